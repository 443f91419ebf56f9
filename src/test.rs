use crate::errors::Error;
use crate::progress::ProgressObserver;
use crate::r1cs::{ConstraintSource, R1cs, Variable};
use crate::{
    create_proof_no_zk, create_proof_with_progress, create_random_proof,
    generate_parameters_with_progress, generate_random_parameters, prepare_verifying_key,
    verify_proof, weak_verify_proof, Proof, ProvingKey, VerifyingKey,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{Field, One, UniformRand};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::Rng;
use ark_std::{boxed::Box, test_rng, vec::Vec};

/// `z = x·y` with `z` public: `z` is variable 1, `x` and `y` are witnesses.
fn product_system<F: Field>() -> R1cs<F> {
    let mut cs = R1cs::new();
    for _ in 0..6 {
        cs.enforce(Variable(2), Variable(3), Variable(1));
    }
    cs
}

fn product_witness<F: Field>(rng: &mut impl Rng) -> [F; 3] {
    let x = F::rand(rng);
    let y = F::rand(rng);
    [x * y, x, y]
}

fn prove_and_verify<E: Pairing>(zk: bool) {
    let rng = &mut test_rng();
    let cs = product_system::<E::ScalarField>();
    let pk = generate_random_parameters::<E, _, _>(&cs, 1, rng).unwrap();
    let pvk = prepare_verifying_key(&pk.vk);

    for _ in 0..10 {
        let witness = product_witness::<E::ScalarField>(rng);
        assert!(cs.is_satisfied(&witness).unwrap());

        let proof = if zk {
            create_random_proof(&cs, 1, &pk, &witness, rng).unwrap()
        } else {
            create_proof_no_zk(&cs, 1, &pk, &witness).unwrap()
        };

        assert!(proof.is_well_formed());
        assert!(verify_proof(&pvk, &proof, &[witness[0]]));
        assert!(!verify_proof(
            &pvk,
            &proof,
            &[witness[0] + E::ScalarField::one()]
        ));
    }
}

fn tampered_proofs_are_rejected<E: Pairing>() {
    let rng = &mut test_rng();
    let cs = product_system::<E::ScalarField>();
    let pk = generate_random_parameters::<E, _, _>(&cs, 1, rng).unwrap();
    let pvk = prepare_verifying_key(&pk.vk);

    let witness = product_witness::<E::ScalarField>(rng);
    let input = [witness[0]];
    let proof = create_random_proof(&cs, 1, &pk, &witness, rng).unwrap();
    assert!(verify_proof(&pvk, &proof, &input));

    let g1_zero = E::G1Affine::zero();
    let g2_zero = E::G2Affine::zero();
    let g1_foreign = E::G1::rand(rng).into_affine();
    let g2_foreign = E::G2::rand(rng).into_affine();

    let mutations: Vec<Box<dyn Fn(&mut Proof<E>)>> = ark_std::vec![
        Box::new(move |p| p.a.g = g1_zero),
        Box::new(move |p| p.a.g = g1_foreign),
        Box::new(move |p| p.a.h = g1_zero),
        Box::new(move |p| p.a.h = g1_foreign),
        Box::new(move |p| p.b.g = g2_zero),
        Box::new(move |p| p.b.g = g2_foreign),
        Box::new(move |p| p.b.h = g1_zero),
        Box::new(move |p| p.b.h = g1_foreign),
        Box::new(move |p| p.c.g = g1_zero),
        Box::new(move |p| p.c.g = g1_foreign),
        Box::new(move |p| p.c.h = g1_zero),
        Box::new(move |p| p.c.h = g1_foreign),
        Box::new(move |p| p.h = g1_zero),
        Box::new(move |p| p.h = g1_foreign),
        Box::new(move |p| p.k = g1_zero),
        Box::new(move |p| p.k = g1_foreign),
    ];

    for mutate in &mutations {
        let mut tampered = proof.clone();
        mutate(&mut tampered);
        assert!(!verify_proof(&pvk, &tampered, &input));
    }
}

fn serialization_round_trips<E: Pairing>() {
    let rng = &mut test_rng();
    let cs = product_system::<E::ScalarField>();
    let pk = generate_random_parameters::<E, _, _>(&cs, 1, rng).unwrap();

    let mut pk_bytes = Vec::new();
    pk.serialize_compressed(&mut pk_bytes).unwrap();
    let reloaded_pk = ProvingKey::<E>::deserialize_compressed(&mut pk_bytes.as_slice()).unwrap();
    assert_eq!(pk, reloaded_pk);

    let mut vk_bytes = Vec::new();
    pk.vk.serialize_compressed(&mut vk_bytes).unwrap();
    let reloaded_vk = VerifyingKey::<E>::deserialize_compressed(&mut vk_bytes.as_slice()).unwrap();
    assert_eq!(pk.vk, reloaded_vk);

    let witness = product_witness::<E::ScalarField>(rng);
    let proof = create_random_proof(&cs, 1, &reloaded_pk, &witness, rng).unwrap();

    let mut proof_bytes = Vec::new();
    proof.serialize_compressed(&mut proof_bytes).unwrap();
    let reloaded_proof = Proof::<E>::deserialize_compressed(&mut proof_bytes.as_slice()).unwrap();
    assert_eq!(proof, reloaded_proof);

    let pvk = prepare_verifying_key(&reloaded_vk);
    assert!(verify_proof(&pvk, &reloaded_proof, &[witness[0]]));
}

fn input_consistency_query_is_folded<E: Pairing>() {
    let rng = &mut test_rng();
    let cs = product_system::<E::ScalarField>();
    let num_inputs = 1;
    let pk = generate_random_parameters::<E, _, _>(&cs, num_inputs, rng).unwrap();

    // The constant and every public input live in the IC query, not the
    // A-query.
    for slot in 3..=3 + num_inputs {
        assert!(!pk.a_query.contains_index(slot));
    }
    assert!(pk.a_query.contains_index(0));
    assert_eq!(pk.vk.ic.num_inputs(), num_inputs);
    assert_eq!(pk.k_query.len(), cs.num_variables() + 4);
}

fn strong_verification_needs_the_whole_input<E: Pairing>() {
    let rng = &mut test_rng();
    let cs = product_system::<E::ScalarField>();
    let pk = generate_random_parameters::<E, _, _>(&cs, 1, rng).unwrap();
    let pvk = prepare_verifying_key(&pk.vk);

    let witness = product_witness::<E::ScalarField>(rng);
    let proof = create_random_proof(&cs, 1, &pk, &witness, rng).unwrap();

    assert!(weak_verify_proof(&pvk, &proof, &[witness[0]]));
    // Too few inputs: strong verification refuses outright, weak runs the
    // checks against the partial accumulator and they fail.
    assert!(!verify_proof(&pvk, &proof, &[]));
    assert!(!weak_verify_proof(&pvk, &proof, &[]));
    // Too many inputs.
    assert!(!verify_proof(&pvk, &proof, &[witness[0], witness[1]]));
}

struct AbortAfter {
    steps_left: usize,
}

impl ProgressObserver for AbortAfter {
    fn major(&mut self) -> bool {
        if self.steps_left == 0 {
            false
        } else {
            self.steps_left -= 1;
            true
        }
    }
}

fn cancellation_stops_at_step_boundaries<E: Pairing>() {
    let rng = &mut test_rng();
    let cs = product_system::<E::ScalarField>();

    let aborted = generate_parameters_with_progress::<E, _, _>(
        &cs,
        1,
        rng,
        &mut AbortAfter { steps_left: 2 },
    );
    assert!(matches!(aborted, Err(Error::Aborted)));

    let pk = generate_random_parameters::<E, _, _>(&cs, 1, rng).unwrap();
    let witness = product_witness::<E::ScalarField>(rng);
    let zero = E::ScalarField::from(0u64);
    let aborted = create_proof_with_progress(
        &cs,
        1,
        &pk,
        &witness,
        zero,
        zero,
        zero,
        0,
        &mut AbortAfter { steps_left: 3 },
    );
    assert!(matches!(aborted, Err(Error::Aborted)));

    // A reserve hint must not change the proof for fixed blinding.
    let tuned = create_proof_with_progress(
        &cs,
        1,
        &pk,
        &witness,
        zero,
        zero,
        zero,
        2,
        &mut crate::NoProgress,
    )
    .unwrap();
    let untuned = create_proof_no_zk(&cs, 1, &pk, &witness).unwrap();
    assert_eq!(tuned, untuned);
}

mod bls12_377 {
    use super::*;
    use ark_bls12_377::Bls12_377;

    #[test]
    fn prove_and_verify_hiding() {
        prove_and_verify::<Bls12_377>(true);
    }

    #[test]
    fn prove_and_verify_no_hiding() {
        prove_and_verify::<Bls12_377>(false);
    }

    #[test]
    fn rejects_tampered_proofs() {
        tampered_proofs_are_rejected::<Bls12_377>();
    }

    #[test]
    fn serialization() {
        serialization_round_trips::<Bls12_377>();
    }
}

mod bls12_381 {
    use super::*;
    use ark_bls12_381::Bls12_381;

    #[test]
    fn prove_and_verify_hiding() {
        prove_and_verify::<Bls12_381>(true);
    }

    #[test]
    fn prove_and_verify_no_hiding() {
        prove_and_verify::<Bls12_381>(false);
    }

    #[test]
    fn rejects_tampered_proofs() {
        tampered_proofs_are_rejected::<Bls12_381>();
    }

    #[test]
    fn serialization() {
        serialization_round_trips::<Bls12_381>();
    }

    #[test]
    fn ic_query_shape() {
        input_consistency_query_is_folded::<Bls12_381>();
    }

    #[test]
    fn strong_vs_weak_verification() {
        strong_verification_needs_the_whole_input::<Bls12_381>();
    }

    #[test]
    fn cancellation() {
        cancellation_stops_at_step_boundaries::<Bls12_381>();
    }
}
