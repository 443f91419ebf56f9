use crate::data_structures::{KnowledgeCommitment, Proof, ProvingKey};
use crate::errors::Error;
use crate::msm::{multi_exp_01, sparse_kc_multi_exp_01};
use crate::progress::{NoProgress, ProgressObserver};
use crate::r1cs::{full_assignment, ConstraintSource};
use crate::r1cs_to_qap::witness_map;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{UniformRand, Zero};
use ark_poly::GeneralEvaluationDomain;
use ark_std::rand::Rng;

/// Creates a zero-knowledge proof, sampling the blinding through `rng`.
#[inline]
pub fn create_random_proof<E, S, R>(
    cs: &S,
    num_inputs: usize,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    rng: &mut R,
) -> Result<Proof<E>, Error>
where
    E: Pairing,
    S: ConstraintSource<E::ScalarField>,
    R: Rng,
{
    let d1 = E::ScalarField::rand(rng);
    let d2 = E::ScalarField::rand(rng);
    let d3 = E::ScalarField::rand(rng);

    create_proof(cs, num_inputs, pk, witness, d1, d2, d3)
}

/// Creates a proof that is *not* zero-knowledge.
#[inline]
pub fn create_proof_no_zk<E, S>(
    cs: &S,
    num_inputs: usize,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
) -> Result<Proof<E>, Error>
where
    E: Pairing,
    S: ConstraintSource<E::ScalarField>,
{
    let zero = E::ScalarField::zero();
    create_proof(cs, num_inputs, pk, witness, zero, zero, zero)
}

/// Creates a proof using blinding `d1`, `d2`, `d3`.
#[inline]
pub fn create_proof<E, S>(
    cs: &S,
    num_inputs: usize,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    d1: E::ScalarField,
    d2: E::ScalarField,
    d3: E::ScalarField,
) -> Result<Proof<E>, Error>
where
    E: Pairing,
    S: ConstraintSource<E::ScalarField>,
{
    create_proof_with_progress(cs, num_inputs, pk, witness, d1, d2, d3, 0, &mut NoProgress)
}

/// [`create_proof`] reporting its five major steps to `observer`.
///
/// `reserve_tune` sizes the general-scalar bucket of the multi-exponentiation
/// at roughly `num_variables / reserve_tune` entries, trading memory for
/// reallocation; `0` means auto.
#[allow(clippy::too_many_arguments)]
pub fn create_proof_with_progress<E, S>(
    cs: &S,
    num_inputs: usize,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    d1: E::ScalarField,
    d2: E::ScalarField,
    d3: E::ScalarField,
    reserve_tune: usize,
    observer: &mut dyn ProgressObserver,
) -> Result<Proof<E>, Error>
where
    E: Pairing,
    S: ConstraintSource<E::ScalarField>,
{
    type D<F> = GeneralEvaluationDomain<F>;

    let prover_time = start_timer!(|| "BCTV14::Prover");
    observer.major_steps(5);

    let num_variables = cs.num_variables();
    if witness.len() != num_variables {
        return Err(Error::AssignmentLengthMismatch);
    }
    if pk.k_query.len() != num_variables + 4 {
        return Err(Error::MalformedProvingKey);
    }

    let assignment = full_assignment(witness);

    let witness_map_time = start_timer!(|| "R1CS to QAP witness map");
    let h_coeffs =
        witness_map::<E::ScalarField, D<E::ScalarField>, S>(cs, num_inputs, &assignment, d1, d2, d3)?;
    end_timer!(witness_map_time);
    if pk.h_query.len() != h_coeffs.len() {
        return Err(Error::MalformedProvingKey);
    }

    let reserve_hint = match reserve_tune {
        0 => 0,
        tune => num_variables / tune,
    };

    // The public-input slots of the A-query were folded into the IC query at
    // generation time, so the sums below never touch them.
    if !observer.major() {
        return Err(Error::Aborted);
    }
    let a_time = start_timer!(|| "Compute A");
    let a0 = pk.a_query.get_by_index(0);
    let a3 = pk.a_query.get_by_index(3);
    let (a_acc_g, a_acc_h) = sparse_kc_multi_exp_01(&pk.a_query, witness, 4, reserve_hint);
    let a_g = a0.g.into_group() * d1 + a3.g + a_acc_g;
    let a_h = a0.h.into_group() * d1 + a3.h + a_acc_h;
    end_timer!(a_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let b_time = start_timer!(|| "Compute B");
    let b1 = pk.b_query.get_by_index(1);
    let b3 = pk.b_query.get_by_index(3);
    let (b_acc_g, b_acc_h) = sparse_kc_multi_exp_01(&pk.b_query, witness, 4, reserve_hint);
    let b_g = b1.g.into_group() * d2 + b3.g + b_acc_g;
    let b_h = b1.h.into_group() * d2 + b3.h + b_acc_h;
    end_timer!(b_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let c_time = start_timer!(|| "Compute C");
    let c2 = pk.c_query.get_by_index(2);
    let c3 = pk.c_query.get_by_index(3);
    let (c_acc_g, c_acc_h) = sparse_kc_multi_exp_01(&pk.c_query, witness, 4, reserve_hint);
    let c_g = c2.g.into_group() * d3 + c3.g + c_acc_g;
    let c_h = c2.h.into_group() * d3 + c3.h + c_acc_h;
    end_timer!(c_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let h_time = start_timer!(|| "Compute H");
    let h_acc = E::G1::msm_unchecked(&pk.h_query, &h_coeffs);
    end_timer!(h_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let k_time = start_timer!(|| "Compute K");
    let k_acc = pk.k_query[0].into_group() * d1
        + pk.k_query[1].into_group() * d2
        + pk.k_query[2].into_group() * d3
        + pk.k_query[3]
        + multi_exp_01(&pk.k_query[4..], witness, reserve_hint);
    end_timer!(k_time);

    end_timer!(prover_time);

    Ok(Proof {
        a: KnowledgeCommitment {
            g: a_g.into_affine(),
            h: a_h.into_affine(),
        },
        b: KnowledgeCommitment {
            g: b_g.into_affine(),
            h: b_h.into_affine(),
        },
        c: KnowledgeCommitment {
            g: c_g.into_affine(),
            h: c_h.into_affine(),
        },
        h: h_acc.into_affine(),
        k: k_acc.into_affine(),
    })
}
