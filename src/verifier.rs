use crate::data_structures::{PreparedVerifyingKey, Proof, VerifyingKey};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::One;

use core::ops::Neg;

/// Prepares the verifying key `vk` for use in proof verification.
///
/// Miller-loop precomputation is done once per fixed pairing operand, so its
/// cost amortises across verifications. The `γβ·G` point is stored negated
/// because it only ever appears on the denominator side of a check.
pub fn prepare_verifying_key<E: Pairing>(vk: &VerifyingKey<E>) -> PreparedVerifyingKey<E> {
    PreparedVerifyingKey {
        vk: vk.clone(),
        g2_one_pc: E::G2Affine::generator().into(),
        alpha_a_g2_pc: vk.alpha_a_g2.into(),
        alpha_b_g1_pc: vk.alpha_b_g1.into(),
        alpha_c_g2_pc: vk.alpha_c_g2.into(),
        gamma_g2_pc: vk.gamma_g2.into(),
        gamma_beta_g1_neg_pc: vk.gamma_beta_g1.into_group().neg().into_affine().into(),
        gamma_beta_g2_pc: vk.gamma_beta_g2.into(),
        rc_z_g2_pc: vk.rc_z_g2.into(),
    }
}

/// One verification equation: the product of the listed pairings must be the
/// identity in `GT`. Denominator operands are passed negated, so each check
/// is a single multi-Miller loop and one final exponentiation.
fn pairing_product_is_one<E, G1S, G2S>(g1: G1S, g2: G2S) -> bool
where
    E: Pairing,
    G1S: IntoIterator<Item = E::G1Prepared>,
    G2S: IntoIterator<Item = E::G2Prepared>,
{
    match E::final_exponentiation(E::multi_miller_loop(g1, g2)) {
        Some(product) => product.0.is_one(),
        None => false,
    }
}

fn neg_affine<G: AffineRepr>(point: G) -> G {
    point.into_group().neg().into_affine()
}

/// Verifies `proof` against a public-input *prefix*.
///
/// Inputs not supplied are left in the accumulated IC query, so the pairing
/// checks run against whatever prefix was given; production callers want
/// [`verify_proof`], which insists on the full input. Total: never errors.
pub fn weak_verify_proof<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    proof: &Proof<E>,
    public_input: &[E::ScalarField],
) -> bool {
    if !proof.is_well_formed() {
        return false;
    }

    let acc = pvk.vk.ic.accumulate(public_input);
    let b_g_pc: E::G2Prepared = proof.b.g.into();

    // Knowledge commitment for A: e(A₁, αA·G2) = e(A₂, G2).
    if !pairing_product_is_one::<E, _, _>(
        [proof.a.g.into(), neg_affine(proof.a.h).into()],
        [pvk.alpha_a_g2_pc.clone(), pvk.g2_one_pc.clone()],
    ) {
        return false;
    }

    // Knowledge commitment for B: e(αB·G1, B₁) = e(B₂, G2).
    if !pairing_product_is_one::<E, _, _>(
        [pvk.alpha_b_g1_pc.clone(), neg_affine(proof.b.h).into()],
        [b_g_pc.clone(), pvk.g2_one_pc.clone()],
    ) {
        return false;
    }

    // Knowledge commitment for C: e(C₁, αC·G2) = e(C₂, G2).
    if !pairing_product_is_one::<E, _, _>(
        [proof.c.g.into(), neg_affine(proof.c.h).into()],
        [pvk.alpha_c_g2_pc.clone(), pvk.g2_one_pc.clone()],
    ) {
        return false;
    }

    // QAP divisibility: e(A₁ + acc, B₁) = e(H, rC·Z·G2)·e(C₁, G2).
    let a_acc = (proof.a.g.into_group() + acc.base).into_affine();
    if !pairing_product_is_one::<E, _, _>(
        [
            a_acc.into(),
            neg_affine(proof.h).into(),
            neg_affine(proof.c.g).into(),
        ],
        [
            b_g_pc.clone(),
            pvk.rc_z_g2_pc.clone(),
            pvk.g2_one_pc.clone(),
        ],
    ) {
        return false;
    }

    // Same coefficients: e(K, γ·G2) = e(A₁ + acc + C₁, γβ·G2)·e(γβ·G1, B₁).
    let a_acc_c = (a_acc.into_group() + proof.c.g).into_affine();
    pairing_product_is_one::<E, _, _>(
        [
            proof.k.into(),
            neg_affine(a_acc_c).into(),
            pvk.gamma_beta_g1_neg_pc.clone(),
        ],
        [
            pvk.gamma_g2_pc.clone(),
            pvk.gamma_beta_g2_pc.clone(),
            b_g_pc,
        ],
    )
}

/// Verifies `proof` against the full public input.
///
/// Rejects immediately unless exactly `num_inputs` inputs are supplied, then
/// runs the five pairing checks. Total: never errors.
pub fn verify_proof<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    proof: &Proof<E>,
    public_input: &[E::ScalarField],
) -> bool {
    pvk.vk.ic.num_inputs() == public_input.len() && weak_verify_proof(pvk, proof, public_input)
}
