use crate::msm::multi_exp_01;
use crate::sparse::SparseVector;
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::*;
use ark_std::vec::Vec;

/// A pair `(P, α·P)` proving knowledge of the scalar used to form `P`.
///
/// The base lives in `G`, the knowledge component in `H`; the A- and C-query
/// use `(G1, G1)` pairs while the B-query pairs a `G2` base with a `G1`
/// knowledge component.
#[derive(Clone, Copy, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct KnowledgeCommitment<G: AffineRepr, H: AffineRepr> {
    /// The committed element.
    pub g: G,
    /// The same element scaled by the knowledge trapdoor.
    pub h: H,
}

impl<G: AffineRepr, H: AffineRepr> Default for KnowledgeCommitment<G, H> {
    fn default() -> Self {
        Self {
            g: G::zero(),
            h: H::zero(),
        }
    }
}

/// A knowledge commitment with both components in `G1`.
pub type KcG1<E> = KnowledgeCommitment<<E as Pairing>::G1Affine, <E as Pairing>::G1Affine>;

/// A knowledge commitment with base in `G2` and knowledge component in `G1`.
pub type KcG2<E> = KnowledgeCommitment<<E as Pairing>::G2Affine, <E as Pairing>::G1Affine>;

/// A proof in the BCTV14 SNARK.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    /// Commitment to the witness A-polynomial, with its `Z(τ)` blinding.
    pub a: KcG1<E>,
    /// Commitment to the witness B-polynomial.
    pub b: KcG2<E>,
    /// Commitment to the witness C-polynomial.
    pub c: KcG1<E>,
    /// Commitment to the quotient polynomial `H`.
    pub h: E::G1Affine,
    /// The same-coefficient commitment `K`.
    pub k: E::G1Affine,
}

impl<E: Pairing> Default for Proof<E> {
    fn default() -> Self {
        Self {
            a: KnowledgeCommitment::default(),
            b: KnowledgeCommitment::default(),
            c: KnowledgeCommitment::default(),
            h: E::G1Affine::zero(),
            k: E::G1Affine::zero(),
        }
    }
}

impl<E: Pairing> Proof<E> {
    /// Whether every group element is a valid point of the prime-order
    /// subgroup. Verification rejects proofs that are not well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.a.g.check().is_ok()
            && self.a.h.check().is_ok()
            && self.b.g.check().is_ok()
            && self.b.h.check().is_ok()
            && self.c.g.check().is_ok()
            && self.c.h.check().is_ok()
            && self.h.check().is_ok()
            && self.k.check().is_ok()
    }
}

////////////////////////////////////////////////////////////////////////////////

/// The input-consistency query: the public inputs' contribution to the
/// A-polynomial, moved out of the proving key's A-query.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct IcQuery<E: Pairing> {
    /// The constant term (and any inputs folded in so far).
    pub base: E::G1Affine,
    /// One encoded term per public input not yet folded in.
    pub encoded: Vec<E::G1Affine>,
}

impl<E: Pairing> IcQuery<E> {
    /// Number of public inputs the query still expects.
    pub fn num_inputs(&self) -> usize {
        self.encoded.len()
    }

    /// Folds a prefix of the public input into the base.
    ///
    /// Terms beyond `input.len()` are kept, so accumulation composes:
    /// inputs may be supplied across several calls.
    pub fn accumulate(&self, input: &[E::ScalarField]) -> Self {
        let take = input.len().min(self.encoded.len());
        let folded = self.base.into_group() + multi_exp_01(&self.encoded[..take], &input[..take], 0);
        Self {
            base: folded.into_affine(),
            encoded: self.encoded[take..].to_vec(),
        }
    }
}

/// A verification key in the BCTV14 SNARK.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey<E: Pairing> {
    /// `αA·H`, where `H` generates `E::G2`.
    pub alpha_a_g2: E::G2Affine,
    /// `αB·G`, where `G` generates `E::G1`.
    pub alpha_b_g1: E::G1Affine,
    /// `αC·H`.
    pub alpha_c_g2: E::G2Affine,
    /// `γ·H`.
    pub gamma_g2: E::G2Affine,
    /// `γβ·G`.
    pub gamma_beta_g1: E::G1Affine,
    /// `γβ·H`.
    pub gamma_beta_g2: E::G2Affine,
    /// `rC·Z(τ)·H`, the encoded vanishing-polynomial value.
    pub rc_z_g2: E::G2Affine,
    /// The input-consistency query.
    pub ic: IcQuery<E>,
}

/// Preprocessed verification key parameters that enable faster verification
/// at the expense of larger size in memory.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PreparedVerifyingKey<E: Pairing> {
    /// The unprepared verification key.
    pub vk: VerifyingKey<E>,
    /// The `G2` generator, prepared for use in pairings.
    pub g2_one_pc: E::G2Prepared,
    /// `αA·H`, prepared for use in pairings.
    pub alpha_a_g2_pc: E::G2Prepared,
    /// `αB·G`, prepared for use in pairings.
    pub alpha_b_g1_pc: E::G1Prepared,
    /// `αC·H`, prepared for use in pairings.
    pub alpha_c_g2_pc: E::G2Prepared,
    /// `γ·H`, prepared for use in pairings.
    pub gamma_g2_pc: E::G2Prepared,
    /// `-γβ·G`, prepared for use on the denominator side.
    pub gamma_beta_g1_neg_pc: E::G1Prepared,
    /// `γβ·H`, prepared for use in pairings.
    pub gamma_beta_g2_pc: E::G2Prepared,
    /// `rC·Z(τ)·H`, prepared for use in pairings.
    pub rc_z_g2_pc: E::G2Prepared,
}

impl<E: Pairing> From<PreparedVerifyingKey<E>> for VerifyingKey<E> {
    fn from(other: PreparedVerifyingKey<E>) -> Self {
        other.vk
    }
}

impl<E: Pairing> From<VerifyingKey<E>> for PreparedVerifyingKey<E> {
    fn from(other: VerifyingKey<E>) -> Self {
        crate::prepare_verifying_key(&other)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// The prover key for the BCTV14 zkSNARK.
///
/// Query vectors are indexed over `num_variables + 4` slots: slots 0–2 hold
/// the `Z(τ)` blinding entries of the A-, B-, and C-query respectively, and
/// slot `3 + i` holds variable `i` (slot 3 being the constant one). The A-,
/// B-, and C-queries are sparse; in particular the A-query entries for the
/// public inputs are folded into the verification key's IC query and absent
/// here.
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct ProvingKey<E: Pairing> {
    /// The underlying verification key.
    pub vk: VerifyingKey<E>,
    /// The elements `(rA·at_i·G, rA·αA·at_i·G)` in `E::G1`.
    pub a_query: SparseVector<KcG1<E>>,
    /// The elements `(rB·bt_i·H, rB·αB·bt_i·G)` in `E::G2 × E::G1`.
    pub b_query: SparseVector<KcG2<E>>,
    /// The elements `(rC·ct_i·G, rC·αC·ct_i·G)` in `E::G1`.
    pub c_query: SparseVector<KcG1<E>>,
    /// The elements `τ^j·G` in `E::G1`, for the quotient commitment.
    pub h_query: Vec<E::G1Affine>,
    /// The elements `β(rA·at_i + rB·bt_i + rC·ct_i)·G` in `E::G1`.
    pub k_query: Vec<E::G1Affine>,
}
