use crate::data_structures::KnowledgeCommitment;
use crate::sparse::SparseVector;
use ark_ec::{AffineRepr, VariableBaseMSM};
use ark_ff::{Field, One, Zero};
use ark_std::vec::Vec;

/// Multi-scalar multiplication with shortcuts for special scalars.
///
/// Scalars are split into three buckets: zeros are skipped, `±1` become plain
/// additions, and only the general bucket is handed to the Pippenger routine.
/// `reserve_hint` caps the general bucket's initial capacity, trading memory
/// for reallocation; `0` means size for the worst case.
pub fn multi_exp_01<G: AffineRepr>(
    bases: &[G],
    scalars: &[G::ScalarField],
    reserve_hint: usize,
) -> G::Group {
    let capacity = match reserve_hint {
        0 => scalars.len().min(bases.len()),
        hint => hint,
    };
    let mut general_bases = Vec::with_capacity(capacity);
    let mut general_scalars = Vec::with_capacity(capacity);

    let one = G::ScalarField::one();
    let minus_one = -one;

    let mut acc = G::Group::zero();
    for (base, scalar) in bases.iter().zip(scalars) {
        if scalar.is_zero() {
            continue;
        } else if *scalar == one {
            acc += *base;
        } else if *scalar == minus_one {
            acc -= *base;
        } else {
            general_bases.push(*base);
            general_scalars.push(*scalar);
        }
    }

    acc + G::Group::msm_unchecked(&general_bases, &general_scalars)
}

/// [`multi_exp_01`] over a sparse knowledge-commitment query.
///
/// Entry `offset + i` of the query is scaled by `scalars[i]`; entries outside
/// `[offset, offset + scalars.len())` and absent entries contribute nothing.
/// Both components of each commitment are accumulated.
pub fn sparse_kc_multi_exp_01<G, H>(
    query: &SparseVector<KnowledgeCommitment<G, H>>,
    scalars: &[G::ScalarField],
    offset: usize,
    reserve_hint: usize,
) -> (G::Group, H::Group)
where
    G: AffineRepr,
    H: AffineRepr<ScalarField = G::ScalarField>,
{
    let capacity = match reserve_hint {
        0 => scalars.len().min(query.len()),
        hint => hint,
    };
    let mut g_bases = Vec::with_capacity(capacity);
    let mut h_bases = Vec::with_capacity(capacity);
    let mut general_scalars = Vec::with_capacity(capacity);

    let one = G::ScalarField::one();
    let minus_one = -one;

    let mut g_acc = G::Group::zero();
    let mut h_acc = H::Group::zero();
    for (index, commitment) in query.iter() {
        if index < offset || index - offset >= scalars.len() {
            continue;
        }
        let scalar = scalars[index - offset];
        if scalar.is_zero() {
            continue;
        } else if scalar == one {
            g_acc += commitment.g;
            h_acc += commitment.h;
        } else if scalar == minus_one {
            g_acc -= commitment.g;
            h_acc -= commitment.h;
        } else {
            g_bases.push(commitment.g);
            h_bases.push(commitment.h);
            general_scalars.push(scalar);
        }
    }

    g_acc += G::Group::msm_unchecked(&g_bases, &general_scalars);
    h_acc += H::Group::msm_unchecked(&h_bases, &general_scalars);
    (g_acc, h_acc)
}

/// Evaluates a polynomial given by `coeffs` at `point` by Horner's rule.
pub(crate) fn horner_evaluate<F: Field>(coeffs: &[F], point: &F) -> F {
    coeffs
        .iter()
        .rfold(F::zero(), |acc, coeff| acc * point + coeff)
}
