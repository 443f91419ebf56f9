use crate::data_structures::{IcQuery, KnowledgeCommitment, ProvingKey, VerifyingKey};
use crate::errors::Error;
use crate::progress::{NoProgress, ProgressObserver};
use crate::r1cs::ConstraintSource;
use crate::r1cs_to_qap::{h_query_powers, instance_map_with_evaluation};
use crate::sparse::SparseVector;
use crate::window::WindowTable;
use ark_ec::{pairing::Pairing, CurveGroup, Group};
use ark_ff::{PrimeField, UniformRand, Zero};
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use ark_std::rand::Rng;
use ark_std::{vec, vec::Vec};
use zeroize::Zeroize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The generator's secret randomness. Zeroised on drop, so no trapdoor
/// survives key generation, early abort included.
struct Trapdoors<F: PrimeField> {
    tau: F,
    alpha_a: F,
    alpha_b: F,
    alpha_c: F,
    rho_a: F,
    rho_b: F,
    rho_c: F,
    beta: F,
    gamma: F,
}

impl<F: PrimeField> Trapdoors<F> {
    fn sample<D: EvaluationDomain<F>>(domain: &D, rng: &mut impl Rng) -> Self {
        let rho_a = F::rand(rng);
        let rho_b = F::rand(rng);
        Self {
            tau: domain.sample_element_outside_domain(rng),
            alpha_a: F::rand(rng),
            alpha_b: F::rand(rng),
            alpha_c: F::rand(rng),
            rho_a,
            rho_b,
            rho_c: rho_a * rho_b,
            beta: F::rand(rng),
            gamma: F::rand(rng),
        }
    }
}

impl<F: PrimeField> Drop for Trapdoors<F> {
    fn drop(&mut self) {
        self.tau.zeroize();
        self.alpha_a.zeroize();
        self.alpha_b.zeroize();
        self.alpha_c.zeroize();
        self.rho_a.zeroize();
        self.rho_b.zeroize();
        self.rho_c.zeroize();
        self.beta.zeroize();
        self.gamma.zeroize();
    }
}

/// Generates a proving key (with its embedded verification key) for the
/// constraint system `cs`, whose first `num_inputs` variables are public.
#[inline]
pub fn generate_random_parameters<E, S, R>(
    cs: &S,
    num_inputs: usize,
    rng: &mut R,
) -> Result<ProvingKey<E>, Error>
where
    E: Pairing,
    S: ConstraintSource<E::ScalarField>,
    R: Rng,
{
    generate_parameters_with_progress(cs, num_inputs, rng, &mut NoProgress)
}

/// [`generate_random_parameters`] reporting its seven major steps to
/// `observer`, which may abort the generation at any step boundary.
pub fn generate_parameters_with_progress<E, S, R>(
    cs: &S,
    num_inputs: usize,
    rng: &mut R,
    observer: &mut dyn ProgressObserver,
) -> Result<ProvingKey<E>, Error>
where
    E: Pairing,
    S: ConstraintSource<E::ScalarField>,
    R: Rng,
{
    type D<F> = GeneralEvaluationDomain<F>;

    let setup_time = start_timer!(|| "BCTV14::Generator");
    observer.major_steps(7);

    let num_constraints = cs.num_constraints();
    if num_constraints == 0 {
        return Err(Error::EmptyConstraintSystem);
    }
    let num_variables = cs.num_variables();
    if num_inputs > num_variables {
        return Err(Error::IndexOutOfBounds);
    }

    let domain = D::<E::ScalarField>::new(num_constraints + num_inputs + 1)
        .ok_or(Error::PolynomialDegreeTooLarge)?;
    let td = Trapdoors::sample(&domain, rng);

    let reduction_time = start_timer!(|| "R1CS to QAP instance map with evaluation");
    let qap =
        instance_map_with_evaluation::<E::ScalarField, D<E::ScalarField>, S>(cs, num_inputs, &td.tau)?;
    end_timer!(reduction_time);
    let degree = qap.degree;
    let zt = qap.zt;

    // Extended query vectors over `num_variables + 4` slots: slots 0-2 carry
    // the Z(τ) blinding entry of the A-, B-, and C-query respectively, and
    // slot `3 + i` carries variable `i`.
    let query_len = num_variables + 4;
    let mut at = vec![E::ScalarField::zero(); query_len];
    let mut bt = vec![E::ScalarField::zero(); query_len];
    let mut ct = vec![E::ScalarField::zero(); query_len];
    at[0] = zt;
    bt[1] = zt;
    ct[2] = zt;
    at[3..].copy_from_slice(&qap.at);
    bt[3..].copy_from_slice(&qap.bt);
    ct[3..].copy_from_slice(&qap.ct);

    // The K-query covers the public-input slots, so its coefficients must be
    // taken before the IC folding zeroes those slots in `at`.
    let kt: Vec<E::ScalarField> = cfg_into_iter!(0..query_len)
        .map(|i| td.beta * (td.rho_a * at[i] + td.rho_b * bt[i] + td.rho_c * ct[i]))
        .collect();

    // Fold the public inputs (and the constant) out of the A-query.
    let mut ic_coeffs = Vec::with_capacity(num_inputs + 1);
    for slot in 3..=3 + num_inputs {
        ic_coeffs.push(td.rho_a * at[slot]);
        at[slot] = E::ScalarField::zero();
    }

    let non_zero = |v: &[E::ScalarField]| v.iter().filter(|e| !e.is_zero()).count();
    let (nz_a, nz_b, nz_c) = (non_zero(&at), non_zero(&bt), non_zero(&ct));
    let g1_count = 2 * nz_a + nz_b + 2 * nz_c + (degree + 1) + query_len + num_inputs + 1;
    let g2_count = nz_b;

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let g1_table_time = start_timer!(|| "Compute G1 window table");
    let g1_table = WindowTable::<E::G1>::new(g1_count);
    end_timer!(g1_table_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let g2_table_time = start_timer!(|| "Compute G2 window table");
    let g2_table = WindowTable::<E::G2>::new(g2_count);
    end_timer!(g2_table_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let k_time = start_timer!(|| "Calculate K");
    let k_query = E::G1::normalize_batch(&g1_table.batch_exp(&kt));
    drop(kt);
    end_timer!(k_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let a_time = start_timer!(|| "Calculate A");
    let a_query = kc_query(&g1_table, &g1_table, td.rho_a, td.rho_a * td.alpha_a, &at);
    drop(at);
    end_timer!(a_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let b_time = start_timer!(|| "Calculate B");
    let b_query = kc_query(&g2_table, &g1_table, td.rho_b, td.rho_b * td.alpha_b, &bt);
    drop(bt);
    drop(g2_table);
    end_timer!(b_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let c_time = start_timer!(|| "Calculate C");
    let c_query = kc_query(&g1_table, &g1_table, td.rho_c, td.rho_c * td.alpha_c, &ct);
    drop(ct);
    end_timer!(c_time);

    if !observer.major() {
        return Err(Error::Aborted);
    }
    let h_time = start_timer!(|| "Calculate H");
    let h_query = E::G1::normalize_batch(&g1_table.batch_exp(&h_query_powers(degree, &td.tau)));
    end_timer!(h_time);

    let vk_time = start_timer!(|| "Generate the R1CS verification key");
    let ic_base = (E::G1::generator() * ic_coeffs[0]).into_affine();
    let ic_encoded = E::G1::normalize_batch(&g1_table.batch_exp(&ic_coeffs[1..]));
    drop(g1_table);

    let mut gamma_beta = td.gamma * td.beta;
    let vk = VerifyingKey::<E> {
        alpha_a_g2: (E::G2::generator() * td.alpha_a).into_affine(),
        alpha_b_g1: (E::G1::generator() * td.alpha_b).into_affine(),
        alpha_c_g2: (E::G2::generator() * td.alpha_c).into_affine(),
        gamma_g2: (E::G2::generator() * td.gamma).into_affine(),
        gamma_beta_g1: (E::G1::generator() * gamma_beta).into_affine(),
        gamma_beta_g2: (E::G2::generator() * gamma_beta).into_affine(),
        rc_z_g2: (E::G2::generator() * (td.rho_c * zt)).into_affine(),
        ic: IcQuery {
            base: ic_base,
            encoded: ic_encoded,
        },
    };
    gamma_beta.zeroize();
    drop(td);
    end_timer!(vk_time);

    end_timer!(setup_time);

    Ok(ProvingKey {
        vk,
        a_query,
        b_query,
        c_query,
        h_query,
        k_query,
    })
}

/// Encodes the non-zero entries of `scalars` as knowledge commitments
/// `(g_coeff·s·G, h_coeff·s·H)`, keyed by their slot index.
fn kc_query<G, H>(
    g_table: &WindowTable<G>,
    h_table: &WindowTable<H>,
    g_coeff: G::ScalarField,
    h_coeff: G::ScalarField,
    scalars: &[G::ScalarField],
) -> SparseVector<KnowledgeCommitment<G::Affine, H::Affine>>
where
    G: CurveGroup,
    H: CurveGroup<ScalarField = G::ScalarField>,
{
    let (indices, entries): (Vec<usize>, Vec<G::ScalarField>) = scalars
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_zero())
        .map(|(i, s)| (i, *s))
        .unzip();

    let g_scalars: Vec<_> = cfg_iter!(entries).map(|s| g_coeff * s).collect();
    let h_scalars: Vec<_> = cfg_iter!(entries).map(|s| h_coeff * s).collect();
    let g_points = G::normalize_batch(&g_table.batch_exp(&g_scalars));
    let h_points = H::normalize_batch(&h_table.batch_exp(&h_scalars));

    indices
        .into_iter()
        .zip(g_points.into_iter().zip(h_points))
        .map(|(index, (g, h))| (index, KnowledgeCommitment { g, h }))
        .collect()
}
