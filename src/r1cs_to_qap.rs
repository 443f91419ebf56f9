use crate::errors::Error;
use crate::r1cs::{ConstraintSource, LinearCombination};
use ark_ff::{FftField, Field, One, PrimeField, Zero};
use ark_poly::EvaluationDomain;
use ark_std::{vec, vec::Vec};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A QAP instance evaluated at the secret point τ.
///
/// `at`, `bt`, and `ct` are indexed by variable (index 0 is the constant
/// one); `zt` is the vanishing polynomial's value at τ; `degree` is the size
/// of the FFT domain the instance was interpolated over.
pub struct QapInstance<F: PrimeField> {
    /// `A_i(τ)` per variable, including the input-consistency terms.
    pub at: Vec<F>,
    /// `B_i(τ)` per variable.
    pub bt: Vec<F>,
    /// `C_i(τ)` per variable.
    pub ct: Vec<F>,
    /// `Z(τ)`.
    pub zt: F,
    /// The FFT domain size.
    pub degree: usize,
}

#[inline]
fn evaluate_constraint<F: Field>(
    lc: &LinearCombination<F>,
    assignment: &[F],
) -> Result<F, Error> {
    let mut sum = F::zero();
    for (coeff, var) in &lc.0 {
        let val = assignment.get(var.0).ok_or(Error::IndexOutOfBounds)?;
        if coeff.is_one() {
            sum += *val;
        } else {
            sum += *val * coeff;
        }
    }
    Ok(sum)
}

fn accumulate_terms<F: Field>(
    dest: &mut [F],
    lc: &LinearCombination<F>,
    u_k: F,
) -> Result<(), Error> {
    for (coeff, var) in &lc.0 {
        let entry = dest.get_mut(var.0).ok_or(Error::IndexOutOfBounds)?;
        *entry += u_k * coeff;
    }
    Ok(())
}

/// Evaluates every variable's QAP polynomials at τ.
///
/// The evaluation domain covers the constraints plus `num_inputs + 1` extra
/// rows that pin each public input (and the constant) to its own Lagrange
/// basis polynomial in A, keeping the inputs' A-polynomials linearly
/// independent. Coefficients come straight from the sparse constraint rows
/// and the Lagrange evaluations `L_k(τ)`; no polynomial is materialised.
pub fn instance_map_with_evaluation<F, D, S>(
    cs: &S,
    num_inputs: usize,
    t: &F,
) -> Result<QapInstance<F>, Error>
where
    F: PrimeField,
    D: EvaluationDomain<F>,
    S: ConstraintSource<F>,
{
    let num_constraints = cs.num_constraints();
    if num_constraints == 0 {
        return Err(Error::EmptyConstraintSystem);
    }
    let num_variables = cs.num_variables();
    if num_inputs > num_variables {
        return Err(Error::IndexOutOfBounds);
    }

    let domain = D::new(num_constraints + num_inputs + 1)
        .ok_or(Error::PolynomialDegreeTooLarge)?;
    let zt = domain.evaluate_vanishing_polynomial(*t);

    let coefficients_time = start_timer!(|| "Evaluate Lagrange coefficients");
    let u = domain.evaluate_all_lagrange_coefficients(*t);
    end_timer!(coefficients_time);

    let mut at = vec![F::zero(); num_variables + 1];
    let mut bt = vec![F::zero(); num_variables + 1];
    let mut ct = vec![F::zero(); num_variables + 1];

    for i in 0..=num_inputs {
        at[i] += u[num_constraints + i];
    }

    let mut k = 0;
    cs.try_for_each_constraint(&mut |constraint| {
        let u_k = u[k];
        accumulate_terms(&mut at, &constraint.a, u_k)?;
        accumulate_terms(&mut bt, &constraint.b, u_k)?;
        accumulate_terms(&mut ct, &constraint.c, u_k)?;
        k += 1;
        Ok(())
    })?;
    debug_assert_eq!(k, num_constraints);

    Ok(QapInstance {
        at,
        bt,
        ct,
        zt,
        degree: domain.size(),
    })
}

/// The scalars `τ^0, …, τ^degree` the generator encodes as the H-query.
pub fn h_query_powers<F: PrimeField>(degree: usize, t: &F) -> Vec<F> {
    cfg_into_iter!(0..degree + 1)
        .map(|i| t.pow([i as u64]))
        .collect()
}

/// Computes the coefficients of the blinded quotient polynomial `H̃`.
///
/// The witness polynomials are realised as evaluations over the FFT domain
/// (with the input-consistency rows mirroring the instance map), moved to a
/// coset for the exact pointwise division by `Z`, and corrected so that
/// `(aA + d1·Z)(aB + d2·Z) − (aC + d3·Z) = H̃·Z`. The result has
/// `degree + 1` coefficients.
pub fn witness_map<F, D, S>(
    cs: &S,
    num_inputs: usize,
    full_assignment: &[F],
    d1: F,
    d2: F,
    d3: F,
) -> Result<Vec<F>, Error>
where
    F: PrimeField,
    D: EvaluationDomain<F>,
    S: ConstraintSource<F>,
{
    let num_constraints = cs.num_constraints();
    if num_constraints == 0 {
        return Err(Error::EmptyConstraintSystem);
    }
    if full_assignment.len() != cs.num_variables() + 1 {
        return Err(Error::AssignmentLengthMismatch);
    }
    if num_inputs > cs.num_variables() {
        return Err(Error::IndexOutOfBounds);
    }

    let domain = D::new(num_constraints + num_inputs + 1)
        .ok_or(Error::PolynomialDegreeTooLarge)?;
    let domain_size = domain.size();

    let mut a = vec![F::zero(); domain_size];
    let mut b = vec![F::zero(); domain_size];
    let mut c = vec![F::zero(); domain_size];

    let eval_time = start_timer!(|| "Evaluate constraints against the assignment");
    let mut k = 0;
    cs.try_for_each_constraint(&mut |constraint| {
        a[k] = evaluate_constraint(&constraint.a, full_assignment)?;
        b[k] = evaluate_constraint(&constraint.b, full_assignment)?;
        c[k] = evaluate_constraint(&constraint.c, full_assignment)?;
        k += 1;
        Ok(())
    })?;
    end_timer!(eval_time);

    for i in 0..=num_inputs {
        a[num_constraints + i] = full_assignment[i];
    }

    let fft_time = start_timer!(|| "Quotient polynomial over the coset");
    domain.ifft_in_place(&mut a);
    domain.ifft_in_place(&mut b);
    let a_coeffs = a.clone();
    let b_coeffs = b.clone();

    let coset = domain.get_coset(F::GENERATOR).unwrap();
    coset.fft_in_place(&mut a);
    coset.fft_in_place(&mut b);

    let mut ab = domain.mul_polynomials_in_evaluation_domain(&a, &b);
    drop(a);
    drop(b);

    domain.ifft_in_place(&mut c);
    coset.fft_in_place(&mut c);

    cfg_iter_mut!(ab).zip(c).for_each(|(ab_i, c_i)| {
        *ab_i -= &c_i;
    });

    let vanishing_on_coset_inv = domain
        .evaluate_vanishing_polynomial(F::GENERATOR)
        .inverse()
        .unwrap();
    cfg_iter_mut!(ab).for_each(|eval| {
        *eval *= &vanishing_on_coset_inv;
    });
    coset.ifft_in_place(&mut ab);
    end_timer!(fft_time);

    // (aA + d1·Z)(aB + d2·Z) − (aC + d3·Z) = Z·(h + d2·aA + d1·aB + d1·d2·Z − d3)
    let mut h = ab;
    let d1_d2 = d1 * d2;
    h.push(d1_d2);
    cfg_iter_mut!(h[..domain_size])
        .zip(cfg_iter!(a_coeffs))
        .zip(cfg_iter!(b_coeffs))
        .for_each(|((h_i, a_i), b_i)| {
            *h_i += d2 * a_i + d1 * b_i;
        });
    h[0] -= d3;
    h[0] -= d1_d2;

    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msm::horner_evaluate;
    use crate::r1cs::{R1cs, Variable};
    use ark_bls12_381::Fr;
    use ark_ff::UniformRand;
    use ark_poly::GeneralEvaluationDomain;
    use ark_std::test_rng;

    type D = GeneralEvaluationDomain<Fr>;

    // Three multiplication gates over six wires, four of them public.
    fn three_gate_system() -> (R1cs<Fr>, Vec<Fr>, usize) {
        let (d1, d2, d3, d4, d5, d6) = (
            Variable(1),
            Variable(2),
            Variable(3),
            Variable(4),
            Variable(5),
            Variable(6),
        );
        let mut cs = R1cs::new();
        cs.enforce(d1, d2, d5);
        cs.enforce(d1, d3, d6);
        cs.enforce(d5, d6, d4);

        let (v1, v2, v3) = (Fr::from(2u64), Fr::from(3u64), Fr::from(4u64));
        let witness = ark_std::vec![v1, v2, v3, v1 * v1 * v2 * v3, v1 * v2, v1 * v3];
        (cs, witness, 4)
    }

    #[test]
    fn blinded_quotient_satisfies_the_divisibility_identity() {
        let rng = &mut test_rng();
        let (cs, witness, num_inputs) = three_gate_system();
        assert!(cs.is_satisfied(&witness).unwrap());
        let full = crate::r1cs::full_assignment(&witness);

        let domain = D::new(cs.num_constraints() + num_inputs + 1).unwrap();
        let tau = domain.sample_element_outside_domain(rng);
        let qap = instance_map_with_evaluation::<Fr, D, _>(&cs, num_inputs, &tau).unwrap();
        assert_eq!(qap.degree, domain.size());

        let (d1, d2, d3) = (Fr::rand(rng), Fr::rand(rng), Fr::rand(rng));
        let h = witness_map::<Fr, D, _>(&cs, num_inputs, &full, d1, d2, d3).unwrap();
        assert_eq!(h.len(), qap.degree + 1);

        let dot = |coeffs: &[Fr]| -> Fr {
            coeffs.iter().zip(&full).map(|(c, z)| *c * z).sum()
        };
        let a_tau = dot(&qap.at) + d1 * qap.zt;
        let b_tau = dot(&qap.bt) + d2 * qap.zt;
        let c_tau = dot(&qap.ct) + d3 * qap.zt;
        let h_tau = horner_evaluate(&h, &tau);

        assert_eq!(a_tau * b_tau - c_tau, h_tau * qap.zt);
    }

    #[test]
    fn unsatisfied_assignments_break_divisibility() {
        let rng = &mut test_rng();
        let (cs, mut witness, num_inputs) = three_gate_system();
        witness[3] += Fr::from(1u64);
        assert!(!cs.is_satisfied(&witness).unwrap());
        let full = crate::r1cs::full_assignment(&witness);

        let domain = D::new(cs.num_constraints() + num_inputs + 1).unwrap();
        let tau = domain.sample_element_outside_domain(rng);
        let qap = instance_map_with_evaluation::<Fr, D, _>(&cs, num_inputs, &tau).unwrap();
        let zero = Fr::from(0u64);
        let h = witness_map::<Fr, D, _>(&cs, num_inputs, &full, zero, zero, zero).unwrap();

        let dot = |coeffs: &[Fr]| -> Fr {
            coeffs.iter().zip(&full).map(|(c, z)| *c * z).sum()
        };
        let lhs = dot(&qap.at) * dot(&qap.bt) - dot(&qap.ct);
        assert_ne!(lhs, horner_evaluate(&h, &tau) * qap.zt);
    }

    #[test]
    fn h_powers_are_consecutive() {
        let rng = &mut test_rng();
        let tau = Fr::rand(rng);
        let powers = h_query_powers(5, &tau);
        assert_eq!(powers.len(), 6);
        assert_eq!(powers[0], Fr::from(1u64));
        for window in powers.windows(2) {
            assert_eq!(window[1], window[0] * tau);
        }
    }
}
