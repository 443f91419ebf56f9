use crate::errors::Error;
use ark_ff::{Field, One, Zero};
use ark_std::vec::Vec;
use core::ops::{Add, Mul, Neg, Sub};

/// A variable in a rank-1 constraint system.
///
/// Variables are numbered from 1; index 0 is reserved for the constant one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Variable(pub usize);

/// The constant-one variable.
pub const ONE: Variable = Variable(0);

/// A sparse linear combination `Σ coeff·var` over the variables of a system.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinearCombination<F: Field>(pub Vec<(F, Variable)>);

impl<F: Field> LinearCombination<F> {
    /// The empty combination.
    pub fn zero() -> Self {
        Self(Vec::new())
    }

    /// A single term `coeff·var`.
    pub fn term(coeff: F, var: Variable) -> Self {
        Self(ark_std::vec![(coeff, var)])
    }

    /// Evaluates the combination against a full assignment `(1, witness)`.
    pub fn evaluate(&self, assignment: &[F]) -> F {
        let mut sum = F::zero();
        for (coeff, var) in &self.0 {
            let val = assignment[var.0];
            if coeff.is_one() {
                sum += val;
            } else {
                sum += val * coeff;
            }
        }
        sum
    }

    /// The highest variable index referenced, if any term is present.
    pub fn max_index(&self) -> Option<usize> {
        self.0.iter().map(|(_, var)| var.0).max()
    }
}

impl<F: Field> From<Variable> for LinearCombination<F> {
    fn from(var: Variable) -> Self {
        Self::term(F::one(), var)
    }
}

impl<F: Field> Add<Variable> for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, var: Variable) -> Self {
        self.0.push((F::one(), var));
        self
    }
}

impl<F: Field> Sub<Variable> for LinearCombination<F> {
    type Output = Self;

    fn sub(mut self, var: Variable) -> Self {
        self.0.push((-F::one(), var));
        self
    }
}

impl<F: Field> Add for LinearCombination<F> {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl<F: Field> Sub for LinearCombination<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + -other
    }
}

impl<F: Field> Neg for LinearCombination<F> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for (coeff, _) in &mut self.0 {
            *coeff = -*coeff;
        }
        self
    }
}

impl<F: Field> Mul<F> for LinearCombination<F> {
    type Output = Self;

    fn mul(mut self, scalar: F) -> Self {
        for (coeff, _) in &mut self.0 {
            *coeff *= scalar;
        }
        self
    }
}

/// A single constraint `⟨a,z⟩·⟨b,z⟩ = ⟨c,z⟩`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct R1Constraint<F: Field> {
    /// The left factor.
    pub a: LinearCombination<F>,
    /// The right factor.
    pub b: LinearCombination<F>,
    /// The product.
    pub c: LinearCombination<F>,
}

impl<F: Field> R1Constraint<F> {
    /// Builds a constraint from its three linear combinations.
    pub fn new(
        a: impl Into<LinearCombination<F>>,
        b: impl Into<LinearCombination<F>>,
        c: impl Into<LinearCombination<F>>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
        }
    }

    fn max_index(&self) -> usize {
        self.a
            .max_index()
            .into_iter()
            .chain(self.b.max_index())
            .chain(self.c.max_index())
            .max()
            .unwrap_or(0)
    }
}

/// Ordered traversal of a constraint system.
///
/// The in-memory [`R1cs`] and any disk-backed system satisfy the same
/// interface, so the generator and prover are agnostic to where constraints
/// live. Constraints must be visited in a stable order.
pub trait ConstraintSource<F: Field> {
    /// The highest variable index used; the full assignment `(1, witness)`
    /// has `num_variables() + 1` entries.
    fn num_variables(&self) -> usize;

    /// Number of constraints.
    fn num_constraints(&self) -> usize;

    /// Visits every constraint in order, stopping at the first error.
    fn try_for_each_constraint(
        &self,
        f: &mut dyn FnMut(&R1Constraint<F>) -> Result<(), Error>,
    ) -> Result<(), Error>;
}

/// An in-memory rank-1 constraint system.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct R1cs<F: Field> {
    constraints: Vec<R1Constraint<F>>,
    num_variables: usize,
}

impl<F: Field> R1cs<F> {
    /// An empty system.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            num_variables: 0,
        }
    }

    /// Appends the constraint `⟨a,z⟩·⟨b,z⟩ = ⟨c,z⟩`, growing the variable
    /// count to cover every referenced index.
    pub fn enforce(
        &mut self,
        a: impl Into<LinearCombination<F>>,
        b: impl Into<LinearCombination<F>>,
        c: impl Into<LinearCombination<F>>,
    ) {
        let constraint = R1Constraint::new(a, b, c);
        self.num_variables = self.num_variables.max(constraint.max_index());
        self.constraints.push(constraint);
    }

    /// The constraints in order.
    pub fn constraints(&self) -> &[R1Constraint<F>] {
        &self.constraints
    }

    /// Rejects systems the generator and prover cannot process: empty
    /// systems, and public-input counts exceeding the variable count.
    pub fn check(&self, num_inputs: usize) -> Result<(), Error> {
        if self.constraints.is_empty() {
            return Err(Error::EmptyConstraintSystem);
        }
        if num_inputs > self.num_variables {
            return Err(Error::IndexOutOfBounds);
        }
        Ok(())
    }

    /// Whether `witness` (one value per variable, public input first)
    /// satisfies every constraint.
    pub fn is_satisfied(&self, witness: &[F]) -> Result<bool, Error> {
        if witness.len() != self.num_variables {
            return Err(Error::AssignmentLengthMismatch);
        }
        let assignment = full_assignment(witness);
        Ok(self.constraints.iter().all(|constraint| {
            constraint.a.evaluate(&assignment) * constraint.b.evaluate(&assignment)
                == constraint.c.evaluate(&assignment)
        }))
    }
}

impl<F: Field> ConstraintSource<F> for R1cs<F> {
    fn num_variables(&self) -> usize {
        self.num_variables
    }

    fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn try_for_each_constraint(
        &self,
        f: &mut dyn FnMut(&R1Constraint<F>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.constraints.iter().try_for_each(|cs| f(cs))
    }
}

/// Prepends the constant one to a witness, yielding the assignment vector
/// that linear combinations are evaluated against.
pub fn full_assignment<F: Field>(witness: &[F]) -> Vec<F> {
    let mut assignment = Vec::with_capacity(witness.len() + 1);
    assignment.push(F::one());
    assignment.extend_from_slice(witness);
    assignment
}
