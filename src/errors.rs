use ark_std::fmt;

/// Errors returned by the generator and prover.
///
/// Verification never surfaces an error: both verifiers are total and report
/// failure as `false`.
#[derive(Debug)]
pub enum Error {
    /// The constraint system contains no constraints.
    EmptyConstraintSystem,
    /// A constraint references a variable outside the declared bounds, or the
    /// declared number of public inputs exceeds the number of variables.
    IndexOutOfBounds,
    /// The supplied assignment does not cover every variable exactly once.
    AssignmentLengthMismatch,
    /// The proving key does not match the constraint system it is used with.
    MalformedProvingKey,
    /// The scalar field has no evaluation domain large enough for this
    /// constraint system.
    PolynomialDegreeTooLarge,
    /// The progress observer requested cancellation at a step boundary.
    Aborted,
    /// A streaming constraint source failed.
    Io(ark_std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyConstraintSystem => write!(f, "constraint system is empty"),
            Error::IndexOutOfBounds => write!(f, "variable index out of bounds"),
            Error::AssignmentLengthMismatch => {
                write!(f, "assignment length does not match the number of variables")
            }
            Error::MalformedProvingKey => {
                write!(f, "proving key does not match the constraint system")
            }
            Error::PolynomialDegreeTooLarge => {
                write!(f, "no evaluation domain of the required size")
            }
            Error::Aborted => write!(f, "aborted by the progress observer"),
            Error::Io(err) => write!(f, "constraint source error: {:?}", err),
        }
    }
}

impl From<ark_std::io::Error> for Error {
    fn from(err: ark_std::io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
