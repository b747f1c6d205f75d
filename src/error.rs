// src/error.rs

use crate::routines::{LapackVersion, Precision, Routine};
use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error that can cross thread boundaries.
pub type ThreadSafeStdError = Box<dyn StdError + Send + Sync + 'static>;

/// Why a backend candidate was not bound.
///
/// Probe failures are expected (no system LAPACK, a disabled backend); the
/// dispatcher logs them and moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("backend `{backend}` is disabled by configuration")]
    Disabled { backend: &'static str },

    #[error("backend `{backend}` is unavailable: {reason}")]
    Unavailable { backend: &'static str, reason: String },

    #[error("backend `{backend}` reports LAPACK {found}, at least {required} is required")]
    IncompatibleVersion {
        backend: &'static str,
        found: LapackVersion,
        required: LapackVersion,
    },

    #[error("backend `{backend}` does not provide {precision:?} precision routines")]
    UnsupportedPrecision { backend: &'static str, precision: Precision },

    #[error("backend `{backend}` was not selected (requested `{requested}`)")]
    NotSelected { backend: &'static str, requested: String },
}

impl ProbeError {
    /// Name of the candidate that failed its probe.
    pub fn backend(&self) -> &'static str {
        match self {
            ProbeError::Disabled { backend }
            | ProbeError::Unavailable { backend, .. }
            | ProbeError::IncompatibleVersion { backend, .. }
            | ProbeError::UnsupportedPrecision { backend, .. }
            | ProbeError::NotSelected { backend, .. } => *backend,
        }
    }
}

/// Binding failed and no fallback was configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no LAPACK backend could be bound; tried: {}", describe_attempts(.attempted))]
    NoBackendAvailable { attempted: Vec<ProbeError> },
}

fn describe_attempts(attempted: &[ProbeError]) -> String {
    if attempted.is_empty() {
        return "no candidates".to_string();
    }
    attempted
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn argument_name(routine: &Routine, position: &usize) -> &'static str {
    routine.argument(*position).unwrap_or("?")
}

/// A non-zero status code translated by the ndarray convenience layer.
#[derive(Debug, Error)]
pub enum LapackError {
    #[error("{routine}: argument {position} (`{}`) had an illegal value", argument_name(.routine, .position))]
    IllegalArgument { routine: Routine, position: usize },

    #[error("{routine}: U({index},{index}) is exactly zero; the matrix is singular")]
    Singular { routine: Routine, index: usize },

    #[error("{routine}: the leading minor of order {order} is not positive definite")]
    NotPositiveDefinite { routine: Routine, order: usize },

    #[error("{routine}: {unconverged} off-diagonal elements did not converge to zero")]
    NoConvergence { routine: Routine, unconverged: usize },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("right-hand side has {found} rows, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("dimension {0} does not fit in a LAPACK integer")]
    DimensionOverflow(usize),

    #[error("{routine}: returned status {info}")]
    Failed { routine: Routine, info: i32 },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl LapackError {
    /// Maps the status code a routine returned. `Ok(())` for zero.
    pub fn check(routine: Routine, info: i32) -> Result<(), LapackError> {
        if info == 0 {
            return Ok(());
        }
        if info < 0 {
            return Err(LapackError::IllegalArgument {
                routine,
                position: info.unsigned_abs() as usize,
            });
        }
        let code = info as usize;
        Err(match routine {
            Routine::Sgetrf
            | Routine::Dgetrf
            | Routine::Sgesv
            | Routine::Dgesv
            | Routine::Sgetri
            | Routine::Dgetri
            | Routine::Sgbtrf
            | Routine::Dgbtrf
            | Routine::Sgbsv
            | Routine::Dgbsv
            | Routine::Sgtsv
            | Routine::Dgtsv
            | Routine::Strtrs
            | Routine::Dtrtrs => LapackError::Singular { routine, index: code },
            Routine::Spotrf
            | Routine::Dpotrf
            | Routine::Sposv
            | Routine::Dposv
            | Routine::Spptrf
            | Routine::Dpptrf
            | Routine::Sppsv
            | Routine::Dppsv => LapackError::NotPositiveDefinite { routine, order: code },
            Routine::Ssyev | Routine::Dsyev | Routine::Sgesvd | Routine::Dgesvd => {
                LapackError::NoConvergence { routine, unconverged: code }
            }
            _ => LapackError::Failed { routine, info },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_per_routine() {
        assert!(LapackError::check(Routine::Dgetrf, 0).is_ok());
        match LapackError::check(Routine::Dgetrf, -4) {
            Err(LapackError::IllegalArgument { routine, position }) => {
                assert_eq!(routine, Routine::Dgetrf);
                assert_eq!(position, 4);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            LapackError::check(Routine::Dgesv, 2),
            Err(LapackError::Singular { index: 2, .. })
        ));
        assert!(matches!(
            LapackError::check(Routine::Spotrf, 3),
            Err(LapackError::NotPositiveDefinite { order: 3, .. })
        ));
        assert!(matches!(
            LapackError::check(Routine::Dsyev, 1),
            Err(LapackError::NoConvergence { unconverged: 1, .. })
        ));
        assert!(matches!(
            LapackError::check(Routine::Dgecon, 1),
            Err(LapackError::Failed { info: 1, .. })
        ));
    }

    #[test]
    fn most_negative_status_does_not_overflow() {
        match LapackError::check(Routine::Dgetrf, i32::MIN) {
            Err(LapackError::IllegalArgument { position, .. }) => {
                assert_eq!(position, 1_usize << 31);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn illegal_argument_names_the_argument() {
        let err = LapackError::check(Routine::Dgetrf, -4).unwrap_err();
        assert_eq!(err.to_string(), "dgetrf: argument 4 (`lda`) had an illegal value");
    }

    #[test]
    fn dispatch_error_lists_attempts() {
        let err = DispatchError::NoBackendAvailable {
            attempted: vec![ProbeError::Disabled { backend: "native" }],
        };
        assert_eq!(
            err.to_string(),
            "no LAPACK backend could be bound; tried: backend `native` is disabled by configuration"
        );
    }
}
