//! Transfer and evaluation method selection.
//!
//! A [`TransferOptions`] pair is attached to each direction of a coupled
//! field: one for moving data into the native representation, one for
//! moving data out to the network. The pairing rule is strict: verbatim
//! `Copy` transfer carries no evaluation, and an interpolating transfer
//! always names its scheme.

use crate::error::SetupError;

/// How field data moves across the transfer boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferMethod {
    /// Verbatim element-wise transfer. Requires source and destination
    /// entity sets to be identical in cardinality and ordering.
    Copy,
    /// Values are reconstructed at destination entities by an evaluator.
    Interpolate,
}

/// The reconstruction scheme applied when entity sets differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationMethod {
    /// No transformation. Valid only with [`TransferMethod::Copy`].
    None,
    /// Lagrange interpolation from the nearest `degree + 1` source points.
    Lagrange {
        /// Polynomial degree; `degree + 1` support points per target.
        degree: u32,
    },
    /// Each target takes the value of its nearest source point.
    NearestNeighbor,
}

/// Immutable `{transfer_method, evaluation_method}` pair for one
/// direction of a coupled field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferOptions {
    /// Whether data moves verbatim or via evaluation.
    pub transfer: TransferMethod,
    /// The reconstruction scheme, `None` for verbatim transfer.
    pub evaluation: EvaluationMethod,
}

impl TransferOptions {
    /// Verbatim copy with no evaluation.
    pub const COPY: Self = Self {
        transfer: TransferMethod::Copy,
        evaluation: EvaluationMethod::None,
    };

    /// Build an options pair. Call [`validate`](Self::validate) before use;
    /// field registration does so and rejects invalid pairings.
    pub fn new(transfer: TransferMethod, evaluation: EvaluationMethod) -> Self {
        Self {
            transfer,
            evaluation,
        }
    }

    /// Check the pairing rule: `Copy` pairs only with `None`, and an
    /// interpolating transfer must name a scheme.
    pub fn validate(&self) -> Result<(), SetupError> {
        let valid = match self.transfer {
            TransferMethod::Copy => self.evaluation == EvaluationMethod::None,
            TransferMethod::Interpolate => self.evaluation != EvaluationMethod::None,
        };
        if valid {
            Ok(())
        } else {
            Err(SetupError::InvalidTransferOptions {
                transfer: self.transfer,
                evaluation: self.evaluation,
            })
        }
    }

    /// Whether this direction requires an evaluator to produce the
    /// destination-shaped buffer.
    pub fn needs_evaluation(&self) -> bool {
        self.transfer == TransferMethod::Interpolate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_none_is_valid() {
        assert!(TransferOptions::COPY.validate().is_ok());
        assert!(!TransferOptions::COPY.needs_evaluation());
    }

    #[test]
    fn copy_with_evaluation_is_rejected() {
        let opts = TransferOptions::new(TransferMethod::Copy, EvaluationMethod::NearestNeighbor);
        assert!(matches!(
            opts.validate(),
            Err(SetupError::InvalidTransferOptions { .. })
        ));
    }

    #[test]
    fn interpolate_without_scheme_is_rejected() {
        let opts = TransferOptions::new(TransferMethod::Interpolate, EvaluationMethod::None);
        assert!(matches!(
            opts.validate(),
            Err(SetupError::InvalidTransferOptions { .. })
        ));
    }

    #[test]
    fn interpolate_with_scheme_needs_evaluation() {
        let opts = TransferOptions::new(
            TransferMethod::Interpolate,
            EvaluationMethod::Lagrange { degree: 1 },
        );
        assert!(opts.validate().is_ok());
        assert!(opts.needs_evaluation());
    }
}
