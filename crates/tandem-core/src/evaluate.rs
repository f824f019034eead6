//! The [`Evaluator`] contract for reconstructing field values.
//!
//! An evaluator is invoked when source and destination entity sets
//! differ: it is a pure function over `(source values, source
//! coordinates, destination coordinates)` producing a destination-shaped
//! buffer. Implementations must be deterministic and side-effect-free so
//! repeated evaluation with unchanged inputs yields bit-identical
//! output. Concrete interpolation schemes live in `tandem-adapters`.

use crate::error::EvaluateError;
use crate::id::{Coord, Real};

/// Reconstructs field values at target entities from source entities.
pub trait Evaluator: Send + Sync {
    /// Name of the scheme, for diagnostics.
    fn name(&self) -> &str;

    /// Produce one value per target coordinate.
    ///
    /// `source_values` and `source_coords` must have equal length; the
    /// returned buffer has `target_coords.len()` elements. Must be a
    /// deterministic pure function of its arguments.
    fn evaluate(
        &self,
        source_values: &[Real],
        source_coords: &[Coord],
        target_coords: &[Coord],
    ) -> Result<Vec<Real>, EvaluateError>;
}

/// Validate the shared preconditions of every evaluator.
///
/// Checks the value/coordinate shape agreement and rejects an empty
/// source when targets exist. Schemes call this before doing any work.
pub fn check_evaluate_inputs(
    source_values: &[Real],
    source_coords: &[Coord],
    target_coords: &[Coord],
) -> Result<(), EvaluateError> {
    if source_values.len() != source_coords.len() {
        return Err(EvaluateError::ShapeMismatch {
            values: source_values.len(),
            coords: source_coords.len(),
        });
    }
    if source_values.is_empty() && !target_coords.is_empty() {
        return Err(EvaluateError::EmptySource);
    }
    Ok(())
}

/// Identity evaluator for entity sets of equal cardinality.
///
/// Returns the source values verbatim; exists for tests and for wiring
/// checks where a degenerate scheme is needed. Fails if the cardinalities
/// differ, since no reconstruction is performed.
#[derive(Clone, Copy, Debug, Default)]
pub struct CopyEvaluator;

impl Evaluator for CopyEvaluator {
    fn name(&self) -> &str {
        "copy"
    }

    fn evaluate(
        &self,
        source_values: &[Real],
        source_coords: &[Coord],
        target_coords: &[Coord],
    ) -> Result<Vec<Real>, EvaluateError> {
        check_evaluate_inputs(source_values, source_coords, target_coords)?;
        if source_values.len() != target_coords.len() {
            return Err(EvaluateError::ShapeMismatch {
                values: source_values.len(),
                coords: target_coords.len(),
            });
        }
        Ok(source_values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(xs: &[f64]) -> Vec<Coord> {
        xs.iter().map(|&x| Coord::from_slice(&[x])).collect()
    }

    #[test]
    fn copy_evaluator_is_identity() {
        let values = [1.0, 2.0, 3.0];
        let src = coords(&[0.0, 1.0, 2.0]);
        let dst = coords(&[5.0, 6.0, 7.0]);
        let out = CopyEvaluator.evaluate(&values, &src, &dst).unwrap();
        assert_eq!(out, values);
    }

    #[test]
    fn copy_evaluator_rejects_cardinality_mismatch() {
        let values = [1.0, 2.0];
        let src = coords(&[0.0, 1.0]);
        let dst = coords(&[0.0, 1.0, 2.0]);
        assert!(matches!(
            CopyEvaluator.evaluate(&values, &src, &dst),
            Err(EvaluateError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn shape_check_rejects_value_coord_disagreement() {
        let values = [1.0, 2.0, 3.0];
        let src = coords(&[0.0]);
        assert!(matches!(
            check_evaluate_inputs(&values, &src, &[]),
            Err(EvaluateError::ShapeMismatch { values: 3, coords: 1 })
        ));
    }

    #[test]
    fn empty_source_with_targets_is_rejected() {
        let dst = coords(&[0.0]);
        assert!(matches!(
            check_evaluate_inputs(&[], &[], &dst),
            Err(EvaluateError::EmptySource)
        ));
    }

    #[test]
    fn empty_everything_is_fine() {
        assert!(check_evaluate_inputs(&[], &[], &[]).is_ok());
        assert_eq!(CopyEvaluator.evaluate(&[], &[], &[]).unwrap(), Vec::<Real>::new());
    }
}
