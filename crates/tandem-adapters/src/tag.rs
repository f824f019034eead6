//! Mesh-tag-backed field adapter.

use std::any::Any;

use tandem_core::{
    Coord, FieldAdapter, FieldIdentity, OverlapMask, Real, SetupError, TransportError,
};

/// Adapter over a named per-entity tag array.
///
/// The external mesh layer supplies the entity coordinates and the
/// initial tag values at construction; afterwards the adapter owns the
/// value storage and exposes it through [`values`](Self::values) /
/// [`values_mut`](Self::values_mut) so drivers can read solver output
/// into it and copy between fields after a checked downcast.
#[derive(Clone, Debug)]
pub struct TagFieldAdapter {
    name: String,
    values: Vec<Real>,
    coords: Vec<Coord>,
}

impl TagFieldAdapter {
    /// Wrap a tag array. `values` and `coords` must be per-entity
    /// parallel arrays.
    pub fn new(
        name: impl Into<String>,
        values: Vec<Real>,
        coords: Vec<Coord>,
    ) -> Result<Self, SetupError> {
        let name = name.into();
        if values.len() != coords.len() {
            return Err(SetupError::EntityCountMismatch {
                context: format!("tag adapter '{name}'"),
                expected: values.len(),
                actual: coords.len(),
            });
        }
        Ok(Self {
            name,
            values,
            coords,
        })
    }

    /// Convenience constructor with 1D coordinates equal to the entity
    /// index, for entity sets whose geometry is implicit.
    pub fn with_index_coords(name: impl Into<String>, values: Vec<Real>) -> Self {
        let coords = (0..values.len())
            .map(|i| Coord::from_slice(&[i as f64]))
            .collect();
        // Parallel by construction, so new() cannot fail.
        match Self::new(name, values, coords) {
            Ok(adapter) => adapter,
            Err(_) => unreachable!("index coords are parallel to values"),
        }
    }

    /// The full per-entity tag array.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Mutable access to the tag array, for writing solver output.
    pub fn values_mut(&mut self) -> &mut [Real] {
        &mut self.values
    }
}

impl FieldAdapter for TagFieldAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn variant(&self) -> &'static str {
        "tag"
    }

    fn entity_count(&self) -> usize {
        self.values.len()
    }

    fn pull(&self, mask: &OverlapMask, out: &mut Vec<Real>) {
        out.clear();
        out.extend(mask.iter_marked().map(|entity| self.values[entity]));
    }

    fn push(&mut self, mask: &OverlapMask, values: &[Real]) -> Result<(), TransportError> {
        if values.len() != mask.marked_count() {
            return Err(TransportError::PayloadShape {
                identity: FieldIdentity::new("native", self.name.clone()),
                expected: mask.marked_count(),
                actual: values.len(),
            });
        }
        for (entity, value) in mask.iter_marked().zip(values) {
            self.values[entity] = *value;
        }
        Ok(())
    }

    fn coordinates(&self, mask: &OverlapMask) -> Vec<Coord> {
        mask.iter_marked()
            .map(|entity| self.coords[entity].clone())
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Application-level field copy between two tag adapters.
///
/// Used between a receive phase and a send phase when one application's
/// received field seeds another's outgoing field. Copies the full tag
/// array; fails if the entity counts differ, before writing anything.
pub fn copy_values(from: &TagFieldAdapter, to: &mut TagFieldAdapter) -> Result<(), SetupError> {
    if from.values.len() != to.values.len() {
        return Err(SetupError::EntityCountMismatch {
            context: format!("copy '{}' -> '{}'", from.name, to.name),
            expected: from.values.len(),
            actual: to.values.len(),
        });
    }
    to.values.copy_from_slice(&from.values);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(values: Vec<Real>) -> TagFieldAdapter {
        TagFieldAdapter::with_index_coords("pot0", values)
    }

    #[test]
    fn pull_gathers_marked_entities_in_order() {
        let a = adapter(vec![10.0, 11.0, 12.0, 13.0]);
        let mask = OverlapMask::from_flags(&[true, false, true, true]);
        let mut out = Vec::new();
        a.pull(&mask, &mut out);
        assert_eq!(out, vec![10.0, 12.0, 13.0]);
    }

    #[test]
    fn push_writes_only_marked_entities() {
        let mut a = adapter(vec![0.0; 4]);
        let mask = OverlapMask::from_flags(&[true, false, true, false]);
        a.push(&mask, &[7.0, 8.0]).unwrap();
        assert_eq!(a.values(), &[7.0, 0.0, 8.0, 0.0]);
    }

    #[test]
    fn push_shape_mismatch_leaves_storage_untouched() {
        let mut a = adapter(vec![1.0, 2.0, 3.0]);
        let mask = OverlapMask::all(3);
        let err = a.push(&mask, &[9.0]).unwrap_err();
        assert!(matches!(err, TransportError::PayloadShape { expected: 3, actual: 1, .. }));
        assert_eq!(a.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn coordinates_follow_pull_order() {
        let a = adapter(vec![0.0; 5]);
        let mask = OverlapMask::from_predicate(5, |i| i % 2 == 0);
        let coords = a.coordinates(&mask);
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0][0], 0.0);
        assert_eq!(coords[1][0], 2.0);
        assert_eq!(coords[2][0], 4.0);
    }

    #[test]
    fn mismatched_coords_rejected_at_construction() {
        let coords = vec![Coord::from_slice(&[0.0])];
        let err = TagFieldAdapter::new("bad", vec![1.0, 2.0], coords).unwrap_err();
        assert!(matches!(err, SetupError::EntityCountMismatch { .. }));
    }

    #[test]
    fn copy_values_copies_full_array() {
        let from = adapter(vec![1.0, 2.0, 3.0]);
        let mut to = adapter(vec![0.0; 3]);
        copy_values(&from, &mut to).unwrap();
        assert_eq!(to.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn copy_values_rejects_size_mismatch() {
        let from = adapter(vec![1.0, 2.0]);
        let mut to = adapter(vec![0.0; 3]);
        assert!(copy_values(&from, &mut to).is_err());
        assert_eq!(to.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_mask_pulls_nothing() {
        let a = adapter(vec![1.0, 2.0]);
        let mut out = vec![99.0];
        a.pull(&OverlapMask::none(2), &mut out);
        assert!(out.is_empty());
    }
}
