//! The [`FieldAdapter`] contract and the checked variant downcast.
//!
//! An adapter converts between an application's native field storage and
//! the flat transfer buffer exchanged through the coupler. Concrete
//! variants wrap different native representations (a mesh-tag-backed
//! array, particle records, a mock in tests); the coupled field stores
//! them as `Box<dyn FieldAdapter>` and drivers recover the concrete type
//! through [`adapter_as`], which fails with a variant-mismatch error
//! rather than ever reinterpreting memory.

use std::any::Any;

use crate::error::{AdapterError, TransportError};
use crate::id::{Coord, Real};
use crate::overlap::OverlapMask;

/// Capability set `{Pull, Push, Describe-Overlap}` over one native field
/// representation.
///
/// # Contract
///
/// - `pull` and `push` visit exactly the entities marked in the mask,
///   in ascending mask order. Unmarked entities are never read by `pull`
///   and never written by `push`.
/// - `push` validates the buffer shape before mutating anything, so a
///   shape mismatch leaves the native storage untouched.
/// - `coordinates` supplies the geometric metadata evaluators consume;
///   it returns one coordinate per marked entity, in the same order as
///   `pull`.
pub trait FieldAdapter: Any {
    /// Name of the wrapped native field, for diagnostics.
    fn name(&self) -> &str;

    /// Short tag identifying the concrete variant, used in
    /// variant-mismatch errors.
    fn variant(&self) -> &'static str;

    /// Total number of entities in the native representation.
    fn entity_count(&self) -> usize;

    /// Gather current native values at marked entities into `out`.
    ///
    /// Clears `out` first; on return `out.len() == mask.marked_count()`.
    fn pull(&self, mask: &OverlapMask, out: &mut Vec<Real>);

    /// Scatter `values` back into the native representation at marked
    /// entities.
    ///
    /// `values.len()` must equal `mask.marked_count()`; otherwise the
    /// push fails with [`TransportError::PayloadShape`] and the native
    /// storage is not mutated.
    fn push(&mut self, mask: &OverlapMask, values: &[Real]) -> Result<(), TransportError>;

    /// Coordinates of the marked entities, in pull order.
    fn coordinates(&self, mask: &OverlapMask) -> Vec<Coord>;

    /// Upcast for the checked variant downcast.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for the checked variant downcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Recover the concrete adapter variant behind a `dyn FieldAdapter`.
///
/// Returns [`AdapterError::VariantMismatch`] naming both the requested
/// and the stored variant when the types differ.
pub fn adapter_as<V: FieldAdapter>(adapter: &dyn FieldAdapter) -> Result<&V, AdapterError> {
    let actual = adapter.variant();
    adapter
        .as_any()
        .downcast_ref::<V>()
        .ok_or(AdapterError::VariantMismatch {
            expected: std::any::type_name::<V>(),
            actual,
        })
}

/// Mutable counterpart of [`adapter_as`].
pub fn adapter_as_mut<V: FieldAdapter>(
    adapter: &mut dyn FieldAdapter,
) -> Result<&mut V, AdapterError> {
    let actual = adapter.variant();
    adapter
        .as_any_mut()
        .downcast_mut::<V>()
        .ok_or(AdapterError::VariantMismatch {
            expected: std::any::type_name::<V>(),
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecAdapter {
        name: String,
        values: Vec<Real>,
    }

    impl FieldAdapter for VecAdapter {
        fn name(&self) -> &str {
            &self.name
        }
        fn variant(&self) -> &'static str {
            "vec"
        }
        fn entity_count(&self) -> usize {
            self.values.len()
        }
        fn pull(&self, mask: &OverlapMask, out: &mut Vec<Real>) {
            out.clear();
            out.extend(mask.iter_marked().map(|i| self.values[i]));
        }
        fn push(&mut self, mask: &OverlapMask, values: &[Real]) -> Result<(), TransportError> {
            if values.len() != mask.marked_count() {
                return Err(TransportError::PayloadShape {
                    identity: crate::id::FieldIdentity::new("test", self.name.clone()),
                    expected: mask.marked_count(),
                    actual: values.len(),
                });
            }
            for (slot, value) in mask.iter_marked().zip(values) {
                self.values[slot] = *value;
            }
            Ok(())
        }
        fn coordinates(&self, mask: &OverlapMask) -> Vec<Coord> {
            mask.iter_marked()
                .map(|i| Coord::from_slice(&[i as f64]))
                .collect()
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct OtherAdapter;

    impl FieldAdapter for OtherAdapter {
        fn name(&self) -> &str {
            "other"
        }
        fn variant(&self) -> &'static str {
            "other"
        }
        fn entity_count(&self) -> usize {
            0
        }
        fn pull(&self, _mask: &OverlapMask, out: &mut Vec<Real>) {
            out.clear();
        }
        fn push(&mut self, _mask: &OverlapMask, _values: &[Real]) -> Result<(), TransportError> {
            Ok(())
        }
        fn coordinates(&self, _mask: &OverlapMask) -> Vec<Coord> {
            Vec::new()
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn downcast_to_stored_variant_succeeds() {
        let adapter: Box<dyn FieldAdapter> = Box::new(VecAdapter {
            name: "density".into(),
            values: vec![1.0, 2.0],
        });
        let concrete = adapter_as::<VecAdapter>(adapter.as_ref()).unwrap();
        assert_eq!(concrete.values, vec![1.0, 2.0]);
    }

    #[test]
    fn downcast_to_wrong_variant_fails_with_both_names() {
        let adapter: Box<dyn FieldAdapter> = Box::new(VecAdapter {
            name: "density".into(),
            values: vec![],
        });
        let err = adapter_as::<OtherAdapter>(adapter.as_ref()).unwrap_err();
        match err {
            AdapterError::VariantMismatch { expected, actual } => {
                assert!(expected.contains("OtherAdapter"));
                assert_eq!(actual, "vec");
            }
        }
    }

    #[test]
    fn mutable_downcast_allows_native_mutation() {
        let mut adapter: Box<dyn FieldAdapter> = Box::new(VecAdapter {
            name: "density".into(),
            values: vec![0.0; 4],
        });
        let concrete = adapter_as_mut::<VecAdapter>(adapter.as_mut()).unwrap();
        concrete.values[2] = 9.0;
        let mut out = Vec::new();
        adapter.pull(&OverlapMask::all(4), &mut out);
        assert_eq!(out, vec![0.0, 0.0, 9.0, 0.0]);
    }
}
