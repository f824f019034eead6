//! Field identities, epoch counters, and the [`Coord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// The element type of every transfer payload.
pub type Real = f64;

/// Spatial coordinate of one entity, used by evaluators.
///
/// Inline capacity of 3 covers 1D, 2D, and 3D geometry without heap
/// allocation; higher-dimensional coordinates spill transparently.
pub type Coord = SmallVec<[f64; 3]>;

/// Routing key for a coupled field: `(application_name, field_name)`.
///
/// Unique within a coupler server by construction: application names are
/// unique within the server and field names are unique within their
/// application. The transport layer delivers payloads keyed by this
/// identity; it never inspects the payload itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldIdentity {
    /// Name of the owning application.
    pub application: String,
    /// Field name within that application's registry.
    pub field: String,
}

impl FieldIdentity {
    /// Build an identity from an application name and a field name.
    pub fn new(application: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.application, self.field)
    }
}

/// Counter of completed send phases for an application.
///
/// Every payload published to the transport is tagged with the sender's
/// current epoch. Receivers use the tag to tell fresh data from a
/// redelivery of an already-seen phase; the transport uses it to let a
/// blocked `get` wait for "epoch at least N".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseEpoch(pub u64);

impl PhaseEpoch {
    /// The epoch of the first send phase.
    pub const FIRST: Self = Self(1);

    /// The epoch following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for PhaseEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination rank in the partition description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankId(pub u32);

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conventional name for one poloidal plane of a field family.
///
/// Drivers that couple plane-decomposed fields register one field per
/// plane, named `<base>_plane_<index>`.
pub fn plane_field_name(base: &str, plane: u32) -> String {
    format!("{base}_plane_{plane}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_display_joins_with_slash() {
        let id = FieldIdentity::new("core", "pot0_plane_0");
        assert_eq!(id.to_string(), "core/pot0_plane_0");
    }

    #[test]
    fn identity_equality_is_componentwise() {
        let a = FieldIdentity::new("core", "f");
        let b = FieldIdentity::new("core", "f");
        let c = FieldIdentity::new("edge", "f");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn epoch_next_increments() {
        assert_eq!(PhaseEpoch::FIRST.next(), PhaseEpoch(2));
        assert_eq!(PhaseEpoch(41).next(), PhaseEpoch(42));
    }

    #[test]
    fn plane_field_name_matches_convention() {
        assert_eq!(plane_field_name("pot0", 0), "pot0_plane_0");
        assert_eq!(plane_field_name("edensity_1", 7), "edensity_1_plane_7");
    }
}
