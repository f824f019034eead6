//! Particle-data-backed field adapter.

use std::any::Any;

use tandem_core::{
    Coord, FieldAdapter, FieldIdentity, OverlapMask, Real, SetupError, TransportError,
};

/// One particle record in the native representation.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Spatial position of the particle.
    pub position: Coord,
    /// Field value carried by the particle.
    pub value: Real,
}

/// Adapter over particle records whose storage order differs from the
/// coupler's local entity order.
///
/// Particle codes keep their records in solver-internal order (bucketed,
/// sorted by cell, ...). The adapter carries a local-entity-to-record
/// permutation so `pull`/`push` still visit entities in ascending mask
/// order while touching the right records.
#[derive(Clone, Debug)]
pub struct ParticleFieldAdapter {
    name: String,
    particles: Vec<Particle>,
    /// `storage_order[local_entity]` is the index of that entity's record.
    storage_order: Vec<usize>,
}

impl ParticleFieldAdapter {
    /// Wrap particle records with an explicit storage permutation.
    ///
    /// `storage_order` must be a permutation of `0..particles.len()`.
    pub fn new(
        name: impl Into<String>,
        particles: Vec<Particle>,
        storage_order: Vec<usize>,
    ) -> Result<Self, SetupError> {
        let name = name.into();
        if storage_order.len() != particles.len() {
            return Err(SetupError::EntityCountMismatch {
                context: format!("particle adapter '{name}'"),
                expected: particles.len(),
                actual: storage_order.len(),
            });
        }
        let mut seen = vec![false; particles.len()];
        for &record in &storage_order {
            if record >= particles.len() || seen[record] {
                return Err(SetupError::EntityCountMismatch {
                    context: format!("particle adapter '{name}': storage order is not a permutation"),
                    expected: particles.len(),
                    actual: record,
                });
            }
            seen[record] = true;
        }
        Ok(Self {
            name,
            particles,
            storage_order,
        })
    }

    /// Wrap particle records stored in local entity order.
    pub fn in_order(name: impl Into<String>, particles: Vec<Particle>) -> Self {
        let order = (0..particles.len()).collect();
        match Self::new(name, particles, order) {
            Ok(adapter) => adapter,
            Err(_) => unreachable!("identity order is a permutation"),
        }
    }

    /// The particle records in storage order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Value of the record backing `local_entity`.
    pub fn value_at(&self, local_entity: usize) -> Real {
        self.particles[self.storage_order[local_entity]].value
    }
}

impl FieldAdapter for ParticleFieldAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn variant(&self) -> &'static str {
        "particle"
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }

    fn pull(&self, mask: &OverlapMask, out: &mut Vec<Real>) {
        out.clear();
        out.extend(
            mask.iter_marked()
                .map(|entity| self.particles[self.storage_order[entity]].value),
        );
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
            self.particles[self.storage_order[entity]].value = *value;
        }
        Ok(())
    }

    fn coordinates(&self, mask: &OverlapMask) -> Vec<Coord> {
        mask.iter_marked()
            .map(|entity| self.particles[self.storage_order[entity]].position.clone())
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
