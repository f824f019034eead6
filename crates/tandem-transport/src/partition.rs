//! The authoritative partition and overlap description.

use indexmap::IndexMap;
use tandem_core::{Coord, OverlapMask, RankId, SetupError};

/// Server-owned description of the coupled entity set.
///
/// Built once at server construction and shared read-only (`Arc`) by
/// every application and field. Three parallel facts per entity: its
/// geometric class, the rank the class routes to, and a reference
/// coordinate. The reference coordinates of the overlap region define
/// the canonical transfer buffer: an interpolating send evaluates native
/// values onto them, and an interpolating receive evaluates from them
/// back to native entities.
#[derive(Clone, Debug)]
pub struct PartitionSpec {
    entity_class: Vec<i32>,
    class_rank: IndexMap<i32, RankId>,
    coords: Vec<Coord>,
}

impl PartitionSpec {
    /// Build a partition from per-entity classes, a class-to-rank map,
    /// and per-entity reference coordinates.
    ///
    /// Fails on zero entities, a coordinate array of the wrong length,
    /// or an entity whose class has no rank mapping.
    pub fn new(
        entity_class: Vec<i32>,
        class_rank: IndexMap<i32, RankId>,
        coords: Vec<Coord>,
    ) -> Result<Self, SetupError> {
        if entity_class.is_empty() {
            return Err(SetupError::EmptyPartition);
        }
        if coords.len() != entity_class.len() {
            return Err(SetupError::EntityCountMismatch {
                context: "partition coordinates".into(),
                expected: entity_class.len(),
                actual: coords.len(),
            });
        }
        for &class in &entity_class {
            if !class_rank.contains_key(&class) {
                return Err(SetupError::UnmappedClass { class });
            }
        }
        Ok(Self {
            entity_class,
            class_rank,
            coords,
        })
    }

    /// Single-rank partition with one class per entity and 1D reference
    /// coordinates equal to the entity index. The degenerate description
    /// used by in-process drivers and tests.
    pub fn uniform(entity_count: usize, rank: RankId) -> Result<Self, SetupError> {
        let entity_class: Vec<i32> = (0..entity_count).map(|i| i as i32).collect();
        let class_rank = entity_class.iter().map(|&c| (c, rank)).collect();
        let coords = (0..entity_count)
            .map(|i| Coord::from_slice(&[i as f64]))
            .collect();
        Self::new(entity_class, class_rank, coords)
    }

    /// Total number of entities.
    pub fn entity_count(&self) -> usize {
        self.entity_class.len()
    }

    /// Geometric class of an entity.
    pub fn class_of(&self, entity: usize) -> Option<i32> {
        self.entity_class.get(entity).copied()
    }

    /// Destination rank of an entity.
    pub fn rank_of(&self, entity: usize) -> Option<RankId> {
        self.class_of(entity)
            .and_then(|class| self.class_rank.get(&class).copied())
    }

    /// Mark the overlap region: entities whose geometric class satisfies
    /// the predicate participate in coupling.
    pub fn mark_overlap(&self, pred: impl Fn(i32) -> bool) -> OverlapMask {
        OverlapMask::from_predicate(self.entity_count(), |entity| {
            pred(self.entity_class[entity])
        })
    }

    /// Reference coordinates of the marked entities, in ascending mask
    /// order. This is the canonical geometry evaluators interpolate
    /// to (on send) and from (on receive).
    pub fn overlap_coords(&self, mask: &OverlapMask) -> Vec<Coord> {
        mask.iter_marked()
            .map(|entity| self.coords[entity].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_partition_has_index_coords() {
        let p = PartitionSpec::uniform(4, RankId(0)).unwrap();
        assert_eq!(p.entity_count(), 4);
        assert_eq!(p.rank_of(2), Some(RankId(0)));
        assert_eq!(p.class_of(3), Some(3));
        let mask = OverlapMask::all(4);
        let coords = p.overlap_coords(&mask);
        assert_eq!(coords[3][0], 3.0);
    }

    #[test]
    fn zero_entities_rejected() {
        assert!(matches!(
            PartitionSpec::uniform(0, RankId(0)),
            Err(SetupError::EmptyPartition)
        ));
    }

    #[test]
    fn unmapped_class_rejected() {
        let classes = vec![1, 2];
        let ranks: IndexMap<i32, RankId> = [(1, RankId(0))].into_iter().collect();
        let coords = vec![Coord::from_slice(&[0.0]), Coord::from_slice(&[1.0])];
        assert!(matches!(
            PartitionSpec::new(classes, ranks, coords),
            Err(SetupError::UnmappedClass { class: 2 })
        ));
    }

    #[test]
    fn coordinate_length_mismatch_rejected() {
        let classes = vec![0, 0];
        let ranks: IndexMap<i32, RankId> = [(0, RankId(1))].into_iter().collect();
        let coords = vec![Coord::from_slice(&[0.0])];
        assert!(matches!(
            PartitionSpec::new(classes, ranks, coords),
            Err(SetupError::EntityCountMismatch { .. })
        ));
    }

    #[test]
    fn mark_overlap_filters_by_class() {
        let classes = vec![0, 1, 0, 2];
        let ranks: IndexMap<i32, RankId> =
            [(0, RankId(0)), (1, RankId(1)), (2, RankId(1))].into_iter().collect();
        let coords = (0..4).map(|i| Coord::from_slice(&[i as f64])).collect();
        let p = PartitionSpec::new(classes, ranks, coords).unwrap();
        let mask = p.mark_overlap(|class| class == 0);
        assert_eq!(mask.iter_marked().collect::<Vec<_>>(), vec![0, 2]);
        let overlap_coords = p.overlap_coords(&mask);
        assert_eq!(overlap_coords.len(), 2);
        assert_eq!(overlap_coords[1][0], 2.0);
    }
}
