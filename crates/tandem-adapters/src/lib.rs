//! Reference field adapters and evaluators for the Tandem coupling
//! framework.
//!
//! Adapters wrap concrete native field representations behind the
//! [`FieldAdapter`](tandem_core::FieldAdapter) contract:
//! [`TagFieldAdapter`] for per-entity tag arrays and
//! [`ParticleFieldAdapter`] for particle records with a storage
//! permutation. [`LagrangeEvaluator`] and [`NearestEvaluator`] implement
//! the [`Evaluator`](tandem_core::Evaluator) contract for the
//! interpolating transfer methods.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod lagrange;
mod particle;
mod tag;

pub use lagrange::{evaluator_for, LagrangeEvaluator, NearestEvaluator};
pub use particle::{Particle, ParticleFieldAdapter};
pub use tag::{copy_values, TagFieldAdapter};
