//! Tandem: phased, partition-aware field exchange between coupled
//! simulation codes.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Tandem sub-crates. For most users, adding `tandem` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use tandem::prelude::*;
//! use tandem::adapters::TagFieldAdapter;
//!
//! // A server over a 100-entity partition; entities 0..50 couple.
//! let partition = Arc::new(PartitionSpec::uniform(100, RankId(0)).unwrap());
//! let transport = InProcessRendezvous::new();
//! let config = ServerConfig::new("demo", partition);
//! let mut server =
//!     CouplerServer::new(config, transport as Arc<dyn Rendezvous>).unwrap();
//! let overlap = server.mark_overlap(|class| class < 50);
//!
//! // Two applications exchanging one field verbatim.
//! let producer = server.add_application("producer", "producer/").unwrap();
//! let values: Vec<f64> = (0..100).map(|i| i as f64 * 2.0).collect();
//! producer
//!     .add_field(
//!         "pot0_plane_0",
//!         Box::new(TagFieldAdapter::with_index_coords("pot0_plane_0", values)),
//!         TransferOptions::COPY,
//!         TransferOptions::COPY,
//!         Arc::clone(&overlap),
//!     )
//!     .unwrap();
//! let consumer = server.add_application("consumer", "consumer/").unwrap();
//! consumer
//!     .add_field(
//!         "pot0_plane_0",
//!         Box::new(TagFieldAdapter::with_index_coords("pot0_plane_0", vec![0.0; 100])),
//!         TransferOptions::COPY,
//!         TransferOptions::COPY,
//!         Arc::clone(&overlap),
//!     )
//!     .unwrap();
//!
//! // Producer publishes, consumer receives under the same field name.
//! let producer = server.application_mut("producer").unwrap();
//! producer.begin_send_phase().unwrap();
//! producer.send("pot0_plane_0").unwrap();
//! producer.end_send_phase().unwrap();
//!
//! let consumer = server.application_mut("consumer").unwrap();
//! consumer.begin_receive_phase().unwrap();
//! consumer.receive("pot0_plane_0").unwrap();
//! consumer.end_receive_phase().unwrap();
//!
//! let field = consumer.field("pot0_plane_0").unwrap();
//! let adapter = field.adapter_as::<TagFieldAdapter>().unwrap();
//! assert_eq!(adapter.values()[10], 20.0);
//! assert_eq!(adapter.values()[50], 0.0); // outside the overlap
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tandem-core` | Identities, errors, transfer options, overlap mask, adapter/evaluator contracts |
//! | [`adapters`] | `tandem-adapters` | Tag and particle adapters, Lagrange/nearest evaluators |
//! | [`transport`] | `tandem-transport` | Partition description and rendezvous transports |
//! | [`server`] | `tandem-server` | Coupler server, applications, coupled fields, phase control |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and contracts (`tandem-core`).
///
/// Field identities, the error taxonomy, [`types::TransferOptions`],
/// [`types::OverlapMask`], the phase state machine, and the
/// [`types::FieldAdapter`] / [`types::Evaluator`] contracts.
pub use tandem_core as types;

/// Reference adapters and evaluators (`tandem-adapters`).
///
/// [`adapters::TagFieldAdapter`], [`adapters::ParticleFieldAdapter`],
/// [`adapters::LagrangeEvaluator`], and [`adapters::NearestEvaluator`].
pub use tandem_adapters as adapters;

/// Partition description and rendezvous transports (`tandem-transport`).
///
/// [`transport::PartitionSpec`], the [`transport::Rendezvous`] contract,
/// and the in-process reference transport.
pub use tandem_transport as transport;

/// Coupler server and phased exchange (`tandem-server`).
///
/// [`server::CouplerServer`], [`server::Application`],
/// [`server::ConvertibleCoupledField`], and the instrumentation probe.
pub use tandem_server as server;

/// Common imports for typical Tandem usage.
///
/// ```rust
/// use tandem::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tandem_core::{
        plane_field_name, Coord, EvaluationMethod, FieldAdapter, FieldIdentity, OverlapMask,
        Phase, PhaseEpoch, RankId, Real, TransferMethod, TransferOptions,
    };

    // Errors
    pub use tandem_core::{
        AdapterError, CouplingError, EvaluateError, LookupError, PhaseError, SetupError,
        TransportError,
    };

    // Transport
    pub use tandem_transport::{InProcessRendezvous, PartitionSpec, Rendezvous};

    // Server
    pub use tandem_server::{
        Application, ConvertibleCoupledField, CouplerServer, NoopProbe, PhaseProbe, ServerConfig,
    };
}
