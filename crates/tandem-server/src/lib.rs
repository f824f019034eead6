//! Coupler server, applications, and phased field exchange.
//!
//! [`CouplerServer`] owns the authoritative partition description and
//! the registered [`Application`]s; each application owns a registry of
//! [`ConvertibleCoupledField`]s and its phase state machine. The driver
//! brackets groups of `send`/`receive` calls in
//! `begin_send_phase`/`end_send_phase` and
//! `begin_receive_phase`/`end_receive_phase`; the end of a send phase is
//! the point at which buffered payloads become visible to peers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod application;
mod config;
mod field;
mod probe;
mod server;

pub use application::Application;
pub use config::ServerConfig;
pub use field::ConvertibleCoupledField;
pub use probe::{NoopProbe, PhaseProbe, ProbeOp, ProbeSpan};
pub use server::CouplerServer;
