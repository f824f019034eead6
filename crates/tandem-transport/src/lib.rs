//! Partition description and rendezvous transport for the Tandem
//! coupling framework.
//!
//! [`PartitionSpec`] is the authoritative, immutable description of the
//! coupled entity set: geometric classes, destination ranks, and the
//! reference coordinates that define the canonical transfer buffer
//! shape. [`Rendezvous`] is the narrow contract the coupler core expects
//! from a transport; [`InProcessRendezvous`] is the reference
//! implementation for applications sharing one process.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod inprocess;
mod partition;
mod rendezvous;

pub use inprocess::InProcessRendezvous;
pub use partition::PartitionSpec;
pub use rendezvous::{Delivery, Rendezvous};
