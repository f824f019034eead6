//! Core types and contracts for the Tandem coupling framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Tandem workspace:
//! field identities, the error taxonomy, transfer options, the overlap
//! mask, the phase state machine, and the adapter/evaluator contracts.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod error;
pub mod evaluate;
pub mod id;
pub mod overlap;
pub mod phase;
pub mod transfer;

pub use adapter::{adapter_as, adapter_as_mut, FieldAdapter};
pub use error::{
    AdapterError, CouplingError, EvaluateError, LookupError, PhaseError, SetupError,
    TransportError,
};
pub use evaluate::{CopyEvaluator, Evaluator};
pub use id::{plane_field_name, Coord, FieldIdentity, PhaseEpoch, RankId, Real};
pub use overlap::OverlapMask;
pub use phase::{Phase, PhaseOp, PhaseState};
pub use transfer::{EvaluationMethod, TransferMethod, TransferOptions};
