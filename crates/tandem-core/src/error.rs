//! Error taxonomy for the Tandem coupling framework.
//!
//! Errors fall into three classes with different handling contracts:
//!
//! - **Programming-error assertions** ([`SetupError`], [`PhaseError`],
//!   [`LookupError`], [`AdapterError`]): a defect in the calling code or
//!   setup. Drivers are expected to propagate these to an abort; they
//!   are never retried.
//! - **Evaluation failures** ([`EvaluateError`]): malformed geometric
//!   metadata handed to an evaluator. Also a setup defect.
//! - **Transport conditions** ([`TransportError`]): peer data not yet
//!   arrived surfaces as blocking with a timeout; the timeout itself is
//!   the only recoverable-looking variant, and it indicates a peer that
//!   never completed its send phase.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::id::FieldIdentity;
use crate::phase::{Phase, PhaseOp};
use crate::transfer::{EvaluationMethod, TransferMethod};

// ── SetupError ─────────────────────────────────────────────────────

/// Configuration defects detected at registration or construction,
/// before any native storage is mutated.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    /// An application with this name is already registered.
    DuplicateApplication {
        /// The conflicting application name.
        name: String,
    },
    /// A field with this name is already registered in the application.
    DuplicateField {
        /// The owning application.
        application: String,
        /// The conflicting field name.
        field: String,
    },
    /// The `{transfer, evaluation}` pairing rule was violated.
    InvalidTransferOptions {
        /// The configured transfer method.
        transfer: TransferMethod,
        /// The configured evaluation method.
        evaluation: EvaluationMethod,
    },
    /// Entity cardinalities that must agree do not.
    EntityCountMismatch {
        /// What was being wired up when the mismatch was found.
        context: String,
        /// The cardinality required by the other side.
        expected: usize,
        /// The cardinality actually supplied.
        actual: usize,
    },
    /// A partition entity references a geometric class with no rank mapping.
    UnmappedClass {
        /// The unmapped class id.
        class: i32,
    },
    /// A name that must be non-empty was empty.
    EmptyName,
    /// The partition describes zero entities.
    EmptyPartition,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateApplication { name } => {
                write!(f, "application '{name}' is already registered")
            }
            Self::DuplicateField { application, field } => {
                write!(f, "field '{field}' is already registered in application '{application}'")
            }
            Self::InvalidTransferOptions {
                transfer,
                evaluation,
            } => write!(
                f,
                "invalid transfer options: {transfer:?} paired with {evaluation:?}"
            ),
            Self::EntityCountMismatch {
                context,
                expected,
                actual,
            } => write!(
                f,
                "entity count mismatch in {context}: expected {expected}, got {actual}"
            ),
            Self::UnmappedClass { class } => {
                write!(f, "geometric class {class} has no rank mapping")
            }
            Self::EmptyName => write!(f, "name must be non-empty"),
            Self::EmptyPartition => write!(f, "partition describes zero entities"),
        }
    }
}

impl Error for SetupError {}

// ── PhaseError ─────────────────────────────────────────────────────

/// Phase protocol misuse.
///
/// Unrecoverable by contract: multi-rank collective phases depend on
/// every rank taking the same transitions in the same order, so a
/// violation means the calling code is defective. Never a silent no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseError {
    /// The phase the application was in.
    pub from: Phase,
    /// The operation that was illegal in that phase.
    pub op: PhaseOp,
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is illegal in phase {}", self.op, self.from)
    }
}

impl Error for PhaseError {}

// ── LookupError ────────────────────────────────────────────────────

/// A name lookup that is total-or-fail found nothing.
///
/// Distinct from a transport failure: an unknown name is a defect in
/// the calling code, never silently treated as absent data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// No application with this name is registered in the server.
    UnknownApplication {
        /// The requested application name.
        name: String,
    },
    /// No field with this name is registered in the application.
    UnknownField {
        /// The owning application.
        application: String,
        /// The requested field name.
        field: String,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownApplication { name } => write!(f, "unknown application '{name}'"),
            Self::UnknownField { application, field } => {
                write!(f, "unknown field '{field}' in application '{application}'")
            }
        }
    }
}

impl Error for LookupError {}

// ── AdapterError ───────────────────────────────────────────────────

/// Checked adapter downcast failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterError {
    /// The stored adapter is not of the requested variant.
    VariantMismatch {
        /// Type name of the requested variant.
        expected: &'static str,
        /// Variant tag of the adapter actually stored.
        actual: &'static str,
    },
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VariantMismatch { expected, actual } => {
                write!(f, "adapter variant mismatch: requested {expected}, stored {actual}")
            }
        }
    }
}

impl Error for AdapterError {}

// ── EvaluateError ──────────────────────────────────────────────────

/// Malformed inputs handed to an evaluator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvaluateError {
    /// Source value and coordinate arrays differ in length.
    ShapeMismatch {
        /// Number of source values.
        values: usize,
        /// Number of source coordinates.
        coords: usize,
    },
    /// The source entity set is empty but targets were requested.
    EmptySource,
}

impl fmt::Display for EvaluateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { values, coords } => write!(
                f,
                "evaluator shape mismatch: {values} source values, {coords} source coordinates"
            ),
            Self::EmptySource => write!(f, "evaluator has no source points"),
        }
    }
}

impl Error for EvaluateError {}

// ── TransportError ─────────────────────────────────────────────────

/// Failures surfaced by the rendezvous transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// No payload for this identity arrived within the timeout.
    ///
    /// Indicates a peer that never completed its matching send phase.
    Timeout {
        /// The identity that was waited on.
        identity: FieldIdentity,
        /// How long the receiver blocked.
        waited: Duration,
    },
    /// The transport endpoint for this identity is gone.
    Disconnected {
        /// The identity whose endpoint disappeared.
        identity: FieldIdentity,
    },
    /// A delivered payload does not have the registered shape.
    PayloadShape {
        /// The identity of the malformed delivery.
        identity: FieldIdentity,
        /// The element count fixed at registration.
        expected: usize,
        /// The element count actually delivered.
        actual: usize,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { identity, waited } => {
                write!(f, "timed out after {waited:?} waiting for '{identity}'")
            }
            Self::Disconnected { identity } => {
                write!(f, "transport endpoint for '{identity}' disconnected")
            }
            Self::PayloadShape {
                identity,
                expected,
                actual,
            } => write!(
                f,
                "payload for '{identity}' has {actual} elements, registered shape is {expected}"
            ),
        }
    }
}

impl Error for TransportError {}

// ── CouplingError ──────────────────────────────────────────────────

/// Top-level error surfaced to drivers.
///
/// Sum of the taxonomy above; everything except [`Transport`](Self::Transport)
/// is a programming-error assertion that should abort the run.
#[derive(Clone, Debug, PartialEq)]
pub enum CouplingError {
    /// Configuration defect at registration or construction.
    Setup(SetupError),
    /// Phase protocol misuse.
    Phase(PhaseError),
    /// Unknown application or field name.
    Lookup(LookupError),
    /// Checked adapter downcast failure.
    Adapter(AdapterError),
    /// Malformed evaluator inputs.
    Evaluate(EvaluateError),
    /// Rendezvous transport failure.
    Transport(TransportError),
}

impl fmt::Display for CouplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "setup: {e}"),
            Self::Phase(e) => write!(f, "phase: {e}"),
            Self::Lookup(e) => write!(f, "lookup: {e}"),
            Self::Adapter(e) => write!(f, "adapter: {e}"),
            Self::Evaluate(e) => write!(f, "evaluate: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl Error for CouplingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            Self::Phase(e) => Some(e),
            Self::Lookup(e) => Some(e),
            Self::Adapter(e) => Some(e),
            Self::Evaluate(e) => Some(e),
            Self::Transport(e) => Some(e),
        }
    }
}

impl From<SetupError> for CouplingError {
    fn from(e: SetupError) -> Self {
        Self::Setup(e)
    }
}

impl From<PhaseError> for CouplingError {
    fn from(e: PhaseError) -> Self {
        Self::Phase(e)
    }
}

impl From<LookupError> for CouplingError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

impl From<AdapterError> for CouplingError {
    fn from(e: AdapterError) -> Self {
        Self::Adapter(e)
    }
}

impl From<EvaluateError> for CouplingError {
    fn from(e: EvaluateError) -> Self {
        Self::Evaluate(e)
    }
}

impl From<TransportError> for CouplingError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_informative() {
        let e = SetupError::DuplicateField {
            application: "core".into(),
            field: "pot0_plane_0".into(),
        };
        assert!(e.to_string().contains("pot0_plane_0"));
        assert!(e.to_string().contains("core"));

        let e = TransportError::Timeout {
            identity: FieldIdentity::new("edge", "dpot_1_plane_0"),
            waited: Duration::from_secs(30),
        };
        assert!(e.to_string().contains("edge/dpot_1_plane_0"));
    }

    #[test]
    fn coupling_error_chains_source() {
        let e = CouplingError::from(LookupError::UnknownApplication { name: "ion".into() });
        assert!(e.source().is_some());
        assert!(e.to_string().contains("unknown application"));
    }
}
