//! Injectable instrumentation hook for phase control and field operations.
//!
//! Profiling is a dependency-injection choice, not conditional
//! compilation: the server calls the probe at the same points whether or
//! not anything listens, and the default [`NoopProbe`] keeps the hot
//! path free of work. A recording implementation for tests lives in
//! `tandem-test-utils`.

use std::time::Duration;

/// The instrumented operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeOp {
    /// `begin_send_phase` on an application.
    BeginSendPhase,
    /// `end_send_phase` on an application.
    EndSendPhase,
    /// `begin_receive_phase` on an application.
    BeginReceivePhase,
    /// `end_receive_phase` on an application.
    EndReceivePhase,
    /// A field send.
    Send,
    /// A field receive.
    Receive,
}

/// One timed operation reported to the probe.
#[derive(Clone, Debug)]
pub struct ProbeSpan {
    /// Which operation completed.
    pub op: ProbeOp,
    /// The application the operation ran on.
    pub application: String,
    /// The field, for field-level operations.
    pub field: Option<String>,
    /// Wall-clock duration of the operation.
    pub elapsed: Duration,
}

/// Consumer of instrumentation spans.
///
/// Implementations must be cheap: the server reports every phase
/// transition and field operation that completes successfully. Failed
/// transitions produce no span.
pub trait PhaseProbe: Send + Sync {
    /// Record one completed operation.
    fn record(&self, span: ProbeSpan);
}

/// The default probe: discards every span.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProbe;

impl PhaseProbe for NoopProbe {
    fn record(&self, _span: ProbeSpan) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_probe_accepts_spans() {
        NoopProbe.record(ProbeSpan {
            op: ProbeOp::Send,
            application: "core".into(),
            field: Some("pot0_plane_0".into()),
            elapsed: Duration::from_micros(3),
        });
    }
}
