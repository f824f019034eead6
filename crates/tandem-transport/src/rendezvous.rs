//! The narrow transport contract the coupler core consumes.

use std::sync::Arc;
use std::time::Duration;

use tandem_core::{FieldIdentity, PhaseEpoch, Real, TransportError};

/// One payload delivered for a field identity.
#[derive(Clone, Debug)]
pub struct Delivery {
    /// The sender's send-phase epoch when the payload was published.
    pub epoch: PhaseEpoch,
    /// The canonical transfer buffer, one element per overlap entity.
    pub payload: Arc<[Real]>,
}

/// Point-to-point rendezvous delivering buffers keyed by field identity.
///
/// The coupler core treats the transport as an opaque `put`/`get` pair
/// honoring phase barriers. Payloads are opaque: length and element type
/// are fixed at field registration, and the transport never inspects
/// them.
///
/// The delivery channel is the field name: peer applications register
/// the same field name independently and those endpoints share one
/// channel, which is how a buffer produced by one application's send
/// phase reaches another's matching receive. The application component
/// of the identity attributes the endpoint (staging on the send side,
/// diagnostics on both). Field names are partitioned by construction:
/// one application sends on a channel per coupling cycle.
pub trait Rendezvous: Send + Sync {
    /// Publish a payload for `identity` under the sender's current epoch.
    ///
    /// Non-blocking. The payload is not guaranteed visible to peers
    /// until the sender's [`confirm_send_phase`](Self::confirm_send_phase)
    /// — the transport may buffer it until the phase barrier.
    fn put(&self, identity: &FieldIdentity, epoch: PhaseEpoch, payload: Arc<[Real]>);

    /// Obtain the most recent delivery for `identity` with
    /// `epoch >= min_epoch`.
    ///
    /// Blocks until such a delivery is available or `timeout` elapses;
    /// a timeout means the peer never completed a matching send phase
    /// and surfaces as [`TransportError::Timeout`]. Re-calling with a
    /// `min_epoch` already satisfied redelivers the cached latest
    /// payload unchanged — the transport never invents data.
    fn get(
        &self,
        identity: &FieldIdentity,
        min_epoch: PhaseEpoch,
        timeout: Duration,
    ) -> Result<Delivery, TransportError>;

    /// Send-phase barrier: flush every payload `application` published
    /// during the closing phase, making them visible to peer receives.
    fn confirm_send_phase(&self, application: &str);

    /// Receive-phase barrier. Locally pushed values are stable after
    /// this returns; the in-process transport needs no work here.
    fn confirm_receive_phase(&self, _application: &str) {}
}
