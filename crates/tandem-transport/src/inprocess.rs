//! In-process reference implementation of the rendezvous contract.
//!
//! Applications coupled through [`InProcessRendezvous`] live in one
//! process: each field identity gets an unbounded channel plus a
//! latest-delivery cache. `put` stages payloads per sending application;
//! `confirm_send_phase` flushes them into the channels, which is what
//! makes send output invisible to peers until the phase barrier.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use indexmap::IndexMap;
use tandem_core::{FieldIdentity, PhaseEpoch, Real, TransportError};

use crate::rendezvous::{Delivery, Rendezvous};

struct Mailbox {
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    /// Most recent delivery taken out of the channel, kept for
    /// idempotent re-receives.
    latest: Option<Delivery>,
}

impl Mailbox {
    fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            tx,
            rx,
            latest: None,
        }
    }
}

#[derive(Default)]
struct Registry {
    /// Payloads staged by `put`, keyed by sending application, until the
    /// send-phase barrier flushes them.
    pending: IndexMap<String, Vec<(String, Delivery)>>,
    /// Delivery channels, keyed by field name: peer endpoints that
    /// registered the same field name share one channel.
    mailboxes: IndexMap<String, Mailbox>,
}

impl Registry {
    fn mailbox(&mut self, field: &str) -> &mut Mailbox {
        if !self.mailboxes.contains_key(field) {
            self.mailboxes.insert(field.to_string(), Mailbox::new());
        }
        &mut self.mailboxes[field]
    }
}

/// Rendezvous transport for applications sharing one process.
///
/// Cheap to share: clone the `Arc` into every application. All state is
/// behind one registry lock; blocking receives clone the channel
/// endpoint out of the registry first, so a `get` never holds the lock
/// while waiting.
#[derive(Default)]
pub struct InProcessRendezvous {
    registry: Mutex<Registry>,
}

impl InProcessRendezvous {
    /// Fresh transport with no staged or delivered payloads.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        // The registry lock protects plain maps; a poisoned lock means a
        // panic mid-update, which this transport never does.
        match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Rendezvous for InProcessRendezvous {
    fn put(&self, identity: &FieldIdentity, epoch: PhaseEpoch, payload: Arc<[Real]>) {
        let mut registry = self.lock();
        registry
            .pending
            .entry(identity.application.clone())
            .or_default()
            .push((identity.field.clone(), Delivery { epoch, payload }));
    }

    fn get(
        &self,
        identity: &FieldIdentity,
        min_epoch: PhaseEpoch,
        timeout: Duration,
    ) -> Result<Delivery, TransportError> {
        let deadline = Instant::now() + timeout;
        let rx = {
            let mut registry = self.lock();
            let mailbox = registry.mailbox(&identity.field);
            // Drain anything already flushed so `latest` is current.
            while let Ok(delivery) = mailbox.rx.try_recv() {
                mailbox.latest = Some(delivery);
            }
            if let Some(latest) = &mailbox.latest {
                if latest.epoch >= min_epoch {
                    return Ok(latest.clone());
                }
            }
            mailbox.rx.clone()
        };

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::Timeout {
                    identity: identity.clone(),
                    waited: timeout,
                });
            }
            match rx.recv_timeout(remaining) {
                Ok(delivery) => {
                    let satisfied = delivery.epoch >= min_epoch;
                    let mut registry = self.lock();
                    registry.mailbox(&identity.field).latest = Some(delivery.clone());
                    if satisfied {
                        return Ok(delivery);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(TransportError::Timeout {
                        identity: identity.clone(),
                        waited: timeout,
                    });
                }
                // The registry keeps a Sender alive per mailbox, so this
                // only happens if the transport itself was dropped.
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TransportError::Disconnected {
                        identity: identity.clone(),
                    });
                }
            }
        }
    }

    fn confirm_send_phase(&self, application: &str) {
        let mut registry = self.lock();
        let staged = registry.pending.swap_remove(application).unwrap_or_default();
        for (field, delivery) in staged {
            let mailbox = registry.mailbox(&field);
            // Unbounded channel; send only fails if the receiver side is
            // gone, which the registry prevents.
            let _ = mailbox.tx.send(delivery);
        }
    }
}
