//! The [`ConvertibleCoupledField`]: one named field bound to an adapter
//! and a pair of transfer options.

use std::sync::Arc;
use std::time::Duration;

use tandem_adapters::evaluator_for;
use tandem_core::{
    adapter_as, adapter_as_mut, AdapterError, CouplingError, FieldAdapter, FieldIdentity,
    OverlapMask, PhaseEpoch, Real, SetupError, TransferOptions, TransportError,
};
use tandem_transport::{PartitionSpec, Rendezvous};

/// A named field bound to one adapter instance and two transfer-options
/// pairs: one for the into-native direction, one for the into-network
/// direction.
///
/// The transfer buffer exchanged through the coupler has the canonical
/// shape of the server's overlap region: one element per marked entity,
/// in ascending mask order. A verbatim (`Copy`) direction requires the
/// native entity set to match that shape one-to-one, which registration
/// guarantees by checking the adapter's entity count against the mask.
/// An interpolating direction evaluates between the native geometry and
/// the partition's reference coordinates.
///
/// Phase legality is checked by the owning [`Application`](crate::Application)
/// before it calls [`send`](Self::send) / [`receive`](Self::receive);
/// neither operation mutates the overlap mask.
pub struct ConvertibleCoupledField {
    identity: FieldIdentity,
    adapter: Box<dyn FieldAdapter>,
    into_native: TransferOptions,
    into_network: TransferOptions,
    overlap: Arc<OverlapMask>,
    partition: Arc<PartitionSpec>,
    pull_buffer: Vec<Real>,
    last_received: Option<PhaseEpoch>,
}

impl ConvertibleCoupledField {
    pub(crate) fn new(
        identity: FieldIdentity,
        adapter: Box<dyn FieldAdapter>,
        into_native: TransferOptions,
        into_network: TransferOptions,
        overlap: Arc<OverlapMask>,
        partition: Arc<PartitionSpec>,
    ) -> Result<Self, SetupError> {
        into_native.validate()?;
        into_network.validate()?;
        if adapter.entity_count() != overlap.entity_count() {
            return Err(SetupError::EntityCountMismatch {
                context: format!("field '{identity}' adapter vs overlap mask"),
                expected: overlap.entity_count(),
                actual: adapter.entity_count(),
            });
        }
        if overlap.entity_count() != partition.entity_count() {
            return Err(SetupError::EntityCountMismatch {
                context: format!("field '{identity}' overlap mask vs partition"),
                expected: partition.entity_count(),
                actual: overlap.entity_count(),
            });
        }
        Ok(Self {
            identity,
            adapter,
            into_native,
            into_network,
            overlap,
            partition,
            pull_buffer: Vec::new(),
            last_received: None,
        })
    }

    /// The `(application, field)` routing key.
    pub fn identity(&self) -> &FieldIdentity {
        &self.identity
    }

    /// The field name within its application.
    pub fn name(&self) -> &str {
        &self.identity.field
    }

    /// Transfer options applied when pushing received data into the
    /// native representation.
    pub fn into_native_options(&self) -> TransferOptions {
        self.into_native
    }

    /// Transfer options applied when pulling data out to the network.
    pub fn into_network_options(&self) -> TransferOptions {
        self.into_network
    }

    /// The shared overlap mask this field exchanges under.
    pub fn overlap(&self) -> &OverlapMask {
        &self.overlap
    }

    /// Epoch of the most recent successfully received delivery.
    pub fn last_received_epoch(&self) -> Option<PhaseEpoch> {
        self.last_received
    }

    /// The concrete adapter as the requested variant.
    ///
    /// Fails with a variant-mismatch error if the stored adapter is of a
    /// different type; never reinterprets memory.
    pub fn adapter_as<V: FieldAdapter>(&self) -> Result<&V, AdapterError> {
        adapter_as::<V>(self.adapter.as_ref())
    }

    /// Mutable counterpart of [`adapter_as`](Self::adapter_as), for
    /// writing solver output into the native representation.
    pub fn adapter_as_mut<V: FieldAdapter>(&mut self) -> Result<&mut V, AdapterError> {
        adapter_as_mut::<V>(self.adapter.as_mut())
    }

    /// Pull current native values, apply the into-network options, and
    /// publish the canonical buffer under this field's identity.
    ///
    /// The payload is not visible to peers until the owning
    /// application's send phase ends.
    pub(crate) fn send(
        &mut self,
        transport: &dyn Rendezvous,
        epoch: PhaseEpoch,
    ) -> Result<(), CouplingError> {
        self.adapter.pull(&self.overlap, &mut self.pull_buffer);
        let payload: Arc<[Real]> = if self.into_network.needs_evaluation() {
            let scheme = evaluator_for(self.into_network.evaluation).ok_or(
                SetupError::InvalidTransferOptions {
                    transfer: self.into_network.transfer,
                    evaluation: self.into_network.evaluation,
                },
            )?;
            let evaluated = scheme.evaluate(
                &self.pull_buffer,
                &self.adapter.coordinates(&self.overlap),
                &self.partition.overlap_coords(&self.overlap),
            )?;
            Arc::from(evaluated.into_boxed_slice())
        } else {
            Arc::from(self.pull_buffer.clone().into_boxed_slice())
        };
        transport.put(&self.identity, epoch, payload);
        Ok(())
    }

    /// Obtain the most recently delivered buffer for this identity,
    /// apply the into-native options, and push into the native
    /// representation.
    ///
    /// Blocks until a delivery is available or `timeout` elapses. Every
    /// precondition (payload shape, evaluation) is checked before the
    /// adapter push, so a failure leaves the native storage untouched.
    pub(crate) fn receive(
        &mut self,
        transport: &dyn Rendezvous,
        timeout: Duration,
    ) -> Result<PhaseEpoch, CouplingError> {
        let delivery = transport.get(&self.identity, PhaseEpoch::FIRST, timeout)?;
        let canonical_len = self.overlap.marked_count();
        if delivery.payload.len() != canonical_len {
            return Err(TransportError::PayloadShape {
                identity: self.identity.clone(),
                expected: canonical_len,
                actual: delivery.payload.len(),
            }
            .into());
        }
        let pushed: Vec<Real> = if self.into_native.needs_evaluation() {
            let scheme = evaluator_for(self.into_native.evaluation).ok_or(
                SetupError::InvalidTransferOptions {
                    transfer: self.into_native.transfer,
                    evaluation: self.into_native.evaluation,
                },
            )?;
            scheme.evaluate(
                &delivery.payload,
                &self.partition.overlap_coords(&self.overlap),
                &self.adapter.coordinates(&self.overlap),
            )?
        } else {
            delivery.payload.to_vec()
        };
        self.adapter.push(&self.overlap, &pushed)?;
        self.last_received = Some(delivery.epoch);
        Ok(delivery.epoch)
    }
}

impl std::fmt::Debug for ConvertibleCoupledField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertibleCoupledField")
            .field("identity", &self.identity)
            .field("adapter_variant", &self.adapter.variant())
            .field("into_native", &self.into_native)
            .field("into_network", &self.into_network)
            .field("marked_count", &self.overlap.marked_count())
            .finish()
    }
}
