//! One coupled code's logical endpoint: field registry and phase control.

use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tandem_core::{
    CouplingError, FieldAdapter, FieldIdentity, LookupError, OverlapMask, Phase, PhaseEpoch,
    PhaseError, PhaseOp, PhaseState, SetupError, TransferOptions,
};
use tandem_transport::{PartitionSpec, Rendezvous};

use crate::field::ConvertibleCoupledField;
use crate::probe::{PhaseProbe, ProbeOp, ProbeSpan};

/// A named logical endpoint owning a registry of coupled fields and its
/// phase state machine.
///
/// Created by [`CouplerServer::add_application`](crate::CouplerServer::add_application);
/// shares the server's partition description, transport, probe, and
/// receive timeout. Fields are registered once at setup and live for the
/// lifetime of the application.
pub struct Application {
    name: String,
    path: String,
    fields: IndexMap<String, ConvertibleCoupledField>,
    phase: PhaseState,
    send_epoch: PhaseEpoch,
    partition: Arc<PartitionSpec>,
    transport: Arc<dyn Rendezvous>,
    probe: Arc<dyn PhaseProbe>,
    receive_timeout: Duration,
}

impl Application {
    pub(crate) fn new(
        name: String,
        path: String,
        partition: Arc<PartitionSpec>,
        transport: Arc<dyn Rendezvous>,
        probe: Arc<dyn PhaseProbe>,
        receive_timeout: Duration,
    ) -> Self {
        Self {
            name,
            path,
            fields: IndexMap::new(),
            phase: PhaseState::new(),
            send_epoch: PhaseEpoch::FIRST,
            partition,
            transport,
            probe,
            receive_timeout,
        }
    }

    /// The application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The path prefix this application's fields are filed under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    /// The epoch the next completed send phase will carry.
    pub fn send_epoch(&self) -> PhaseEpoch {
        self.send_epoch
    }

    /// Names of the registered fields, in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    // ── Field registration and lookup ───────────────────────────

    /// Construct and register a coupled field.
    ///
    /// Validates both transfer-options pairs and the adapter's entity
    /// count before inserting; a duplicate name fails and leaves the
    /// registry unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn add_field(
        &mut self,
        name: &str,
        adapter: Box<dyn FieldAdapter>,
        into_native: TransferOptions,
        into_network: TransferOptions,
        overlap: Arc<OverlapMask>,
    ) -> Result<&mut ConvertibleCoupledField, CouplingError> {
        if name.is_empty() {
            return Err(SetupError::EmptyName.into());
        }
        if self.fields.contains_key(name) {
            return Err(SetupError::DuplicateField {
                application: self.name.clone(),
                field: name.to_string(),
            }
            .into());
        }
        let field = ConvertibleCoupledField::new(
            FieldIdentity::new(self.name.clone(), name),
            adapter,
            into_native,
            into_network,
            overlap,
            Arc::clone(&self.partition),
        )?;
        let entry = self.fields.entry(name.to_string()).or_insert(field);
        Ok(entry)
    }

    /// Index of a field by name; the single lookup both accessors share.
    fn field_index(&self, name: &str) -> Result<usize, LookupError> {
        self.fields
            .get_index_of(name)
            .ok_or_else(|| LookupError::UnknownField {
                application: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Look up a field by name. Total-or-fail: an unknown name is a
    /// programming error, never silently absent data.
    pub fn field(&self, name: &str) -> Result<&ConvertibleCoupledField, LookupError> {
        let index = self.field_index(name)?;
        Ok(&self.fields[index])
    }

    /// Mutable counterpart of [`field`](Self::field).
    pub fn field_mut(&mut self, name: &str) -> Result<&mut ConvertibleCoupledField, LookupError> {
        let index = self.field_index(name)?;
        Ok(&mut self.fields[index])
    }

    // ── Phase control ───────────────────────────────────────────

    /// Open a send phase. Fails unless the application is idle.
    pub fn begin_send_phase(&mut self) -> Result<(), PhaseError> {
        let started = Instant::now();
        self.phase.begin_send()?;
        self.record_phase(ProbeOp::BeginSendPhase, started);
        Ok(())
    }

    /// Close the send phase: the synchronization point at which every
    /// payload sent during the phase becomes visible to peer receives.
    pub fn end_send_phase(&mut self) -> Result<(), PhaseError> {
        let started = Instant::now();
        self.phase.end_send()?;
        self.transport.confirm_send_phase(&self.name);
        self.send_epoch = self.send_epoch.next();
        self.record_phase(ProbeOp::EndSendPhase, started);
        Ok(())
    }

    /// Open a receive phase. Fails unless the application is idle.
    pub fn begin_receive_phase(&mut self) -> Result<(), PhaseError> {
        let started = Instant::now();
        self.phase.begin_receive()?;
        self.record_phase(ProbeOp::BeginReceivePhase, started);
        Ok(())
    }

    /// Close the receive phase. Locally pushed values are stable until
    /// the next receive.
    pub fn end_receive_phase(&mut self) -> Result<(), PhaseError> {
        let started = Instant::now();
        self.phase.end_receive()?;
        self.transport.confirm_receive_phase(&self.name);
        self.record_phase(ProbeOp::EndReceivePhase, started);
        Ok(())
    }

    // ── Field operations ────────────────────────────────────────

    /// Send one field. Legal only inside a send phase.
    pub fn send(&mut self, field_name: &str) -> Result<(), CouplingError> {
        self.phase.require(Phase::Sending, PhaseOp::Send)?;
        let started = Instant::now();
        let epoch = self.send_epoch;
        let transport = Arc::clone(&self.transport);
        let index = self.field_index(field_name)?;
        self.fields[index].send(transport.as_ref(), epoch)?;
        self.record_field(ProbeOp::Send, field_name, started);
        Ok(())
    }

    /// Receive one field. Legal only inside a receive phase; blocks with
    /// the configured timeout until peer data for this identity arrives.
    pub fn receive(&mut self, field_name: &str) -> Result<(), CouplingError> {
        self.phase.require(Phase::Receiving, PhaseOp::Receive)?;
        let started = Instant::now();
        let timeout = self.receive_timeout;
        let transport = Arc::clone(&self.transport);
        let index = self.field_index(field_name)?;
        self.fields[index].receive(transport.as_ref(), timeout)?;
        self.record_field(ProbeOp::Receive, field_name, started);
        Ok(())
    }

    /// Send every registered field, in registration order.
    pub fn send_all(&mut self) -> Result<(), CouplingError> {
        let names: Vec<String> = self.fields.keys().cloned().collect();
        for name in names {
            self.send(&name)?;
        }
        Ok(())
    }

    /// Receive every registered field, in registration order.
    pub fn receive_all(&mut self) -> Result<(), CouplingError> {
        let names: Vec<String> = self.fields.keys().cloned().collect();
        for name in names {
            self.receive(&name)?;
        }
        Ok(())
    }

    fn record_phase(&self, op: ProbeOp, started: Instant) {
        self.probe.record(ProbeSpan {
            op,
            application: self.name.clone(),
            field: None,
            elapsed: started.elapsed(),
        });
    }

    fn record_field(&self, op: ProbeOp, field: &str, started: Instant) {
        self.probe.record(ProbeSpan {
            op,
            application: self.name.clone(),
            field: Some(field.to_string()),
            elapsed: started.elapsed(),
        });
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("phase", &self.phase.current())
            .field("fields", &self.fields.len())
            .field("send_epoch", &self.send_epoch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_adapters::TagFieldAdapter;
    use tandem_core::RankId;
    use tandem_transport::InProcessRendezvous;

    use crate::probe::NoopProbe;

    fn application() -> Application {
        let partition = Arc::new(PartitionSpec::uniform(4, RankId(0)).unwrap());
        Application::new(
            "core".to_string(),
            "core/".to_string(),
            partition,
            InProcessRendezvous::new(),
            Arc::new(NoopProbe),
            Duration::from_millis(20),
        )
    }

    fn register(app: &mut Application, name: &str, values: Vec<f64>) {
        app.add_field(
            name,
            Box::new(TagFieldAdapter::with_index_coords(name, values)),
            TransferOptions::COPY,
            TransferOptions::COPY,
            Arc::new(OverlapMask::all(4)),
        )
        .unwrap();
    }

    #[test]
    fn duplicate_field_fails_and_registry_unchanged() {
        let mut app = application();
        register(&mut app, "density", vec![1.0, 2.0, 3.0, 4.0]);
        let err = app
            .add_field(
                "density",
                Box::new(TagFieldAdapter::with_index_coords("density", vec![0.0; 4])),
                TransferOptions::COPY,
                TransferOptions::COPY,
                Arc::new(OverlapMask::all(4)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CouplingError::Setup(SetupError::DuplicateField { .. })
        ));
        assert_eq!(app.field_names().collect::<Vec<_>>(), vec!["density"]);
        // The first registration survives, values intact.
        let tag = app
            .field("density")
            .unwrap()
            .adapter_as::<TagFieldAdapter>()
            .unwrap();
        assert_eq!(tag.values(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn empty_field_name_rejected() {
        let mut app = application();
        let err = app
            .add_field(
                "",
                Box::new(TagFieldAdapter::with_index_coords("", vec![0.0; 4])),
                TransferOptions::COPY,
                TransferOptions::COPY,
                Arc::new(OverlapMask::all(4)),
            )
            .unwrap_err();
        assert!(matches!(err, CouplingError::Setup(SetupError::EmptyName)));
        assert_eq!(app.field_names().count(), 0);
    }

    #[test]
    fn unknown_field_lookup_fails() {
        let mut app = application();
        register(&mut app, "density", vec![0.0; 4]);
        assert!(matches!(
            app.field("nope"),
            Err(LookupError::UnknownField { .. })
        ));
        assert!(matches!(
            app.field_mut("nope"),
            Err(LookupError::UnknownField { .. })
        ));
        assert!(app.field("density").is_ok());
    }
}
