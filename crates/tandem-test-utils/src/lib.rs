//! Test utilities and mock types for Tandem development.
//!
//! Provides a mock implementation of the
//! [`FieldAdapter`](tandem_core::FieldAdapter) contract with call
//! counters, a recording [`PhaseProbe`](tandem_server::PhaseProbe), and
//! fixtures for the standard two-application coupling scenario.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::any::Any;
use std::cell::Cell;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tandem_core::{
    Coord, FieldAdapter, FieldIdentity, OverlapMask, RankId, Real, TransportError,
};
use tandem_server::{CouplerServer, PhaseProbe, ProbeSpan, ServerConfig};
use tandem_transport::{InProcessRendezvous, PartitionSpec, Rendezvous};

/// Mock adapter over a plain value vector, with pull/push call counters.
///
/// Coordinates are the entity index in 1D, matching the uniform
/// partition fixtures.
pub struct MockFieldAdapter {
    name: String,
    values: Vec<Real>,
    pull_calls: Cell<usize>,
    push_calls: usize,
}

impl MockFieldAdapter {
    pub fn new(name: impl Into<String>, values: Vec<Real>) -> Self {
        Self {
            name: name.into(),
            values,
            pull_calls: Cell::new(0),
            push_calls: 0,
        }
    }

    /// Adapter of `entity_count` zeros.
    pub fn zeroed(name: impl Into<String>, entity_count: usize) -> Self {
        Self::new(name, vec![0.0; entity_count])
    }

    pub fn values(&self) -> &[Real] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Real] {
        &mut self.values
    }

    pub fn pull_calls(&self) -> usize {
        self.pull_calls.get()
    }

    pub fn push_calls(&self) -> usize {
        self.push_calls
    }
}

impl FieldAdapter for MockFieldAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn variant(&self) -> &'static str {
        "mock"
    }

    fn entity_count(&self) -> usize {
        self.values.len()
    }

    fn pull(&self, mask: &OverlapMask, out: &mut Vec<Real>) {
        self.pull_calls.set(self.pull_calls.get() + 1);
        out.clear();
        out.extend(mask.iter_marked().map(|entity| self.values[entity]));
    }

    fn push(&mut self, mask: &OverlapMask, values: &[Real]) -> Result<(), TransportError> {
        if values.len() != mask.marked_count() {
            return Err(TransportError::PayloadShape {
                identity: FieldIdentity::new("mock", self.name.clone()),
                expected: mask.marked_count(),
                actual: values.len(),
            });
        }
        self.push_calls += 1;
        for (entity, value) in mask.iter_marked().zip(values) {
            self.values[entity] = *value;
        }
        Ok(())
    }

    fn coordinates(&self, mask: &OverlapMask) -> Vec<Coord> {
        mask.iter_marked()
            .map(|entity| Coord::from_slice(&[entity as f64]))
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Probe that stores every span for later inspection.
#[derive(Default)]
pub struct RecordingProbe {
    spans: Mutex<Vec<ProbeSpan>>,
}

impl RecordingProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the recorded spans, in arrival order.
    pub fn spans(&self) -> Vec<ProbeSpan> {
        match self.spans.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PhaseProbe for RecordingProbe {
    fn record(&self, span: ProbeSpan) {
        if let Ok(mut guard) = self.spans.lock() {
            guard.push(span);
        }
    }
}

/// Entity count used by the standard scenario fixtures.
pub const SCENARIO_ENTITIES: usize = 100;

/// Marked prefix of the scenario overlap mask: entities `0..50`.
pub const SCENARIO_OVERLAP: usize = 50;

/// Server over a 100-entity uniform partition with a short receive
/// timeout, plus the shared transport it was built on.
pub fn scenario_server() -> (CouplerServer, Arc<InProcessRendezvous>) {
    scenario_server_with_probe(Arc::new(tandem_server::NoopProbe))
}

/// [`scenario_server`] with an injected probe.
pub fn scenario_server_with_probe(
    probe: Arc<dyn PhaseProbe>,
) -> (CouplerServer, Arc<InProcessRendezvous>) {
    let partition = Arc::new(
        PartitionSpec::uniform(SCENARIO_ENTITIES, RankId(0))
            .expect("scenario partition is non-empty"),
    );
    let transport = InProcessRendezvous::new();
    let config = ServerConfig::new("scenario", partition)
        .with_receive_timeout(Duration::from_millis(100))
        .with_probe(probe);
    let server = CouplerServer::new(config, Arc::clone(&transport) as Arc<dyn Rendezvous>)
        .expect("scenario config is valid");
    (server, transport)
}

/// The scenario overlap mask: entities `0..SCENARIO_OVERLAP` marked.
pub fn scenario_mask() -> Arc<OverlapMask> {
    Arc::new(OverlapMask::from_predicate(SCENARIO_ENTITIES, |entity| {
        entity < SCENARIO_OVERLAP
    }))
}
