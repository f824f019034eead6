//! Server configuration and validation.

use std::sync::Arc;
use std::time::Duration;

use tandem_core::SetupError;
use tandem_transport::PartitionSpec;

use crate::probe::{NoopProbe, PhaseProbe};

/// Builder-input for constructing a [`CouplerServer`](crate::CouplerServer).
///
/// [`validate`](Self::validate) checks the structural invariants at
/// construction time so configuration defects fail before any
/// application or field exists.
#[derive(Clone)]
pub struct ServerConfig {
    /// Name of the coupling session, used in diagnostics.
    pub name: String,
    /// The authoritative partition and overlap description.
    pub partition: Arc<PartitionSpec>,
    /// How long a blocked receive waits for peer data before failing.
    /// Default: 30 seconds.
    pub receive_timeout: Duration,
    /// Instrumentation hook for phase control and field operations.
    /// Default: [`NoopProbe`].
    pub probe: Arc<dyn PhaseProbe>,
}

impl ServerConfig {
    /// Config with default timeout and a no-op probe.
    pub fn new(name: impl Into<String>, partition: Arc<PartitionSpec>) -> Self {
        Self {
            name: name.into(),
            partition,
            receive_timeout: Duration::from_secs(30),
            probe: Arc::new(NoopProbe),
        }
    }

    /// Replace the receive timeout.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// Replace the instrumentation probe.
    pub fn with_probe(mut self, probe: Arc<dyn PhaseProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Check structural invariants: non-empty session name, non-empty
    /// partition.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.name.is_empty() {
            return Err(SetupError::EmptyName);
        }
        if self.partition.entity_count() == 0 {
            return Err(SetupError::EmptyPartition);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("name", &self.name)
            .field("entity_count", &self.partition.entity_count())
            .field("receive_timeout", &self.receive_timeout)
            .finish()
    }
}
