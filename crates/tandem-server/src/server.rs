//! The [`CouplerServer`]: application registry and partition ownership.

use std::sync::Arc;

use indexmap::IndexMap;
use tandem_core::{LookupError, OverlapMask, PhaseError, SetupError};
use tandem_transport::{PartitionSpec, Rendezvous};

use crate::application::Application;
use crate::config::ServerConfig;

/// The central coupling hub.
///
/// Owns the authoritative partition/overlap description and the
/// registered applications, and routes phase control to them. The
/// partition is immutable after construction and exposed read-only;
/// applications share it (and the transport and probe) by `Arc`.
pub struct CouplerServer {
    name: String,
    partition: Arc<PartitionSpec>,
    transport: Arc<dyn Rendezvous>,
    applications: IndexMap<String, Application>,
    config: ServerConfig,
}

impl CouplerServer {
    /// Construct a server from a validated configuration and a
    /// transport.
    pub fn new(config: ServerConfig, transport: Arc<dyn Rendezvous>) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            partition: Arc::clone(&config.partition),
            transport,
            applications: IndexMap::new(),
            config,
        })
    }

    /// The coupling session name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The partition description, read-only.
    pub fn partition(&self) -> &PartitionSpec {
        &self.partition
    }

    /// Mark the overlap region by geometric class, ready to share across
    /// field registrations.
    pub fn mark_overlap(&self, pred: impl Fn(i32) -> bool) -> Arc<OverlapMask> {
        Arc::new(self.partition.mark_overlap(pred))
    }

    /// Names of the registered applications, in registration order.
    pub fn application_names(&self) -> impl Iterator<Item = &str> {
        self.applications.keys().map(String::as_str)
    }

    // ── Application registry ────────────────────────────────────

    /// Register a new application under a unique name.
    ///
    /// Fails if the name is empty or already registered; the registry is
    /// unchanged after a failure.
    pub fn add_application(
        &mut self,
        name: &str,
        path: &str,
    ) -> Result<&mut Application, SetupError> {
        if name.is_empty() {
            return Err(SetupError::EmptyName);
        }
        if self.applications.contains_key(name) {
            return Err(SetupError::DuplicateApplication {
                name: name.to_string(),
            });
        }
        let application = Application::new(
            name.to_string(),
            path.to_string(),
            Arc::clone(&self.partition),
            Arc::clone(&self.transport),
            Arc::clone(&self.config.probe),
            self.config.receive_timeout,
        );
        let entry = self.applications.entry(name.to_string()).or_insert(application);
        Ok(entry)
    }

    /// Index of an application by name; the single lookup both
    /// accessors share.
    fn application_index(&self, name: &str) -> Result<usize, LookupError> {
        self.applications
            .get_index_of(name)
            .ok_or_else(|| LookupError::UnknownApplication {
                name: name.to_string(),
            })
    }

    /// Look up an application by name. Total-or-fail.
    pub fn application(&self, name: &str) -> Result<&Application, LookupError> {
        let index = self.application_index(name)?;
        Ok(&self.applications[index])
    }

    /// Mutable counterpart of [`application`](Self::application).
    pub fn application_mut(&mut self, name: &str) -> Result<&mut Application, LookupError> {
        let index = self.application_index(name)?;
        Ok(&mut self.applications[index])
    }

    // ── Server-level phase control ──────────────────────────────
    //
    // Collective convenience: each call drives the same transition on
    // every owned application, in registration order, stopping at the
    // first violation.

    /// Open a send phase on every application.
    pub fn begin_send_phase(&mut self) -> Result<(), PhaseError> {
        for application in self.applications.values_mut() {
            application.begin_send_phase()?;
        }
        Ok(())
    }

    /// Close the send phase on every application.
    pub fn end_send_phase(&mut self) -> Result<(), PhaseError> {
        for application in self.applications.values_mut() {
            application.end_send_phase()?;
        }
        Ok(())
    }

    /// Open a receive phase on every application.
    pub fn begin_receive_phase(&mut self) -> Result<(), PhaseError> {
        for application in self.applications.values_mut() {
            application.begin_receive_phase()?;
        }
        Ok(())
    }

    /// Close the receive phase on every application.
    pub fn end_receive_phase(&mut self) -> Result<(), PhaseError> {
        for application in self.applications.values_mut() {
            application.end_receive_phase()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for CouplerServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouplerServer")
            .field("name", &self.name)
            .field("entity_count", &self.partition.entity_count())
            .field("applications", &self.applications.len())
            .finish()
    }
}
