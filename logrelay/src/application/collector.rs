// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Collector
//!
//! The supervisor that owns the plugin registries (inputs, processors,
//! outputs, each name → factory) and the map of running instances. `start`
//! constructs an instance's plugins through the registries, runs its manager
//! to completion, and removes it; `stop` signals the instance's input and
//! lets the pipeline drain.
//!
//! ## Concurrency
//!
//! Registries and the instance map are behind reader/writer locks: the map
//! is the hot path for `start`/`stop`/`status`, the registries are
//! read-heavy after startup. `start` blocks for the lifetime of the
//! instance and is expected to be called from its own task, one caller per
//! id; concurrent `start`s with distinct ids are fully supported.
//!
//! ## Registration
//!
//! `Collector::new` registers the builtin plugins (`file` input, `json`
//! processor, `stdout`/`file` outputs). `Collector::bare` starts with empty
//! registries for embedders and tests that bring their own.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use logrelay_domain::{
    CollectorError, ErrorHandler, InputFactory, InstanceConfig, InstanceId, InstanceStatus,
    OutputFactory, ProcessorFactory, StateStore,
};

use crate::application::manager::{Manager, ManagerConfig, PipelineTuning};
use crate::infrastructure::plugins;

/// Host-supplied wiring for a collector.
pub struct CollectorConfig {
    /// Cursor persistence shared by every instance.
    pub state_store: Arc<dyn StateStore>,

    /// Failure hook shared by every instance.
    pub error_handler: ErrorHandler,

    /// Pipeline tuning applied to every instance.
    pub tuning: PipelineTuning,
}

/// Plugin registry + instance supervisor.
pub struct Collector {
    inputs: RwLock<HashMap<String, Arc<dyn InputFactory>>>,
    processors: RwLock<HashMap<String, Arc<dyn ProcessorFactory>>>,
    outputs: RwLock<HashMap<String, Arc<dyn OutputFactory>>>,
    instances: RwLock<HashMap<String, Arc<Manager>>>,
    state_store: Arc<dyn StateStore>,
    error_handler: ErrorHandler,
    tuning: PipelineTuning,
}

impl Collector {
    /// Creates a collector with the builtin plugins registered.
    pub fn new(config: CollectorConfig) -> Result<Self, CollectorError> {
        let collector = Self::bare(config);
        plugins::register_builtins(&collector)?;
        Ok(collector)
    }

    /// Creates a collector with empty registries.
    pub fn bare(config: CollectorConfig) -> Self {
        Self {
            inputs: RwLock::new(HashMap::new()),
            processors: RwLock::new(HashMap::new()),
            outputs: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
            state_store: config.state_store,
            error_handler: config.error_handler,
            tuning: config.tuning,
        }
    }

    /// Registers an input factory under `name`.
    pub fn register_input(
        &self,
        name: &str,
        factory: Arc<dyn InputFactory>,
    ) -> Result<(), CollectorError> {
        let mut inputs = self.inputs.write();
        if inputs.contains_key(name) {
            return Err(CollectorError::AlreadyRegistered(name.to_string()));
        }
        inputs.insert(name.to_string(), factory);
        Ok(())
    }

    /// Registers a processor factory under `name`.
    pub fn register_processor(
        &self,
        name: &str,
        factory: Arc<dyn ProcessorFactory>,
    ) -> Result<(), CollectorError> {
        let mut processors = self.processors.write();
        if processors.contains_key(name) {
            return Err(CollectorError::AlreadyRegistered(name.to_string()));
        }
        processors.insert(name.to_string(), factory);
        Ok(())
    }

    /// Registers an output factory under `name`.
    pub fn register_output(
        &self,
        name: &str,
        factory: Arc<dyn OutputFactory>,
    ) -> Result<(), CollectorError> {
        let mut outputs = self.outputs.write();
        if outputs.contains_key(name) {
            return Err(CollectorError::AlreadyRegistered(name.to_string()));
        }
        outputs.insert(name.to_string(), factory);
        Ok(())
    }

    /// Starts an instance and blocks until it stops.
    ///
    /// Fails with `DuplicateInstance` when `id` is already running, with
    /// `UnknownPlugin`/`InvalidConfiguration` when the config cannot be
    /// built (both also surfaced as critical through the error handler).
    /// The instance is removed from the map before this returns.
    pub async fn start(&self, id: &str, config: InstanceConfig) -> Result<(), CollectorError> {
        let id = InstanceId::new(id)?;

        if self.instances.read().contains_key(id.as_str()) {
            return Err(CollectorError::DuplicateInstance(id.to_string()));
        }

        let manager = match self.build_manager(&id, &config) {
            Ok(manager) => Arc::new(manager),
            Err(err) => {
                (self.error_handler)(true, err.clone());
                return Err(err);
            }
        };

        {
            let mut instances = self.instances.write();
            if instances.contains_key(id.as_str()) {
                return Err(CollectorError::DuplicateInstance(id.to_string()));
            }
            instances.insert(id.to_string(), Arc::clone(&manager));
        }

        manager.run().await;
        tracing::info!(instance = %id, "closing instance");

        self.instances.write().remove(id.as_str());
        Ok(())
    }

    /// Signals an instance to stop. The pipeline drains asynchronously; the
    /// blocked `start` call returns once it has.
    pub fn stop(&self, id: &str) -> Result<(), CollectorError> {
        match self.instances.read().get(id) {
            Some(manager) => {
                manager.stop();
                Ok(())
            }
            None => Err(CollectorError::InstanceNotFound(id.to_string())),
        }
    }

    /// Status snapshot of one instance.
    pub fn status(&self, id: &str) -> Result<InstanceStatus, CollectorError> {
        match self.instances.read().get(id) {
            Some(manager) => Ok(manager.status()),
            None => Err(CollectorError::InstanceNotFound(id.to_string())),
        }
    }

    /// Signals every known instance to stop. Does not wait.
    pub fn stop_all(&self) {
        for manager in self.instances.read().values() {
            manager.stop();
        }
    }

    /// Ids of the currently running instances.
    pub fn list(&self) -> Vec<String> {
        self.instances.read().keys().cloned().collect()
    }

    /// Status snapshots of every running instance, keyed by id.
    pub fn list_status(&self) -> Vec<(String, InstanceStatus)> {
        self.instances
            .read()
            .iter()
            .map(|(id, manager)| (id.clone(), manager.status()))
            .collect()
    }

    fn build_manager(
        &self,
        id: &InstanceId,
        config: &InstanceConfig,
    ) -> Result<Manager, CollectorError> {
        config.validate()?;

        let input_factory = self
            .inputs
            .read()
            .get(&config.input.name)
            .cloned()
            .ok_or_else(|| CollectorError::UnknownPlugin(config.input.name.clone()))?;
        let input = input_factory.create(&config.input.settings_bytes())?;

        let mut processors = Vec::with_capacity(config.processors.len());
        for spec in &config.processors {
            let factory = self
                .processors
                .read()
                .get(&spec.name)
                .cloned()
                .ok_or_else(|| CollectorError::UnknownPlugin(spec.name.clone()))?;
            processors.push(factory.create(&spec.settings_bytes())?);
        }

        let mut outputs = Vec::with_capacity(config.outputs.len());
        for spec in &config.outputs {
            let factory = self
                .outputs
                .read()
                .get(&spec.name)
                .cloned()
                .ok_or_else(|| CollectorError::UnknownPlugin(spec.name.clone()))?;
            outputs.push(factory.create(&spec.settings_bytes())?);
        }

        Ok(Manager::new(ManagerConfig {
            id: id.clone(),
            input,
            processors,
            outputs,
            state_store: Arc::clone(&self.state_store),
            error_handler: Arc::clone(&self.error_handler),
            tuning: self.tuning.clone(),
        }))
    }
}
