//! The dashboard engine: the single recomputation point.
//!
//! DISPATCH ORDER (fixed):
//!   1. Interaction controller computes the next filter state
//!   2. Filter engine derives the filtered view
//!   3. Metric calculators derive KPIs, funnel and breakdowns
//!   4. The bundle is published to every consumer, in registration order
//!
//! RULES:
//!   - Steps 2–4 always run to completion before dispatch returns.
//!   - A command that leaves the state unchanged publishes nothing.
//!   - The record store is never mutated.

use crate::{
    bundle::DerivedBundle,
    command::FilterCommand,
    config::DashConfig,
    consumer::BundleConsumer,
    controller::{self, ToggleValue},
    error::DashResult,
    filter::{DropdownField, FilterState},
    store::{FilterOptions, RecordStore},
    types::Revision,
};
use std::sync::Arc;

pub struct DashEngine {
    config:    DashConfig,
    store:     RecordStore,
    state:     FilterState,
    current:   Arc<DerivedBundle>,
    consumers: Vec<Box<dyn BundleConsumer>>,
}

impl DashEngine {
    /// Build an engine in the initial state and compute the first bundle.
    pub fn new(config: DashConfig, store: RecordStore) -> Self {
        let state = FilterState::default();
        let current = Arc::new(DerivedBundle::compute(
            0,
            &store.shared(),
            &state,
            config.total_visits,
        ));
        Self {
            config,
            store,
            state,
            current,
            consumers: Vec::new(),
        }
    }

    /// Engine over the synthetic corpus of the test config.
    pub fn build_test() -> DashResult<Self> {
        let config = DashConfig::default_test();
        let records = crate::generator::CorpusGenerator::generate(&config.corpus)?;
        Ok(Self::new(config, RecordStore::from_records(records)))
    }

    /// Register a consumer. It immediately receives the current bundle.
    pub fn subscribe(&mut self, mut consumer: Box<dyn BundleConsumer>) {
        log::info!("engine: consumer '{}' subscribed", consumer.name());
        consumer.on_bundle(&self.current);
        self.consumers.push(consumer);
    }

    /// Apply one command and, if the state changed, republish.
    pub fn dispatch(&mut self, command: &FilterCommand) -> DashResult<Arc<DerivedBundle>> {
        let next = controller::apply(&self.state, command).inspect_err(|e| {
            log::warn!("engine: {} rejected: {e}", command.name());
        })?;
        self.commit(next);
        Ok(self.bundle())
    }

    pub fn set_dropdown(&mut self, field: DropdownField, value: &str) -> DashResult<Arc<DerivedBundle>> {
        self.dispatch(&FilterCommand::set_dropdown(field, value))
    }

    /// Toggle from a raw click event. Unknown input leaves the state unchanged.
    pub fn toggle(&mut self, field: &str, value: &str) -> Arc<DerivedBundle> {
        let next = controller::toggle_raw(&self.state, field, value);
        self.commit(next);
        self.bundle()
    }

    pub fn toggle_value(&mut self, value: ToggleValue) -> Arc<DerivedBundle> {
        let next = controller::toggle(&self.state, value);
        self.commit(next);
        self.bundle()
    }

    pub fn clear_interactive(&mut self) -> Arc<DerivedBundle> {
        let next = controller::clear_interactive(&self.state);
        self.commit(next);
        self.bundle()
    }

    pub fn reset(&mut self) -> Arc<DerivedBundle> {
        self.commit(controller::reset());
        self.bundle()
    }

    /// The latest published bundle.
    pub fn bundle(&self) -> Arc<DerivedBundle> {
        Arc::clone(&self.current)
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn revision(&self) -> Revision {
        self.current.revision
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.store.filter_options()
    }

    /// Look up a registered consumer by concrete type.
    /// Used by tests and tooling only.
    pub fn consumer<T: 'static>(&self) -> Option<&T> {
        self.consumers
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    fn commit(&mut self, next: FilterState) {
        if next == self.state {
            return;
        }

        let revision = self.current.revision + 1;
        let bundle = Arc::new(DerivedBundle::compute(
            revision,
            &self.store.shared(),
            &next,
            self.config.total_visits,
        ));

        // State and bundle are swapped together before anyone is notified.
        self.state = next;
        self.current = bundle;

        log::debug!(
            "engine: revision {revision} publishes {} of {} records",
            self.current.view.len(),
            self.store.len(),
        );

        for consumer in &mut self.consumers {
            consumer.on_bundle(&self.current);
        }
    }
}
