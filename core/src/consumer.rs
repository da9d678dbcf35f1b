//! Bundle consumer trait.
//!
//! RULE: Every visual consumer implements BundleConsumer.
//! The engine hands each registered consumer the same immutable bundle
//! after every filter change, in registration order.
//! Consumers never compute metrics themselves.

use crate::bundle::DerivedBundle;
use std::any::Any;
use std::sync::Arc;

pub trait BundleConsumer {
    /// Unique stable name for this consumer.
    fn name(&self) -> &'static str;

    /// Called once per published bundle.
    fn on_bundle(&mut self, bundle: &Arc<DerivedBundle>);

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}
