//! Interactive filter-and-metrics engine for the cart abandonment dashboard.
//!
//! Records flow one way: store → filter engine → calculators → bundle.
//! Filter changes flow the other way: command → controller → engine.

pub mod breakdown;
pub mod bundle;
pub mod command;
pub mod config;
pub mod consumer;
pub mod controller;
pub mod engine;
pub mod error;
pub mod filter;
pub mod funnel;
pub mod generator;
pub mod metrics;
pub mod record;
pub mod rng;
pub mod store;
pub mod table;
pub mod types;
