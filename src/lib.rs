//! chargeview: fetches chargeback and cost reports from the backend API and
//! shapes them into chart-ready series.

pub mod cli;
pub mod config;
pub mod services;
pub mod types;
