//! mktsim-core: deterministic synthesis of a multi-table marketing
//! analytics dataset, plus the CSV and SQLite plumbing around it.

pub mod ab_test_synthesizer;
pub mod campaign_generator;
pub mod config;
pub mod customer_synthesizer;
pub mod error;
pub mod horizon;
pub mod interchange;
pub mod loader;
pub mod performance_simulator;
pub mod pipeline;
pub mod rng;
pub mod sequence;
pub mod store;
pub mod summary;
pub mod table;
pub mod transaction_synthesizer;
pub mod types;
pub mod views;
