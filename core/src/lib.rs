pub mod account;
pub mod bank;
pub mod clock;
pub mod command;
pub mod compliance;
pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod format;
pub mod ledger;
pub mod report;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod workload;
