//! Pre-migration database repairs.
//!
//! A fixed sequence of idempotent SQL fixes run on an existing database
//! before the module upgrade loads, clearing data the new version would
//! otherwise refuse to load over.

pub mod config;
pub mod error;
pub mod runner;
pub mod steps;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::MigrationConfig;
pub use error::MigrationError;
pub use runner::{
    MigrationReport, StepReport, TARGET_VERSION, detect_installed_version, run_pre_migration,
    run_steps,
};
pub use steps::StepOutcome;
pub use views::delete_view_cascade;
