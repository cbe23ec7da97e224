pub mod api;
pub mod model;
pub mod report;
pub mod store;

use std::sync::Arc;

use axum::Router;
use openerp_core::Module;

use store::TimesheetStore;

/// Timesheet module — employee timesheet lines and the daily report.
pub struct TimesheetModule {
    store: Arc<TimesheetStore>,
}

impl TimesheetModule {
    pub fn new(store: TimesheetStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl Module for TimesheetModule {
    fn name(&self) -> &str {
        "timesheet"
    }

    fn routes(&self) -> Router {
        api::router(self.store.clone())
    }
}
