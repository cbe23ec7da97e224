//! The ordered pre-migration repair steps.
//!
//! Every step checks its precondition first and is a logged no-op when it
//! does not hold, so the whole list can be re-run safely.

mod cron;
mod edi_format;
mod removed_model;
mod settings_views;

use openerp_sql::{SQLError, SQLStore};

use crate::config::MigrationConfig;

pub use cron::deactivate_obsolete_crons;
pub use edi_format::pin_linked_edi_formats;
pub use removed_model::purge_removed_model;
pub use settings_views::delete_incompatible_views;

/// What one step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The precondition did not hold; nothing was touched.
    pub skipped: bool,
    /// Rows updated or deleted.
    pub affected: u64,
}

impl StepOutcome {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            affected: 0,
        }
    }

    pub fn affected(affected: u64) -> Self {
        Self {
            skipped: false,
            affected,
        }
    }
}

pub type StepFn = fn(&dyn SQLStore, &MigrationConfig) -> Result<StepOutcome, SQLError>;

/// The repairs, in execution order.
pub const STEPS: &[(&str, StepFn)] = &[
    ("deactivate_obsolete_crons", deactivate_obsolete_crons),
    ("pin_linked_edi_formats", pin_linked_edi_formats),
    ("purge_removed_model", purge_removed_model),
    ("delete_incompatible_views", delete_incompatible_views),
];

/// Translate a `LIKE` pattern (`%`, `_`) into a `GLOB` pattern.
///
/// `GLOB` compares case-sensitively, which `LIKE` does not in SQLite.
pub(crate) fn like_to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '%' => out.push('*'),
            '_' => out.push('?'),
            _ => push_glob_literal(&mut out, c),
        }
    }
    out
}

/// `GLOB` pattern matching `text` literally anywhere in a value.
pub(crate) fn glob_contains(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('*');
    for c in text.chars() {
        push_glob_literal(&mut out, c);
    }
    out.push('*');
    out
}

fn push_glob_literal(out: &mut String, c: char) {
    match c {
        '*' | '?' | '[' => {
            out.push('[');
            out.push(c);
            out.push(']');
        }
        _ => out.push(c),
    }
}
