use openerp_sql::SQLError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("sql error: {0}")]
    Sql(#[from] SQLError),

    #[error("step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: SQLError,
    },

    #[error("config error: {0}")]
    Config(String),
}
