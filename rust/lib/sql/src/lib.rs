pub mod error;
pub mod sqlite;
pub mod traits;
pub mod tx;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
pub use tx::in_transaction;
