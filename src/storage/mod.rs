pub mod error;
pub mod schema;
pub mod sqlite;
pub mod table;
pub mod traits;
pub mod value;

pub use error::{ConstraintKind, StorageError, StorageResult};
pub use sqlite::SqliteStore;
pub use table::{Column, Table};
pub use traits::{Executor, Store};
pub use value::{Value, ValueKind};
