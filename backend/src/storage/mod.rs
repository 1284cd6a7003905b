//! # Storage Module
//!
//! The entity store client consumed by the domain layer.
//!
//! The domain only sees the traits in [`traits`]; which backend sits behind
//! them is picked at startup:
//!
//! - **memory**: process-local state, used by tests and throwaway sessions
//! - **csv**: flat files in a data directory (YAML for users and children,
//!   CSV for transactions)

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::CsvConnection;
pub use memory::MemoryConnection;
pub use traits::{ChildStorage, Connection, TransactionStorage, UserStorage};
