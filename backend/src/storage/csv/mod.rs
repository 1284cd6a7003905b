//! Flat-file entity store: YAML for users and children, CSV for transactions.

pub mod child_repository;
pub mod connection;
pub mod transaction_repository;
pub mod user_repository;

pub use child_repository::CsvChildRepository;
pub use connection::CsvConnection;
pub use transaction_repository::CsvTransactionRepository;
pub use user_repository::CsvUserRepository;
