pub mod child;
pub mod transaction;
pub mod user;

pub use child::Child;
pub use transaction::{Transaction, TransactionType};
pub use user::User;
