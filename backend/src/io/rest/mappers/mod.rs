pub mod balance_mapper;
pub mod child_mapper;
pub mod family_mapper;
pub mod transaction_mapper;

pub use balance_mapper::BalanceMapper;
pub use child_mapper::ChildMapper;
pub use family_mapper::FamilyMapper;
pub use transaction_mapper::TransactionMapper;
