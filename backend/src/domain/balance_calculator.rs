//! Balance computation for a child's ledger.
//!
//! A balance is never stored; it is derived on every read by reducing the
//! child's transactions:
//!
//! ```text
//! balance = Σ amount(income) − Σ amount(expense)
//! ```
//!
//! The reduction is a plain sum of exact decimals, so the order of the
//! transactions has no effect on the result. Recomputing from the full
//! history is O(n) per view, which is fine for household-sized ledgers.

use rust_decimal::Decimal;

use crate::domain::errors::ValidationError;
use crate::domain::models::{Transaction, TransactionType};

/// Reduce a child's transactions into a signed balance.
///
/// Fails on a record with an unrecognized type or a negative amount rather
/// than guessing which side of the ledger it belongs to, and with
/// `BalanceOverflow` when the running sum leaves the decimal range.
pub fn calculate_balance<'a, I>(transactions: I) -> Result<Decimal, ValidationError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .try_fold(Decimal::ZERO, |balance, transaction| {
            if transaction.amount < Decimal::ZERO {
                return Err(ValidationError::NegativeAmount(transaction.id.clone()));
            }
            match &transaction.transaction_type {
                TransactionType::Income => balance
                    .checked_add(transaction.amount)
                    .ok_or(ValidationError::BalanceOverflow),
                TransactionType::Expense => balance
                    .checked_sub(transaction.amount)
                    .ok_or(ValidationError::BalanceOverflow),
                TransactionType::Unrecognized(tag) => {
                    Err(ValidationError::UnrecognizedTransactionType(tag.clone()))
                }
            }
        })
}
