use super::{ChildMapper, TransactionMapper};
use crate::domain::commands::balances::{ChildBalance as DomainChildBalance, ChildLedger, FamilyBalances};
use crate::domain::models::Child;
use rust_decimal::Decimal;
use shared::{format_amount, ChildBalance, ChildLedgerResponse, FamilyBalancesResponse};

/// Mapper for the derived balance views.
pub struct BalanceMapper;

impl BalanceMapper {
    pub fn to_child_balance_dto(child: Child, balance: Decimal) -> ChildBalance {
        ChildBalance {
            child: ChildMapper::to_dto(child),
            balance,
            formatted_balance: format_amount(balance),
        }
    }

    pub fn to_family_balances_dto(domain: FamilyBalances) -> FamilyBalancesResponse {
        FamilyBalancesResponse {
            children: domain
                .children
                .into_iter()
                .map(|DomainChildBalance { child, balance }| Self::to_child_balance_dto(child, balance))
                .collect(),
            total_balance: domain.total_balance,
            formatted_total_balance: format_amount(domain.total_balance),
        }
    }

    pub fn to_ledger_dto(domain: ChildLedger) -> ChildLedgerResponse {
        ChildLedgerResponse {
            child: ChildMapper::to_dto(domain.child),
            transactions: domain
                .transactions
                .into_iter()
                .map(TransactionMapper::to_dto)
                .collect(),
            balance: domain.balance,
            formatted_balance: format_amount(domain.balance),
        }
    }
}
