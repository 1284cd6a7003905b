use crate::domain::commands::transactions::CreateTransactionCommand;
use crate::domain::models::Transaction as DomainTransaction;
use shared::{format_amount, CreateTransactionRequest, Transaction as SharedTransaction};

/// Mapper between shared Transaction DTOs and domain Transaction models.
pub struct TransactionMapper;

impl TransactionMapper {
    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            formatted_amount: format_amount(domain.amount),
            id: domain.id,
            child_id: domain.child_id,
            transaction_type: domain.transaction_type.as_tag().to_string(),
            amount: domain.amount,
            description: domain.description,
            created_date: domain.created_date.to_rfc3339(),
        }
    }

    pub fn to_create_command(child_id: String, request: CreateTransactionRequest) -> CreateTransactionCommand {
        CreateTransactionCommand {
            child_id,
            transaction_type: request.transaction_type,
            amount: request.amount,
            description: request.description,
        }
    }
}
