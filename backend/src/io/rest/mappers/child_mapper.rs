use crate::domain::commands::child::{CreateChildCommand, DeleteChildResult, UpdateChildCommand};
use crate::domain::models::Child as DomainChild;
use shared::{
    Child as SharedChild, ChildListResponse, ChildResponse, CreateChildRequest,
    DeleteChildResponse, UpdateChildRequest,
};

/// Mapper between shared Child DTOs and domain Child models.
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_dto(domain: DomainChild) -> SharedChild {
        SharedChild {
            id: domain.id,
            family_id: domain.family_id,
            name: domain.name,
            age: domain.age,
            created_date: domain.created_date.to_rfc3339(),
            updated_date: domain.updated_date.to_rfc3339(),
        }
    }

    pub fn to_child_list_dto(domain_children: Vec<DomainChild>) -> ChildListResponse {
        ChildListResponse {
            children: domain_children.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_child_response_dto(domain: DomainChild, message: &str) -> ChildResponse {
        ChildResponse {
            child: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_delete_response_dto(result: DeleteChildResult) -> DeleteChildResponse {
        DeleteChildResponse {
            success_message: format!(
                "{} was removed along with {} transactions.",
                result.child.name, result.deleted_transactions
            ),
            child_id: result.child.id,
            deleted_transactions: result.deleted_transactions,
        }
    }

    pub fn to_create_command(request: CreateChildRequest) -> CreateChildCommand {
        CreateChildCommand {
            name: request.name,
            age: request.age,
        }
    }

    pub fn to_update_command(child_id: String, request: UpdateChildRequest) -> UpdateChildCommand {
        UpdateChildCommand {
            child_id,
            name: request.name,
            age: request.age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_to_dto_formats_dates() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let mut child = DomainChild::new("user-1", "Maya", 9, created).unwrap();
        child.id = "child::1".to_string();

        let dto = ChildMapper::to_dto(child);
        assert_eq!(dto.id, "child::1");
        assert_eq!(dto.family_id, "user-1");
        assert_eq!(dto.age, 9);
        assert_eq!(dto.created_date, "2025-03-01T09:30:00+00:00");
        assert_eq!(dto.updated_date, dto.created_date);
    }
}
