use crate::domain::commands::family::ConfigureFamilyCommand;
use crate::domain::models::User as DomainUser;
use crate::domain::FamilySetupState;
use shared::{ConfigureFamilyRequest, FamilyStatus, FamilyStatusResponse, User as SharedUser};

/// Mapper for the family setup endpoints.
pub struct FamilyMapper;

impl FamilyMapper {
    pub fn to_user_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            family_name: domain.family_name,
        }
    }

    pub fn to_status_dto(state: FamilySetupState) -> FamilyStatus {
        match state {
            FamilySetupState::Unconfigured => FamilyStatus::Unconfigured,
            FamilySetupState::Configured { family_name } => FamilyStatus::Configured { family_name },
        }
    }

    pub fn to_status_response_dto(user: DomainUser) -> FamilyStatusResponse {
        let status = Self::to_status_dto(FamilySetupState::of(&user));
        FamilyStatusResponse {
            user: Self::to_user_dto(user),
            status,
        }
    }

    pub fn to_configure_command(request: ConfigureFamilyRequest) -> ConfigureFamilyCommand {
        ConfigureFamilyCommand {
            family_name: request.family_name,
        }
    }
}
