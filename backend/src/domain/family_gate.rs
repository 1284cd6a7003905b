//! Family setup gate.
//!
//! A user starts out `Unconfigured` (no family name). Naming the family moves
//! them to `Configured`, and only then may children or transactions be read or
//! written. There is no way back: once named, the family stays configured.

use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::family::ConfigureFamilyCommand;
use crate::domain::errors::{LedgerError, LedgerResult, ValidationError};
use crate::domain::models::User;
use crate::domain::session::Session;
use crate::storage::{Connection, UserStorage};

/// Setup state derived from the user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilySetupState {
    Unconfigured,
    Configured { family_name: String },
}

impl FamilySetupState {
    pub fn of(user: &User) -> Self {
        match &user.family_name {
            Some(name) if !name.trim().is_empty() => FamilySetupState::Configured {
                family_name: name.clone(),
            },
            _ => FamilySetupState::Unconfigured,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, FamilySetupState::Configured { .. })
    }

    /// Apply a family name to this state.
    ///
    /// `Unconfigured` accepts any non-empty name. `Configured` accepts only its
    /// own name again (a no-op), so a repeated submit of the setup form does
    /// not fail while a rename is still refused.
    pub fn configure(&self, family_name: &str) -> Result<FamilySetupState, ValidationError> {
        let family_name = family_name.trim();
        if family_name.is_empty() {
            return Err(ValidationError::EmptyFamilyName);
        }
        match self {
            FamilySetupState::Unconfigured => Ok(FamilySetupState::Configured {
                family_name: family_name.to_string(),
            }),
            FamilySetupState::Configured { family_name: current } if current == family_name => {
                Ok(self.clone())
            }
            FamilySetupState::Configured { family_name: current } => {
                Err(ValidationError::FamilyAlreadyConfigured(current.clone()))
            }
        }
    }
}

/// Service that owns the user record and the setup state machine
#[derive(Clone)]
pub struct FamilySetupGate<C: Connection> {
    user_repository: C::UserRepository,
}

impl<C: Connection> FamilySetupGate<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
        }
    }

    /// Fetch the caller's user record, provisioning it on first contact.
    ///
    /// Signup happens at the identity provider; the first authenticated call
    /// creates the matching local record with no family name.
    pub async fn current_user(&self, session: &Session) -> LedgerResult<User> {
        if let Some(user) = self.user_repository.get_user(session.user_id()).await? {
            return Ok(user);
        }

        info!("Provisioning user record for {}", session.user_id());
        let user = User::new(session.user_id());
        if let Err(e) = self.user_repository.store_user(&user).await {
            // A concurrent first request may have created it in the meantime
            return match self.user_repository.get_user(session.user_id()).await? {
                Some(existing) => {
                    warn!("User {} was provisioned concurrently: {:#}", session.user_id(), e);
                    Ok(existing)
                }
                None => Err(e.into()),
            };
        }
        Ok(user)
    }

    /// Current setup state of the caller's family
    pub async fn status(&self, session: &Session) -> LedgerResult<(User, FamilySetupState)> {
        let user = self.current_user(session).await?;
        let state = FamilySetupState::of(&user);
        info!(
            "Family setup for {}: {}",
            session.user_id(),
            if state.is_configured() { "configured" } else { "unconfigured" }
        );
        Ok((user, state))
    }

    /// Name the caller's family, moving the gate to `Configured`
    pub async fn configure(
        &self,
        session: &Session,
        command: ConfigureFamilyCommand,
    ) -> LedgerResult<User> {
        // Reject a blank name before touching the store
        if command.family_name.trim().is_empty() {
            return Err(ValidationError::EmptyFamilyName.into());
        }

        let mut user = self.current_user(session).await?;
        let current = FamilySetupState::of(&user);
        let next = current.configure(&command.family_name)?;

        if next == current {
            info!("Family for {} already configured, nothing to do", session.user_id());
            return Ok(user);
        }

        if let FamilySetupState::Configured { family_name } = next {
            user.family_name = Some(family_name);
        }
        self.user_repository.update_user(&user).await?;

        info!("Configured family {:?} for {}", user.family_name, session.user_id());
        Ok(user)
    }

    /// Guard used before any child or transaction query.
    ///
    /// Returns the family ID to scope queries by, or `SetupRequired`.
    pub async fn require_configured(&self, session: &Session) -> LedgerResult<String> {
        let user = self.current_user(session).await?;
        if !FamilySetupState::of(&user).is_configured() {
            warn!("Blocked child data access for unconfigured user {}", session.user_id());
            return Err(LedgerError::SetupRequired);
        }
        Ok(user.family_id().to_string())
    }
}
