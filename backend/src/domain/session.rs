//! Explicit session context passed to every service call.

/// The authenticated caller, as vouched for by the identity provider.
///
/// The user ID scopes everything the caller can see: children are owned by the
/// family whose ID equals the user's ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn family_id(&self) -> &str {
        &self.user_id
    }
}
