use uuid::Uuid;

use crate::{error::ServiceError, models::Identity};

/// Action
///
/// Every operation that requires an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListUsers,
    ReadUser,
    UpdateUser,
    DeleteUser,
    ReadArticle,
    CreateArticle,
    UpdateArticle,
    DeleteArticle,
}

/// Capability
///
/// What an identity must hold to perform an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any verified identity.
    Authenticated,
    /// The owner of the resource, or an admin.
    SelfOrAdmin,
    AdminOnly,
}

impl Action {
    /// The policy table: one capability per action.
    pub const fn required_capability(self) -> Capability {
        match self {
            Self::ReadArticle => Capability::Authenticated,
            Self::ReadUser | Self::UpdateUser | Self::DeleteUser => Capability::SelfOrAdmin,
            Self::ListUsers | Self::CreateArticle | Self::UpdateArticle | Self::DeleteArticle => {
                Capability::AdminOnly
            }
        }
    }
}

/// authorize
///
/// Decides whether `identity` may perform `action` on a resource owned by
/// `owner` (if the resource has an owner). Returns `ServiceError::Forbidden`
/// on denial. The identity is already verified at this point.
pub fn authorize(
    identity: &Identity,
    action: Action,
    owner: Option<Uuid>,
) -> Result<(), ServiceError> {
    let permitted = match action.required_capability() {
        Capability::Authenticated => true,
        Capability::AdminOnly => identity.is_admin,
        Capability::SelfOrAdmin => identity.is_admin || owner == Some(identity.user_id),
    };

    if permitted {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %identity.user_id,
            action = ?action,
            "insufficient privilege"
        );
        Err(ServiceError::Forbidden)
    }
}
