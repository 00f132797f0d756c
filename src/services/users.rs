use crate::{
    auth::CredentialIssuer,
    authorization::{Action, authorize},
    error::ServiceError,
    models::{
        Identity, LoginRequest, LoginResponse, NewUser, RegisterUserRequest, UpdateUserRequest,
        UserPatch, UserProfile,
    },
    password::{hash_password, verify_password, verify_unknown},
    repository::RepositoryState,
    validation::{LOGIN_SCHEMA, Mode, USER_PROFILE_SCHEMA, USER_SCHEMA, validate},
};

use super::parse_id;

const ENTITY: &str = "user";

/// UserService
///
/// Registration, login and profile management.
#[derive(Clone)]
pub struct UserService {
    repo: RepositoryState,
    issuer: CredentialIssuer,
    admin_email: Option<String>,
}

impl UserService {
    pub fn new(repo: RepositoryState, issuer: CredentialIssuer, admin_email: Option<String>) -> Self {
        Self {
            repo,
            issuer,
            admin_email,
        }
    }

    /// register
    ///
    /// Validates the full payload, rejects a taken email, hashes the password and
    /// stores the user. The admin flag is fixed here and never changes afterwards.
    pub async fn register(&self, payload: RegisterUserRequest) -> Result<UserProfile, ServiceError> {
        validate(&USER_SCHEMA, &payload, Mode::Full)?;

        // Every field is present once the full schema passed.
        let RegisterUserRequest {
            fullname: Some(fullname),
            email: Some(email),
            profession: Some(profession),
            city: Some(city),
            contact: Some(contact),
            password: Some(password),
        } = payload
        else {
            return Err(ServiceError::Internal(
                "registration payload incomplete after validation".to_string(),
            ));
        };

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::AlreadyExists(
                "A user with this email already exists".to_string(),
            ));
        }

        let is_admin = self.admin_email.as_deref() == Some(email.as_str());
        let user = self
            .repo
            .insert_user(NewUser {
                fullname,
                email,
                profession,
                city,
                contact,
                password_hash: hash_password(&password)?,
                is_admin,
            })
            .await?;

        tracing::info!(user_id = %user.id, is_admin, "user registered");
        Ok(user.into())
    }

    /// login
    ///
    /// Checks the credentials and issues a token for the matching user. An unknown
    /// email and a wrong password produce the same `CredentialMismatch`.
    pub async fn login(&self, payload: LoginRequest) -> Result<LoginResponse, ServiceError> {
        validate(&LOGIN_SCHEMA, &payload, Mode::Full)?;
        let email = payload.email.unwrap_or_default();
        let password = payload.password.unwrap_or_default();

        let user = match self.repo.find_user_by_email(&email).await? {
            Some(user) if verify_password(&password, &user.password_hash) => user,
            Some(_) => {
                tracing::debug!("login rejected");
                return Err(ServiceError::CredentialMismatch);
            }
            None => {
                verify_unknown(&password);
                tracing::debug!("login rejected");
                return Err(ServiceError::CredentialMismatch);
            }
        };

        let token = self.issuer.issue(&Identity::from(&user))?;
        tracing::info!(user_id = %user.id, "user authenticated");

        Ok(LoginResponse {
            message: "User authenticated successfully".to_string(),
            token,
            user: user.into(),
        })
    }

    /// list
    ///
    /// All users, newest first. Admin only.
    pub async fn list(&self, identity: &Identity) -> Result<Vec<UserProfile>, ServiceError> {
        authorize(identity, Action::ListUsers, None)?;
        let users = self.repo.list_users().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    /// get
    ///
    /// A single user profile, visible to that user and to admins.
    pub async fn get(&self, identity: &Identity, id: &str) -> Result<UserProfile, ServiceError> {
        let id = parse_id(ENTITY, id)?;
        authorize(identity, Action::ReadUser, Some(id))?;

        self.repo
            .find_user_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| ServiceError::unmatched(ENTITY, id))
    }

    /// update
    ///
    /// Changes only fullname, profession, city and contact. Email, password and
    /// the admin flag cannot be changed through this path.
    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        payload: UpdateUserRequest,
    ) -> Result<UserProfile, ServiceError> {
        let id = parse_id(ENTITY, id)?;
        authorize(identity, Action::UpdateUser, Some(id))?;
        validate(&USER_PROFILE_SCHEMA, &payload, Mode::Partial)?;

        if self.repo.find_user_by_id(id).await?.is_none() {
            return Err(ServiceError::unmatched(ENTITY, id));
        }

        let user = self
            .repo
            .update_user(id, UserPatch::from(payload))
            .await?
            // Removed between the existence check and the write.
            .ok_or_else(|| ServiceError::unmatched(ENTITY, id))?;

        tracing::info!(user_id = %id, "user updated");
        Ok(user.into())
    }

    /// delete
    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(ENTITY, id)?;
        authorize(identity, Action::DeleteUser, Some(id))?;

        if self.repo.find_user_by_id(id).await?.is_none() {
            return Err(ServiceError::unmatched(ENTITY, id));
        }
        if !self.repo.delete_user(id).await? {
            return Err(ServiceError::unmatched(ENTITY, id));
        }

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
