use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::Payload;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical account record stored in the `users` table.
/// It carries the password hash, so it is never serialized: every response goes
/// through `UserProfile` instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    // Unique across all users (enforced by the service and the table constraint).
    pub email: String,
    pub profession: String,
    pub city: String,
    // Exactly 10 characters.
    pub contact: String,
    pub password_hash: String,
    // Decided once at registration by comparing the email with the admin address.
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article
///
/// An article record from the `articles` table. The `author` is always stamped
/// from the identity of the admin that created or last modified it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,

    // 'type' is a reserved keyword in Rust, so the field is renamed on both sides.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub article_type: String,

    pub content: String,
    pub author: String,

    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Identity
///
/// The caller identity carried inside a credential token. It is rebuilt on every
/// authenticated request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Uuid,
    pub fullname: String,
    pub is_admin: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            fullname: user.fullname.clone(),
            is_admin: user.is_admin,
        }
    }
}

// --- Persistence Inputs ---

/// NewUser
///
/// A fully validated user ready for insertion. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub fullname: String,
    pub email: String,
    pub profession: String,
    pub city: String,
    pub contact: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// UserPatch
///
/// The only user fields that may change after registration.
/// Email, password and admin flag are deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub fullname: Option<String>,
    pub profession: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
}

/// NewArticle
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub article_type: String,
    pub content: String,
    pub author: String,
}

/// ArticlePatch
///
/// Partial article modification. `author` is always set by the service.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub article_type: Option<String>,
    pub content: Option<String>,
    pub author: String,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterUserRequest
///
/// Input payload for the public registration endpoint (POST /api/users/register).
/// Every field is optional at the type level so that missing fields are reported
/// by the validator together with the other violations instead of failing JSON parsing.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterUserRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub profession: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub password: Option<String>,
}

impl Payload for RegisterUserRequest {
    fn field(&self, path: &str) -> Option<&str> {
        match path {
            "fullname" => self.fullname.as_deref(),
            "email" => self.email.as_deref(),
            "profession" => self.profession.as_deref(),
            "city" => self.city.as_deref(),
            "contact" => self.contact.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }
}

/// LoginRequest
///
/// Input payload for POST /api/users/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Payload for LoginRequest {
    fn field(&self, path: &str) -> Option<&str> {
        match path {
            "email" => self.email.as_deref(),
            "password" => self.password.as_deref(),
            _ => None,
        }
    }
}

/// UpdateUserRequest
///
/// Partial profile update (PUT /api/users/{id}). Unknown fields such as `email`,
/// `password` or `isAdmin` are ignored by deserialization and can never reach storage.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Payload for UpdateUserRequest {
    fn field(&self, path: &str) -> Option<&str> {
        match path {
            "fullname" => self.fullname.as_deref(),
            "profession" => self.profession.as_deref(),
            "city" => self.city.as_deref(),
            "contact" => self.contact.as_deref(),
            _ => None,
        }
    }
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            fullname: req.fullname,
            profession: req.profession,
            city: req.city,
            contact: req.contact,
        }
    }
}

/// ArticleRequest
///
/// Body of POST and PUT /api/articles. The author is never accepted from the client.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub article_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// ArticleDraft
///
/// An article request paired with the author taken from the caller identity,
/// which is the shape the article schema is checked against.
pub struct ArticleDraft<'a> {
    pub request: &'a ArticleRequest,
    pub author: &'a str,
}

impl Payload for ArticleDraft<'_> {
    fn field(&self, path: &str) -> Option<&str> {
        match path {
            "title" => self.request.title.as_deref(),
            "type" => self.request.article_type.as_deref(),
            "content" => self.request.content.as_deref(),
            "author" => Some(self.author),
            _ => None,
        }
    }
}

// --- Response Schemas (Output) ---

/// UserProfile
///
/// The public shape of a user. It never contains password or hash material.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub profession: String,
    pub city: String,
    pub contact: String,
    pub is_admin: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            profession: user.profession,
            city: user.city,
            contact: user.contact,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// UserResponse
///
/// Confirmation message plus the affected user (registration, profile update).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserResponse {
    pub message: String,
    pub user: UserProfile,
}

/// LoginResponse
///
/// Returned on successful authentication. `token` is sent back by the client as
/// `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

/// MessageResponse
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
