//! Record services: validate, check existence or uniqueness, then persist.
//!
//! Each write operation ends either committed or rejected with a `ServiceError`.
//! Nothing here renders responses; the handlers pass every failure to
//! `error::classify`.

pub mod articles;
pub mod users;

pub use articles::ArticleService;
pub use users::UserService;

use uuid::Uuid;

use crate::error::ServiceError;

/// Parses a path identifier. A malformed id is reported as "does not exist"
/// without touching storage.
pub(crate) fn parse_id(entity: &str, raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::invalid_id(entity, raw))
}
