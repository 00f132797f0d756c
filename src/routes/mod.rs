//! Router Module Index
//!
//! One router per resource. Authentication is enforced by the `AuthUser`
//! extractor on each protected handler, and the admin/owner decision is made by
//! the services through `authorization::authorize`, so every method on a path can
//! share one router regardless of its access level.

/// /api/users: registration, login and profile management.
pub mod users;

/// /api/articles: public listing, authenticated reads, admin writes.
pub mod articles;
