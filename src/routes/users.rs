use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Users Router Module
///
/// Mounted under `/api`.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // POST /users/register
        // Public. Creates an account; the admin flag comes from the configured admin address.
        .route("/users/register", post(handlers::register_user))
        // POST /users/login
        // Public. Returns a bearer token valid for one hour.
        .route("/users/login", post(handlers::login_user))
        // GET /users
        // Admin only.
        .route("/users", get(handlers::get_users))
        // GET/PUT/DELETE /users/{id}
        // The owner of the account, or an admin.
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
}
