use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Articles Router Module
///
/// Mounted under `/api`. Listing is public, reading one article needs any valid
/// token, and every write is admin only.
pub fn article_routes() -> Router<AppState> {
    Router::new()
        // GET /articles (public) and POST /articles (admin)
        .route(
            "/articles",
            get(handlers::get_articles).post(handlers::create_article),
        )
        // GET (authenticated), PUT and DELETE (admin) /articles/{id}
        .route(
            "/articles/{id}",
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
}
