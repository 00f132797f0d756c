use axum::{Router, extract::FromRef, http::HeaderName, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core components: credentials, passwords, validation, authorization, errors.
pub mod auth;
pub mod authorization;
pub mod error;
pub mod extract;
pub mod password;
pub mod validation;

// Data, persistence and the record services built on them.
pub mod config;
pub mod models;
pub mod repository;
pub mod services;

// HTTP transport.
pub mod handlers;
pub mod routes;

use routes::{articles, users};

// --- Public Re-exports ---

pub use auth::CredentialIssuer;
pub use config::AppConfig;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use services::{ArticleService, UserService};

/// ApiDoc
///
/// The OpenAPI document for every handler and schema, served at
/// `/api-docs/openapi.json` and browsable through Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_user, handlers::login_user, handlers::get_users,
        handlers::get_user, handlers::update_user, handlers::delete_user,
        handlers::get_articles, handlers::get_article, handlers::create_article,
        handlers::update_article, handlers::delete_article
    ),
    components(
        schemas(
            models::RegisterUserRequest, models::LoginRequest, models::UpdateUserRequest,
            models::ArticleRequest, models::UserProfile, models::UserResponse,
            models::LoginResponse, models::MessageResponse, models::Article,
            validation::FieldError,
        )
    ),
    tags(
        (name = "article-portal", description = "User and article management API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, cloneable container shared by every request: the credential
/// issuer and the services, all built once from the storage and configuration.
#[derive(Clone)]
pub struct AppState {
    pub issuer: CredentialIssuer,
    pub users: UserService,
    pub articles: ArticleService,
}

impl AppState {
    /// Wires the services to `repo` using the signing secret and admin address
    /// from `config`.
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        let issuer = CredentialIssuer::new(&config.jwt_secret);
        let users = UserService::new(repo.clone(), issuer.clone(), config.admin_email.clone());
        let articles = ArticleService::new(repo);

        Self {
            issuer,
            users,
            articles,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

// Lets the `AuthUser` extractor verify tokens without the rest of the state.
impl FromRef<AppState> for CredentialIssuer {
    fn from_ref(app_state: &AppState) -> CredentialIssuer {
        app_state.issuer.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the global middleware and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .merge(users::user_routes())
        .merge(articles::article_routes());

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Liveness check.
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .with_state(state);

    // Request ID is set first so the trace span and the response both carry it.
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span with method, uri and the `x-request-id` so every
/// log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
