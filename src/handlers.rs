use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, classify},
    extract::JsonBody,
    models::{
        Article, ArticleRequest, LoginRequest, LoginResponse, MessageResponse,
        RegisterUserRequest, UpdateUserRequest, UserProfile, UserResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// --- User Handlers ---

/// register_user
///
/// [Public Route] Creates an account. The admin flag is derived from the
/// configured admin address, never from the payload.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Registered", body = UserResponse),
        (status = 400, description = "Invalid fields"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .users
        .register(payload)
        .await
        .map_err(|e| classify(e, "Error while creating the user"))?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// login_user
///
/// [Public Route] Exchanges email and password for a one-hour bearer token.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Invalid fields"),
        (status = 409, description = "Email or password is incorrect")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    state
        .users
        .login(payload)
        .await
        .map(Json)
        .map_err(|e| classify(e, "Error while authenticating the user"))
}

/// get_users
///
/// [Admin Route] Lists every user, newest first.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [UserProfile]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn get_users(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    state
        .users
        .list(&identity)
        .await
        .map(Json)
        .map_err(|e| classify(e, "Error while fetching users"))
}

/// get_user
///
/// [Authenticated Route] Reads one profile. Members may only read their own.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = UserProfile),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Does not exist")
    )
)]
pub async fn get_user(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    state
        .users
        .get(&identity, &id)
        .await
        .map(Json)
        .map_err(|e| classify(e, "Error while fetching the user"))
}

/// update_user
///
/// [Authenticated Route] Partial profile update (fullname, profession, city, contact).
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserResponse),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Does not exist")
    )
)]
pub async fn update_user(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .update(&identity, &id, payload)
        .await
        .map_err(|e| classify(e, "Error while updating the user"))?;

    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// delete_user
///
/// [Authenticated Route] Removes an account (own account, or any as admin).
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not the owner"),
        (status = 409, description = "Does not exist")
    )
)]
pub async fn delete_user(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .users
        .delete(&identity, &id)
        .await
        .map_err(|e| classify(e, "Error while deleting the user"))?;

    Ok(Json(MessageResponse::new(format!(
        "The user with id {id} was deleted successfully"
    ))))
}

// --- Article Handlers ---

/// get_articles
///
/// [Public Route] Lists every article, newest first.
#[utoipa::path(
    get,
    path = "/api/articles",
    responses((status = 200, description = "All articles", body = [Article]))
)]
pub async fn get_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    state
        .articles
        .list()
        .await
        .map(Json)
        .map_err(|e| classify(e, "Error while fetching articles"))
}

/// get_article
///
/// [Authenticated Route] Reads one article.
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Found", body = Article),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Does not exist")
    )
)]
pub async fn get_article(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    state
        .articles
        .get(&identity, &id)
        .await
        .map(Json)
        .map_err(|e| classify(e, "Error while fetching the article"))
}

/// create_article
///
/// [Admin Route] Publishes an article authored by the caller.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = ArticleRequest,
    responses(
        (status = 201, description = "Created", body = Article),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn create_article(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = state
        .articles
        .create(&identity, payload)
        .await
        .map_err(|e| classify(e, "Error while creating the article"))?;

    Ok((StatusCode::CREATED, Json(article)))
}

/// update_article
///
/// [Admin Route] Partial article update; the caller becomes the author.
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article ID")),
    request_body = ArticleRequest,
    responses(
        (status = 200, description = "Updated", body = Article),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Does not exist")
    )
)]
pub async fn update_article(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    state
        .articles
        .update(&identity, &id, payload)
        .await
        .map(Json)
        .map_err(|e| classify(e, "Error while updating the article"))
}

/// delete_article
///
/// [Admin Route]
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(("id" = String, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Does not exist")
    )
)]
pub async fn delete_article(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .articles
        .delete(&identity, &id)
        .await
        .map_err(|e| classify(e, "Error while deleting the article"))?;

    Ok(Json(MessageResponse::new(format!(
        "The article with id {id} was deleted successfully"
    ))))
}
