use crate::models::{Article, ArticlePatch, NewArticle, NewUser, User, UserPatch};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// StorageError
///
/// Failures raised by the persistence layer. Apart from unique-constraint
/// violations, these all end up as internal errors for the caller.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::UniqueViolation(db.constraint().unwrap_or("unknown").to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Unavailable(err.to_string())
            }
            _ => Self::Database(err),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, so the services
/// never know whether they talk to Postgres or to the in-memory store.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;
    async fn insert_user(&self, user: NewUser) -> StorageResult<User>;
    // Returns None when no row matched.
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StorageResult<Option<User>>;
    // Returns true if a row was removed.
    async fn delete_user(&self, id: Uuid) -> StorageResult<bool>;
    // Newest first.
    async fn list_users(&self) -> StorageResult<Vec<User>>;

    // --- Articles ---
    async fn find_article_by_id(&self, id: Uuid) -> StorageResult<Option<Article>>;
    async fn insert_article(&self, article: NewArticle) -> StorageResult<Article>;
    async fn update_article(&self, id: Uuid, patch: ArticlePatch)
    -> StorageResult<Option<Article>>;
    async fn delete_article(&self, id: Uuid) -> StorageResult<bool>;
    async fn list_articles(&self) -> StorageResult<Vec<Article>>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const USER_COLUMNS: &str = "id, fullname, email, profession, city, contact, password_hash, is_admin, created_at, updated_at";
const ARTICLE_COLUMNS: &str = "id, title, type, content, author, created_at, updated_at";

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// insert_user
    ///
    /// The `UNIQUE` constraint on `email` turns a concurrent duplicate into
    /// `StorageError::UniqueViolation`.
    async fn insert_user(&self, user: NewUser) -> StorageResult<User> {
        let query = format!(
            "INSERT INTO users (id, fullname, email, profession, city, contact, password_hash, is_admin, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW()) RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(user.fullname)
            .bind(user.email)
            .bind(user.profession)
            .bind(user.city)
            .bind(user.contact)
            .bind(user.password_hash)
            .bind(user.is_admin)
            .fetch_one(&self.pool)
            .await?)
    }

    /// update_user
    ///
    /// Uses `COALESCE` so only the supplied profile fields change.
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StorageResult<Option<User>> {
        let query = format!(
            "UPDATE users \
             SET fullname = COALESCE($2, fullname), \
                 profession = COALESCE($3, profession), \
                 city = COALESCE($4, city), \
                 contact = COALESCE($5, contact), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(patch.fullname)
            .bind(patch.profession)
            .bind(patch.city)
            .bind(patch.contact)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_user(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_article_by_id(&self, id: Uuid) -> StorageResult<Option<Article>> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_article(&self, article: NewArticle) -> StorageResult<Article> {
        let query = format!(
            "INSERT INTO articles (id, title, type, content, author, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {ARTICLE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(Uuid::new_v4())
            .bind(article.title)
            .bind(article.article_type)
            .bind(article.content)
            .bind(article.author)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_article(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> StorageResult<Option<Article>> {
        let query = format!(
            "UPDATE articles \
             SET title = COALESCE($2, title), \
                 type = COALESCE($3, type), \
                 content = COALESCE($4, content), \
                 author = $5, \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {ARTICLE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(patch.title)
            .bind(patch.article_type)
            .bind(patch.content)
            .bind(patch.author)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_article(&self, id: Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_articles(&self) -> StorageResult<Vec<Article>> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Article>(&query)
            .fetch_all(&self.pool)
            .await?)
    }
}

/// InMemoryRepository
///
/// A process-local `Repository` used for local runs without a database and by the
/// test suite. Each operation holds the lock for its whole duration, which gives the
/// same single-record atomicity the database provides.
#[derive(Default)]
pub struct InMemoryRepository {
    users: RwLock<Vec<User>>,
    articles: RwLock<Vec<Article>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StorageResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::UniqueViolation("users_email_key".to_string()));
        }
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            fullname: user.fullname,
            email: user.email,
            profession: user.profession,
            city: user.city,
            contact: user.contact,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StorageResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(fullname) = patch.fullname {
            user.fullname = fullname;
        }
        if let Some(profession) = patch.profession {
            user.profession = profession;
        }
        if let Some(city) = patch.city {
            user.city = city;
        }
        if let Some(contact) = patch.contact {
            user.contact = contact;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StorageResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let mut users = self.users.read().await.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn find_article_by_id(&self, id: Uuid) -> StorageResult<Option<Article>> {
        let articles = self.articles.read().await;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_article(&self, article: NewArticle) -> StorageResult<Article> {
        let now = Utc::now();
        let created = Article {
            id: Uuid::new_v4(),
            title: article.title,
            article_type: article.article_type,
            content: article.content,
            author: article.author,
            created_at: now,
            updated_at: now,
        };
        self.articles.write().await.push(created.clone());
        Ok(created)
    }

    async fn update_article(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> StorageResult<Option<Article>> {
        let mut articles = self.articles.write().await;
        let Some(article) = articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            article.title = title;
        }
        if let Some(article_type) = patch.article_type {
            article.article_type = article_type;
        }
        if let Some(content) = patch.content {
            article.content = content;
        }
        article.author = patch.author;
        article.updated_at = Utc::now();
        Ok(Some(article.clone()))
    }

    async fn delete_article(&self, id: Uuid) -> StorageResult<bool> {
        let mut articles = self.articles.write().await;
        let before = articles.len();
        articles.retain(|a| a.id != id);
        Ok(articles.len() < before)
    }

    async fn list_articles(&self) -> StorageResult<Vec<Article>> {
        let mut articles = self.articles.read().await.clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles)
    }
}
