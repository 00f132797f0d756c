#![allow(dead_code)]

use article_portal::{
    AppState,
    config::AppConfig,
    models::{
        Article, ArticlePatch, Identity, NewArticle, NewUser, RegisterUserRequest, User, UserPatch,
    },
    repository::{InMemoryRepository, Repository, StorageError, StorageResult},
};
use async_trait::async_trait;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";

// --- Counting Repository ---

/// Delegates to the in-memory store and counts the calls the tests care about.
#[derive(Default)]
pub struct CountingRepo {
    pub inner: InMemoryRepository,
    pub lookups: AtomicUsize,
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl CountingRepo {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository for CountingRepo {
    async fn find_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_user_by_email(email).await
    }
    async fn find_user_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_user_by_id(id).await
    }
    async fn insert_user(&self, user: NewUser) -> StorageResult<User> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_user(user).await
    }
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StorageResult<Option<User>> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_user(id, patch).await
    }
    async fn delete_user(&self, id: Uuid) -> StorageResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_user(id).await
    }
    async fn list_users(&self) -> StorageResult<Vec<User>> {
        self.inner.list_users().await
    }
    async fn find_article_by_id(&self, id: Uuid) -> StorageResult<Option<Article>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_article_by_id(id).await
    }
    async fn insert_article(&self, article: NewArticle) -> StorageResult<Article> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_article(article).await
    }
    async fn update_article(
        &self,
        id: Uuid,
        patch: ArticlePatch,
    ) -> StorageResult<Option<Article>> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_article(id, patch).await
    }
    async fn delete_article(&self, id: Uuid) -> StorageResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_article(id).await
    }
    async fn list_articles(&self) -> StorageResult<Vec<Article>> {
        self.inner.list_articles().await
    }
}

// --- Failing Repository ---

/// Every call fails as if the database were down.
pub struct FailingRepo;

fn down<T>() -> StorageResult<T> {
    Err(StorageError::Unavailable("connection refused (db.internal:5432)".to_string()))
}

#[async_trait]
impl Repository for FailingRepo {
    async fn find_user_by_email(&self, _email: &str) -> StorageResult<Option<User>> {
        down()
    }
    async fn find_user_by_id(&self, _id: Uuid) -> StorageResult<Option<User>> {
        down()
    }
    async fn insert_user(&self, _user: NewUser) -> StorageResult<User> {
        down()
    }
    async fn update_user(&self, _id: Uuid, _patch: UserPatch) -> StorageResult<Option<User>> {
        down()
    }
    async fn delete_user(&self, _id: Uuid) -> StorageResult<bool> {
        down()
    }
    async fn list_users(&self) -> StorageResult<Vec<User>> {
        down()
    }
    async fn find_article_by_id(&self, _id: Uuid) -> StorageResult<Option<Article>> {
        down()
    }
    async fn insert_article(&self, _article: NewArticle) -> StorageResult<Article> {
        down()
    }
    async fn update_article(
        &self,
        _id: Uuid,
        _patch: ArticlePatch,
    ) -> StorageResult<Option<Article>> {
        down()
    }
    async fn delete_article(&self, _id: Uuid) -> StorageResult<bool> {
        down()
    }
    async fn list_articles(&self) -> StorageResult<Vec<Article>> {
        down()
    }
}

// --- Fixtures ---

pub fn test_config() -> AppConfig {
    AppConfig {
        admin_email: Some(ADMIN_EMAIL.to_string()),
        ..AppConfig::default()
    }
}

pub fn create_state(repo: Arc<dyn Repository>) -> AppState {
    AppState::new(repo, test_config())
}

pub fn registration(email: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        fullname: Some("Ada Lovelace".to_string()),
        email: Some(email.to_string()),
        profession: Some("Mathematician".to_string()),
        city: Some("London".to_string()),
        contact: Some("0612345678".to_string()),
        password: Some("analytical".to_string()),
    }
}

pub fn member(id: Uuid) -> Identity {
    Identity {
        user_id: id,
        fullname: "Member".to_string(),
        is_admin: false,
    }
}

pub fn admin() -> Identity {
    Identity {
        user_id: Uuid::from_u128(456),
        fullname: "Site Admin".to_string(),
        is_admin: true,
    }
}
