use crate::{
    authorization::{Action, authorize},
    error::ServiceError,
    models::{Article, ArticleDraft, ArticlePatch, ArticleRequest, Identity, NewArticle},
    repository::RepositoryState,
    validation::{ARTICLE_SCHEMA, Mode, validate},
};

use super::parse_id;

const ENTITY: &str = "article";

/// ArticleService
///
/// Article reads are open (listing) or need any identity (single read);
/// every write is admin only and stamps the author from the caller.
#[derive(Clone)]
pub struct ArticleService {
    repo: RepositoryState,
}

impl ArticleService {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// All articles, newest first.
    pub async fn list(&self) -> Result<Vec<Article>, ServiceError> {
        Ok(self.repo.list_articles().await?)
    }

    pub async fn get(&self, identity: &Identity, id: &str) -> Result<Article, ServiceError> {
        authorize(identity, Action::ReadArticle, None)?;
        let id = parse_id(ENTITY, id)?;

        self.repo
            .find_article_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::unmatched(ENTITY, id))
    }

    /// create
    ///
    /// The caller's full name becomes the author; any author sent by the client
    /// is never read.
    pub async fn create(
        &self,
        identity: &Identity,
        payload: ArticleRequest,
    ) -> Result<Article, ServiceError> {
        authorize(identity, Action::CreateArticle, None)?;
        validate(
            &ARTICLE_SCHEMA,
            &ArticleDraft {
                request: &payload,
                author: &identity.fullname,
            },
            Mode::Full,
        )?;

        let ArticleRequest {
            title: Some(title),
            article_type: Some(article_type),
            content: Some(content),
        } = payload
        else {
            return Err(ServiceError::Internal(
                "article payload incomplete after validation".to_string(),
            ));
        };

        let article = self
            .repo
            .insert_article(NewArticle {
                title,
                article_type,
                content,
                author: identity.fullname.clone(),
            })
            .await?;

        tracing::info!(article_id = %article.id, author = %article.author, "article created");
        Ok(article)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        payload: ArticleRequest,
    ) -> Result<Article, ServiceError> {
        authorize(identity, Action::UpdateArticle, None)?;
        let id = parse_id(ENTITY, id)?;
        validate(
            &ARTICLE_SCHEMA,
            &ArticleDraft {
                request: &payload,
                author: &identity.fullname,
            },
            Mode::Partial,
        )?;

        if self.repo.find_article_by_id(id).await?.is_none() {
            return Err(ServiceError::unmatched(ENTITY, id));
        }

        let patch = ArticlePatch {
            title: payload.title,
            article_type: payload.article_type,
            content: payload.content,
            author: identity.fullname.clone(),
        };
        let article = self
            .repo
            .update_article(id, patch)
            .await?
            .ok_or_else(|| ServiceError::unmatched(ENTITY, id))?;

        tracing::info!(article_id = %id, "article updated");
        Ok(article)
    }

    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), ServiceError> {
        authorize(identity, Action::DeleteArticle, None)?;
        let id = parse_id(ENTITY, id)?;

        if self.repo.find_article_by_id(id).await?.is_none() {
            return Err(ServiceError::unmatched(ENTITY, id));
        }
        if !self.repo.delete_article(id).await? {
            return Err(ServiceError::unmatched(ENTITY, id));
        }

        tracing::info!(article_id = %id, "article deleted");
        Ok(())
    }
}
