//! News service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        enums::NewsStatus,
        news::{News, NewsInput},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct NewsService {
    repository: Repository,
}

impl NewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Active news, newest first
    pub async fn list_active(&self) -> AppResult<Vec<News>> {
        self.repository.news.list(Some(NewsStatus::Active)).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<News>> {
        self.repository.news.list(None).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<News> {
        self.repository.news.get_by_id(id).await
    }

    pub async fn create(&self, data: &NewsInput) -> AppResult<News> {
        data.validate()?;
        self.repository.news.create(data).await
    }

    pub async fn update(&self, id: i64, data: &NewsInput) -> AppResult<News> {
        data.validate()?;
        self.repository.news.update(id, data).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.news.deactivate(id).await?;
        tracing::info!(news_id = id, "News deactivated");
        Ok(())
    }
}
