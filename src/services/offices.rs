//! Offices service

use validator::Validate;

use crate::{
    error::AppResult,
    models::office::{Office, OfficeInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct OfficesService {
    repository: Repository,
}

impl OfficesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Office>> {
        self.repository.offices.list().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Office> {
        self.repository.offices.get_by_id(id).await
    }

    pub async fn create(&self, data: &OfficeInput) -> AppResult<Office> {
        data.validate()?;
        self.repository.offices.create(data).await
    }

    pub async fn update(&self, id: i64, data: &OfficeInput) -> AppResult<Office> {
        data.validate()?;
        self.repository.offices.update(id, data).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.offices.delete(id).await
    }
}
