//! Departments service

use validator::Validate;

use crate::{
    error::AppResult,
    models::department::{Department, DepartmentInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct DepartmentsService {
    repository: Repository,
}

impl DepartmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Department>> {
        self.repository.departments.list().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Department> {
        self.repository.departments.get_by_id(id).await
    }

    pub async fn create(&self, data: &DepartmentInput) -> AppResult<Department> {
        data.validate()?;
        self.repository.departments.create(data).await
    }

    pub async fn update(&self, id: i64, data: &DepartmentInput) -> AppResult<Department> {
        data.validate()?;
        self.repository.departments.update(id, data).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.departments.delete(id).await
    }
}
