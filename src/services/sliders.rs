//! Sliders service

use validator::Validate;

use crate::{
    error::AppResult,
    models::slider::{Slider, SliderInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct SlidersService {
    repository: Repository,
}

impl SlidersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Slider>> {
        self.repository.sliders.list(active_only).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Slider> {
        self.repository.sliders.get_by_id(id).await
    }

    pub async fn create(&self, data: &SliderInput) -> AppResult<Slider> {
        data.validate()?;
        self.repository.sliders.create(data).await
    }

    pub async fn update(&self, id: i64, data: &SliderInput) -> AppResult<Slider> {
        data.validate()?;
        self.repository.sliders.update(id, data).await
    }

    pub async fn set_status(&self, id: i64, status: bool) -> AppResult<Slider> {
        self.repository.sliders.set_status(id, status).await
    }

    pub async fn set_order(&self, id: i64, display_order: i32) -> AppResult<Slider> {
        self.repository.sliders.set_order(id, display_order).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.sliders.delete(id).await
    }
}
