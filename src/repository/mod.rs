//! Repository layer for database operations

pub mod communications;
pub mod departments;
pub mod event_reports;
pub mod events;
pub mod news;
pub mod offices;
pub mod registrations;
pub mod sliders;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub departments: departments::DepartmentsRepository,
    pub offices: offices::OfficesRepository,
    pub events: events::EventsRepository,
    pub registrations: registrations::RegistrationsRepository,
    pub communications: communications::CommunicationsRepository,
    pub event_reports: event_reports::EventReportsRepository,
    pub sliders: sliders::SlidersRepository,
    pub news: news::NewsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            departments: departments::DepartmentsRepository::new(pool.clone()),
            offices: offices::OfficesRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            registrations: registrations::RegistrationsRepository::new(pool.clone()),
            communications: communications::CommunicationsRepository::new(pool.clone()),
            event_reports: event_reports::EventReportsRepository::new(pool.clone()),
            sliders: sliders::SlidersRepository::new(pool.clone()),
            news: news::NewsRepository::new(pool.clone()),
            pool,
        }
    }
}
