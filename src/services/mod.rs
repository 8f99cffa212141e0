//! Business logic services

pub mod communications;
pub mod departments;
pub mod email;
pub mod event_reports;
pub mod events;
pub mod files;
pub mod news;
pub mod notifications;
pub mod offices;
pub mod registrations;
pub mod sliders;
pub mod stats;
pub mod users;

use std::sync::Arc;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub departments: departments::DepartmentsService,
    pub offices: offices::OfficesService,
    pub events: events::EventsService,
    pub registrations: registrations::RegistrationsService,
    pub communications: communications::CommunicationsService,
    pub event_reports: event_reports::EventReportsService,
    pub sliders: sliders::SlidersService,
    pub news: news::NewsService,
    pub stats: stats::StatsService,
    pub files: files::FilesService,
    pub notifications: notifications::NotificationService,
}

impl Services {
    /// Create all services with the given repository and mail transport
    pub fn new(repository: Repository, config: &AppConfig, mailer: Arc<dyn email::Mailer>) -> Self {
        let notifications = notifications::NotificationService::new(mailer);

        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone(), notifications.clone()),
            departments: departments::DepartmentsService::new(repository.clone()),
            offices: offices::OfficesService::new(repository.clone()),
            events: events::EventsService::new(repository.clone(), notifications.clone()),
            registrations: registrations::RegistrationsService::new(repository.clone(), notifications.clone()),
            communications: communications::CommunicationsService::new(repository.clone()),
            event_reports: event_reports::EventReportsService::new(repository.clone()),
            sliders: sliders::SlidersService::new(repository.clone()),
            news: news::NewsService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            files: files::FilesService::new(&config.storage),
            notifications,
        }
    }
}
