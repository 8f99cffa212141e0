//! Data models for the EMS server

pub mod communication;
pub mod department;
pub mod enums;
pub mod event;
pub mod event_report;
pub mod news;
pub mod office;
pub mod registration;
pub mod slider;
pub mod user;

// Re-export commonly used types
pub use communication::Communication;
pub use department::Department;
pub use enums::{
    CommunicationStatus, CommunicationType, EventReportStatus, EventStatus, NewsStatus,
    RegistrationStatus, Role,
};
pub use event::Event;
pub use event_report::EventReport;
pub use news::News;
pub use office::Office;
pub use registration::{RegisteredUser, Registration};
pub use slider::Slider;
pub use user::{User, UserClaims};
