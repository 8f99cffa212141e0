//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, communications, departments, event_reports, events, files, health, news, offices, registrations,
    sliders, stats, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EMS API",
        version = "1.0.0",
        description = "Event Management System REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        auth::my_registrations,
        auth::change_password,
        auth::reset_password,
        auth::forgot_password,
        auth::contact,
        // Users
        users::list_users,
        users::get_user,
        users::get_user_registrations,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Departments
        departments::list_departments,
        departments::get_department,
        departments::create_department,
        departments::update_department,
        departments::delete_department,
        // Offices
        offices::list_offices,
        offices::get_office,
        offices::create_office,
        offices::update_office,
        offices::delete_office,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::approve_event,
        events::reject_event,
        // Registrations
        registrations::register,
        registrations::cancel,
        registrations::is_registered,
        registrations::list_registrations,
        registrations::registered_users,
        registrations::check_in,
        // Communications
        communications::list_communications,
        communications::get_communication,
        communications::create_communication,
        communications::update_communication,
        communications::delete_communication,
        communications::approve_communication,
        communications::reject_communication,
        communications::unapprove_communication,
        communications::submit_communication,
        communications::share_communication,
        communications::view_communication,
        // Event reports
        event_reports::list_reports,
        event_reports::list_reports_by_event,
        event_reports::get_report,
        event_reports::create_report,
        event_reports::update_report,
        event_reports::delete_report,
        event_reports::approve_report,
        event_reports::reject_report,
        event_reports::request_revision,
        // Sliders
        sliders::list_sliders,
        sliders::list_active_sliders,
        sliders::get_slider,
        sliders::create_slider,
        sliders::update_slider,
        sliders::set_slider_status,
        sliders::set_slider_order,
        sliders::delete_slider,
        // News
        news::list_active_news,
        news::list_all_news,
        news::get_news,
        news::create_news,
        news::update_news,
        news::delete_news,
        // Stats
        stats::get_summary,
        // Files
        files::upload,
        files::download,
        files::delete_file,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::Role,
            crate::models::enums::EventStatus,
            crate::models::enums::RegistrationStatus,
            crate::models::enums::CommunicationStatus,
            crate::models::enums::CommunicationType,
            crate::models::enums::EventReportStatus,
            crate::models::enums::NewsStatus,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::ChangePasswordRequest,
            auth::ResetPasswordRequest,
            auth::ForgotPasswordRequest,
            auth::ContactRequest,
            // Users
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Organisation
            crate::models::department::Department,
            crate::models::department::DepartmentInput,
            crate::models::office::Office,
            crate::models::office::OfficeInput,
            // Events
            crate::models::event::Event,
            crate::models::event::CreateEvent,
            crate::models::event::UpdateEvent,
            crate::models::event::RejectRequest,
            // Registrations
            crate::models::registration::Registration,
            crate::models::registration::RegisteredUser,
            crate::models::registration::OrgUnitRef,
            crate::models::registration::RegisterRequest,
            registrations::IsRegisteredResponse,
            // Communications
            crate::models::communication::Communication,
            crate::models::communication::CommunicationInput,
            // Event reports
            crate::models::event_report::EventReport,
            crate::models::event_report::EventReportInput,
            // Sliders
            crate::models::slider::Slider,
            crate::models::slider::SliderInput,
            crate::models::slider::SliderStatusRequest,
            crate::models::slider::SliderOrderRequest,
            // News
            crate::models::news::News,
            crate::models::news::NewsInput,
            // Stats
            stats::StatsSummary,
            stats::EventCounts,
            stats::UserCounts,
            stats::RegistrationCounts,
            stats::StatEntry,
            stats::DailyCount,
            // Files
            files::UploadResponse,
            // Common
            health::HealthResponse,
            crate::api::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and account endpoints"),
        (name = "users", description = "User management"),
        (name = "departments", description = "Departments"),
        (name = "offices", description = "Offices"),
        (name = "events", description = "Events and approval workflow"),
        (name = "registrations", description = "Event registrations and check-in"),
        (name = "communications", description = "Communications and their review"),
        (name = "event-reports", description = "Post-event reports"),
        (name = "sliders", description = "Homepage sliders"),
        (name = "news", description = "News"),
        (name = "stats", description = "Statistics"),
        (name = "files", description = "File storage")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use utoipa::openapi::PathItemType;

    use super::*;

    #[test]
    fn test_openapi_documents_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/events/{id}/register"));
        assert!(doc.paths.paths.contains_key("/statistics/summary"));
    }

    #[test]
    fn test_upload_documents_multipart_body() {
        let doc = ApiDoc::openapi();
        let upload = &doc.paths.paths["/files/upload"];
        let body = upload.operations[&PathItemType::Post]
            .request_body
            .as_ref()
            .expect("upload request body");
        assert!(body.content.contains_key("multipart/form-data"));
    }
}
