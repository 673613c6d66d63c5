//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    agent_handler, application_handler, auth_handler, feedback_handler, geography_handler,
    job_handler, message_handler, news_handler, order_handler, partnership_handler,
    report_handler, stats_handler, user_handler,
};
use crate::domain::{
    AccountStatus, AgentRequest, AgentStatus, ApplicationStatus, CustomerOrder, Feedback,
    FeedbackKind, Job, JobApplication, JobStatus, Message, News, OrderStatus, Partnership,
    PartnershipStatus, Region, Report, ReportStatus, Role, SenderKind, ServiceOrder,
    ThreadSummary, UserResponse, Woreda, Zone,
};
use crate::infra::repositories::StatusCount;
use crate::services::{BucketCounts, EntityBreakdown, StatsOverview, TokenResponse};

/// OpenAPI documentation for the Hulegeb administrative API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hulegeb API",
        version = "0.1.0",
        description = "Multi-tenant administrative backend: citizen reports, service and \
                       customer orders, job postings, partnerships, agent enrollment, \
                       feedback, support messages, news and dashboard statistics.",
        contact(name = "API Support", email = "support@hulegeb.et")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
        (url = "https://api.hulegeb.et", description = "Production server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::verify_otp,
        auth_handler::resend_otp,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::logout,
        // Users
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::assign_role,
        user_handler::block_user,
        user_handler::unblock_user,
        user_handler::delete_user,
        // Geography
        geography_handler::list_regions,
        geography_handler::list_zones,
        geography_handler::list_woredas,
        geography_handler::create_region,
        geography_handler::rename_region,
        geography_handler::delete_region,
        geography_handler::create_zone,
        geography_handler::rename_zone,
        geography_handler::delete_zone,
        geography_handler::create_woreda,
        geography_handler::rename_woreda,
        geography_handler::delete_woreda,
        // Reports
        report_handler::create_report,
        report_handler::list_reports,
        report_handler::get_report,
        report_handler::update_report,
        report_handler::cancel_report,
        report_handler::transition_report,
        report_handler::delete_report,
        // Service orders
        order_handler::create_service_order,
        order_handler::list_service_orders,
        order_handler::get_service_order,
        order_handler::update_service_order,
        order_handler::cancel_service_order,
        order_handler::transition_service_order,
        order_handler::delete_service_order,
        // Customer orders
        order_handler::create_customer_order,
        order_handler::list_customer_orders,
        order_handler::get_customer_order,
        order_handler::update_customer_order,
        order_handler::cancel_customer_order,
        order_handler::transition_customer_order,
        order_handler::delete_customer_order,
        // Jobs
        job_handler::list_jobs,
        job_handler::get_job,
        job_handler::create_job,
        job_handler::update_job,
        job_handler::delete_job,
        job_handler::apply_to_job,
        // Applications
        application_handler::list_applications,
        application_handler::get_application,
        application_handler::update_application,
        application_handler::transition_application,
        application_handler::delete_application,
        // Partnerships
        partnership_handler::create_partnership,
        partnership_handler::list_partnerships,
        partnership_handler::get_partnership,
        partnership_handler::update_partnership,
        partnership_handler::transition_partnership,
        partnership_handler::delete_partnership,
        // Agent requests
        agent_handler::create_agent_request,
        agent_handler::list_agent_requests,
        agent_handler::get_agent_request,
        agent_handler::update_agent_request,
        agent_handler::cancel_agent_request,
        agent_handler::transition_agent_request,
        agent_handler::delete_agent_request,
        // Feedback
        feedback_handler::create_feedback,
        feedback_handler::list_feedback,
        feedback_handler::delete_feedback,
        // Messages
        message_handler::send_message,
        message_handler::my_thread,
        message_handler::inbox,
        message_handler::thread,
        message_handler::reply,
        // News
        news_handler::list_news,
        news_handler::get_news,
        news_handler::create_news,
        news_handler::list_all_news,
        news_handler::update_news,
        news_handler::delete_news,
        // Statistics
        stats_handler::overview,
    ),
    components(
        schemas(
            // Domain types
            Role,
            AccountStatus,
            UserResponse,
            Region,
            Zone,
            Woreda,
            Report,
            ReportStatus,
            ServiceOrder,
            CustomerOrder,
            OrderStatus,
            Job,
            JobStatus,
            JobApplication,
            ApplicationStatus,
            Partnership,
            PartnershipStatus,
            AgentRequest,
            AgentStatus,
            Feedback,
            FeedbackKind,
            Message,
            SenderKind,
            ThreadSummary,
            News,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::VerifyOtpRequest,
            auth_handler::ResendOtpRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            TokenResponse,
            // Request bodies
            user_handler::UpdateProfileRequest,
            user_handler::AssignRoleRequest,
            geography_handler::NameRequest,
            geography_handler::CreateZoneRequest,
            geography_handler::CreateWoredaRequest,
            report_handler::ReportStatusRequest,
            order_handler::OrderStatusRequest,
            job_handler::CreateJobRequest,
            job_handler::UpdateJobRequest,
            application_handler::ApplicationStatusRequest,
            partnership_handler::CreatePartnershipRequest,
            partnership_handler::UpdatePartnershipRequest,
            partnership_handler::PartnershipStatusRequest,
            agent_handler::CreateAgentRequestBody,
            agent_handler::UpdateAgentRequestBody,
            agent_handler::AgentStatusRequest,
            feedback_handler::CreateFeedbackRequest,
            message_handler::SendMessageRequest,
            // Statistics
            StatsOverview,
            EntityBreakdown,
            BucketCounts,
            StatusCount,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, verification and tokens"),
        (name = "Users", description = "Profiles and account administration"),
        (name = "Geography", description = "Region, zone and woreda reference data"),
        (name = "Reports", description = "Citizen reports and their lifecycle"),
        (name = "Service orders", description = "Orders for the organization's services"),
        (name = "Customer orders", description = "Goods orders placed for customers"),
        (name = "Jobs", description = "Job postings and the application intake"),
        (name = "Applications", description = "Job application review"),
        (name = "Partnerships", description = "Partnership requests"),
        (name = "Agent requests", description = "Agent enrollment requests"),
        (name = "Feedback", description = "User feedback"),
        (name = "Messages", description = "Support threads with the assistant team"),
        (name = "News", description = "Public announcements"),
        (name = "Statistics", description = "Dashboard counters")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
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
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
