//! Application services: the use-case layer between the HTTP surface
//! and the repositories. Services own permission checks, geography
//! validation, lifecycle rules and the side effects that follow a
//! mutation.

mod agent_service;
mod auth_service;
pub mod container;
mod feedback_service;
mod geography_service;
mod job_service;
mod message_service;
mod news_service;
mod notify;
mod order_service;
mod partnership_service;
mod report_service;
mod stats_service;
mod user_service;

pub use container::{parallel, ServiceContainer, Services};

pub use agent_service::{AgentRequestManager, AgentService, CreateAgentRequest};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use feedback_service::{FeedbackManager, FeedbackService};
pub use geography_service::{GeographyManager, GeographyService};
pub use job_service::{
    ApplicationManager, ApplicationService, ApplyToJob, CreateJob, JobManager, JobService,
};
pub use message_service::{MessageDesk, MessageService};
pub use news_service::{CreateNews, NewsRoom, NewsService};
pub use order_service::{
    CreateCustomerOrder, CreateServiceOrder, CustomerOrderManager, CustomerOrderService,
    LocationInput, ServiceOrderManager, ServiceOrderService,
};
pub use partnership_service::{CreatePartnership, PartnershipManager, PartnershipService};
pub use report_service::{CreateReport, ReportManager, ReportService};
pub use stats_service::{
    BucketCounts, EntityBreakdown, StatsOverview, StatsRoom, StatsService,
};
pub use user_service::{UserManager, UserService};
