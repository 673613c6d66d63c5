//! Repository layer.
//!
//! One trait per aggregate, each with a SeaORM-backed store and a
//! generated mock for service tests. Queries exclude soft-deleted rows
//! unless a method says otherwise.

pub(crate) mod entities;
mod scope;

mod agent_repository;
mod feedback_repository;
mod geography_repository;
mod job_repository;
mod message_repository;
mod news_repository;
mod order_repository;
mod partnership_repository;
mod report_repository;
mod stats_repository;
mod token_repository;
mod user_repository;

pub use agent_repository::{AgentRequestRepository, AgentRequestStore};
pub use feedback_repository::{FeedbackRepository, FeedbackStore};
pub use geography_repository::{GeographyRepository, GeographyStore};
pub use job_repository::{
    ApplicationFilter, JobApplicationRepository, JobApplicationStore, JobFilter, JobRepository,
    JobStore,
};
pub use message_repository::{MessageRepository, MessageStore};
pub use news_repository::{NewsRepository, NewsStore};
pub use order_repository::{
    CustomerOrderRepository, CustomerOrderStore, OrderFilter, ServiceOrderRepository,
    ServiceOrderStore,
};
pub use partnership_repository::{PartnershipRepository, PartnershipStore};
pub use report_repository::{ReportFilter, ReportRepository, ReportStore};
pub use stats_repository::{StatsRepository, StatsStore, StatusCount, TimeRange};
pub use token_repository::{RefreshTokenRecord, RefreshTokenRepository, RefreshTokenStore};
pub use user_repository::{UserFilter, UserRepository, UserStore};

// Mocks for unit and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use agent_repository::MockAgentRequestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use geography_repository::MockGeographyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use job_repository::{MockJobApplicationRepository, MockJobRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use message_repository::MockMessageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use news_repository::MockNewsRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::{MockCustomerOrderRepository, MockServiceOrderRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use partnership_repository::MockPartnershipRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use report_repository::MockReportRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use stats_repository::MockStatsRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use token_repository::MockRefreshTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
