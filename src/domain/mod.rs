//! Domain layer: entities, lifecycle machines and authorization rules,
//! independent of transport and storage.

pub mod agent;
pub mod assets;
pub mod feedback;
pub mod geography;
pub mod job;
pub mod message;
pub mod news;
pub mod order;
pub mod partnership;
pub mod password;
pub mod report;
pub mod role;
pub mod status;
pub mod user;

pub use agent::{AgentRequest, AgentRequestPatch, NewAgentRequest};
pub use assets::{EntityKind, Upload};
pub use feedback::{Feedback, FeedbackKind};
pub use geography::{ManualLocation, OrderLocation, Region, Woreda, Zone};
pub use job::{ApplicationPatch, Job, JobApplication, JobPatch, NewApplication, NewJob};
pub use message::{Message, SenderKind, ThreadSummary};
pub use news::{News, NewsPatch, NewNews};
pub use order::{
    CustomerOrder, CustomerOrderPatch, NewCustomerOrder, NewServiceOrder, ServiceOrder,
    ServiceOrderPatch,
};
pub use partnership::{NewPartnership, Partnership, PartnershipPatch};
pub use password::Password;
pub use report::{NewReport, Report, ReportPatch};
pub use role::{AuthorityScope, GeoRef, Permission, Role};
pub use status::{
    AgentStatus, ApplicationStatus, JobStatus, OrderStatus, PartnershipStatus, ReportStatus,
    StatusFlow,
};
pub use user::{AccountStatus, CurrentUser, PendingRegistration, User, UserResponse};
