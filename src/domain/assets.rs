//! Upload handling types shared by the multipart endpoints.

/// An uploaded file as received from a multipart request, before it is
/// handed to the asset store.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Entity families named in notification emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Report,
    ServiceOrder,
    CustomerOrder,
    JobApplication,
    Partnership,
    AgentRequest,
}

impl EntityKind {
    /// Human-readable name used in notification subjects and bodies.
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Report => "report",
            EntityKind::ServiceOrder => "service order",
            EntityKind::CustomerOrder => "customer order",
            EntityKind::JobApplication => "job application",
            EntityKind::Partnership => "partnership request",
            EntityKind::AgentRequest => "agent request",
        }
    }
}
