//! Shared request/response plumbing types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginationMeta, PaginationParams, SortOrder};
pub use response::{ApiResponse, Created};
