mod pagination;
mod response;
mod scope;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
pub use scope::SchoolScopeQuery;
