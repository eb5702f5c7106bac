//! Response Mapper: HTTP response → action outputs or a classified error

pub mod classify;
pub mod mapper;

pub use classify::classify;
pub use mapper::{map_response, MappedResponse, ReleaseSummary};
