pub mod auth;
pub mod pages;
pub mod response;

pub use auth::{session_gate, AuthUser};
pub use pages::page_gate;
pub use response::{ApiResponse, ApiResult};
