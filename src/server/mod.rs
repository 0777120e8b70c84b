mod admin;
mod browse;
pub mod dto;
pub mod response;
mod router;
mod sessions;

pub use admin::admin_router;
pub use browse::browse_router;
pub use router::{AppState, create_router};
pub use sessions::session_router;
