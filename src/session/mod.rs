//! The page router: which page each client has selected, and whether it is
//! logged in as the shared admin.

mod page;
mod registry;

pub use page::{Page, Session, View};
pub use registry::SessionRegistry;
