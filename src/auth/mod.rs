mod helpers;
mod middleware;
mod password;

pub use helpers::verify_admin_login;
pub use middleware::{AuthError, RequireAdmin, RequireSession, SESSION_HEADER};
pub use password::{CredentialHasher, MIN_PASSWORD_LENGTH, generate_password, validate_password};
