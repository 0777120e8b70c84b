use crate::error::Result;
use crate::store::Store;

use super::CredentialHasher;

/// Checks a username/password pair against the stored admin credential.
/// Returns false when no credential has been initialized.
pub fn verify_admin_login(store: &dyn Store, username: &str, password: &str) -> Result<bool> {
    let Some(credential) = store.get_admin_credential()? else {
        return Ok(false);
    };

    if credential.username != username {
        return Ok(false);
    }

    CredentialHasher::new().verify(password, &credential.password_hash)
}
