//! Per-request caller resolution.
//!
//! Handlers call [`resolve_caller`] once and pass the resulting [`Caller`]
//! into the issue service; nothing below this layer reads the session.

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Caller, Error};

use super::session::SessionContext;

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Query { message } => {
            Error::internal(format!("identity provider error: {message}"))
        }
    }
}

/// Resolve the session user and their roles into a [`Caller`].
pub async fn resolve_caller(
    session: &SessionContext,
    identity: &dyn IdentityProvider,
) -> Result<Caller, Error> {
    let Some(user_id) = session.user_id()? else {
        return Ok(Caller::Anonymous);
    };
    let roles = identity
        .roles_for(&user_id)
        .await
        .map_err(map_identity_error)?;
    Ok(Caller::authenticated(user_id, roles))
}
