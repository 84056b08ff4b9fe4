//! PostgreSQL-backed `IdentityProvider` reading `user_roles`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Role, RoleSet, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, failure_message};
use super::pool::{DbPool, PoolError};
use super::schema::user_roles;

/// Diesel-backed implementation of the [`IdentityProvider`] port.
#[derive(Clone)]
pub struct DieselIdentityProvider {
    pool: DbPool,
}

impl DieselIdentityProvider {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityProviderError {
    IdentityProviderError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityProviderError {
    let failure = classify_diesel_error(&error);
    match failure {
        DieselFailure::Connection => IdentityProviderError::connection(failure_message(failure)),
        DieselFailure::Validation | DieselFailure::Query => {
            IdentityProviderError::query(failure_message(failure))
        }
    }
}

/// Parse stored role names, skipping any the tracker does not recognise.
pub(crate) fn parse_roles(user_id: &UserId, names: &[String]) -> RoleSet {
    names
        .iter()
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(error) => {
                warn!(user_id = %user_id, %error, "ignoring unknown role");
                None
            }
        })
        .collect()
}

#[async_trait]
impl IdentityProvider for DieselIdentityProvider {
    async fn roles_for(&self, user_id: &UserId) -> Result<RoleSet, IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let names: Vec<String> = user_roles::table
            .filter(user_roles::user_id.eq(user_id.as_uuid()))
            .select(user_roles::role)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(parse_roles(user_id, &names))
    }
}
