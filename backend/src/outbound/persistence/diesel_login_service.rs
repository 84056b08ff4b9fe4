//! Diesel-backed `LoginService`.
//!
//! Accepts the built-in accounts under the configured [`AccountPassword`] and
//! makes sure the authenticated account, with its roles, exists in `users`
//! and `user_roles` so the
//! [`DieselIdentityProvider`](super::DieselIdentityProvider) can resolve it.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPassword, FixtureAccount, LoginService, fixture_account};
use crate::domain::{Error, LoginCredentials, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, failure_message};
use super::models::{NewUserRoleRow, NewUserRow};
use super::pool::DbPool;
use super::schema::{user_roles, users};

/// Persists accounts accepted by the credential contract.
#[async_trait]
pub(crate) trait AccountStore: Send + Sync {
    /// Insert the account and its roles when missing. Idempotent.
    async fn ensure_account(&self, user_id: UserId, account: &FixtureAccount)
    -> Result<(), Error>;
}

/// [`AccountStore`] writing to PostgreSQL.
pub(crate) struct DieselAccountStore {
    pool: DbPool,
}

fn map_diesel_error(error: diesel::result::Error) -> Error {
    let failure = classify_diesel_error(&error);
    match failure {
        DieselFailure::Connection => Error::service_unavailable(failure_message(failure)),
        DieselFailure::Validation | DieselFailure::Query => {
            Error::internal(failure_message(failure))
        }
    }
}

#[async_trait]
impl AccountStore for DieselAccountStore {
    async fn ensure_account(
        &self,
        user_id: UserId,
        account: &FixtureAccount,
    ) -> Result<(), Error> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| Error::service_unavailable(err.into_message()))?;

        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: *user_id.as_uuid(),
                username: account.username,
                display_name: account.display_name,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let role_rows: Vec<NewUserRoleRow<'_>> = account
            .roles
            .iter()
            .map(|role| NewUserRoleRow {
                user_id: *user_id.as_uuid(),
                role: role.as_str(),
            })
            .collect();
        if !role_rows.is_empty() {
            diesel::insert_into(user_roles::table)
                .values(&role_rows)
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        Ok(())
    }
}

/// Diesel-backed [`LoginService`].
#[derive(Clone)]
pub struct DieselLoginService {
    accounts: Arc<dyn AccountStore>,
    password: AccountPassword,
}

impl DieselLoginService {
    pub fn new(pool: DbPool, password: AccountPassword) -> Self {
        Self {
            accounts: Arc::new(DieselAccountStore { pool }),
            password,
        }
    }

    #[cfg(test)]
    fn from_store(accounts: Arc<dyn AccountStore>, password: AccountPassword) -> Self {
        Self { accounts, password }
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = fixture_account(credentials, &self.password)
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        let user_id = UserId::new(account.user_id)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        self.accounts.ensure_account(user_id, account).await?;
        Ok(user_id)
    }
}
