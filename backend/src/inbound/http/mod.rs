//! HTTP inbound adapter exposing the issue tracker over JSON.

pub mod caller;
pub mod error;
pub mod health;
pub mod issues;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
