//! HTTP inbound adapter exposing REST endpoints.

pub mod convert;
pub mod documentations;
pub mod error;
pub mod health;
pub mod payload;
pub mod projects;
pub mod relay;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
