//! HTTP inbound adapter exposing REST endpoints.

pub mod bookings;
pub mod error;
pub mod events;
pub mod health;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
