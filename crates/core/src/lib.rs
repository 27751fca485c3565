//! Core types for stronger
//!
//! Domain types, form validation and the training analytics shared by the
//! storage, service and HTTP crates.

#![allow(clippy::cast_precision_loss, reason = "averages over small counts")]

mod activity;
pub mod analytics;
pub mod constants;
mod env_config;
mod error;
mod exercise;
mod goal;
mod nutrition;
mod social;
mod user;
mod validation;
mod workout;

pub use activity::*;
pub use env_config::*;
pub use error::*;
pub use exercise::*;
pub use goal::*;
pub use nutrition::*;
pub use social::*;
pub use user::*;
pub use validation::*;
pub use workout::*;
