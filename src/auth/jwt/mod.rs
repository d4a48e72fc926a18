//! JWT token handling
//!
//! This module issues and verifies the bearer tokens that identify an acting member.

mod handler;
pub mod types;
mod utils;


pub use types::{Claims, JwtHandler};
