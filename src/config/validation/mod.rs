//! Configuration validation
//!
//! - `trait_def`: core Validate trait
//! - `validators`: section validators
//! - `ssrf`: outbound URL screening, shared with webhook registration

mod ssrf;
mod trait_def;
mod validators;

pub use trait_def::Validate;

pub use ssrf::validate_url_against_ssrf;
