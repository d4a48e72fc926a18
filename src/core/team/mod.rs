//! Team management
//!
//! Every change to a member's role, status or overrides passes the
//! [`TeamGuard`] before it is staged.

mod email;
mod guard;
mod operations;
mod types;

pub(crate) use email::validate_email;
pub use guard::TeamGuard;
pub use operations::TeamOperations;
pub use types::{NewMember, UpdateMember};
