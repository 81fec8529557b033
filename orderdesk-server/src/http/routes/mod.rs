//! Route handlers organized by resource

pub mod diagnostics;
pub mod orders;
pub mod users;
