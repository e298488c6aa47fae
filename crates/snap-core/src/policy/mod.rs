//! Authorization policies

mod ownership;

pub use ownership::{ensure_owner, Capability, Owned};
