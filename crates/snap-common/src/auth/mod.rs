//! Authentication utilities

mod password;
mod session;
mod token;

pub use password::{hash_password, verify_password, PasswordService};
pub use session::{Claims, SessionSigner, SessionToken};
pub use token::generate_token_secret;
