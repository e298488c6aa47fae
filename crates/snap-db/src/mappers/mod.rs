//! Entity to model mappers
//!
//! - `From<Model> for Entity` converts database rows to domain objects
//! - `TryFrom` where a text column holds an enumeration the database could
//!   in principle hold garbage for

mod account_token;
mod content;
mod outbox;
mod user;
