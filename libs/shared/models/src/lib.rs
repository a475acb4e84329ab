pub mod auth;
pub mod contact;
pub mod error;
pub mod id;

pub use id::UniqueId;
