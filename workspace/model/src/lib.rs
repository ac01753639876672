pub mod admin;
pub mod entities;
pub mod error;
pub mod identity;
pub mod manager;
pub mod password;

pub use error::{AccountError, ValidationKind};
pub use manager::{ExtraFields, UserManager};
