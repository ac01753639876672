//! SeaORM entity modules.
//!
//! The account store is a single table; the account embeds every field the
//! authentication side needs instead of extending a framework base type.

pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::user::Entity as User;
}
