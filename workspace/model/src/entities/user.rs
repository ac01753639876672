use std::fmt;

use sea_orm::entity::prelude::*;

use crate::password::UNUSABLE_PASSWORD_PREFIX;

/// Maximum length of the optional `username` and of the name fields.
pub const NAME_MAX_LENGTH: usize = 150;

/// Maximum length of a stored email address.
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Represents an account that logs in with its email address.
///
/// The table keeps the name of the framework's default user table, so this
/// model is the one and only user model of an installation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Encoded password hash, or an unusable marker.
    pub password: String,
    pub last_login: Option<DateTimeUtc>,
    pub is_superuser: bool,
    /// Optional display handle; not unique and never used to log in.
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Normalized email, the login identifier.
    #[sea_orm(unique)]
    pub email: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// First and last name separated by a space, with surrounding whitespace removed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }

    pub fn has_usable_password(&self) -> bool {
        !self.password.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}
