//! Account creation.
//!
//! [`UserManager`] is the only place creation-time rules are enforced: the email
//! must be present and is normalized, optional fields are validated, the
//! password credential is derived, and elevated accounts get both staff and
//! superuser flags. Uniqueness of the email is left to the store's unique
//! index, so concurrent creations with the same address are serialized by the
//! database and the loser sees [`AccountError::ConstraintViolation`].

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::{debug, info, instrument, trace, warn};

use crate::entities::user;
use crate::error::{AccountError, Result, ValidationKind};
use crate::identity::{normalize_email, validate_display_name, validate_email, validate_username};
use crate::password::make_password;

/// Optional fields merged into a new account.
///
/// Unset fields take the model defaults: no username, empty names, active,
/// neither staff nor superuser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraFields {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Creates accounts on top of a database connection.
#[derive(Debug)]
pub struct UserManager<'a, C> {
    db: &'a C,
}

impl<'a, C> UserManager<'a, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Create and persist a regular account.
    ///
    /// Fails with [`ValidationKind::MissingRequiredField`] when the email is
    /// blank and with [`AccountError::ConstraintViolation`] when the normalized
    /// email is already taken. Without a password the account gets an unusable
    /// credential.
    #[instrument(skip(self, password, extra))]
    pub async fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<user::Model> {
        trace!("Entering create_user");

        if email.trim().is_empty() {
            warn!("Rejecting account creation without an email");
            return Err(AccountError::validation(
                ValidationKind::MissingRequiredField,
                "The Email field must be set",
            ));
        }

        let email = normalize_email(email);
        debug!("Normalized email to {}", email);
        validate_email(&email)?;

        let username = extra
            .username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        if let Some(name) = &username {
            validate_username(name)?;
        }

        let first_name = extra.first_name.unwrap_or_default();
        let last_name = extra.last_name.unwrap_or_default();
        validate_display_name("first_name", &first_name)?;
        validate_display_name("last_name", &last_name)?;

        trace!("Deriving password credential");
        let password = make_password(password)?;

        let new_user = user::ActiveModel {
            password: Set(password),
            last_login: Set(None),
            is_superuser: Set(extra.is_superuser.unwrap_or(false)),
            username: Set(username),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email.clone()),
            is_staff: Set(extra.is_staff.unwrap_or(false)),
            is_active: Set(extra.is_active.unwrap_or(true)),
            date_joined: Set(Utc::now()),
            ..Default::default()
        };

        let created = new_user.insert(self.db).await.map_err(|db_error| {
            let err = AccountError::from(db_error);
            if err.is_constraint_violation() {
                warn!("An account with email {} already exists", email);
            }
            err
        })?;

        info!(
            "Account created with ID: {}, email: {}, staff: {}, superuser: {}",
            created.id, created.email, created.is_staff, created.is_superuser
        );
        Ok(created)
    }

    /// Create and persist an elevated account.
    ///
    /// `is_staff` and `is_superuser` default to true. An explicit false on
    /// either is a caller error rather than something to override.
    #[instrument(skip(self, password, extra))]
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        mut extra: ExtraFields,
    ) -> Result<user::Model> {
        trace!("Entering create_superuser");

        let is_staff = *extra.is_staff.get_or_insert(true);
        let is_superuser = *extra.is_superuser.get_or_insert(true);

        if !is_staff {
            warn!("Rejecting superuser creation with is_staff=false");
            return Err(AccountError::validation(
                ValidationKind::InvalidElevation,
                "Superuser must have is_staff=True.",
            ));
        }
        if !is_superuser {
            warn!("Rejecting superuser creation with is_superuser=false");
            return Err(AccountError::validation(
                ValidationKind::InvalidElevation,
                "Superuser must have is_superuser=True.",
            ));
        }

        self.create_user(email, password, extra).await
    }

    /// Look an account up by its login identifier.
    ///
    /// The lookup email is normalized the same way as on creation.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let email = normalize_email(email);
        trace!("Looking up account by email {}", email);
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await?;
        Ok(found)
    }

    /// Replace the stored credential; `None` makes the password unusable.
    pub async fn set_password(
        &self,
        account: user::Model,
        password: Option<&str>,
    ) -> Result<user::Model> {
        let id = account.id;
        let mut active: user::ActiveModel = account.into();
        active.password = Set(make_password(password)?);
        let updated = active.update(self.db).await?;
        info!("Password updated for account ID: {}", id);
        Ok(updated)
    }
}
