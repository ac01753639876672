use anyhow::{Context, Result};
use model::{ExtraFields, UserManager};
use sea_orm::{ConnectionTrait, Database};
use tracing::{debug, info, trace, warn};

/// Inputs of the `create-superuser` command
#[derive(Debug, Default)]
pub struct SuperuserArgs {
    pub email: String,
    pub password: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Create an elevated account on an open connection
pub async fn create_superuser_with<C: ConnectionTrait>(
    db: &C,
    args: SuperuserArgs,
) -> Result<model::entities::user::Model> {
    trace!("Entering create_superuser_with function");

    if args.password.is_none() {
        warn!("No password given; the account will not be able to log in until one is set");
    }

    let extra = ExtraFields {
        username: args.username,
        first_name: args.first_name,
        last_name: args.last_name,
        ..Default::default()
    };

    let created = UserManager::new(db)
        .create_superuser(&args.email, args.password.as_deref(), extra)
        .await
        .with_context(|| format!("Failed to create superuser '{}'", args.email))?;

    Ok(created)
}

pub async fn create_superuser(database_url: &str, args: SuperuserArgs) -> Result<()> {
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;

    let created = create_superuser_with(&db, args).await?;
    info!("Superuser created successfully with ID: {}, email: {}", created.id, created.email);

    Ok(())
}
