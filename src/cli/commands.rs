pub mod create_superuser;
pub mod initdb;
pub mod serve;

pub use create_superuser::{create_superuser, SuperuserArgs};
pub use initdb::{init_database, run_migrations};
pub use serve::serve;
