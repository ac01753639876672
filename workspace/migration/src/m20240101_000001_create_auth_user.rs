use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::user;
use sea_orm_migration::{prelude::*, schema::*};

/// Index backing the one-account-per-email rule.
pub const EMAIL_UNIQUE_INDEX: &str = "idx_auth_user_email";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::table())
                    .if_not_exists()
                    .col(pk_auto(User::column(user::Column::Id)))
                    .col(string_len(User::column(user::Column::Password), 128))
                    .col(timestamp_with_time_zone_null(User::column(
                        user::Column::LastLogin,
                    )))
                    .col(boolean(User::column(user::Column::IsSuperuser)).default(false))
                    .col(string_len_null(User::column(user::Column::Username), 150))
                    .col(string_len(User::column(user::Column::FirstName), 150).default(""))
                    .col(string_len(User::column(user::Column::LastName), 150).default(""))
                    .col(string_len(User::column(user::Column::Email), user::EMAIL_MAX_LENGTH as u32))
                    .col(boolean(User::column(user::Column::IsStaff)).default(false))
                    .col(boolean(User::column(user::Column::IsActive)).default(true))
                    .col(timestamp_with_time_zone(User::column(
                        user::Column::DateJoined,
                    )))
                    .to_owned(),
            )
            .await?;

        // Email is compared after normalization, so a plain unique index suffices
        manager
            .create_index(
                Index::create()
                    .name(EMAIL_UNIQUE_INDEX)
                    .table(User::table())
                    .col(User::column(user::Column::Email))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(EMAIL_UNIQUE_INDEX)
                    .table(User::table())
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(User::table()).to_owned())
            .await
    }
}
