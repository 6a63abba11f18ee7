use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Authors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Authors::Id).uuid().not_null().primary_key())
                    // Stored lower-cased, so uniqueness is case-insensitive.
                    .col(ColumnDef::new(Authors::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Authors::PasswordHash).string())
                    // NULLs never collide, so password-only authors coexist.
                    .col(ColumnDef::new(Authors::GoogleId).string().unique_key())
                    .col(ColumnDef::new(Authors::FirstName).string().not_null())
                    .col(ColumnDef::new(Authors::LastName).string().not_null())
                    .col(ColumnDef::new(Authors::BirthDate).date())
                    .col(ColumnDef::new(Authors::Avatar).string())
                    .col(
                        ColumnDef::new(Authors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Authors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_authors_created_at")
                    .table(Authors::Table)
                    .col(Authors::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Authors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Authors {
    Table,
    Id,
    Email,
    PasswordHash,
    GoogleId,
    FirstName,
    LastName,
    BirthDate,
    Avatar,
    CreatedAt,
    UpdatedAt,
}
