//! Creates the OAuth app, client secret and token tables.
//!
//! Authorization codes and access tokens share `oauth_token`; the role of a
//! row is decided by the engine, not the schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OAuthApp::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OAuthApp::ClientId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OAuthApp::Name).string().not_null())
                    .col(ColumnDef::new(OAuthApp::RedirectUri).string().not_null())
                    .col(
                        ColumnDef::new(OAuthApp::HomeUrl)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OAuthApp::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(OAuthApp::OwnerType).string_len(16).not_null())
                    .col(ColumnDef::new(OAuthApp::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(OAuthApp::AppType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(OAuthApp::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthApp::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OAuthClientSecret::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OAuthClientSecret::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OAuthClientSecret::ClientId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthClientSecret::ClientSecret)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthClientSecret::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthClientSecret::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OAuthToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OAuthToken::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OAuthToken::ClientId).string().not_null())
                    .col(ColumnDef::new(OAuthToken::RedirectUri).string().not_null())
                    .col(
                        ColumnDef::new(OAuthToken::State)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(OAuthToken::Scope).text().not_null())
                    .col(
                        ColumnDef::new(OAuthToken::UserOrRobotIdentity)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthToken::ExpiresIn)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_oauth_app_owner")
                    .table(OAuthApp::Table)
                    .col(OAuthApp::OwnerType)
                    .col(OAuthApp::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_oauth_client_secret_client_id")
                    .table(OAuthClientSecret::Table)
                    .col(OAuthClientSecret::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_oauth_token_client_id")
                    .table(OAuthToken::Table)
                    .col(OAuthToken::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_oauth_token_client_id").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_oauth_client_secret_client_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_oauth_app_owner").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OAuthToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OAuthClientSecret::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OAuthApp::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum OAuthApp {
    #[sea_orm(iden = "oauth_app")]
    Table,
    ClientId,
    Name,
    RedirectUri,
    HomeUrl,
    Description,
    OwnerType,
    OwnerId,
    AppType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OAuthClientSecret {
    #[sea_orm(iden = "oauth_client_secret")]
    Table,
    Id,
    ClientId,
    ClientSecret,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum OAuthToken {
    #[sea_orm(iden = "oauth_token")]
    Table,
    Code,
    ClientId,
    RedirectUri,
    State,
    Scope,
    UserOrRobotIdentity,
    CreatedAt,
    ExpiresIn,
}
