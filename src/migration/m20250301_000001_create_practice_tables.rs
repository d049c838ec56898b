// ABOUTME: Initial migration creating users, clients, cases, case_notes and case_documents
// ABOUTME: Cases point at clients by name and optional id only, so client deletion never cascades

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("lawyer"))
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clients::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Clients::UserId).uuid().not_null())
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string().not_null())
                    .col(ColumnDef::new(Clients::Phone).string().not_null())
                    .col(ColumnDef::new(Clients::Status).string().not_null().default("Active"))
                    .col(
                        ColumnDef::new(Clients::LastContact)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Clients::CaseCount).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clients_user_id")
                            .from(Clients::Table, Clients::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clients_owner_email")
                    .table(Clients::Table)
                    .col(Clients::UserId)
                    .col(Clients::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cases::UserId).uuid().not_null())
                    .col(ColumnDef::new(Cases::ClientId).uuid())
                    .col(ColumnDef::new(Cases::CaseNumber).string().not_null())
                    .col(ColumnDef::new(Cases::Title).string().not_null())
                    .col(ColumnDef::new(Cases::ClientName).string().not_null())
                    .col(ColumnDef::new(Cases::Status).string().not_null().default("Open"))
                    .col(ColumnDef::new(Cases::CaseType).string().not_null().default("Civil"))
                    .col(
                        ColumnDef::new(Cases::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cases::Priority).string().not_null().default("Medium"))
                    .col(ColumnDef::new(Cases::NextHearing).timestamp_with_time_zone())
                    .col(ColumnDef::new(Cases::Value).double().not_null().default(0.0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cases_user_id")
                            .from(Cases::Table, Cases::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cases_owner_start_date")
                    .table(Cases::Table)
                    .col(Cases::UserId)
                    .col(Cases::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CaseNotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CaseNotes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CaseNotes::CaseId).uuid().not_null())
                    .col(ColumnDef::new(CaseNotes::Content).text().not_null())
                    .col(ColumnDef::new(CaseNotes::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(CaseNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_case_notes_case_id")
                            .from(CaseNotes::Table, CaseNotes::CaseId)
                            .to(Cases::Table, Cases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_case_notes_case_id")
                    .table(CaseNotes::Table)
                    .col(CaseNotes::CaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CaseDocuments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CaseDocuments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CaseDocuments::CaseId).uuid().not_null())
                    .col(ColumnDef::new(CaseDocuments::Name).string().not_null())
                    .col(ColumnDef::new(CaseDocuments::Kind).string().not_null().default("UPLOAD"))
                    .col(ColumnDef::new(CaseDocuments::Size).string().not_null())
                    .col(ColumnDef::new(CaseDocuments::Url).string())
                    .col(ColumnDef::new(CaseDocuments::PublicId).string())
                    .col(ColumnDef::new(CaseDocuments::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(CaseDocuments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_case_documents_case_id")
                            .from(CaseDocuments::Table, CaseDocuments::CaseId)
                            .to(Cases::Table, Cases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_case_documents_case_id")
                    .table(CaseDocuments::Table)
                    .col(CaseDocuments::CaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CaseDocuments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CaseNotes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Phone,
    Status,
    LastContact,
    CaseCount,
}

#[derive(DeriveIden)]
enum Cases {
    Table,
    Id,
    UserId,
    ClientId,
    CaseNumber,
    Title,
    ClientName,
    Status,
    CaseType,
    StartDate,
    Priority,
    NextHearing,
    Value,
}

#[derive(DeriveIden)]
enum CaseNotes {
    Table,
    Id,
    CaseId,
    Content,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CaseDocuments {
    Table,
    Id,
    CaseId,
    Name,
    Kind,
    Size,
    Url,
    PublicId,
    CreatedBy,
    CreatedAt,
}
