use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Publishers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Publishers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Publishers::Name).string().not_null())
                    .col(ColumnDef::new(Publishers::Country).string().null())
                    .col(ColumnDef::new(Publishers::City).string().null())
                    .to_owned(),
            )
            .await?;

        // publisher_id is a plain column: reads resolve it through an inner join
        manager
            .create_table(
                Table::create()
                    .table(AnimeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnimeEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AnimeEntries::AnimeTitle).string_len(255).null())
                    .col(ColumnDef::new(AnimeEntries::Date).string().null())
                    .col(ColumnDef::new(AnimeEntries::Rating).string().null())
                    .col(ColumnDef::new(AnimeEntries::TitleImage).string().null())
                    .col(ColumnDef::new(AnimeEntries::Style).string().null())
                    .col(ColumnDef::new(AnimeEntries::ShowSummary).text().null())
                    .col(ColumnDef::new(AnimeEntries::NumOfSeasons).integer().null())
                    .col(ColumnDef::new(AnimeEntries::Stars).integer().null())
                    .col(
                        ColumnDef::new(AnimeEntries::PublisherId)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_entries_publisher_id")
                    .table(AnimeEntries::Table)
                    .col(AnimeEntries::PublisherId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anime_entries_anime_title")
                    .table(AnimeEntries::Table)
                    .col(AnimeEntries::AnimeTitle)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AnimeEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Publishers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Publishers {
    Table,
    Id,
    Name,
    Country,
    City,
}

#[derive(Iden)]
enum AnimeEntries {
    Table,
    Id,
    AnimeTitle,
    Date,
    Rating,
    TitleImage,
    Style,
    ShowSummary,
    NumOfSeasons,
    Stars,
    PublisherId,
}
