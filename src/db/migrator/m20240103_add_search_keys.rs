use crate::db::query::search_key;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("anime_entries", "anime_title_folded")
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(AnimeEntries::Table)
                        .add_column(ColumnDef::new(AnimeEntries::AnimeTitleFolded).string().null())
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column("publishers", "name_folded").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Publishers::Table)
                        .add_column(ColumnDef::new(Publishers::NameFolded).string().null())
                        .to_owned(),
                )
                .await?;
        }

        // sqlite's lower() only folds ASCII, so keys are computed here
        backfill(manager, "anime_entries", "anime_title", "anime_title_folded").await?;
        backfill(manager, "publishers", "name", "name_folded").await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(AnimeEntries::Table)
                    .drop_column(AnimeEntries::AnimeTitleFolded)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Publishers::Table)
                    .drop_column(Publishers::NameFolded)
                    .to_owned(),
            )
            .await
    }
}

async fn backfill(
    manager: &SchemaManager<'_>,
    table: &str,
    source: &str,
    target: &str,
) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    let backend = manager.get_database_backend();

    let rows = conn
        .query_all(Statement::from_string(
            backend,
            format!("SELECT id, {source} FROM {table} WHERE {source} IS NOT NULL"),
        ))
        .await?;

    for row in rows {
        let id: i32 = row.try_get("", "id")?;
        let value: String = row.try_get("", source)?;

        conn.execute(Statement::from_sql_and_values(
            backend,
            format!("UPDATE {table} SET {target} = ? WHERE id = ?"),
            [search_key(&value).into(), id.into()],
        ))
        .await?;
    }

    Ok(())
}

#[derive(Iden)]
enum AnimeEntries {
    Table,
    AnimeTitleFolded,
}

#[derive(Iden)]
enum Publishers {
    Table,
    NameFolded,
}
