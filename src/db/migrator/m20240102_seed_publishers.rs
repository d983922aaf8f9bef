use crate::entities::{prelude::*, publishers};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Publishers available on a fresh database. The catalog never writes
/// publisher rows itself, so selection lists start from this set.
const DEFAULT_PUBLISHERS: &[(&str, &str, &str)] = &[
    ("Aniplex", "Japan", "Tokyo"),
    ("Toho Animation", "Japan", "Tokyo"),
    ("Kadokawa", "Japan", "Tokyo"),
    ("Crunchyroll", "United States", "San Francisco"),
    ("Shueisha", "Japan", "Tokyo"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Publishers)
            .columns([
                publishers::Column::Name,
                publishers::Column::Country,
                publishers::Column::City,
            ])
            .to_owned();

        for (name, country, city) in DEFAULT_PUBLISHERS {
            insert
                .values([(*name).into(), (*country).into(), (*city).into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names: Vec<&str> = DEFAULT_PUBLISHERS.iter().map(|(name, _, _)| *name).collect();

        let delete = sea_orm_migration::sea_query::Query::delete()
            .from_table(Publishers)
            .and_where(Expr::col(publishers::Column::Name).is_in(names))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
