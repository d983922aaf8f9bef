use crate::db::query::{EntryQuery, search_key};
use crate::domain::EntryId;
use crate::entities::{anime_entries, prelude::*, publishers};
use crate::models::entry::{EntryRow, EntryUpdate, NewEntry, WriteAck};
use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait, Select, Set,
};
use tracing::{debug, info};

pub struct EntryRepository {
    conn: DatabaseConnection,
}

impl EntryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Entry columns plus the denormalised publisher, inner-joined so rows
    /// without a resolvable publisher are left out.
    fn joined() -> Select<AnimeEntries> {
        AnimeEntries::find()
            .select_only()
            .column_as(anime_entries::Column::Id, "anime_id")
            .column(anime_entries::Column::AnimeTitle)
            .column(anime_entries::Column::Date)
            .column(anime_entries::Column::Rating)
            .column(anime_entries::Column::TitleImage)
            .column(anime_entries::Column::Style)
            .column(anime_entries::Column::ShowSummary)
            .column(anime_entries::Column::NumOfSeasons)
            .column(anime_entries::Column::Stars)
            .column_as(publishers::Column::Id, "publisher_id")
            .column_as(publishers::Column::Name, "publisher_name")
            .column(publishers::Column::Country)
            .column(publishers::Column::City)
            .join(JoinType::InnerJoin, anime_entries::Relation::Publishers.def())
    }

    pub async fn list(&self, query: &EntryQuery) -> Result<Vec<EntryRow>> {
        debug!(
            predicates = ?query.predicates,
            sort = query.sort.as_str(),
            limit = ?query.limit,
            "Listing catalog entries"
        );

        let rows = query
            .apply(Self::joined())
            .into_model::<EntryRow>()
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: EntryId) -> Result<Option<EntryRow>> {
        debug!(id = %id, "Fetching catalog entry");

        let row = Self::joined()
            .filter(anime_entries::Column::Id.eq(id.value()))
            .into_model::<EntryRow>()
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn create(&self, entry: &NewEntry) -> Result<WriteAck> {
        let active_model = anime_entries::ActiveModel {
            anime_title: Set(Some(entry.anime_title.clone())),
            anime_title_folded: Set(Some(search_key(&entry.anime_title))),
            date: Set(Some(entry.date.clone())),
            rating: Set(Some(entry.rating.as_str().to_string())),
            title_image: Set(Some(entry.title_image.clone())),
            style: Set(Some(entry.style.clone())),
            show_summary: Set(Some(entry.show_summary.clone())),
            num_of_seasons: Set(Some(entry.num_of_seasons)),
            stars: Set(Some(entry.stars)),
            publisher_id: Set(entry.publisher_id.value()),
            ..Default::default()
        };

        let result = AnimeEntries::insert(active_model).exec(&self.conn).await?;

        info!(
            id = result.last_insert_id,
            title = %entry.anime_title,
            "Created catalog entry"
        );
        Ok(WriteAck::inserted(result.last_insert_id))
    }

    /// Overwrites every editable column; `None` fields are written as NULL.
    /// The publisher reference is left as it is.
    pub async fn update(&self, id: EntryId, update: &EntryUpdate) -> Result<WriteAck> {
        debug!(id = %id, update = ?update, "Updating catalog entry");

        let result = AnimeEntries::update_many()
            .col_expr(
                anime_entries::Column::AnimeTitle,
                Expr::value(update.anime_title.clone()),
            )
            .col_expr(
                anime_entries::Column::AnimeTitleFolded,
                Expr::value(update.anime_title.as_deref().map(search_key)),
            )
            .col_expr(anime_entries::Column::Date, Expr::value(update.date.clone()))
            .col_expr(
                anime_entries::Column::Rating,
                Expr::value(update.rating.map(|r| r.as_str().to_string())),
            )
            .col_expr(
                anime_entries::Column::TitleImage,
                Expr::value(update.title_image.clone()),
            )
            .col_expr(anime_entries::Column::Style, Expr::value(update.style.clone()))
            .col_expr(
                anime_entries::Column::ShowSummary,
                Expr::value(update.show_summary.clone()),
            )
            .col_expr(
                anime_entries::Column::NumOfSeasons,
                Expr::value(update.num_of_seasons),
            )
            .col_expr(anime_entries::Column::Stars, Expr::value(update.stars))
            .filter(anime_entries::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!(id = %id, "Updated catalog entry");
        }
        Ok(WriteAck::affected(result.rows_affected))
    }

    pub async fn delete(&self, id: EntryId) -> Result<WriteAck> {
        let result = AnimeEntries::delete_by_id(id.value())
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!(id = %id, "Deleted catalog entry");
        }
        Ok(WriteAck::affected(result.rows_affected))
    }
}
