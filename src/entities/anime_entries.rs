use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub anime_title: Option<String>,
    /// Lower-cased title used by the title filter.
    pub anime_title_folded: Option<String>,
    /// Calendar date stored as `YYYY-MM-DD` text so substring filters apply.
    pub date: Option<String>,
    pub rating: Option<String>,
    pub title_image: Option<String>,
    pub style: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub show_summary: Option<String>,
    pub num_of_seasons: Option<i32>,
    pub stars: Option<i32>,
    pub publisher_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publishers::Entity",
        from = "Column::PublisherId",
        to = "super::publishers::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Publishers,
}

impl Related<super::publishers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publishers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
