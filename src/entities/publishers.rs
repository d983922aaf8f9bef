use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "publishers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub name_folded: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::anime_entries::Entity")]
    AnimeEntries,
}

impl Related<super::anime_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnimeEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
