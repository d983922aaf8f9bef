pub use super::anime_entries::Entity as AnimeEntries;
pub use super::publishers::Entity as Publishers;
