pub mod prelude;

pub mod anime_entries;
pub mod publishers;
