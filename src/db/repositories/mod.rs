pub mod entry;
pub mod publisher;
