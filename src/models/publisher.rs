use serde::{Deserialize, Serialize};

use crate::entities::publishers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl From<publishers::Model> for Publisher {
    fn from(model: publishers::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
            city: model.city,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublisherFilter {
    pub name: Option<String>,
}
