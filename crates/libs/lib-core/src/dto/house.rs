//! # House DTOs

use crate::model::store::HouseFilter;
use serde::Deserialize;

/// Query string for `GET /houses`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseListQuery {
    pub house_name: Option<String>,
    pub city: Option<String>,
}

impl From<HouseListQuery> for HouseFilter {
    fn from(query: HouseListQuery) -> Self {
        HouseFilter::new(query.house_name, query.city)
    }
}
