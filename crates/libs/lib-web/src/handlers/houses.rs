//! # House Handlers

use axum::extract::{Json, Path, Query, State};
use lib_core::dto::{DeleteResult, HouseListQuery, InsertResult, UpdateResult};
use lib_core::model::store::{
    parse_object_id, Fields, House, HouseFilter, HouseForCreate, HouseForUpdate,
};
use lib_core::{HouseStore, Result};
use lib_utils::now_utc;
use std::sync::Arc;
use tracing::{debug, info};

/// `POST /houses` - store the submitted listing with a `createdAt` stamp.
pub async fn create_house(
    State(houses): State<Arc<dyn HouseStore>>,
    Json(fields): Json<Fields>,
) -> Result<Json<InsertResult>> {
    let result = houses
        .insert_house(HouseForCreate::new(fields, now_utc()))
        .await?;
    info!("[HOUSES] Created house {}", result.inserted_id);
    Ok(Json(result))
}

/// `GET /houses?houseName=&city=`
pub async fn list_houses(
    State(houses): State<Arc<dyn HouseStore>>,
    Query(query): Query<HouseListQuery>,
) -> Result<Json<Vec<House>>> {
    let filter = HouseFilter::from(query);
    let found = houses.list_houses(&filter).await?;
    debug!("[HOUSES] {:?} matched {} houses", filter, found.len());
    Ok(Json(found))
}

/// `GET /houses/{id}` - the house, or `null`.
pub async fn get_house(
    State(houses): State<Arc<dyn HouseStore>>,
    Path(id): Path<String>,
) -> Result<Json<Option<House>>> {
    let id = parse_object_id(&id)?;
    houses.find_house(id).await.map(Json)
}

/// `PUT /houses/{id}` - replace the listing fields, creating the house if needed.
pub async fn update_house(
    State(houses): State<Arc<dyn HouseStore>>,
    Path(id): Path<String>,
    Json(fields): Json<Fields>,
) -> Result<Json<UpdateResult>> {
    let id = parse_object_id(&id)?;
    let result = houses
        .upsert_house(id, HouseForUpdate::from_submission(&fields))
        .await?;
    info!(
        "[HOUSES] Updated house {} (matched {}, upserted {})",
        id, result.matched_count, result.upserted_count
    );
    Ok(Json(result))
}

/// `DELETE /houses/{id}`
pub async fn delete_house(
    State(houses): State<Arc<dyn HouseStore>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id = parse_object_id(&id)?;
    houses.delete_house(id).await.map(Json)
}
