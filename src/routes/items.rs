use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
    pub total: usize,
}

#[derive(Default)]
struct Inventory {
    next_id: u64,
    items: BTreeMap<u64, Item>,
}

/// In-memory item storage shared by the item controllers.
#[derive(Clone, Default)]
pub struct ItemStore {
    inner: Arc<RwLock<Inventory>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, name: String, price: f64) -> Item {
        let mut inventory = self.inner.write().await;
        inventory.next_id += 1;
        let item = Item {
            id: inventory.next_id,
            name,
            price,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        inventory.items.insert(item.id, item.clone());
        item
    }

    pub async fn get(&self, id: u64) -> Option<Item> {
        self.inner.read().await.items.get(&id).cloned()
    }

    pub async fn list(&self, name_filter: Option<&str>) -> Vec<Item> {
        let inventory = self.inner.read().await;
        inventory
            .items
            .values()
            .filter(|item| name_filter.map_or(true, |needle| item.name.contains(needle)))
            .cloned()
            .collect()
    }

    pub async fn remove(&self, id: u64) -> Option<Item> {
        self.inner.write().await.items.remove(&id)
    }
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Json<ItemListResponse> {
    let items = state.items.list(query.name.as_deref()).await;
    Json(ItemListResponse {
        total: items.len(),
        items,
    })
}

pub async fn get_item(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Json<Item>> {
    state
        .items
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("item {id} not found")))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(ApiError::BadRequest("price must be a non-negative number".to_string()));
    }

    let item = state.items.insert(payload.name, payload.price).await;
    debug!(id = item.id, "Item created");

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn delete_item(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    state
        .items
        .remove(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::NotFound(format!("item {id} not found")))
}
