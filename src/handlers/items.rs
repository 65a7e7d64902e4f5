use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use super::{parse_id, JsonBody};
use crate::{
    error::AppResult,
    models::{Item, Supplier},
    serializers, AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = state.store.list_items().await?;
    debug!(count = items.len(), "Listed items");
    Ok(Json(items))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_item(
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<(StatusCode, Json<Item>)> {
    let fields = serializers::item::validate(&body.value()?)?;
    let item = state.store.insert_item(&fields).await?;

    info!(id = item.id, name = %item.name, "Created item");
    Ok((StatusCode::CREATED, Json(item)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Item>> {
    let id = parse_id(&id, "Item")?;
    Ok(Json(state.store.fetch_item(id).await?))
}

// ── Replace ───────────────────────────────────────────────────────────────────

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> AppResult<Json<Item>> {
    let id = parse_id(&id, "Item")?;
    // A missing target is reported before any payload problem.
    state.store.fetch_item(id).await?;

    let fields = serializers::item::validate(&body.value()?)?;
    let item = state.store.update_item(id, &fields).await?;

    info!(id = item.id, name = %item.name, "Updated item");
    Ok(Json(item))
}

// ── Partial update ────────────────────────────────────────────────────────────

pub async fn partial_update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> AppResult<Json<Item>> {
    let id = parse_id(&id, "Item")?;
    let existing = state.store.fetch_item(id).await?;

    let fields = serializers::item::validate_patch(&body.value()?)?.apply(&existing);
    let item = state.store.update_item(id, &fields).await?;

    info!(id = item.id, name = %item.name, "Patched item");
    Ok(Json(item))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "Item")?;
    state.store.delete_item(id).await?;

    info!(id, "Deleted item");
    Ok(StatusCode::NO_CONTENT)
}

// ── Relations ─────────────────────────────────────────────────────────────────

pub async fn list_item_suppliers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Supplier>>> {
    let id = parse_id(&id, "Item")?;
    let suppliers = state.store.suppliers_for_item(id).await?;

    debug!(id, count = suppliers.len(), "Listed item suppliers");
    Ok(Json(suppliers))
}
