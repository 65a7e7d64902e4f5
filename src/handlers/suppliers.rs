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

pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = state.store.list_suppliers().await?;
    debug!(count = suppliers.len(), "Listed suppliers");
    Ok(Json(suppliers))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_supplier(
    State(state): State<AppState>,
    body: JsonBody,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let fields = serializers::supplier::validate(&body.value()?, state.store.as_ref()).await?;
    let supplier = state.store.insert_supplier(&fields).await?;

    info!(
        id = supplier.id,
        name = %supplier.name,
        items = supplier.items.len(),
        "Created supplier"
    );
    Ok((StatusCode::CREATED, Json(supplier)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    let id = parse_id(&id, "Supplier")?;
    Ok(Json(state.store.fetch_supplier(id).await?))
}

// ── Replace ───────────────────────────────────────────────────────────────────

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> AppResult<Json<Supplier>> {
    let id = parse_id(&id, "Supplier")?;
    state.store.fetch_supplier(id).await?;

    let fields = serializers::supplier::validate(&body.value()?, state.store.as_ref()).await?;
    let supplier = state.store.update_supplier(id, &fields).await?;

    info!(
        id = supplier.id,
        name = %supplier.name,
        items = supplier.items.len(),
        "Updated supplier"
    );
    Ok(Json(supplier))
}

// ── Partial update ────────────────────────────────────────────────────────────

pub async fn partial_update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> AppResult<Json<Supplier>> {
    let id = parse_id(&id, "Supplier")?;
    let existing = state.store.fetch_supplier(id).await?;

    let fields = serializers::supplier::validate_patch(&body.value()?, state.store.as_ref())
        .await?
        .apply(&existing);
    let supplier = state.store.update_supplier(id, &fields).await?;

    info!(id = supplier.id, name = %supplier.name, "Patched supplier");
    Ok(Json(supplier))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "Supplier")?;
    state.store.delete_supplier(id).await?;

    info!(id, "Deleted supplier");
    Ok(StatusCode::NO_CONTENT)
}

// ── Relations ─────────────────────────────────────────────────────────────────

pub async fn list_supplier_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Item>>> {
    let id = parse_id(&id, "Supplier")?;
    let items = state.store.items_for_supplier(id).await?;

    debug!(id, count = items.len(), "Listed supplier items");
    Ok(Json(items))
}
