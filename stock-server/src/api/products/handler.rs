//! Product API Handlers

use axum::{Extension, extract::State, http::StatusCode};
use shared::models::{BranchKey, Product, ProductCreate, ProductUpdate};

use crate::activity::{self, Action};
use crate::api::BranchQuery;
use crate::api::extract::{Json, Path, Query};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::RepoError;
use crate::db::repository::product::{self, ProductWrite};
use crate::inventory::{self, ProductFields};
use crate::utils::{AppError, AppResult, ErrorCode};

fn product_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("id", id)
}

/// Row vanished between read and write
fn or_not_found(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound(_) => product_not_found(id),
        other => other.into(),
    }
}

fn write(fields: &ProductFields) -> ProductWrite<'_> {
    ProductWrite {
        name: &fields.name,
        category: &fields.category,
        price: fields.price,
        quantities: fields.quantities,
    }
}

async fn find(state: &ServerState, key: &BranchKey, id: i64) -> AppResult<Product> {
    product::find_by_id(&state.pool, key, id)
        .await?
        .ok_or_else(|| product_not_found(id))
}

/// GET /api/products?branch= - 门店商品列表
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let branch = state.branches.resolve_for(query.branch.as_deref(), &current)?;
    let products = product::find_all(&state.pool, &branch.key).await?;
    Ok(Json(products))
}

/// GET /api/products/:id?branch=
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<Product>> {
    let branch = state.branches.resolve_for(query.branch.as_deref(), &current)?;
    Ok(Json(find(&state, &branch.key, id).await?))
}

/// POST /api/products?branch= - 创建商品 (`current` 由服务端推导)
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<BranchQuery>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let branch = state.branches.resolve_for(query.branch.as_deref(), &current)?;
    let fields = inventory::prepare_create(payload)?;
    inventory::warn_if_overdrawn(branch.key.as_str(), &fields.name, &fields.quantities);

    let created = product::create(&state.pool, &branch.key, write(&fields)).await?;

    activity::record(
        &state.pool,
        &current,
        Action::ProductAdded {
            branch: branch.name.clone(),
            name: created.name.clone(),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/products/:id?branch= - 更新商品
///
/// 非管理员只能修改 `delivered` 与 `use`。
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<BranchQuery>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let branch = state.branches.resolve_for(query.branch.as_deref(), &current)?;
    let existing = find(&state, &branch.key, id).await?;

    let fields = inventory::prepare_update(&existing, payload, &current.role)?;
    inventory::warn_if_overdrawn(branch.key.as_str(), &fields.name, &fields.quantities);

    let updated = product::update(&state.pool, &branch.key, id, write(&fields))
        .await
        .map_err(or_not_found(id))?;

    activity::record(
        &state.pool,
        &current,
        Action::ProductUpdated {
            branch: branch.name.clone(),
            name: updated.name.clone(),
        },
    )
    .await;

    Ok(Json(updated))
}

/// DELETE /api/products/:id?branch=
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<Product>> {
    let branch = state.branches.resolve_for(query.branch.as_deref(), &current)?;
    let existing = find(&state, &branch.key, id).await?;

    let removed = product::delete(&state.pool, &branch.key, existing.id)
        .await
        .map_err(or_not_found(id))?;

    activity::record(
        &state.pool,
        &current,
        Action::ProductDeleted {
            branch: branch.name.clone(),
            name: removed.name.clone(),
        },
    )
    .await;

    Ok(Json(removed))
}
