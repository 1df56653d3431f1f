//! Table inventory routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::table::{
    CreateTableRequest, ListTablesQuery, ListTablesResponse, UpdateTableRequest,
};
use domain::models::{RestaurantTable, TableStatus};
use persistence::repositories::{DeleteTableOutcome, TableRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;

/// List tables ordered by number.
///
/// GET /api/tables?status=
pub async fn list_tables(
    State(state): State<AppState>,
    _staff: StaffContext,
    Query(query): Query<ListTablesQuery>,
) -> Result<Json<ListTablesResponse>, ApiError> {
    let tables: Vec<RestaurantTable> = TableRepository::new(state.pool.clone())
        .list(query.status.map(Into::into))
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = tables.len();
    Ok(Json(ListTablesResponse { tables, total }))
}

/// Get a single table.
///
/// GET /api/tables/:id
pub async fn get_table(
    State(state): State<AppState>,
    _staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<RestaurantTable>, ApiError> {
    let table = TableRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Table not found".into()))?;

    Ok(Json(table.into()))
}

/// Add a table.
///
/// POST /api/tables
///
/// Requires manager or admin role. Duplicate numbers are rejected with 409.
pub async fn create_table(
    State(state): State<AppState>,
    staff: StaffContext,
    Json(request): Json<CreateTableRequest>,
) -> Result<(StatusCode, Json<RestaurantTable>), ApiError> {
    request.validate()?;

    let status = request.status.unwrap_or(TableStatus::Available);
    let table: RestaurantTable = TableRepository::new(state.pool.clone())
        .create(request.number, request.capacity, status.into())
        .await
        .map_err(|e| duplicate_number(e, request.number))?
        .into();

    info!(
        table_id = %table.id,
        number = table.number,
        capacity = table.capacity,
        employee_id = %staff.employee_id,
        "Table created"
    );

    Ok((StatusCode::CREATED, Json(table)))
}

/// Update a table's number, capacity or status.
///
/// PATCH /api/tables/:id
///
/// Requires manager or admin role.
pub async fn update_table(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTableRequest>,
) -> Result<Json<RestaurantTable>, ApiError> {
    request.validate()?;

    let table: RestaurantTable = TableRepository::new(state.pool.clone())
        .update(
            id,
            request.number,
            request.capacity,
            request.status.map(Into::into),
        )
        .await
        .map_err(|e| match request.number {
            Some(number) => duplicate_number(e, number),
            None => e.into(),
        })?
        .ok_or_else(|| ApiError::NotFound("Table not found".into()))?
        .into();

    info!(
        table_id = %id,
        status = %table.status,
        employee_id = %staff.employee_id,
        "Table updated"
    );

    Ok(Json(table))
}

/// Remove a table.
///
/// DELETE /api/tables/:id
///
/// Requires manager or admin role. Refused while an open reservation
/// references the table.
pub async fn delete_table(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match TableRepository::new(state.pool.clone()).delete(id).await? {
        DeleteTableOutcome::Deleted => {
            info!(table_id = %id, employee_id = %staff.employee_id, "Table deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteTableOutcome::NotFound => Err(ApiError::NotFound("Table not found".into())),
        DeleteTableOutcome::InUse(count) => Err(ApiError::Conflict(format!(
            "Table is assigned to {} open reservation(s)",
            count
        ))),
    }
}

fn duplicate_number(err: sqlx::Error, number: i32) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            ApiError::Conflict(format!("Table number {} already exists", number))
        }
        _ => err.into(),
    }
}
