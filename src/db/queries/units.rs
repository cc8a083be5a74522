use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::units::{NewUnitModel, UnitModel, UnitSnapshotRow, UnitStatus, UnitUpdate};

const UNIT_COLUMNS: &str =
    "id, numero_serie, modelo, capacidad, status, cliente_id, qr_code, notas, created_at, updated_at";

/// Fetch all units, newest first
pub async fn get_all_units(pool: &PgPool) -> Result<Vec<UnitModel>, sqlx::Error> {
    sqlx::query_as::<_, UnitModel>(&format!(
        "SELECT {UNIT_COLUMNS} FROM conservadores ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_units_by_status(pool: &PgPool, status: UnitStatus) -> Result<Vec<UnitModel>, sqlx::Error> {
    sqlx::query_as::<_, UnitModel>(&format!(
        "SELECT {UNIT_COLUMNS} FROM conservadores WHERE status = $1 ORDER BY created_at DESC"
    ))
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Ids of units not in `status`, read straight from the table
pub async fn get_unit_ids_excluding_status(pool: &PgPool, status: UnitStatus) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM conservadores WHERE status <> $1 ORDER BY created_at ASC")
        .bind(status)
        .fetch_all(pool)
        .await
}

pub async fn get_unit_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UnitModel>, sqlx::Error> {
    sqlx::query_as::<_, UnitModel>(&format!("SELECT {UNIT_COLUMNS} FROM conservadores WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Unit joined with its productivity row; productivity columns are NULL when missing
pub async fn get_unit_snapshot(pool: &PgPool, id: Uuid) -> Result<Option<UnitSnapshotRow>, sqlx::Error> {
    sqlx::query_as::<_, UnitSnapshotRow>(
        r#"
        SELECT c.id, c.capacidad, c.status,
               p.ocupacion_promedio, p.rotacion_inventario,
               p.costos_mantenimiento, p.ingresos_generados
        FROM conservadores c
        LEFT JOIN productividad p ON p.conservador_id = c.id
        WHERE c.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_unit(pool: &PgPool, unit: &NewUnitModel) -> Result<UnitModel, sqlx::Error> {
    sqlx::query_as::<_, UnitModel>(&format!(
        r#"
        INSERT INTO conservadores (numero_serie, modelo, capacidad, status, cliente_id, qr_code, notas)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {UNIT_COLUMNS}
        "#
    ))
    .bind(&unit.numero_serie)
    .bind(&unit.modelo)
    .bind(unit.capacidad)
    .bind(unit.status)
    .bind(unit.cliente_id)
    .bind(&unit.qr_code)
    .bind(&unit.notas)
    .fetch_one(pool)
    .await
}

pub async fn update_unit(pool: &PgPool, id: Uuid, update: &UnitUpdate) -> Result<Option<UnitModel>, sqlx::Error> {
    sqlx::query_as::<_, UnitModel>(&format!(
        r#"
        UPDATE conservadores SET
            numero_serie = COALESCE($2, numero_serie),
            modelo = COALESCE($3, modelo),
            capacidad = COALESCE($4, capacidad),
            status = COALESCE($5, status),
            cliente_id = COALESCE($6, cliente_id),
            qr_code = COALESCE($7, qr_code),
            notas = COALESCE($8, notas),
            updated_at = now()
        WHERE id = $1
        RETURNING {UNIT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.numero_serie)
    .bind(&update.modelo)
    .bind(update.capacidad)
    .bind(update.status)
    .bind(update.cliente_id)
    .bind(&update.qr_code)
    .bind(&update.notas)
    .fetch_optional(pool)
    .await
}

/// Set status and note in one statement; returns whether the unit exists
pub async fn update_unit_status(pool: &PgPool, id: Uuid, status: UnitStatus, note: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE conservadores
        SET status = $2, notas = $3, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(note)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_unit(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM conservadores WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
