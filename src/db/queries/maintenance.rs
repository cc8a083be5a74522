use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::maintenance::{MaintenanceModel, MaintenanceUpdate, NewMaintenanceModel};

const MAINTENANCE_COLUMNS: &str = "id, conservador_id, tipo_servicio, descripcion, fecha_programada, \
    fecha_realizado, costo, status, tecnico, notas, created_at, updated_at";

/// Maintenance records ordered by scheduled date, optionally for one unit
pub async fn get_maintenance(pool: &PgPool, conservador_id: Option<Uuid>) -> Result<Vec<MaintenanceModel>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceModel>(&format!(
        r#"
        SELECT {MAINTENANCE_COLUMNS}
        FROM mantenimientos
        WHERE $1::uuid IS NULL OR conservador_id = $1
        ORDER BY fecha_programada ASC NULLS LAST
        "#
    ))
    .bind(conservador_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_maintenance(pool: &PgPool, record: &NewMaintenanceModel) -> Result<MaintenanceModel, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceModel>(&format!(
        r#"
        INSERT INTO mantenimientos (
            conservador_id, tipo_servicio, descripcion, fecha_programada,
            fecha_realizado, costo, status, tecnico, notas
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {MAINTENANCE_COLUMNS}
        "#
    ))
    .bind(record.conservador_id)
    .bind(record.tipo_servicio)
    .bind(&record.descripcion)
    .bind(record.fecha_programada)
    .bind(record.fecha_realizado)
    .bind(record.costo)
    .bind(record.status)
    .bind(&record.tecnico)
    .bind(&record.notas)
    .fetch_one(pool)
    .await
}

pub async fn update_maintenance(
    pool: &PgPool,
    id: Uuid,
    update: &MaintenanceUpdate,
) -> Result<Option<MaintenanceModel>, sqlx::Error> {
    sqlx::query_as::<_, MaintenanceModel>(&format!(
        r#"
        UPDATE mantenimientos SET
            tipo_servicio = COALESCE($2, tipo_servicio),
            descripcion = COALESCE($3, descripcion),
            fecha_programada = COALESCE($4, fecha_programada),
            fecha_realizado = COALESCE($5, fecha_realizado),
            costo = COALESCE($6, costo),
            status = COALESCE($7, status),
            tecnico = COALESCE($8, tecnico),
            notas = COALESCE($9, notas),
            updated_at = now()
        WHERE id = $1
        RETURNING {MAINTENANCE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.tipo_servicio)
    .bind(&update.descripcion)
    .bind(update.fecha_programada)
    .bind(update.fecha_realizado)
    .bind(update.costo)
    .bind(update.status)
    .bind(&update.tecnico)
    .bind(&update.notas)
    .fetch_optional(pool)
    .await
}

pub async fn delete_maintenance(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM mantenimientos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
