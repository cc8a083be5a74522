use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::productivity::{NewProductivityModel, ProductivityModel};

pub async fn get_productivity(pool: &PgPool, conservador_id: Uuid) -> Result<Option<ProductivityModel>, sqlx::Error> {
    sqlx::query_as::<_, ProductivityModel>(
        r#"
        SELECT conservador_id, ocupacion_promedio, rotacion_inventario,
               costos_mantenimiento, ingresos_generados, ventas_mensuales, ultima_actualizacion
        FROM productividad
        WHERE conservador_id = $1
        "#,
    )
    .bind(conservador_id)
    .fetch_optional(pool)
    .await
}

/// Insert or replace the productivity snapshot of a unit
pub async fn upsert_productivity(pool: &PgPool, snapshot: &NewProductivityModel) -> Result<ProductivityModel, sqlx::Error> {
    sqlx::query_as::<_, ProductivityModel>(
        r#"
        INSERT INTO productividad (
            conservador_id, ocupacion_promedio, rotacion_inventario,
            costos_mantenimiento, ingresos_generados, ventas_mensuales, ultima_actualizacion
        )
        VALUES ($1, $2, $3, $4, $5, $6, now())
        ON CONFLICT (conservador_id) DO UPDATE SET
            ocupacion_promedio = EXCLUDED.ocupacion_promedio,
            rotacion_inventario = EXCLUDED.rotacion_inventario,
            costos_mantenimiento = EXCLUDED.costos_mantenimiento,
            ingresos_generados = EXCLUDED.ingresos_generados,
            ventas_mensuales = EXCLUDED.ventas_mensuales,
            ultima_actualizacion = EXCLUDED.ultima_actualizacion
        RETURNING conservador_id, ocupacion_promedio, rotacion_inventario,
                  costos_mantenimiento, ingresos_generados, ventas_mensuales, ultima_actualizacion
        "#,
    )
    .bind(snapshot.conservador_id)
    .bind(snapshot.ocupacion_promedio)
    .bind(snapshot.rotacion_inventario)
    .bind(snapshot.costos_mantenimiento)
    .bind(snapshot.ingresos_generados)
    .bind(snapshot.ventas_mensuales)
    .fetch_one(pool)
    .await
}
