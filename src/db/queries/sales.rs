use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::sales::{NewSaleModel, SaleModel};

pub async fn insert_sale(pool: &PgPool, sale: &NewSaleModel) -> Result<SaleModel, sqlx::Error> {
    sqlx::query_as::<_, SaleModel>(
        r#"
        INSERT INTO ventas (conservador_id, fecha, cantidad)
        VALUES ($1, $2, $3)
        RETURNING id, conservador_id, fecha, cantidad, created_at
        "#,
    )
    .bind(sale.conservador_id)
    .bind(sale.fecha)
    .bind(sale.cantidad)
    .fetch_one(pool)
    .await
}

/// Sales of one unit dated at or after `since`, newest first
pub async fn get_sales_since(
    pool: &PgPool,
    conservador_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<SaleModel>, sqlx::Error> {
    sqlx::query_as::<_, SaleModel>(
        r#"
        SELECT id, conservador_id, fecha, cantidad, created_at
        FROM ventas
        WHERE conservador_id = $1 AND fecha >= $2
        ORDER BY fecha DESC
        "#,
    )
    .bind(conservador_id)
    .bind(since)
    .fetch_all(pool)
    .await
}
