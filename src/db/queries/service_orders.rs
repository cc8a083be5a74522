use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::service_orders::{
    EvidenceModel, NewEvidenceModel, NewServiceOrderModel, NewSignatureModel, ServiceOrderModel,
    ServiceOrderUpdate, SignatureModel,
};

const ORDER_COLUMNS: &str = "id, numero_orden, conservador_id, proveedor_id, tipo, estado, fecha_solicitud, \
    fecha_programada, fecha_inicio, fecha_fin, descripcion_problema, diagnostico, trabajo_realizado, \
    materiales_utilizados, costo_materiales, costo_mano_obra, costo_total, numero_factura, fecha_factura, \
    uuid_factura, pdf_factura_url, xml_factura_url, notas_internas, created_at, updated_at";

/// Service orders, newest request first, optionally for one unit
pub async fn get_service_orders(
    pool: &PgPool,
    conservador_id: Option<Uuid>,
) -> Result<Vec<ServiceOrderModel>, sqlx::Error> {
    sqlx::query_as::<_, ServiceOrderModel>(&format!(
        r#"
        SELECT {ORDER_COLUMNS}
        FROM ordenes_servicio
        WHERE $1::uuid IS NULL OR conservador_id = $1
        ORDER BY fecha_solicitud DESC
        "#
    ))
    .bind(conservador_id)
    .fetch_all(pool)
    .await
}

pub async fn get_service_order_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ServiceOrderModel>, sqlx::Error> {
    sqlx::query_as::<_, ServiceOrderModel>(&format!("SELECT {ORDER_COLUMNS} FROM ordenes_servicio WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Order numbers starting with `prefix`, used to sequence the next one
pub async fn get_order_numbers_with_prefix(
    tx: &mut Transaction<'_, Postgres>,
    prefix: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT numero_orden FROM ordenes_servicio WHERE numero_orden LIKE $1")
        .bind(format!("{prefix}%"))
        .fetch_all(&mut **tx)
        .await
}

/// Serializes order number generation across concurrent writers
pub async fn lock_order_numbers(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("LOCK TABLE ordenes_servicio IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_service_order(
    tx: &mut Transaction<'_, Postgres>,
    numero_orden: &str,
    order: &NewServiceOrderModel,
    costo_total: Option<Decimal>,
) -> Result<ServiceOrderModel, sqlx::Error> {
    sqlx::query_as::<_, ServiceOrderModel>(&format!(
        r#"
        INSERT INTO ordenes_servicio (
            numero_orden, conservador_id, proveedor_id, tipo, estado, fecha_solicitud,
            fecha_programada, descripcion_problema, costo_materiales, costo_mano_obra,
            costo_total, notas_internas
        )
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()), $7, $8, $9, $10, $11, $12)
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(numero_orden)
    .bind(order.conservador_id)
    .bind(order.proveedor_id)
    .bind(order.tipo)
    .bind(order.estado)
    .bind(order.fecha_solicitud)
    .bind(order.fecha_programada)
    .bind(&order.descripcion_problema)
    .bind(order.costo_materiales)
    .bind(order.costo_mano_obra)
    .bind(costo_total)
    .bind(&order.notas_internas)
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_service_order(
    pool: &PgPool,
    id: Uuid,
    update: &ServiceOrderUpdate,
) -> Result<Option<ServiceOrderModel>, sqlx::Error> {
    sqlx::query_as::<_, ServiceOrderModel>(&format!(
        r#"
        UPDATE ordenes_servicio SET
            tipo = COALESCE($2, tipo),
            estado = COALESCE($3, estado),
            fecha_programada = COALESCE($4, fecha_programada),
            fecha_inicio = COALESCE($5, fecha_inicio),
            fecha_fin = COALESCE($6, fecha_fin),
            descripcion_problema = COALESCE($7, descripcion_problema),
            diagnostico = COALESCE($8, diagnostico),
            trabajo_realizado = COALESCE($9, trabajo_realizado),
            materiales_utilizados = COALESCE($10, materiales_utilizados),
            costo_materiales = COALESCE($11, costo_materiales),
            costo_mano_obra = COALESCE($12, costo_mano_obra),
            costo_total = COALESCE($13, costo_total),
            numero_factura = COALESCE($14, numero_factura),
            fecha_factura = COALESCE($15, fecha_factura),
            uuid_factura = COALESCE($16, uuid_factura),
            pdf_factura_url = COALESCE($17, pdf_factura_url),
            xml_factura_url = COALESCE($18, xml_factura_url),
            notas_internas = COALESCE($19, notas_internas),
            updated_at = now()
        WHERE id = $1
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.tipo)
    .bind(update.estado)
    .bind(update.fecha_programada)
    .bind(update.fecha_inicio)
    .bind(update.fecha_fin)
    .bind(&update.descripcion_problema)
    .bind(&update.diagnostico)
    .bind(&update.trabajo_realizado)
    .bind(&update.materiales_utilizados)
    .bind(update.costo_materiales)
    .bind(update.costo_mano_obra)
    .bind(update.total_cost())
    .bind(&update.numero_factura)
    .bind(update.fecha_factura)
    .bind(&update.uuid_factura)
    .bind(&update.pdf_factura_url)
    .bind(&update.xml_factura_url)
    .bind(&update.notas_internas)
    .fetch_optional(pool)
    .await
}

pub async fn delete_service_order(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ordenes_servicio WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_evidence(pool: &PgPool, evidence: &NewEvidenceModel) -> Result<EvidenceModel, sqlx::Error> {
    sqlx::query_as::<_, EvidenceModel>(
        r#"
        INSERT INTO evidencias_servicio (orden_servicio_id, tipo, url, descripcion)
        VALUES ($1, $2, $3, $4)
        RETURNING id, orden_servicio_id, tipo, url, descripcion, created_at
        "#,
    )
    .bind(evidence.orden_servicio_id)
    .bind(&evidence.tipo)
    .bind(&evidence.url)
    .bind(&evidence.descripcion)
    .fetch_one(pool)
    .await
}

pub async fn get_evidence_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<EvidenceModel>, sqlx::Error> {
    sqlx::query_as::<_, EvidenceModel>(
        r#"
        SELECT id, orden_servicio_id, tipo, url, descripcion, created_at
        FROM evidencias_servicio
        WHERE orden_servicio_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_signature(pool: &PgPool, signature: &NewSignatureModel) -> Result<SignatureModel, sqlx::Error> {
    sqlx::query_as::<_, SignatureModel>(
        r#"
        INSERT INTO firmas_conformidad (orden_servicio_id, nombre_firmante, cargo_firmante, firma_url, fecha_firma)
        VALUES ($1, $2, $3, $4, COALESCE($5, now()))
        RETURNING id, orden_servicio_id, nombre_firmante, cargo_firmante, firma_url, fecha_firma, created_at
        "#,
    )
    .bind(signature.orden_servicio_id)
    .bind(&signature.nombre_firmante)
    .bind(&signature.cargo_firmante)
    .bind(&signature.firma_url)
    .bind(signature.fecha_firma)
    .fetch_one(pool)
    .await
}

pub async fn get_signatures_for_order(pool: &PgPool, order_id: Uuid) -> Result<Vec<SignatureModel>, sqlx::Error> {
    sqlx::query_as::<_, SignatureModel>(
        r#"
        SELECT id, orden_servicio_id, nombre_firmante, cargo_firmante, firma_url, fecha_firma, created_at
        FROM firmas_conformidad
        WHERE orden_servicio_id = $1
        ORDER BY fecha_firma ASC
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}
