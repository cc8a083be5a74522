use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::providers::{NewProviderModel, ProviderModel, ProviderUpdate};

const PROVIDER_COLUMNS: &str = "id, razon_social, rfc, regimen_fiscal, direccion_fiscal, telefono, email, \
    contacto_nombre, notas, created_at, updated_at";

/// Fetch all service providers ordered by legal name
pub async fn get_all_providers(pool: &PgPool) -> Result<Vec<ProviderModel>, sqlx::Error> {
    sqlx::query_as::<_, ProviderModel>(&format!(
        "SELECT {PROVIDER_COLUMNS} FROM proveedores_servicio ORDER BY razon_social ASC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn insert_provider(pool: &PgPool, provider: &NewProviderModel) -> Result<ProviderModel, sqlx::Error> {
    sqlx::query_as::<_, ProviderModel>(&format!(
        r#"
        INSERT INTO proveedores_servicio (
            razon_social, rfc, regimen_fiscal, direccion_fiscal,
            telefono, email, contacto_nombre, notas
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {PROVIDER_COLUMNS}
        "#
    ))
    .bind(&provider.razon_social)
    .bind(&provider.rfc)
    .bind(&provider.regimen_fiscal)
    .bind(&provider.direccion_fiscal)
    .bind(&provider.telefono)
    .bind(&provider.email)
    .bind(&provider.contacto_nombre)
    .bind(&provider.notas)
    .fetch_one(pool)
    .await
}

pub async fn update_provider(
    pool: &PgPool,
    id: Uuid,
    update: &ProviderUpdate,
) -> Result<Option<ProviderModel>, sqlx::Error> {
    sqlx::query_as::<_, ProviderModel>(&format!(
        r#"
        UPDATE proveedores_servicio SET
            razon_social = COALESCE($2, razon_social),
            rfc = COALESCE($3, rfc),
            regimen_fiscal = COALESCE($4, regimen_fiscal),
            direccion_fiscal = COALESCE($5, direccion_fiscal),
            telefono = COALESCE($6, telefono),
            email = COALESCE($7, email),
            contacto_nombre = COALESCE($8, contacto_nombre),
            notas = COALESCE($9, notas),
            updated_at = now()
        WHERE id = $1
        RETURNING {PROVIDER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.razon_social)
    .bind(&update.rfc)
    .bind(&update.regimen_fiscal)
    .bind(&update.direccion_fiscal)
    .bind(&update.telefono)
    .bind(&update.email)
    .bind(&update.contacto_nombre)
    .bind(&update.notas)
    .fetch_optional(pool)
    .await
}

pub async fn delete_provider(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM proveedores_servicio WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
