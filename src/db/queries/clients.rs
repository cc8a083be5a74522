use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::clients::{ClientModel, ClientUpdate, NewClientModel};

const CLIENT_COLUMNS: &str = "id, nombre, rfc, direccion, telefono, email, created_at, updated_at";

/// Fetch all clients, newest first
pub async fn get_all_clients(pool: &PgPool) -> Result<Vec<ClientModel>, sqlx::Error> {
    sqlx::query_as::<_, ClientModel>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clientes ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn get_client_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ClientModel>, sqlx::Error> {
    sqlx::query_as::<_, ClientModel>(&format!("SELECT {CLIENT_COLUMNS} FROM clientes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_client(pool: &PgPool, client: &NewClientModel) -> Result<ClientModel, sqlx::Error> {
    sqlx::query_as::<_, ClientModel>(&format!(
        r#"
        INSERT INTO clientes (nombre, rfc, direccion, telefono, email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CLIENT_COLUMNS}
        "#
    ))
    .bind(&client.nombre)
    .bind(&client.rfc)
    .bind(&client.direccion)
    .bind(&client.telefono)
    .bind(&client.email)
    .fetch_one(pool)
    .await
}

pub async fn update_client(pool: &PgPool, id: Uuid, update: &ClientUpdate) -> Result<Option<ClientModel>, sqlx::Error> {
    sqlx::query_as::<_, ClientModel>(&format!(
        r#"
        UPDATE clientes SET
            nombre = COALESCE($2, nombre),
            rfc = COALESCE($3, rfc),
            direccion = COALESCE($4, direccion),
            telefono = COALESCE($5, telefono),
            email = COALESCE($6, email),
            updated_at = now()
        WHERE id = $1
        RETURNING {CLIENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.nombre)
    .bind(&update.rfc)
    .bind(&update.direccion)
    .bind(&update.telefono)
    .bind(&update.email)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted
pub async fn delete_client(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
