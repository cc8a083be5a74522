use sqlx::{
    Executor,
    postgres::PgPool,
};

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(include_str!("enums.sql")).await?;
    pool.execute(include_str!("clientes.sql")).await?;
    pool.execute(include_str!("conservadores.sql")).await?;
    pool.execute(include_str!("productividad.sql")).await?;
    pool.execute(include_str!("ventas.sql")).await?;
    pool.execute(include_str!("mantenimientos.sql")).await?;
    pool.execute(include_str!("proveedores_servicio.sql")).await?;
    pool.execute(include_str!("ordenes_servicio.sql")).await?;

    // Sales are always read per unit over a recent date range
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_ventas_conservador_fecha
        ON ventas(conservador_id, fecha DESC);
        "#
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_ordenes_servicio_created_at
        ON ordenes_servicio(created_at);
        "#
    )
    .execute(pool)
    .await?;

    Ok(())
}
