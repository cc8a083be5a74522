use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::connection;
use super::schema;
use super::queries::{
    clients as clients_queries,
    units as units_queries,
    productivity as productivity_queries,
    sales as sales_queries,
    maintenance as maintenance_queries,
    providers as providers_queries,
    service_orders as service_orders_queries,
};
use super::models::{
    clients::{ClientModel, ClientUpdate, NewClientModel},
    units::{NewUnitModel, UnitModel, UnitStatus, UnitUpdate},
    productivity::{NewProductivityModel, ProductivityModel},
    sales::{NewSaleModel, SaleModel},
    maintenance::{MaintenanceModel, MaintenanceUpdate, NewMaintenanceModel},
    providers::{NewProviderModel, ProviderModel, ProviderUpdate},
    service_orders::{
        self, EvidenceModel, NewEvidenceModel, NewServiceOrderModel, NewSignatureModel,
        ServiceOrderDetail, ServiceOrderModel, ServiceOrderUpdate, SignatureModel,
    },
};
use crate::cache::ListCache;
use crate::config::Config;
use crate::error::FleetError;
use crate::repository::{SaleRecord, UnitMetricsRepository, UnitSnapshot, UnitStatusUpdate};

/// Entry point to the fleet database.
///
/// List results are cached per filter key and every mutation of an entity
/// invalidates all cached lists of that entity.
pub struct DbManager {
    pub pool: PgPool,
    clients_cache: ListCache<(), ClientModel>,
    units_cache: ListCache<Option<UnitStatus>, UnitModel>,
    maintenance_cache: ListCache<Option<Uuid>, MaintenanceModel>,
    providers_cache: ListCache<(), ProviderModel>,
    orders_cache: ListCache<Option<Uuid>, ServiceOrderModel>,
}

impl DbManager {
    /// Creates a new database connection and initializes the schema
    pub async fn init(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;

        // Ensure schema is initialized (creates tables if needed)
        schema::init_schema(&pool).await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            clients_cache: ListCache::new(),
            units_cache: ListCache::new(),
            maintenance_cache: ListCache::new(),
            providers_cache: ListCache::new(),
            orders_cache: ListCache::new(),
        }
    }

    // --- Clients ---

    pub async fn list_clients(&self) -> Result<Arc<Vec<ClientModel>>, FleetError> {
        Ok(self
            .clients_cache
            .get_or_load((), || clients_queries::get_all_clients(&self.pool))
            .await?)
    }

    pub async fn get_client(&self, id: Uuid) -> Result<ClientModel, FleetError> {
        clients_queries::get_client_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| FleetError::not_found("cliente", id))
    }

    pub async fn create_client(&self, client: &NewClientModel) -> Result<ClientModel, FleetError> {
        client.validate()?;
        let created = clients_queries::insert_client(&self.pool, client).await?;
        self.clients_cache.invalidate().await;
        info!(client_id = %created.id, nombre = %created.nombre, "Client created");
        Ok(created)
    }

    pub async fn update_client(&self, id: Uuid, update: &ClientUpdate) -> Result<ClientModel, FleetError> {
        update.validate()?;
        let updated = clients_queries::update_client(&self.pool, id, update)
            .await?
            .ok_or_else(|| FleetError::not_found("cliente", id))?;
        self.clients_cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<(), FleetError> {
        if !clients_queries::delete_client(&self.pool, id).await? {
            return Err(FleetError::not_found("cliente", id));
        }
        self.clients_cache.invalidate().await;
        // Units keep their row but lose the client reference
        self.units_cache.invalidate().await;
        Ok(())
    }

    // --- Units ---

    pub async fn list_units(&self) -> Result<Arc<Vec<UnitModel>>, FleetError> {
        Ok(self
            .units_cache
            .get_or_load(None, || units_queries::get_all_units(&self.pool))
            .await?)
    }

    pub async fn list_units_by_status(&self, status: UnitStatus) -> Result<Arc<Vec<UnitModel>>, FleetError> {
        Ok(self
            .units_cache
            .get_or_load(Some(status), || units_queries::get_units_by_status(&self.pool, status))
            .await?)
    }

    pub async fn get_unit(&self, id: Uuid) -> Result<UnitModel, FleetError> {
        units_queries::get_unit_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| FleetError::not_found("conservador", id))
    }

    pub async fn create_unit(&self, unit: &NewUnitModel) -> Result<UnitModel, FleetError> {
        unit.validate()?;
        let created = units_queries::insert_unit(&self.pool, unit).await?;
        self.units_cache.invalidate().await;
        info!(unit_id = %created.id, numero_serie = %created.numero_serie, "Unit created");
        Ok(created)
    }

    pub async fn update_unit(&self, id: Uuid, update: &UnitUpdate) -> Result<UnitModel, FleetError> {
        update.validate()?;
        let updated = units_queries::update_unit(&self.pool, id, update)
            .await?
            .ok_or_else(|| FleetError::not_found("conservador", id))?;
        self.units_cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_unit(&self, id: Uuid) -> Result<(), FleetError> {
        if !units_queries::delete_unit(&self.pool, id).await? {
            return Err(FleetError::not_found("conservador", id));
        }
        // Maintenance and orders cascade with the unit
        self.units_cache.invalidate().await;
        self.maintenance_cache.invalidate().await;
        self.orders_cache.invalidate().await;
        Ok(())
    }

    pub async fn get_productivity(&self, unit_id: Uuid) -> Result<Option<ProductivityModel>, FleetError> {
        Ok(productivity_queries::get_productivity(&self.pool, unit_id).await?)
    }

    pub async fn upsert_productivity(&self, snapshot: &NewProductivityModel) -> Result<ProductivityModel, FleetError> {
        snapshot.validate()?;
        let saved = productivity_queries::upsert_productivity(&self.pool, snapshot).await?;
        debug!(unit_id = %saved.conservador_id, "Productivity snapshot saved");
        Ok(saved)
    }

    // --- Sales ---

    pub async fn record_sale(&self, sale: &NewSaleModel) -> Result<SaleModel, FleetError> {
        sale.validate()?;
        Ok(sales_queries::insert_sale(&self.pool, sale).await?)
    }

    // --- Maintenance ---

    pub async fn list_maintenance(&self, unit_id: Option<Uuid>) -> Result<Arc<Vec<MaintenanceModel>>, FleetError> {
        Ok(self
            .maintenance_cache
            .get_or_load(unit_id, || maintenance_queries::get_maintenance(&self.pool, unit_id))
            .await?)
    }

    pub async fn create_maintenance(&self, record: &NewMaintenanceModel) -> Result<MaintenanceModel, FleetError> {
        record.validate()?;
        let created = maintenance_queries::insert_maintenance(&self.pool, record).await?;
        self.maintenance_cache.invalidate().await;
        Ok(created)
    }

    pub async fn update_maintenance(&self, id: Uuid, update: &MaintenanceUpdate) -> Result<MaintenanceModel, FleetError> {
        update.validate()?;
        let updated = maintenance_queries::update_maintenance(&self.pool, id, update)
            .await?
            .ok_or_else(|| FleetError::not_found("mantenimiento", id))?;
        self.maintenance_cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_maintenance(&self, id: Uuid) -> Result<(), FleetError> {
        if !maintenance_queries::delete_maintenance(&self.pool, id).await? {
            return Err(FleetError::not_found("mantenimiento", id));
        }
        self.maintenance_cache.invalidate().await;
        Ok(())
    }

    // --- Providers ---

    pub async fn list_providers(&self) -> Result<Arc<Vec<ProviderModel>>, FleetError> {
        Ok(self
            .providers_cache
            .get_or_load((), || providers_queries::get_all_providers(&self.pool))
            .await?)
    }

    pub async fn create_provider(&self, provider: &NewProviderModel) -> Result<ProviderModel, FleetError> {
        provider.validate()?;
        let created = providers_queries::insert_provider(&self.pool, provider).await?;
        self.providers_cache.invalidate().await;
        Ok(created)
    }

    pub async fn update_provider(&self, id: Uuid, update: &ProviderUpdate) -> Result<ProviderModel, FleetError> {
        update.validate()?;
        let updated = providers_queries::update_provider(&self.pool, id, update)
            .await?
            .ok_or_else(|| FleetError::not_found("proveedor", id))?;
        self.providers_cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_provider(&self, id: Uuid) -> Result<(), FleetError> {
        if !providers_queries::delete_provider(&self.pool, id).await? {
            return Err(FleetError::not_found("proveedor", id));
        }
        self.providers_cache.invalidate().await;
        Ok(())
    }

    // --- Service orders ---

    pub async fn list_service_orders(&self, unit_id: Option<Uuid>) -> Result<Arc<Vec<ServiceOrderModel>>, FleetError> {
        Ok(self
            .orders_cache
            .get_or_load(unit_id, || service_orders_queries::get_service_orders(&self.pool, unit_id))
            .await?)
    }

    pub async fn get_service_order_detail(&self, id: Uuid) -> Result<ServiceOrderDetail, FleetError> {
        let order = service_orders_queries::get_service_order_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| FleetError::not_found("orden de servicio", id))?;
        let (evidencias, firmas) = tokio::try_join!(
            service_orders_queries::get_evidence_for_order(&self.pool, id),
            service_orders_queries::get_signatures_for_order(&self.pool, id),
        )?;
        Ok(ServiceOrderDetail { order, evidencias, firmas })
    }

    /// Creates an order numbered after the highest order number issued this month
    #[instrument(skip(self, order), fields(unit_id = %order.conservador_id))]
    pub async fn create_service_order(&self, order: &NewServiceOrderModel) -> Result<ServiceOrderModel, FleetError> {
        order.validate()?;
        let now = Utc::now();
        let prefix = service_orders::order_number_prefix(now.year(), now.month());

        let mut tx = self.pool.begin().await?;
        service_orders_queries::lock_order_numbers(&mut tx).await?;
        let issued = service_orders_queries::get_order_numbers_with_prefix(&mut tx, &prefix).await?;
        let sequence = service_orders::next_order_sequence(&prefix, &issued);
        let numero_orden = service_orders::format_order_number(now.year(), now.month(), sequence);

        let created =
            service_orders_queries::insert_service_order(&mut tx, &numero_orden, order, order.total_cost()).await?;
        tx.commit().await?;

        self.orders_cache.invalidate().await;
        info!(order_id = %created.id, numero_orden = %created.numero_orden, "Service order created");
        Ok(created)
    }

    pub async fn update_service_order(&self, id: Uuid, update: &ServiceOrderUpdate) -> Result<ServiceOrderModel, FleetError> {
        update.validate()?;
        let updated = service_orders_queries::update_service_order(&self.pool, id, update)
            .await?
            .ok_or_else(|| FleetError::not_found("orden de servicio", id))?;
        self.orders_cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_service_order(&self, id: Uuid) -> Result<(), FleetError> {
        if !service_orders_queries::delete_service_order(&self.pool, id).await? {
            return Err(FleetError::not_found("orden de servicio", id));
        }
        self.orders_cache.invalidate().await;
        Ok(())
    }

    pub async fn add_evidence(&self, evidence: &NewEvidenceModel) -> Result<EvidenceModel, FleetError> {
        evidence.validate()?;
        let created = service_orders_queries::insert_evidence(&self.pool, evidence).await?;
        self.orders_cache.invalidate().await;
        Ok(created)
    }

    pub async fn add_signature(&self, signature: &NewSignatureModel) -> Result<SignatureModel, FleetError> {
        signature.validate()?;
        let created = service_orders_queries::insert_signature(&self.pool, signature).await?;
        self.orders_cache.invalidate().await;
        Ok(created)
    }
}

#[async_trait]
impl UnitMetricsRepository for DbManager {
    async fn get_unit_snapshot(&self, unit_id: Uuid) -> Result<UnitSnapshot, FleetError> {
        let row = units_queries::get_unit_snapshot(&self.pool, unit_id)
            .await?
            .ok_or_else(|| FleetError::not_found("conservador", unit_id))?;
        UnitSnapshot::try_from(row)
    }

    async fn get_sales_since(&self, unit_id: Uuid, since: DateTime<Utc>) -> Result<Vec<SaleRecord>, FleetError> {
        let sales = sales_queries::get_sales_since(&self.pool, unit_id, since).await?;
        Ok(sales.into_iter().map(SaleRecord::from).collect())
    }

    async fn update_unit_status(&self, unit_id: Uuid, update: &UnitStatusUpdate) -> Result<(), FleetError> {
        if !units_queries::update_unit_status(&self.pool, unit_id, update.status, &update.note).await? {
            return Err(FleetError::not_found("conservador", unit_id));
        }
        self.units_cache.invalidate().await;
        Ok(())
    }

    async fn list_units_to_evaluate(&self) -> Result<Vec<Uuid>, FleetError> {
        // Uncached: other writers add and retire units between runs
        Ok(units_queries::get_unit_ids_excluding_status(&self.pool, UnitStatus::Inactive).await?)
    }
}
