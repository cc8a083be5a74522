#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use conservador_fleet::db::models::units::UnitStatus;
use conservador_fleet::error::FleetError;
use conservador_fleet::repository::{
    ProductivitySnapshot, SaleRecord, UnitMetricsRepository, UnitSnapshot, UnitStatusUpdate,
};

/// In-memory stand-in for the fleet database
#[derive(Default)]
pub struct InMemoryFleet {
    units: Mutex<HashMap<Uuid, UnitSnapshot>>,
    sales: Mutex<HashMap<Uuid, Vec<SaleRecord>>>,
    status_updates: Mutex<Vec<(Uuid, UnitStatusUpdate)>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_status_writes: AtomicBool,
}

impl InMemoryFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&self, unit: UnitSnapshot) {
        self.units.lock().unwrap().insert(unit.id, unit);
    }

    pub fn add_sales(&self, unit_id: Uuid, sales: impl IntoIterator<Item = SaleRecord>) {
        self.sales.lock().unwrap().entry(unit_id).or_default().extend(sales);
    }

    pub fn unit(&self, unit_id: Uuid) -> Option<UnitSnapshot> {
        self.units.lock().unwrap().get(&unit_id).cloned()
    }

    pub fn set_unit_status(&self, unit_id: Uuid, status: UnitStatus) {
        if let Some(unit) = self.units.lock().unwrap().get_mut(&unit_id) {
            unit.status = status;
        }
    }

    pub fn status_updates(&self) -> Vec<(Uuid, UnitStatusUpdate)> {
        self.status_updates.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_status_writes(&self, fail: bool) {
        self.fail_status_writes.store(fail, Ordering::SeqCst);
    }

    fn record_read(&self) -> Result<(), FleetError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FleetError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitMetricsRepository for InMemoryFleet {
    async fn get_unit_snapshot(&self, unit_id: Uuid) -> Result<UnitSnapshot, FleetError> {
        self.record_read()?;
        self.unit(unit_id).ok_or_else(|| FleetError::not_found("conservador", unit_id))
    }

    async fn get_sales_since(&self, unit_id: Uuid, since: DateTime<Utc>) -> Result<Vec<SaleRecord>, FleetError> {
        self.record_read()?;
        let mut sales: Vec<SaleRecord> = self
            .sales
            .lock()
            .unwrap()
            .get(&unit_id)
            .map(|all| all.iter().filter(|s| s.fecha >= since).copied().collect())
            .unwrap_or_default();
        sales.sort_by(|a, b| b.fecha.cmp(&a.fecha));
        Ok(sales)
    }

    async fn update_unit_status(&self, unit_id: Uuid, update: &UnitStatusUpdate) -> Result<(), FleetError> {
        if self.fail_status_writes.load(Ordering::SeqCst) {
            return Err(FleetError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut units = self.units.lock().unwrap();
        let unit = units
            .get_mut(&unit_id)
            .ok_or_else(|| FleetError::not_found("conservador", unit_id))?;
        unit.status = update.status;
        self.status_updates.lock().unwrap().push((unit_id, update.clone()));
        Ok(())
    }

    async fn list_units_to_evaluate(&self) -> Result<Vec<Uuid>, FleetError> {
        self.record_read()?;
        let mut ids: Vec<Uuid> = self
            .units
            .lock()
            .unwrap()
            .values()
            .filter(|unit| unit.status != UnitStatus::Inactive)
            .map(|unit| unit.id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
}

/// Active unit of capacity 100 whose productivity passes every default threshold
pub fn healthy_unit() -> UnitSnapshot {
    UnitSnapshot {
        id: Uuid::new_v4(),
        capacity: Some(100),
        status: UnitStatus::Active,
        productivity: ProductivitySnapshot {
            occupancy_percent: 80.0,
            inventory_rotation: 3.0,
            maintenance_cost: 100.0,
            revenue: 1000.0,
        },
    }
}

/// One sale of `cantidad` per week for `weeks` weeks, the newest a day before `now`
pub fn weekly_sales(now: DateTime<Utc>, weeks: i64, cantidad: i32) -> Vec<SaleRecord> {
    (0..weeks)
        .map(|k| SaleRecord { fecha: now - Duration::days(k * 7 + 1), cantidad })
        .collect()
}

pub fn sale(fecha: DateTime<Utc>, cantidad: i32) -> SaleRecord {
    SaleRecord { fecha, cantidad }
}
