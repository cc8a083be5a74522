pub mod clients;
pub mod units;
pub mod productivity;
pub mod sales;
pub mod maintenance;
pub mod providers;
pub mod service_orders;
