pub mod api;
pub mod checkout;
pub mod config;
pub mod entities;
pub mod layout;
pub mod metrics;
pub mod migrator;
pub mod reference;
pub mod routes;
pub mod stats;
pub mod store;
pub mod telemetry;

pub use sea_orm;
