pub mod action;
pub mod app;
pub mod aws;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod prober;
pub mod progress;
pub mod reporter;
pub mod simulator;
pub mod util;

pub use action::ActionIdentifier;
pub use catalog::{fetch_catalog, ServiceCatalog};
pub use config::ProbeConfig;
pub use error::{CatalogError, ProbeError};
pub use prober::{probe_permissions, AllowedPermissionSet, Prober};
pub use reporter::present;
