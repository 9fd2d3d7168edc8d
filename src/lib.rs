//! # Drone Performance
//!
//! Calibrated empirical performance estimator for multirotors assembled from catalog
//! components: mass, thrust-to-weight, power draw, flight time, top speed, hover
//! metrics, compatibility flags and price.

// Re-export the main types and functions
pub use catalog::{AuxiliaryWeight, CatalogComponent, ComponentSelection, ComponentSlot};
pub use compatibility::CompatibilityReport;
pub use error::{ConfigError, PerformanceError};
pub use flight_style::FlightStyle;
pub use hover::HoverMetrics;
pub use mass::MassBreakdown;
pub use model_config::ModelConfig;
pub use performance::{estimate, estimate_many, BatteryMetrics, MotorMetrics, PerformanceReport};
pub use pricing::PriceBreakdown;
pub use profile::BuildProfile;

// Module declarations
pub mod atmosphere;
pub mod bands;
pub mod catalog;
pub mod compatibility;
pub mod constants;
mod error;
pub mod flight_style;
pub mod flight_time;
pub mod hover;
pub mod mass;
pub mod model_config;
pub mod performance;
pub mod power;
pub mod pricing;
pub mod profile;
pub mod spec_value;
pub mod thrust;
pub mod top_speed;
