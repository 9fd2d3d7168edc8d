//! Performance facade: runs every estimator in dependency order and assembles the
//! report.
//!
//! mass -> thrust -> power -> flight time, with mass and thrust also feeding top speed
//! and the hover metrics. Compatibility and pricing only read the selection.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::atmosphere::air_density;
use crate::catalog::ComponentSelection;
use crate::compatibility::{check_compatibility, CompatibilityReport};
use crate::model_config::ModelConfig;
use crate::flight_style::{classify_build, FlightStyle};
use crate::flight_time::estimate_flight_time;
use crate::hover::{estimate_hover, HoverMetrics};
use crate::mass::{aggregate_mass, MassBreakdown};
use crate::power::estimate_power;
use crate::pricing::{estimate_price, PriceBreakdown};
use crate::profile::BuildProfile;
use crate::thrust::{estimate_thrust, thrust_to_weight};
use crate::top_speed::estimate_top_speed;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotorMetrics {
    pub kv: f64,
    pub voltage: f64,
    pub estimated_rpm: f64,
    /// "DxPxB" of the selected propeller
    pub prop_size: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryMetrics {
    pub voltage: f64,
    pub capacity_mah: f64,
    pub cell_count: u32,
    pub max_discharge_current_a: f64,
}

/// Everything the estimator knows about one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_mass_g: f64,
    pub mass_breakdown: MassBreakdown,
    pub thrust_to_weight: f64,
    pub max_thrust_kg: f64,
    pub max_thrust_g: f64,
    pub top_speed_kmh: f64,
    pub flight_time_min: f64,
    pub power_draw_w: f64,
    pub average_current_a: f64,
    /// Pack-to-air efficiency of the drivetrain
    pub efficiency: f64,
    pub flight_style: Option<FlightStyle>,
    pub hover: HoverMetrics,
    pub motor: MotorMetrics,
    pub battery: BatteryMetrics,
    pub price: PriceBreakdown,
    pub compatibility: CompatibilityReport,
}

/// Estimate the performance of a build.
///
/// # Arguments
/// * `selection` - Selected components; any slot may be empty
/// * `config` - Model configuration, the shared default when `None`
///
/// # Returns
/// A complete report. Estimation never fails: missing components zero the figures
/// that depend on them and unreadable fields fall back to typical values.
pub fn estimate(selection: &ComponentSelection, config: Option<&ModelConfig>) -> PerformanceReport {
    let config = config.unwrap_or_else(|| ModelConfig::shared_default());
    let span = debug_span!("estimate", slots = selection.populated_slots().len());
    let _enter = span.enter();

    let profile = BuildProfile::from_selection(selection);
    let env = &config.environment;
    let rho = air_density(env.altitude_m, env.temperature_c, env.humidity_percent);

    let mass = aggregate_mass(&profile, config);
    debug!(total_g = mass.total_g, air_density = rho, "mass aggregated");

    let thrust = estimate_thrust(&profile, rho, config);
    let twr = thrust_to_weight(thrust.total_g, mass.total_g, &config.limits);
    debug!(total_thrust_g = thrust.total_g, twr, "thrust estimated");

    let style = classify_build(&profile, &config.flight_style);
    let power = estimate_power(&profile, mass.total_g, twr, style, rho, config);
    debug!(
        ?style,
        average_current_a = power.average_current_a,
        power_w = power.power_w,
        "power estimated"
    );

    let flight_time = estimate_flight_time(&profile, &power, mass.total_g, style, config);
    let top_speed = estimate_top_speed(&profile, thrust.total_g, mass.total_g, twr, rho, config);
    let hover = estimate_hover(&profile, mass.total_g, thrust.total_g, &power, config);
    debug!(
        flight_time_min = flight_time.minutes,
        top_speed_kmh = top_speed.kmh,
        hover_throttle = hover.throttle_percent,
        "flight envelope estimated"
    );

    let cells = profile.cell_count(config);
    let voltage = profile.pack_voltage(config);
    let price = estimate_price(&profile, cells, profile.esc_current_a(config), &config.pricing);

    let motor = MotorMetrics {
        kv: profile.motor.as_ref().map(|m| m.kv).unwrap_or(0.0),
        voltage,
        estimated_rpm: thrust.loaded_rpm,
        prop_size: profile.propeller.as_ref().map(|p| p.size_label()),
    };
    let battery = profile
        .battery
        .as_ref()
        .map(|b| BatteryMetrics {
            voltage,
            capacity_mah: b.capacity_mah,
            cell_count: cells,
            max_discharge_current_a: b.max_discharge_current_a(),
        })
        .unwrap_or_default();

    PerformanceReport {
        total_mass_g: mass.total_g,
        mass_breakdown: mass,
        thrust_to_weight: twr,
        max_thrust_kg: thrust.total_kg(),
        max_thrust_g: thrust.total_g,
        top_speed_kmh: top_speed.kmh,
        flight_time_min: flight_time.minutes,
        power_draw_w: power.power_w,
        average_current_a: power.average_current_a,
        efficiency: power.overall_efficiency(),
        flight_style: style,
        hover,
        motor,
        battery,
        price,
        compatibility: check_compatibility(selection),
    }
}

/// Estimate many independent builds in parallel. Reports come back in input order.
pub fn estimate_many(selections: &[ComponentSelection], config: Option<&ModelConfig>) -> Vec<PerformanceReport> {
    let config = config.unwrap_or_else(|| ModelConfig::shared_default());
    debug!(count = selections.len(), "batch estimate");

    selections
        .par_iter()
        .map(|selection| estimate(selection, Some(config)))
        .collect()
}
