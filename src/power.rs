//! Electrical power draw over a typical flight.
//!
//! Hover power comes from momentum theory and the figure of merit. Each flight phase
//! scales hover thrust, and power grows with thrust^1.5. Mechanical power is turned
//! into pack current through the drivetrain efficiency chain.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model_config::{ModelConfig, PhaseSpec};
use crate::constants::{G_ACCEL_MPS2, MIN_DIVISION_THRESHOLD, MOTOR_COUNT};
use crate::flight_style::{style_factor, FlightStyle};
use crate::profile::{BuildProfile, MotorProfile, PropellerProfile};
use crate::thrust::{kv_deviation, optimal_kv};

/// Efficiencies between the pack and the air.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyChain {
    pub motor: f64,
    pub propeller: f64,
    pub esc: f64,
    pub wiring: f64,
}

impl EfficiencyChain {
    pub fn overall(&self) -> f64 {
        self.motor * self.propeller * self.esc * self.wiring
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    /// Time-weighted pack current over the phase mix (A)
    pub average_current_a: f64,
    pub hover_current_a: f64,
    pub sport_current_a: f64,
    /// Average electrical power (W)
    pub power_w: f64,
    /// Mechanical hover power per motor (W)
    pub hover_mechanical_w: f64,
    /// Hover thrust per disk area (N/m²)
    pub disk_loading_n_m2: f64,
    pub efficiency: EfficiencyChain,
}

impl PowerEstimate {
    pub fn overall_efficiency(&self) -> f64 {
        self.efficiency.overall()
    }
}

/// Hover disk loading of one propeller (N/m²).
pub fn hover_disk_loading(mass_g: f64, prop: &PropellerProfile) -> f64 {
    hover_thrust_per_motor_n(mass_g) / prop.disk_area_m2().max(MIN_DIVISION_THRESHOLD)
}

fn hover_thrust_per_motor_n(mass_g: f64) -> f64 {
    mass_g / 1000.0 * G_ACCEL_MPS2 / MOTOR_COUNT
}

/// Actual mechanical hover power of one motor: ideal momentum power / figure of merit.
pub fn hover_power_w(mass_g: f64, prop: &PropellerProfile, air_density: f64, config: &ModelConfig) -> f64 {
    let thrust_n = hover_thrust_per_motor_n(mass_g);
    let ideal = thrust_n.powf(1.5) / (2.0 * air_density * prop.disk_area_m2()).sqrt().max(MIN_DIVISION_THRESHOLD);
    ideal / config.propeller.hover_figure_of_merit
}

/// Power of one phase relative to hover: thrust_multiplier^exponent.
fn phase_power_ratio(phase: &PhaseSpec, exponent: f64) -> f64 {
    phase.thrust_multiplier.powf(exponent)
}

/// Time-weighted average of the phase power ratios.
pub fn phase_mix_power_ratio(config: &ModelConfig) -> f64 {
    let style = &config.flight_style;
    let phases = [
        &style.phases.hover,
        &style.phases.cruise,
        &style.phases.sport,
        &style.phases.aggressive,
    ];

    let ratio_sum: f64 = phases.iter().map(|p| p.time_ratio).sum();
    let weighted: f64 = phases
        .iter()
        .map(|p| phase_power_ratio(p, style.power_exponent) * p.time_ratio)
        .sum();

    weighted / ratio_sum.max(MIN_DIVISION_THRESHOLD)
}

/// Efficiency chain of a drivetrain on this pack.
pub fn efficiency_chain(
    motor: &MotorProfile,
    prop: &PropellerProfile,
    disk_loading: f64,
    voltage: f64,
    esc_current_a: f64,
    config: &ModelConfig,
) -> EfficiencyChain {
    let deviation = kv_deviation(motor.kv, optimal_kv(prop.diameter_in, voltage, config));
    let motor_eff = config.motor.stator_efficiency.lookup(motor.stator.width_mm)
        * config.motor.kv_deviation_efficiency.lookup(deviation);

    let prop_cfg = &config.propeller;
    let prop_eff = prop_cfg.disk_loading_efficiency.lookup(disk_loading)
        * prop_cfg.pitch_ratio_efficiency.lookup(prop.pitch_ratio())
        * prop_cfg.material_efficiency.lookup(&prop.material);

    EfficiencyChain {
        motor: motor_eff,
        propeller: prop_eff,
        esc: config.system.esc_efficiency.lookup(esc_current_a),
        wiring: config.system.wiring_efficiency,
    }
}

/// Combined current multiplier for altitude and temperature.
pub fn environment_current_factor(config: &ModelConfig) -> f64 {
    let env = &config.environment;
    env.altitude_current.lookup(env.altitude_m) * env.temperature_current.lookup(env.temperature_c)
}

/// Estimate pack current and power.
///
/// # Arguments
/// * `profile` - Typed build
/// * `mass_g` - All-up mass
/// * `thrust_to_weight` - Clamped thrust-to-weight ratio
/// * `style` - Detected flight style
/// * `air_density` - kg/m³
///
/// # Returns
/// All-zero estimate without a motor or a propeller.
pub fn estimate_power(
    profile: &BuildProfile,
    mass_g: f64,
    thrust_to_weight: f64,
    style: Option<FlightStyle>,
    air_density: f64,
    config: &ModelConfig,
) -> PowerEstimate {
    let Some((motor, prop)) = profile.drivetrain() else {
        return PowerEstimate::default();
    };

    let voltage = profile.pack_voltage(config);
    let esc_current_a = profile.esc_current_a(config);
    let disk_loading = hover_disk_loading(mass_g, prop);
    let chain = efficiency_chain(motor, prop, disk_loading, voltage, esc_current_a, config);
    let overall = chain.overall().max(MIN_DIVISION_THRESHOLD);

    let hover_mech_w = hover_power_w(mass_g, prop, air_density, config);
    let average_mech_w = hover_mech_w * phase_mix_power_ratio(config);
    let sport_mech_w = hover_mech_w * phase_power_ratio(&config.flight_style.phases.sport, config.flight_style.power_exponent);

    let environment = environment_current_factor(config);
    let frame_aero = config.aero.frame_current_factor.lookup(profile.wheelbase_mm());
    let twr_factor = config.aero.twr_current_factor.lookup(thrust_to_weight);
    let style_multiplier = style_factor(style, &config.flight_style.power_multiplier);
    let per_motor_cap = esc_current_a * config.system.esc_current_cap_fraction;

    let mass_kg = mass_g / 1000.0;
    let lower = mass_kg * config.system.min_current_per_kg;
    let upper = lower.max((per_motor_cap * MOTOR_COUNT).min(mass_kg * config.system.max_current_per_kg));

    // Flying current: style and environment per motor, then ESC cap, then airframe
    let flying_current = |mech_w: f64| {
        let per_motor = (mech_w / overall / voltage * style_multiplier * environment).min(per_motor_cap);
        (per_motor * MOTOR_COUNT * frame_aero * twr_factor).clamp(lower, upper)
    };

    let average_current_a = flying_current(average_mech_w);
    let sport_current_a = flying_current(sport_mech_w);
    // Hover skips the style and TWR multipliers but shares the mass band
    let hover_current_a = ((hover_mech_w / overall / voltage * environment).min(per_motor_cap)
        * MOTOR_COUNT
        * frame_aero)
        .clamp(lower, upper);

    trace!(
        hover_mech_w,
        average_mech_w,
        efficiency = chain.overall(),
        average_current_a,
        hover_current_a,
        "power draw"
    );

    PowerEstimate {
        average_current_a,
        hover_current_a,
        sport_current_a,
        power_w: average_current_a * voltage,
        hover_mechanical_w: hover_mech_w,
        disk_loading_n_m2: disk_loading,
        efficiency: chain,
    }
}
