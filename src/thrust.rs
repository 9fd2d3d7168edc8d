//! Static thrust of the drivetrain.
//!
//! Two independent estimates are averaged: momentum theory over the propeller disk
//! and a blade-element style coefficient model. The result is reconciled with the
//! manufacturer's bench figure, scaled by how well the propeller suits the motor and
//! derated for real-world conditions.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::model_config::{LimitsConfig, ModelConfig};
use crate::constants::{G_ACCEL_MPS2, MIN_DIVISION_THRESHOLD, MIN_MASS_G, MOTOR_COUNT};
use crate::profile::{BuildProfile, MotorProfile, PropellerProfile};

/// Intermediate and final thrust figures. Thrust values are in grams-force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThrustEstimate {
    pub optimal_kv: f64,
    /// Relative deviation of the motor KV from `optimal_kv`
    pub kv_deviation: f64,
    pub loaded_rpm: f64,
    pub momentum_g: f64,
    pub blade_element_g: f64,
    /// Blended with the declared figure when one exists
    pub blended_g: f64,
    pub match_factor: f64,
    pub per_motor_g: f64,
    pub total_g: f64,
}

impl ThrustEstimate {
    pub fn total_kg(&self) -> f64 {
        self.total_g / 1000.0
    }

    pub fn total_newtons(&self) -> f64 {
        self.total_kg() * G_ACCEL_MPS2
    }
}

/// KV at which the propeller tip reaches its design speed on this pack.
///
/// # Arguments
/// * `diameter_in` - Propeller diameter in inches
/// * `voltage` - Nominal pack voltage
///
/// # Returns
/// Optimal KV (RPM per volt)
pub fn optimal_kv(diameter_in: f64, voltage: f64, config: &ModelConfig) -> f64 {
    config.motor.optimal_kv_constant / (diameter_in * voltage).max(MIN_DIVISION_THRESHOLD)
}

/// Relative deviation |kv - optimal| / optimal.
pub fn kv_deviation(kv: f64, optimal: f64) -> f64 {
    (kv - optimal).abs() / optimal.max(MIN_DIVISION_THRESHOLD)
}

/// Momentum-theory thrust of one propeller in newtons.
///
/// The induced velocity is a fixed share of the tip speed scaled by the geometric
/// inflow ratio pitch / (pi x diameter); thrust = 2 rho A v_i².
pub fn momentum_thrust_n(prop: &PropellerProfile, rpm: f64, air_density: f64, config: &ModelConfig) -> f64 {
    let diameter_m = prop.diameter_m();
    let revs_per_sec = rpm / 60.0;
    let tip_speed = std::f64::consts::PI * diameter_m * revs_per_sec;
    let inflow_ratio = prop.pitch_m() / (std::f64::consts::PI * diameter_m);
    let induced_velocity = config.propeller.induced_velocity_fraction * tip_speed * inflow_ratio;

    2.0 * air_density * prop.disk_area_m2() * induced_velocity.powi(2)
}

/// Blade-element style thrust of one propeller in newtons: Ct rho n² D⁴.
///
/// Ct grows with the square root of the blade count over two and is penalised by the
/// distance of the 75%-radius blade angle from the optimum.
pub fn blade_element_thrust_n(
    prop: &PropellerProfile,
    rpm: f64,
    air_density: f64,
    config: &ModelConfig,
) -> f64 {
    let cfg = &config.propeller;
    let diameter_m = prop.diameter_m();
    let revs_per_sec = rpm / 60.0;

    let blade_angle_deg = (prop.pitch_m() / (std::f64::consts::PI * 0.75 * diameter_m))
        .atan()
        .to_degrees();
    let angle_efficiency = (1.0
        - cfg.blade_angle_penalty_per_deg * (blade_angle_deg - cfg.optimal_blade_angle_deg).abs())
    .clamp(cfg.min_blade_angle_efficiency, 1.0);
    let blade_factor = (prop.blades / 2.0).powf(cfg.blade_count_exponent);

    cfg.blade_element_ct * blade_factor * angle_efficiency * air_density * revs_per_sec.powi(2) * diameter_m.powi(4)
}

/// Reconcile the computed per-motor thrust with the manufacturer's figure.
///
/// Close figures are blended toward the computed value; when they disagree badly the
/// declared figure wins, nudged in the direction of the computation.
pub fn blend_with_declared(computed_g: f64, declared_g: Option<f64>, config: &ModelConfig) -> f64 {
    let Some(declared_g) = declared_g else {
        return computed_g;
    };
    let cfg = &config.thrust;
    let ratio = computed_g / declared_g;

    if ratio < cfg.blend_lower_ratio {
        declared_g * cfg.below_range_scale
    } else if ratio > cfg.blend_upper_ratio {
        declared_g * cfg.above_range_scale
    } else {
        cfg.computed_blend_weight * computed_g + (1.0 - cfg.computed_blend_weight) * declared_g
    }
}

/// How well the propeller suits the motor, in [match_factor_min, match_factor_max].
///
/// The motor's power class (stator volume x KV x cells) implies an ideal propeller
/// diameter and pitch; the factor falls with the weighted relative mismatch.
pub fn match_factor(motor: &MotorProfile, prop: &PropellerProfile, cells: u32, config: &ModelConfig) -> f64 {
    let cfg = &config.thrust;
    let motor_power_w =
        motor.stator_volume_mm3() / 1000.0 * motor.kv * cells as f64 * config.motor.power_per_stator_kv_cell;

    let ideal_diameter_in = (motor_power_w.cbrt() * cfg.ideal_diameter_coefficient).max(MIN_DIVISION_THRESHOLD);
    let ideal_pitch_in = (ideal_diameter_in * cfg.ideal_pitch_ratio).max(MIN_DIVISION_THRESHOLD);

    let diameter_mismatch = (prop.diameter_in - ideal_diameter_in).abs() / ideal_diameter_in;
    let pitch_mismatch = (prop.pitch_in - ideal_pitch_in).abs() / ideal_pitch_in;
    let mismatch = cfg.match_diameter_weight * diameter_mismatch + cfg.match_pitch_weight * pitch_mismatch;
    if !mismatch.is_finite() {
        return cfg.match_factor_min;
    }

    (cfg.match_factor_max - cfg.match_sensitivity * mismatch).clamp(cfg.match_factor_min, cfg.match_factor_max)
}

/// Estimate the static thrust of the build.
///
/// # Arguments
/// * `profile` - Typed build
/// * `air_density` - kg/m³ at the configured conditions
/// * `config` - Model configuration
///
/// # Returns
/// All-zero estimate without a motor or a propeller.
pub fn estimate_thrust(profile: &BuildProfile, air_density: f64, config: &ModelConfig) -> ThrustEstimate {
    let Some((motor, prop)) = profile.drivetrain() else {
        return ThrustEstimate::default();
    };

    let cells = profile.cell_count(config);
    let voltage = profile.pack_voltage(config);

    let optimal = optimal_kv(prop.diameter_in, voltage, config);
    let deviation = kv_deviation(motor.kv, optimal);
    let load_efficiency = config.motor.load_efficiency.lookup(motor.stator.width_mm)
        * config.motor.kv_deviation_efficiency.lookup(deviation);
    let loaded_rpm = motor.kv * voltage * load_efficiency;

    let momentum_g = momentum_thrust_n(prop, loaded_rpm, air_density, config) / G_ACCEL_MPS2 * 1000.0;
    let blade_element_g = blade_element_thrust_n(prop, loaded_rpm, air_density, config) / G_ACCEL_MPS2 * 1000.0;
    let computed_g = (momentum_g + blade_element_g) / 2.0;

    let blended_g = blend_with_declared(computed_g, motor.declared_thrust_g, config);
    let factor = match_factor(motor, prop, cells, config);
    let mut per_motor_g = blended_g * factor * config.thrust.condition_derating * config.thrust.tolerance_derating;
    if !per_motor_g.is_finite() {
        warn!(kv = motor.kv, diameter_in = prop.diameter_in, "thrust overflowed, reporting none");
        per_motor_g = 0.0;
    }

    trace!(
        optimal_kv = optimal,
        loaded_rpm,
        momentum_g,
        blade_element_g,
        blended_g,
        match_factor = factor,
        "per-motor thrust"
    );

    ThrustEstimate {
        optimal_kv: optimal,
        kv_deviation: deviation,
        loaded_rpm,
        momentum_g,
        blade_element_g,
        blended_g,
        match_factor: factor,
        per_motor_g,
        total_g: per_motor_g * MOTOR_COUNT,
    }
}

/// Thrust-to-weight ratio clamped to the configured limits.
///
/// A weightless build reports the maximum when it has any thrust and the minimum
/// otherwise. A ratio that is not a number reports the minimum.
pub fn thrust_to_weight(total_thrust_g: f64, mass_g: f64, limits: &LimitsConfig) -> f64 {
    if mass_g < MIN_MASS_G {
        return if total_thrust_g > 0.0 { limits.twr_max } else { limits.twr_min };
    }
    let ratio = total_thrust_g / mass_g;
    if ratio.is_nan() {
        return limits.twr_min;
    }
    ratio.clamp(limits.twr_min, limits.twr_max)
}
