use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model_config::ModelConfig;
use crate::constants::{G_ACCEL_MPS2, MIN_DIVISION_THRESHOLD, MPS_TO_KMH};
use crate::profile::BuildProfile;

/// Level-flight top speed, in km/h.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TopSpeedEstimate {
    pub kmh: f64,
    /// Advance-ratio derated pitch speed
    pub pitch_limited_kmh: f64,
    /// Speed at which frame drag balances the horizontal thrust
    pub drag_limited_kmh: f64,
    pub ceiling_kmh: f64,
}

/// Estimate top speed as the lesser of the propeller's pitch speed and the
/// drag-balance speed, corrected by thrust-to-weight, frame and pitch-ratio tiers.
///
/// Requires motor, propeller and frame; otherwise every figure is 0.
pub fn estimate_top_speed(
    profile: &BuildProfile,
    total_thrust_g: f64,
    mass_g: f64,
    thrust_to_weight: f64,
    air_density: f64,
    config: &ModelConfig,
) -> TopSpeedEstimate {
    let (Some((motor, prop)), Some(frame)) = (profile.drivetrain(), profile.frame.as_ref()) else {
        return TopSpeedEstimate::default();
    };
    let aero = &config.aero;

    let voltage = profile.pack_voltage(config);
    let loaded_rpm = motor.kv * voltage * aero.top_speed_load_efficiency;
    let pitch_ratio = prop.pitch_ratio();
    let pitch_speed = loaded_rpm / 60.0 * prop.pitch_m()
        * config.propeller.advance_ratio_efficiency.lookup(pitch_ratio);

    let thrust_n = total_thrust_g / 1000.0 * G_ACCEL_MPS2;
    let weight_n = mass_g / 1000.0 * G_ACCEL_MPS2;
    let horizontal_n = (thrust_n.powi(2) - weight_n.powi(2)).max(0.0).sqrt();

    let wheelbase_m = frame.wheelbase_mm / 1000.0;
    let drag_coefficient = aero.drag_coefficient.lookup(frame.wheelbase_mm);
    let frontal_area = aero.frontal_area_coefficient * wheelbase_m.powi(2);
    let drag_speed =
        (2.0 * horizontal_n / (air_density * drag_coefficient * frontal_area).max(MIN_DIVISION_THRESHOLD)).sqrt();

    let corrected = pitch_speed.min(drag_speed)
        * aero.twr_speed_factor.lookup(thrust_to_weight)
        * aero.frame_speed_factor.lookup(frame.wheelbase_mm)
        * aero.pitch_ratio_speed_factor.lookup(pitch_ratio);

    let ceiling_kmh = config.limits.top_speed_ceiling_kmh.lookup(frame.wheelbase_mm);
    let kmh = (corrected * MPS_TO_KMH).min(ceiling_kmh).max(0.0);

    trace!(pitch_speed, drag_speed, kmh, "top speed");

    TopSpeedEstimate {
        kmh,
        pitch_limited_kmh: pitch_speed * MPS_TO_KMH,
        drag_limited_kmh: drag_speed * MPS_TO_KMH,
        ceiling_kmh,
    }
}
