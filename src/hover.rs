use serde::{Deserialize, Serialize};

use crate::model_config::ModelConfig;
use crate::flight_time::{capacity_tier_ceiling, effective_capacity_mah};
use crate::power::PowerEstimate;
use crate::profile::BuildProfile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverMetrics {
    pub throttle_percent: f64,
    pub current_a: f64,
    pub time_min: f64,
}

/// Throttle needed to hover, in percent.
///
/// Static thrust is roughly quadratic in throttle, so hover throttle is
/// sqrt(weight / max thrust). 0 without thrust.
pub fn hover_throttle_percent(mass_g: f64, total_thrust_g: f64) -> f64 {
    if total_thrust_g <= 0.0 {
        return 0.0;
    }
    ((mass_g / total_thrust_g).sqrt() * 100.0).clamp(0.0, 100.0)
}

/// Hover throttle, current and endurance.
pub fn estimate_hover(
    profile: &BuildProfile,
    mass_g: f64,
    total_thrust_g: f64,
    power: &PowerEstimate,
    config: &ModelConfig,
) -> HoverMetrics {
    let current_a = power.hover_current_a;
    let time_min = match profile.battery.as_ref() {
        Some(battery) if current_a > 0.0 => {
            let effective_mah =
                effective_capacity_mah(battery, current_a, profile, power.disk_loading_n_m2, config);
            (effective_mah / 1000.0 / current_a * 60.0)
                .min(capacity_tier_ceiling(battery.capacity_mah, config))
                .max(0.0)
        }
        _ => 0.0,
    };

    HoverMetrics {
        throttle_percent: hover_throttle_percent(mass_g, total_thrust_g),
        current_a,
        time_min,
    }
}
