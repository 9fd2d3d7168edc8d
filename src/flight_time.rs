//! Flight time from usable pack energy and average current.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model_config::ModelConfig;
use crate::flight_style::{style_factor, FlightStyle};
use crate::power::PowerEstimate;
use crate::profile::{BatteryProfile, BuildProfile};

/// Flight-time figures in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightTimeEstimate {
    pub minutes: f64,
    /// Energy-limited time before the ceiling is applied
    pub base_minutes: f64,
    /// Ceiling after racing and power-to-weight reductions
    pub ceiling_minutes: f64,
    pub effective_capacity_mah: f64,
}

/// Capacity actually available at `current_a`, after every derating.
///
/// # Arguments
/// * `battery` - Pack
/// * `current_a` - Continuous pack current
/// * `profile` - Build, for the whole-system factors
/// * `disk_loading` - Hover disk loading (N/m²)
///
/// # Returns
/// Effective capacity in mAh
pub fn effective_capacity_mah(
    battery: &BatteryProfile,
    current_a: f64,
    profile: &BuildProfile,
    disk_loading: f64,
    config: &ModelConfig,
) -> f64 {
    let cfg = &config.battery;
    let env = &config.environment;

    let discharge_c = current_a / battery.capacity_ah();
    let per_cell_current = current_a / battery.parallel_strings.max(1) as f64;
    let internal_resistance_ohm = cfg.internal_resistance_mohm.lookup(battery.c_rating) / 1000.0;
    let resistance_sag = (1.0
        - per_cell_current * internal_resistance_ohm / cfg.nominal_cell_voltage * cfg.resistance_sag_weight)
        .clamp(cfg.min_resistance_sag_factor, 1.0);
    let voltage_sag = cfg.voltage_sag.lookup(per_cell_current) * resistance_sag;

    let battery_factors = cfg.usable_capacity_fraction
        * cfg.discharge_derating.lookup(discharge_c)
        * cfg.temperature_efficiency.lookup(env.temperature_c)
        * cfg.altitude_efficiency.lookup(env.altitude_m)
        * cfg.wind_efficiency.lookup(env.wind_speed_mps)
        * cfg.age_factor
        * cfg.chemistry_quality.lookup(battery.capacity_mah)
        * cfg.c_rating_quality.lookup(battery.c_rating)
        * voltage_sag;

    let endurance = &config.endurance;
    let system_factors = endurance.pitch_ratio.lookup(profile.pitch_ratio())
        * endurance.disk_loading.lookup(disk_loading)
        * endurance.frame_size.lookup(profile.wheelbase_mm())
        * endurance.stator_size.lookup(profile.stator_width_mm());

    battery.capacity_mah * battery_factors * system_factors
}

/// Unreduced flight-time ceiling for a pack size.
pub fn capacity_tier_ceiling(capacity_mah: f64, config: &ModelConfig) -> f64 {
    config.limits.flight_time_ceiling_min.lookup(capacity_mah)
}

/// Estimate flight time over the configured phase mix.
///
/// No battery, or no current draw, means no flight: 0 minutes.
pub fn estimate_flight_time(
    profile: &BuildProfile,
    power: &PowerEstimate,
    mass_g: f64,
    style: Option<FlightStyle>,
    config: &ModelConfig,
) -> FlightTimeEstimate {
    let Some(battery) = profile.battery.as_ref() else {
        return FlightTimeEstimate::default();
    };
    let current_a = power.average_current_a;
    if current_a <= 0.0 {
        return FlightTimeEstimate::default();
    }

    let effective_mah = effective_capacity_mah(battery, current_a, profile, power.disk_loading_n_m2, config);
    let time_factor = style_factor(style, &config.flight_style.time_factor);
    let base_minutes = effective_mah / 1000.0 / current_a * 60.0 * time_factor;

    let limits = &config.limits;
    let mut ceiling = capacity_tier_ceiling(battery.capacity_mah, config);
    if style == Some(FlightStyle::Racing) {
        ceiling *= limits.racing_ceiling_factor;
    }
    let mass_kg = mass_g / 1000.0;
    if mass_kg > 0.0 && power.power_w / mass_kg > limits.high_power_to_weight_w_per_kg {
        ceiling *= limits.high_power_ceiling_factor;
    }

    let minutes = base_minutes
        .min(ceiling)
        .max(limits.flight_time_floor_min.min(ceiling))
        .max(0.0);

    trace!(effective_mah, base_minutes, ceiling, minutes, "flight time");

    FlightTimeEstimate {
        minutes,
        base_minutes,
        ceiling_minutes: ceiling,
        effective_capacity_mah: effective_mah,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandTable;
    use crate::catalog::{CatalogComponent, ComponentSelection, ComponentSlot};

    fn profile_with_pack(capacity: &str) -> BuildProfile {
        let selection = ComponentSelection::default()
            .with(
                ComponentSlot::Motor,
                CatalogComponent::new("Motor").with_spec("stator_size", "2207"),
            )
            .with(
                ComponentSlot::Propeller,
                CatalogComponent::new("Prop").with_spec("size", "5x4.3x3"),
            )
            .with(
                ComponentSlot::Frame,
                CatalogComponent::new("Frame").with_spec("wheelbase", "220mm"),
            )
            .with(
                ComponentSlot::Battery,
                CatalogComponent::new("Pack")
                    .with_spec("capacity", capacity)
                    .with_spec("cell_count", "4S")
                    .with_spec("discharge_rate", "95C"),
            );
        BuildProfile::from_selection(&selection)
    }

    fn power_at(current_a: f64, disk_loading: f64) -> PowerEstimate {
        PowerEstimate {
            average_current_a: current_a,
            hover_current_a: current_a / 2.0,
            power_w: current_a * 14.8,
            disk_loading_n_m2: disk_loading,
            ..PowerEstimate::default()
        }
    }

    #[test]
    fn test_five_inch_racing_flight_time() {
        let config = ModelConfig::default();
        let profile = profile_with_pack("1300mAh");
        let estimate = estimate_flight_time(&profile, &power_at(11.41, 91.9), 474.8, Some(FlightStyle::Racing), &config);

        assert!((estimate.effective_capacity_mah - 923.0).abs() < 2.0, "{}", estimate.effective_capacity_mah);
        assert!((estimate.minutes - 4.12).abs() < 0.02, "{}", estimate.minutes);
        assert!((estimate.ceiling_minutes - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_no_battery_no_flight() {
        let config = ModelConfig::default();
        let mut profile = profile_with_pack("1300mAh");
        profile.battery = None;
        let estimate = estimate_flight_time(&profile, &power_at(10.0, 90.0), 450.0, None, &config);
        assert_eq!(estimate.minutes, 0.0);
    }

    #[test]
    fn test_zero_current_no_flight() {
        let config = ModelConfig::default();
        let profile = profile_with_pack("1300mAh");
        let estimate = estimate_flight_time(&profile, &PowerEstimate::default(), 450.0, None, &config);
        assert_eq!(estimate, FlightTimeEstimate::default());
    }

    #[test]
    fn test_small_pack_hits_lowest_ceiling() {
        let config = ModelConfig::default();
        let profile = profile_with_pack("450mAh");
        // A trickle of current would fly for an hour without the ceiling
        let estimate = estimate_flight_time(&profile, &power_at(0.2, 40.0), 180.0, Some(FlightStyle::Cinematic), &config);
        assert_eq!(estimate.minutes, 8.0);
        assert!(estimate.base_minutes > estimate.minutes);
    }

    #[test]
    fn test_floor_applies_to_huge_draw() {
        let config = ModelConfig::default();
        let profile = profile_with_pack("1300mAh");
        let estimate = estimate_flight_time(&profile, &power_at(400.0, 90.0), 2000.0, None, &config);
        assert_eq!(estimate.minutes, 0.5);
    }

    #[test]
    fn test_high_power_to_weight_reduces_ceiling() {
        let config = ModelConfig::default();
        let profile = profile_with_pack("1300mAh");
        // 30 A x 14.8 V on 0.4 kg = 1110 W/kg
        let estimate = estimate_flight_time(&profile, &power_at(30.0, 90.0), 400.0, None, &config);
        assert!((estimate.ceiling_minutes - 12.0 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_cold_weather_shortens_flight() {
        let profile = profile_with_pack("1300mAh");
        let warm = estimate_flight_time(&profile, &power_at(11.0, 90.0), 470.0, None, &ModelConfig::default());

        let mut config = ModelConfig::default();
        config.environment.temperature_c = -5.0;
        let cold = estimate_flight_time(&profile, &power_at(11.0, 90.0), 470.0, None, &config);
        assert!(cold.minutes < warm.minutes);
    }

    #[test]
    fn test_parallel_strings_reduce_sag() {
        let config = ModelConfig::default();
        let single = profile_with_pack("3000mAh");
        let mut double = single.clone();
        if let Some(battery) = double.battery.as_mut() {
            battery.parallel_strings = 2;
        }
        let a = effective_capacity_mah(single.battery.as_ref().unwrap(), 50.0, &single, 90.0, &config);
        let b = effective_capacity_mah(double.battery.as_ref().unwrap(), 50.0, &double, 90.0, &config);
        assert!(b > a);
    }

    #[test]
    fn test_never_negative_with_unvalidated_ceiling() {
        let mut config = ModelConfig::default();
        config.limits.flight_time_ceiling_min = BandTable::new(&[(600.0, -5.0)], -5.0);
        let estimate = estimate_flight_time(
            &profile_with_pack("1300mAh"),
            &power_at(11.41, 91.9),
            474.8,
            None,
            &config,
        );
        assert_eq!(estimate.minutes, 0.0);
    }
}
