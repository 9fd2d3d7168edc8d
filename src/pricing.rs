//! Build price from declared prices, or category heuristics when none is listed.

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentSlot;
use crate::model_config::PricingConfig;
use crate::profile::{
    BatteryProfile, BuildProfile, CameraProfile, FrameProfile, MotorProfile, PropellerProfile, StackProfile,
};

/// Category subtotals and total, in currency units rounded to cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub motors: f64,
    pub propellers: f64,
    pub frame: f64,
    pub stack: f64,
    pub camera: f64,
    pub battery: f64,
    pub aux: f64,
    pub total: f64,
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Heuristic motor price: grows with stator volume, small premium for high KV.
pub fn motor_unit_price(motor: &MotorProfile, config: &PricingConfig) -> f64 {
    let premium = if motor.kv > config.motor_high_kv_threshold {
        config.motor_high_kv_premium
    } else {
        0.0
    };
    config.motor_base + config.motor_per_stator_volume * motor.stator_volume_mm3() + premium
}

pub fn propeller_unit_price(prop: &PropellerProfile, config: &PricingConfig) -> f64 {
    config.propeller_base
        + config.propeller_per_inch * prop.diameter_in
        + config.propeller_per_extra_blade * (prop.blades - 2.0).max(0.0)
}

pub fn frame_price(frame: &FrameProfile, config: &PricingConfig) -> f64 {
    (config.frame_base + config.frame_per_mm * frame.wheelbase_mm) * config.frame_material.lookup(&frame.material)
}

pub fn stack_price(stack: &StackProfile, esc_current_a: f64, config: &PricingConfig) -> f64 {
    (config.stack_base + config.stack_per_esc_amp * esc_current_a) * config.stack_type_factor.lookup(&stack.kind)
}

pub fn camera_price(camera: &CameraProfile, config: &PricingConfig) -> f64 {
    config.camera_type_price.lookup(&camera.kind)
}

pub fn battery_price(battery: &BatteryProfile, cells: u32, config: &PricingConfig) -> f64 {
    config.battery_base + config.battery_per_mah_cell * battery.capacity_mah * cells as f64
}

/// Price every selected component; absent slots cost nothing.
///
/// # Arguments
/// * `profile` - Typed build
/// * `cells` - Series cell count of the pack
/// * `esc_current_a` - ESC rating used for stacks without a declared price
pub fn estimate_price(profile: &BuildProfile, cells: u32, esc_current_a: f64, config: &PricingConfig) -> PriceBreakdown {
    let motors = profile
        .motor
        .as_ref()
        .map(|m| m.price.unwrap_or_else(|| motor_unit_price(m, config)) * ComponentSlot::Motor.quantity())
        .unwrap_or(0.0);
    let propellers = profile
        .propeller
        .as_ref()
        .map(|p| p.price.unwrap_or_else(|| propeller_unit_price(p, config)) * ComponentSlot::Propeller.quantity())
        .unwrap_or(0.0);
    let frame = profile
        .frame
        .as_ref()
        .map(|f| f.price.unwrap_or_else(|| frame_price(f, config)))
        .unwrap_or(0.0);
    let stack = profile
        .stack
        .as_ref()
        .map(|s| s.price.unwrap_or_else(|| stack_price(s, esc_current_a, config)))
        .unwrap_or(0.0);
    let camera = profile
        .camera
        .as_ref()
        .map(|c| c.price.unwrap_or_else(|| camera_price(c, config)))
        .unwrap_or(0.0);
    let battery = profile
        .battery
        .as_ref()
        .map(|b| b.price.unwrap_or_else(|| battery_price(b, cells, config)))
        .unwrap_or(0.0);
    let aux: f64 = profile
        .aux
        .iter()
        .map(|a| a.price.unwrap_or(config.aux_default))
        .sum();

    let mut breakdown = PriceBreakdown {
        motors: round_to_cents(motors),
        propellers: round_to_cents(propellers),
        frame: round_to_cents(frame),
        stack: round_to_cents(stack),
        camera: round_to_cents(camera),
        battery: round_to_cents(battery),
        aux: round_to_cents(aux),
        total: 0.0,
    };
    breakdown.total = round_to_cents(
        breakdown.motors
            + breakdown.propellers
            + breakdown.frame
            + breakdown.stack
            + breakdown.camera
            + breakdown.battery
            + breakdown.aux,
    );
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AuxiliaryWeight, CatalogComponent, ComponentSelection};

    fn price_of(selection: &ComponentSelection) -> PriceBreakdown {
        let profile = BuildProfile::from_selection(selection);
        estimate_price(&profile, 4, 45.0, &PricingConfig::default())
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(12.345_6), 12.35);
        assert_eq!(round_to_cents(0.004), 0.0);
    }

    #[test]
    fn test_empty_build_is_free() {
        assert_eq!(price_of(&ComponentSelection::default()), PriceBreakdown::default());
    }

    #[test]
    fn test_declared_prices() {
        let selection = ComponentSelection::default()
            .with(ComponentSlot::Motor, CatalogComponent::new("M").with_spec("price", "$21.99"))
            .with(ComponentSlot::Frame, CatalogComponent::new("F").with_spec("price", "54.90"))
            .with_aux(AuxiliaryWeight::new("GPS", "12g").with_price("$15"));
        let price = price_of(&selection);
        assert_eq!(price.motors, 87.96);
        assert_eq!(price.frame, 54.9);
        assert_eq!(price.aux, 15.0);
        assert_eq!(price.total, 157.86);
    }

    #[test]
    fn test_heuristic_prices() {
        let selection = ComponentSelection::default()
            .with(
                ComponentSlot::Motor,
                CatalogComponent::new("M")
                    .with_spec("kv", "2750KV")
                    .with_spec("stator_size", "2207"),
            )
            .with(
                ComponentSlot::Propeller,
                CatalogComponent::new("P").with_spec("size", "5x4.3x3"),
            )
            .with(
                ComponentSlot::Frame,
                CatalogComponent::new("F")
                    .with_spec("wheelbase", "220mm")
                    .with_spec("material", "Carbon fiber"),
            )
            .with(
                ComponentSlot::Stack,
                CatalogComponent::new("S").with_spec("type", "30x30 stack"),
            )
            .with(
                ComponentSlot::Camera,
                CatalogComponent::new("C").with_spec("type", "Analog"),
            )
            .with(
                ComponentSlot::Battery,
                CatalogComponent::new("B").with_spec("capacity", "1300mAh"),
            )
            .with_aux(AuxiliaryWeight::new("Strap", "5g"));
        let price = price_of(&selection);

        // (10 + 0.004 x 3388 + 2) x 4
        assert_eq!(price.motors, 102.21);
        // (0.5 + 0.75 + 0.1) x 4
        assert_eq!(price.propellers, 5.4);
        // (20 + 33) x 1.3
        assert_eq!(price.frame, 68.9);
        // 40 + 1.2 x 45
        assert_eq!(price.stack, 94.0);
        assert_eq!(price.camera, 30.0);
        // 5 + 0.0045 x 1300 x 4
        assert_eq!(price.battery, 28.4);
        assert_eq!(price.aux, 5.0);
        assert_eq!(price.total, 333.91);
    }

    #[test]
    fn test_camera_keywords() {
        let config = PricingConfig::default();
        let camera = |kind: &str| {
            CameraProfile::from_component(&CatalogComponent::new("Cam").with_spec("type", kind))
        };
        assert_eq!(camera_price(&camera("DJI O3 Digital"), &config), 120.0);
        assert_eq!(camera_price(&camera("4K action"), &config), 150.0);
        assert_eq!(camera_price(&camera("HD"), &config), 120.0);
        assert_eq!(camera_price(&camera("CMOS analog"), &config), 30.0);
    }

    #[test]
    fn test_aio_stack_discount() {
        let config = PricingConfig::default();
        let stack = StackProfile::from_component(&CatalogComponent::new("S").with_spec("type", "AIO"));
        assert!((stack_price(&stack, 20.0, &config) - 51.2).abs() < 1e-9);
    }
}
