//! Typed, unit-explicit view of a component selection.
//!
//! Every catalog text field is parsed exactly once, here. The estimators downstream
//! only ever see grams, millimeters, inches, mAh and plain counts.

use crate::catalog::{fields, AuxiliaryWeight, CatalogComponent, ComponentSelection};
use crate::model_config::ModelConfig;
use crate::constants::*;
use crate::spec_value::{
    first_number, parse_capacity_mah, parse_length_mm, parse_mass_g, parse_number,
    parse_parallel_count, parse_prop_geometry, parse_series_cells, parse_stator,
    StatorDimensions,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MotorProfile {
    pub name: String,
    pub kv: f64,
    pub stator: StatorDimensions,
    pub mass_g: f64,
    /// Manufacturer bench thrust per motor (g)
    pub declared_thrust_g: Option<f64>,
    pub price: Option<f64>,
}

impl MotorProfile {
    pub fn from_component(component: &CatalogComponent) -> Self {
        let stator = parse_stator(component.spec(fields::STATOR_SIZE))
            .or_else(|| parse_stator(Some(component.name.as_str())))
            .unwrap_or(StatorDimensions {
                width_mm: STATOR_WIDTH_FALLBACK_MM,
                height_mm: STATOR_HEIGHT_FALLBACK_MM,
            });

        Self {
            name: component.name.clone(),
            kv: parse_number(component.spec(fields::KV), MOTOR_KV_FALLBACK),
            stator,
            mass_g: parse_mass_g(component.spec(fields::WEIGHT)).unwrap_or(MOTOR_MASS_FALLBACK_G),
            declared_thrust_g: parse_mass_g(component.spec(fields::MAX_THRUST)).filter(|t| *t > 0.0),
            price: declared_price(component),
        }
    }

    /// Stator volume proxy: width² x height (mm³).
    pub fn stator_volume_mm3(&self) -> f64 {
        self.stator.width_mm.powi(2) * self.stator.height_mm
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropellerProfile {
    pub name: String,
    pub diameter_in: f64,
    pub pitch_in: f64,
    pub blades: f64,
    pub mass_g: f64,
    pub material: String,
    pub price: Option<f64>,
}

impl PropellerProfile {
    pub fn from_component(component: &CatalogComponent) -> Self {
        let mut geometry = parse_prop_geometry(component.spec(fields::SIZE));
        if geometry.diameter_in.is_none() {
            geometry = parse_prop_geometry(Some(component.name.as_str()));
        }

        let diameter_in = geometry
            .diameter_in
            .filter(|d| *d > 0.0)
            .unwrap_or(PROP_DIAMETER_FALLBACK_IN);
        let pitch_in = component
            .spec(fields::PITCH)
            .and_then(first_number)
            .or(geometry.pitch_in)
            .filter(|p| *p > 0.0)
            .unwrap_or(diameter_in * PROP_PITCH_TO_DIAMETER_FALLBACK);
        let blades = component
            .spec(fields::BLADES)
            .and_then(first_number)
            .or(geometry.blades)
            .filter(|b| *b >= 1.0)
            .unwrap_or(PROP_BLADES_FALLBACK);

        Self {
            name: component.name.clone(),
            diameter_in,
            pitch_in,
            blades,
            mass_g: parse_mass_g(component.spec(fields::WEIGHT)).unwrap_or(PROP_MASS_FALLBACK_G),
            material: component.spec(fields::MATERIAL).unwrap_or_default().to_string(),
            price: declared_price(component),
        }
    }

    pub fn diameter_m(&self) -> f64 {
        self.diameter_in * INCH_TO_M
    }

    pub fn pitch_m(&self) -> f64 {
        self.pitch_in * INCH_TO_M
    }

    pub fn pitch_ratio(&self) -> f64 {
        self.pitch_in / self.diameter_in
    }

    /// Swept disk area of one propeller (m²).
    pub fn disk_area_m2(&self) -> f64 {
        std::f64::consts::PI * (self.diameter_m() / 2.0).powi(2)
    }

    /// Compact "DxPxB" label, e.g. "5x4.3x3".
    pub fn size_label(&self) -> String {
        format!("{}x{}x{}", self.diameter_in, self.pitch_in, self.blades)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameProfile {
    pub name: String,
    pub wheelbase_mm: f64,
    pub mass_g: f64,
    pub material: String,
    pub price: Option<f64>,
}

impl FrameProfile {
    pub fn from_component(component: &CatalogComponent) -> Self {
        Self {
            name: component.name.clone(),
            wheelbase_mm: parse_length_mm(component.spec(fields::WHEELBASE))
                .filter(|w| *w > 0.0)
                .unwrap_or(FRAME_WHEELBASE_FALLBACK_MM),
            mass_g: parse_mass_g(component.spec(fields::WEIGHT)).unwrap_or(FRAME_MASS_FALLBACK_G),
            material: component.spec(fields::MATERIAL).unwrap_or_default().to_string(),
            price: declared_price(component),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackProfile {
    pub name: String,
    /// Type text ("30x30 stack", "AIO"), or the product name when no type is given
    pub kind: String,
    pub esc_current_a: Option<f64>,
    /// Declared mass; the mass model looks one up by type when absent
    pub mass_g: Option<f64>,
    pub price: Option<f64>,
}

impl StackProfile {
    pub fn from_component(component: &CatalogComponent) -> Self {
        Self {
            name: component.name.clone(),
            kind: kind_text(component),
            esc_current_a: component
                .spec(fields::ESC_CURRENT)
                .and_then(first_number)
                .filter(|a| *a > 0.0),
            mass_g: parse_mass_g(component.spec(fields::WEIGHT)),
            price: declared_price(component),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraProfile {
    pub name: String,
    pub kind: String,
    pub mass_g: f64,
    pub price: Option<f64>,
}

impl CameraProfile {
    pub fn from_component(component: &CatalogComponent) -> Self {
        Self {
            name: component.name.clone(),
            kind: kind_text(component),
            mass_g: parse_mass_g(component.spec(fields::WEIGHT)).unwrap_or(CAMERA_MASS_FALLBACK_G),
            price: declared_price(component),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryProfile {
    pub name: String,
    pub capacity_mah: f64,
    /// Series cells, `None` when the pack does not say
    pub series_cells: Option<u32>,
    pub parallel_strings: u32,
    pub c_rating: f64,
    pub mass_g: f64,
    pub price: Option<f64>,
}

impl BatteryProfile {
    pub fn from_component(component: &CatalogComponent) -> Self {
        let cell_text = component.spec(fields::CELL_COUNT);

        Self {
            name: component.name.clone(),
            capacity_mah: parse_capacity_mah(component.spec(fields::CAPACITY))
                .filter(|c| *c > 0.0)
                .unwrap_or(BATTERY_CAPACITY_FALLBACK_MAH),
            series_cells: parse_series_cells(cell_text).or_else(|| {
                // Product names only count when they spell out "nS"
                let name = component.name.to_ascii_lowercase();
                parse_series_cells(Some(name.as_str())).filter(|n| name.contains(&format!("{n}s")))
            }),
            parallel_strings: parse_parallel_count(cell_text),
            c_rating: component
                .spec(fields::DISCHARGE_RATE)
                .and_then(first_number)
                .filter(|c| *c > 0.0)
                .unwrap_or(BATTERY_C_RATING_FALLBACK),
            mass_g: parse_mass_g(component.spec(fields::WEIGHT)).unwrap_or(BATTERY_MASS_FALLBACK_G),
            price: declared_price(component),
        }
    }

    pub fn capacity_ah(&self) -> f64 {
        self.capacity_mah / 1000.0
    }

    /// Continuous current the C-rating allows (A).
    pub fn max_discharge_current_a(&self) -> f64 {
        self.capacity_ah() * self.c_rating
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuxProfile {
    pub name: String,
    pub mass_g: f64,
    pub price: Option<f64>,
}

impl AuxProfile {
    pub fn from_weight(aux: &AuxiliaryWeight) -> Self {
        Self {
            name: aux.name.clone(),
            mass_g: parse_mass_g(Some(aux.weight.as_str())).unwrap_or(AUX_MASS_FALLBACK_G),
            price: aux.price.as_deref().and_then(first_number),
        }
    }
}

/// A whole build in typed form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildProfile {
    pub motor: Option<MotorProfile>,
    pub propeller: Option<PropellerProfile>,
    pub frame: Option<FrameProfile>,
    pub stack: Option<StackProfile>,
    pub camera: Option<CameraProfile>,
    pub battery: Option<BatteryProfile>,
    pub aux: Vec<AuxProfile>,
}

impl BuildProfile {
    pub fn from_selection(selection: &ComponentSelection) -> Self {
        Self {
            motor: selection.motor.as_ref().map(MotorProfile::from_component),
            propeller: selection.propeller.as_ref().map(PropellerProfile::from_component),
            frame: selection.frame.as_ref().map(FrameProfile::from_component),
            stack: selection.stack.as_ref().map(StackProfile::from_component),
            camera: selection.camera.as_ref().map(CameraProfile::from_component),
            battery: selection.battery.as_ref().map(BatteryProfile::from_component),
            aux: selection.aux_weights.iter().map(AuxProfile::from_weight).collect(),
        }
    }

    /// Motor and propeller together, the minimum for any thrust or power figure.
    pub fn drivetrain(&self) -> Option<(&MotorProfile, &PropellerProfile)> {
        Some((self.motor.as_ref()?, self.propeller.as_ref()?))
    }

    /// Series cells of the pack, or the configured default when unknown.
    pub fn cell_count(&self, config: &ModelConfig) -> u32 {
        self.battery
            .as_ref()
            .and_then(|b| b.series_cells)
            .unwrap_or(config.battery.default_cell_count)
    }

    /// Nominal pack voltage (V).
    pub fn pack_voltage(&self, config: &ModelConfig) -> f64 {
        self.cell_count(config) as f64 * config.battery.nominal_cell_voltage
    }

    /// ESC continuous rating per motor (A).
    pub fn esc_current_a(&self, config: &ModelConfig) -> f64 {
        self.stack
            .as_ref()
            .and_then(|s| s.esc_current_a)
            .unwrap_or(config.system.default_esc_current_a)
    }

    pub fn wheelbase_mm(&self) -> f64 {
        self.frame
            .as_ref()
            .map(|f| f.wheelbase_mm)
            .unwrap_or(FRAME_WHEELBASE_FALLBACK_MM)
    }

    pub fn stator_width_mm(&self) -> f64 {
        self.motor
            .as_ref()
            .map(|m| m.stator.width_mm)
            .unwrap_or(STATOR_WIDTH_FALLBACK_MM)
    }

    pub fn pitch_ratio(&self) -> f64 {
        self.propeller
            .as_ref()
            .map(PropellerProfile::pitch_ratio)
            .unwrap_or(PROP_PITCH_TO_DIAMETER_FALLBACK)
    }
}

fn declared_price(component: &CatalogComponent) -> Option<f64> {
    component
        .spec(fields::PRICE)
        .and_then(first_number)
        .filter(|p| *p >= 0.0)
}

fn kind_text(component: &CatalogComponent) -> String {
    component
        .spec(fields::TYPE)
        .unwrap_or(&component.name)
        .to_string()
}
