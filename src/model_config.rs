//! Model configuration: every coefficient the estimators use, with defaults.
//!
//! All sections carry `#[serde(default)]`, so a TOML file only needs to name the knobs
//! it changes. The defaults alone fully specify the model.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::bands::{BandTable, KeywordTable};
use crate::error::{ConfigError, PerformanceError};

static DEFAULT_MODEL_CONFIG: Lazy<ModelConfig> = Lazy::new(ModelConfig::default);

/// Band tables whose factors are upper limits rather than multipliers.
const CEILING_TABLES: [&str; 2] = ["limits.flight_time_ceiling_min", "limits.top_speed_ceiling_kmh"];

/// Root of the model configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub environment: EnvironmentConfig,
    pub battery: BatteryModelConfig,
    pub endurance: EnduranceConfig,
    pub motor: MotorModelConfig,
    pub propeller: PropellerModelConfig,
    pub system: SystemLossConfig,
    pub thrust: ThrustModelConfig,
    pub flight_style: FlightStyleConfig,
    pub aero: AeroConfig,
    pub limits: LimitsConfig,
    pub mass: MassModelConfig,
    pub pricing: PricingConfig,
}

/// Flying conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub altitude_m: f64,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub wind_speed_mps: f64,
    /// Current multiplier by altitude (m)
    pub altitude_current: BandTable,
    /// Current multiplier by ambient temperature (°C)
    pub temperature_current: BandTable,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            altitude_m: 0.0,
            temperature_c: 25.0,
            humidity_percent: 50.0,
            wind_speed_mps: 0.0,
            altitude_current: BandTable::new(&[(500.0, 1.0), (1500.0, 1.03), (3000.0, 1.07)], 1.12),
            temperature_current: BandTable::new(&[(0.0, 1.08), (10.0, 1.04), (35.0, 1.0)], 1.05),
        }
    }
}

/// LiPo pack behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryModelConfig {
    pub nominal_cell_voltage: f64,
    /// Cell count assumed when no battery is selected
    pub default_cell_count: u32,
    /// Share of the rated capacity drawn before landing
    pub usable_capacity_fraction: f64,
    /// Capacity retention of a used pack (1.0 = new)
    pub age_factor: f64,
    /// Capacity derating by discharge rate in C (current / capacity)
    pub discharge_derating: BandTable,
    /// Capacity efficiency by ambient temperature (°C)
    pub temperature_efficiency: BandTable,
    /// Capacity efficiency by altitude (m)
    pub altitude_efficiency: BandTable,
    /// Capacity efficiency by wind speed (m/s)
    pub wind_efficiency: BandTable,
    /// Chemistry quality by capacity (mAh); small packs age and sag worse
    pub chemistry_quality: BandTable,
    /// Quality factor by C-rating
    pub c_rating_quality: BandTable,
    /// Internal resistance per cell (mΩ) by C-rating
    pub internal_resistance_mohm: BandTable,
    /// Voltage sag factor by per-cell current (A)
    pub voltage_sag: BandTable,
    /// Weight of the resistive sag term relative to the nominal cell voltage
    pub resistance_sag_weight: f64,
    /// Lower bound of the resistive sag term
    pub min_resistance_sag_factor: f64,
}

impl Default for BatteryModelConfig {
    fn default() -> Self {
        Self {
            nominal_cell_voltage: 3.7,
            default_cell_count: 4,
            usable_capacity_fraction: 0.8,
            age_factor: 1.0,
            discharge_derating: BandTable::new(&[(5.0, 1.0), (10.0, 0.97), (20.0, 0.93), (40.0, 0.88)], 0.82),
            temperature_efficiency: BandTable::new(
                &[(0.0, 0.75), (10.0, 0.88), (20.0, 0.96), (35.0, 1.0), (45.0, 0.97)],
                0.92,
            ),
            altitude_efficiency: BandTable::new(&[(500.0, 1.0), (1500.0, 0.98), (3000.0, 0.95)], 0.90),
            wind_efficiency: BandTable::new(&[(2.0, 1.0), (5.0, 0.96), (10.0, 0.90)], 0.82),
            chemistry_quality: BandTable::new(&[(500.0, 0.92), (1000.0, 0.95), (2000.0, 0.97)], 0.98),
            c_rating_quality: BandTable::new(&[(30.0, 0.90), (60.0, 0.95), (100.0, 0.98)], 1.0),
            internal_resistance_mohm: BandTable::new(&[(30.0, 12.0), (60.0, 8.0), (100.0, 5.0)], 4.0),
            voltage_sag: BandTable::new(&[(10.0, 0.99), (20.0, 0.97), (40.0, 0.94), (60.0, 0.90)], 0.85),
            resistance_sag_weight: 0.5,
            min_resistance_sag_factor: 0.7,
        }
    }
}

/// Whole-system factors applied to the usable capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnduranceConfig {
    /// By propeller pitch / diameter
    pub pitch_ratio: BandTable,
    /// By hover disk loading (N/m²)
    pub disk_loading: BandTable,
    /// By frame wheelbase (mm)
    pub frame_size: BandTable,
    /// By stator width (mm)
    pub stator_size: BandTable,
}

impl Default for EnduranceConfig {
    fn default() -> Self {
        Self {
            pitch_ratio: BandTable::new(&[(0.7, 1.02), (0.9, 1.0), (1.1, 0.97)], 0.94),
            disk_loading: BandTable::new(&[(50.0, 1.03), (100.0, 1.0), (200.0, 0.96)], 0.90),
            frame_size: BandTable::new(&[(150.0, 0.95), (250.0, 1.0), (350.0, 1.02)], 1.03),
            stator_size: BandTable::new(&[(14.0, 0.96), (22.0, 1.0)], 1.01),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorModelConfig {
    /// Loaded / no-load RPM by stator width (mm)
    pub load_efficiency: BandTable,
    /// Efficiency by relative deviation from the optimal KV
    pub kv_deviation_efficiency: BandTable,
    /// Electrical -> shaft efficiency by stator width (mm)
    pub stator_efficiency: BandTable,
    /// Optimal loaded-tip constant: optimal KV = constant / (prop inches x volts)
    pub optimal_kv_constant: f64,
    /// Motor power (W) per stator cm³ per KV per cell
    pub power_per_stator_kv_cell: f64,
}

impl Default for MotorModelConfig {
    fn default() -> Self {
        Self {
            load_efficiency: BandTable::new(&[(14.0, 0.74), (18.0, 0.77), (22.0, 0.80), (26.0, 0.82)], 0.84),
            kv_deviation_efficiency: BandTable::new(&[(0.10, 1.0), (0.25, 0.97), (0.50, 0.92)], 0.85),
            stator_efficiency: BandTable::new(&[(14.0, 0.72), (18.0, 0.76), (22.0, 0.80), (26.0, 0.82)], 0.84),
            optimal_kv_constant: 195_000.0,
            power_per_stator_kv_cell: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropellerModelConfig {
    /// Ideal / actual hover power
    pub hover_figure_of_merit: f64,
    /// Induced velocity as a share of the geometric inflow at the tip
    pub induced_velocity_fraction: f64,
    /// Thrust coefficient of a two-blade prop at the optimal blade angle
    pub blade_element_ct: f64,
    /// Thrust scales with (blades / 2)^exponent
    pub blade_count_exponent: f64,
    pub optimal_blade_angle_deg: f64,
    /// Efficiency lost per degree away from the optimal blade angle
    pub blade_angle_penalty_per_deg: f64,
    pub min_blade_angle_efficiency: f64,
    /// Efficiency by hover disk loading (N/m²)
    pub disk_loading_efficiency: BandTable,
    /// Efficiency by pitch / diameter
    pub pitch_ratio_efficiency: BandTable,
    /// High-speed efficiency by advance ratio at pitch speed
    pub advance_ratio_efficiency: BandTable,
    /// Efficiency by blade material keyword
    pub material_efficiency: KeywordTable,
}

impl Default for PropellerModelConfig {
    fn default() -> Self {
        Self {
            hover_figure_of_merit: 0.65,
            induced_velocity_fraction: 0.2,
            blade_element_ct: 0.045,
            blade_count_exponent: 0.5,
            optimal_blade_angle_deg: 15.0,
            blade_angle_penalty_per_deg: 0.02,
            min_blade_angle_efficiency: 0.5,
            disk_loading_efficiency: BandTable::new(&[(50.0, 0.80), (100.0, 0.76), (200.0, 0.72)], 0.66),
            pitch_ratio_efficiency: BandTable::new(&[(0.6, 0.96), (0.9, 1.0), (1.1, 0.97)], 0.92),
            advance_ratio_efficiency: BandTable::new(&[(0.6, 0.85), (0.9, 0.80), (1.2, 0.75)], 0.70),
            material_efficiency: KeywordTable::new(&[("carbon", 1.03), ("glass", 1.01), ("nylon", 0.98)], 1.0),
        }
    }
}

/// Electrical losses between the pack and the motors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemLossConfig {
    /// ESC efficiency by continuous current rating (A)
    pub esc_efficiency: BandTable,
    pub wiring_efficiency: f64,
    /// ESC rating assumed when the stack does not declare one (A)
    pub default_esc_current_a: f64,
    /// Share of the ESC rating a motor may draw continuously
    pub esc_current_cap_fraction: f64,
    /// Plausible total current band per kg of aircraft (A/kg)
    pub min_current_per_kg: f64,
    pub max_current_per_kg: f64,
}

impl Default for SystemLossConfig {
    fn default() -> Self {
        Self {
            esc_efficiency: BandTable::new(&[(20.0, 0.92), (35.0, 0.94), (50.0, 0.95)], 0.96),
            wiring_efficiency: 0.97,
            default_esc_current_a: 35.0,
            esc_current_cap_fraction: 0.85,
            min_current_per_kg: 8.0,
            max_current_per_kg: 120.0,
        }
    }
}

/// Blending of the computed thrust with the declared figure and final derating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrustModelConfig {
    /// Computed / declared ratio range inside which both are blended
    pub blend_lower_ratio: f64,
    pub blend_upper_ratio: f64,
    /// Weight of the computed value inside the blend range
    pub computed_blend_weight: f64,
    /// Declared figure scale when the computed value is far below it
    pub below_range_scale: f64,
    /// Declared figure scale when the computed value is far above it
    pub above_range_scale: f64,
    pub match_factor_min: f64,
    pub match_factor_max: f64,
    /// Loss of match factor per unit of weighted relative mismatch
    pub match_sensitivity: f64,
    pub match_diameter_weight: f64,
    pub match_pitch_weight: f64,
    /// Ideal prop diameter (in) = coefficient x motor_power^(1/3)
    pub ideal_diameter_coefficient: f64,
    /// Ideal pitch / diameter
    pub ideal_pitch_ratio: f64,
    /// Real-world vs bench conditions
    pub condition_derating: f64,
    /// Manufacturing tolerance
    pub tolerance_derating: f64,
}

impl Default for ThrustModelConfig {
    fn default() -> Self {
        Self {
            blend_lower_ratio: 0.7,
            blend_upper_ratio: 1.3,
            computed_blend_weight: 0.6,
            below_range_scale: 0.85,
            above_range_scale: 1.10,
            match_factor_min: 0.85,
            match_factor_max: 1.15,
            match_sensitivity: 0.6,
            match_diameter_weight: 0.6,
            match_pitch_weight: 0.4,
            ideal_diameter_coefficient: 0.55,
            ideal_pitch_ratio: 0.85,
            condition_derating: 0.85,
            tolerance_derating: 0.95,
        }
    }
}

/// Thrust multiplier and share of flight time for one flight phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub thrust_multiplier: f64,
    pub time_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseMix {
    pub hover: PhaseSpec,
    pub cruise: PhaseSpec,
    pub sport: PhaseSpec,
    pub aggressive: PhaseSpec,
}

impl Default for PhaseMix {
    fn default() -> Self {
        Self {
            hover: PhaseSpec { thrust_multiplier: 1.0, time_ratio: 0.30 },
            cruise: PhaseSpec { thrust_multiplier: 1.4, time_ratio: 0.45 },
            sport: PhaseSpec { thrust_multiplier: 1.8, time_ratio: 0.20 },
            aggressive: PhaseSpec { thrust_multiplier: 2.2, time_ratio: 0.05 },
        }
    }
}

/// One factor per flight style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleFactors {
    pub whoop: f64,
    pub racing: f64,
    pub freestyle: f64,
    pub cinematic: f64,
    pub long_range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightStyleConfig {
    pub phases: PhaseMix,
    /// Power grows with thrust^exponent
    pub power_exponent: f64,
    pub whoop_max_wheelbase_mm: f64,
    pub racing_min_kv: f64,
    pub racing_max_wheelbase_mm: f64,
    pub long_range_min_wheelbase_mm: f64,
    pub long_range_max_kv: f64,
    pub cinematic_max_wheelbase_mm: f64,
    /// Current multiplier per style
    pub power_multiplier: StyleFactors,
    /// Flight-time multiplier per style
    pub time_factor: StyleFactors,
}

impl Default for FlightStyleConfig {
    fn default() -> Self {
        Self {
            phases: PhaseMix::default(),
            power_exponent: 1.5,
            whoop_max_wheelbase_mm: 120.0,
            racing_min_kv: 2400.0,
            racing_max_wheelbase_mm: 240.0,
            long_range_min_wheelbase_mm: 300.0,
            long_range_max_kv: 1400.0,
            cinematic_max_wheelbase_mm: 180.0,
            power_multiplier: StyleFactors {
                whoop: 1.0,
                racing: 1.25,
                freestyle: 1.12,
                cinematic: 0.95,
                long_range: 0.85,
            },
            time_factor: StyleFactors {
                whoop: 1.0,
                racing: 0.85,
                freestyle: 0.93,
                cinematic: 1.0,
                long_range: 1.08,
            },
        }
    }
}

/// Airframe aerodynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AeroConfig {
    /// Current factor by wheelbase (mm)
    pub frame_current_factor: BandTable,
    /// Current factor by thrust-to-weight ratio
    pub twr_current_factor: BandTable,
    /// Forward-flight drag coefficient by wheelbase (mm)
    pub drag_coefficient: BandTable,
    /// Frontal area (m²) = coefficient x wheelbase(m)²
    pub frontal_area_coefficient: f64,
    /// Loaded / no-load RPM in forward flight
    pub top_speed_load_efficiency: f64,
    pub twr_speed_factor: BandTable,
    pub frame_speed_factor: BandTable,
    pub pitch_ratio_speed_factor: BandTable,
}

impl Default for AeroConfig {
    fn default() -> Self {
        Self {
            frame_current_factor: BandTable::new(&[(150.0, 1.08), (250.0, 1.0), (350.0, 0.97)], 0.95),
            twr_current_factor: BandTable::new(&[(2.0, 0.95), (4.0, 1.0), (6.0, 1.06)], 1.12),
            drag_coefficient: BandTable::new(&[(150.0, 1.3), (250.0, 1.1), (350.0, 1.0)], 0.95),
            frontal_area_coefficient: 0.25,
            top_speed_load_efficiency: 0.8,
            twr_speed_factor: BandTable::new(&[(2.0, 0.8), (3.0, 0.9), (5.0, 1.0), (8.0, 1.05)], 1.1),
            frame_speed_factor: BandTable::new(&[(150.0, 0.85), (250.0, 1.0), (350.0, 0.97)], 0.92),
            pitch_ratio_speed_factor: BandTable::new(&[(0.7, 0.92), (0.9, 1.0), (1.1, 1.05)], 1.08),
        }
    }
}

/// Clamps and realistic ceilings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub twr_min: f64,
    pub twr_max: f64,
    /// Flight-time ceiling (min) by capacity tier (mAh)
    pub flight_time_ceiling_min: BandTable,
    /// Ceiling multiplier for racing builds
    pub racing_ceiling_factor: f64,
    /// Electrical power per kg above which the ceiling is reduced (W/kg)
    pub high_power_to_weight_w_per_kg: f64,
    pub high_power_ceiling_factor: f64,
    pub flight_time_floor_min: f64,
    /// Top-speed ceiling (km/h) by wheelbase tier (mm): tiny to large
    pub top_speed_ceiling_kmh: BandTable,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            twr_min: 1.0,
            twr_max: 15.0,
            flight_time_ceiling_min: BandTable::new(
                &[(600.0, 8.0), (1100.0, 10.0), (1600.0, 12.0), (2500.0, 18.0), (4000.0, 30.0)],
                45.0,
            ),
            racing_ceiling_factor: 0.8,
            high_power_to_weight_w_per_kg: 450.0,
            high_power_ceiling_factor: 0.9,
            flight_time_floor_min: 0.5,
            top_speed_ceiling_kmh: BandTable::new(
                &[(100.0, 60.0), (150.0, 90.0), (200.0, 130.0), (250.0, 160.0), (350.0, 150.0)],
                120.0,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassModelConfig {
    /// Stack mass (g) by stack type keyword when no weight is declared
    pub stack_type_mass_g: KeywordTable,
}

impl Default for MassModelConfig {
    fn default() -> Self {
        Self {
            stack_type_mass_g: KeywordTable::new(&[("mini", 10.0), ("aio", 15.0)], 25.0),
        }
    }
}

/// Price heuristics for components without a declared price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub motor_base: f64,
    /// Per mm³ of stator width² x height
    pub motor_per_stator_volume: f64,
    pub motor_high_kv_threshold: f64,
    pub motor_high_kv_premium: f64,
    pub frame_base: f64,
    pub frame_per_mm: f64,
    pub frame_material: KeywordTable,
    pub stack_base: f64,
    pub stack_per_esc_amp: f64,
    pub stack_type_factor: KeywordTable,
    pub camera_type_price: KeywordTable,
    pub propeller_base: f64,
    pub propeller_per_inch: f64,
    pub propeller_per_extra_blade: f64,
    pub battery_base: f64,
    pub battery_per_mah_cell: f64,
    pub aux_default: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            motor_base: 10.0,
            motor_per_stator_volume: 0.004,
            motor_high_kv_threshold: 2500.0,
            motor_high_kv_premium: 2.0,
            frame_base: 20.0,
            frame_per_mm: 0.15,
            frame_material: KeywordTable::new(&[("carbon", 1.3), ("alumin", 1.1), ("plastic", 0.7)], 1.0),
            stack_base: 40.0,
            stack_per_esc_amp: 1.2,
            stack_type_factor: KeywordTable::new(&[("aio", 0.8)], 1.0),
            camera_type_price: KeywordTable::new(&[("4k", 150.0), ("digital", 120.0), ("hd", 120.0)], 30.0),
            propeller_base: 0.5,
            propeller_per_inch: 0.15,
            propeller_per_extra_blade: 0.1,
            battery_base: 5.0,
            battery_per_mah_cell: 0.0045,
            aux_default: 5.0,
        }
    }
}

impl ModelConfig {
    /// The immutable process-wide default.
    pub fn shared_default() -> &'static ModelConfig {
        &DEFAULT_MODEL_CONFIG
    }

    /// Parse a (possibly partial) TOML document and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, PerformanceError> {
        let config: ModelConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn band_tables(&self) -> Vec<(&'static str, &BandTable)> {
        vec![
            ("environment.altitude_current", &self.environment.altitude_current),
            ("environment.temperature_current", &self.environment.temperature_current),
            ("battery.discharge_derating", &self.battery.discharge_derating),
            ("battery.temperature_efficiency", &self.battery.temperature_efficiency),
            ("battery.altitude_efficiency", &self.battery.altitude_efficiency),
            ("battery.wind_efficiency", &self.battery.wind_efficiency),
            ("battery.chemistry_quality", &self.battery.chemistry_quality),
            ("battery.c_rating_quality", &self.battery.c_rating_quality),
            ("battery.internal_resistance_mohm", &self.battery.internal_resistance_mohm),
            ("battery.voltage_sag", &self.battery.voltage_sag),
            ("endurance.pitch_ratio", &self.endurance.pitch_ratio),
            ("endurance.disk_loading", &self.endurance.disk_loading),
            ("endurance.frame_size", &self.endurance.frame_size),
            ("endurance.stator_size", &self.endurance.stator_size),
            ("motor.load_efficiency", &self.motor.load_efficiency),
            ("motor.kv_deviation_efficiency", &self.motor.kv_deviation_efficiency),
            ("motor.stator_efficiency", &self.motor.stator_efficiency),
            ("propeller.disk_loading_efficiency", &self.propeller.disk_loading_efficiency),
            ("propeller.pitch_ratio_efficiency", &self.propeller.pitch_ratio_efficiency),
            ("propeller.advance_ratio_efficiency", &self.propeller.advance_ratio_efficiency),
            ("system.esc_efficiency", &self.system.esc_efficiency),
            ("aero.frame_current_factor", &self.aero.frame_current_factor),
            ("aero.twr_current_factor", &self.aero.twr_current_factor),
            ("aero.drag_coefficient", &self.aero.drag_coefficient),
            ("aero.twr_speed_factor", &self.aero.twr_speed_factor),
            ("aero.frame_speed_factor", &self.aero.frame_speed_factor),
            ("aero.pitch_ratio_speed_factor", &self.aero.pitch_ratio_speed_factor),
            ("limits.flight_time_ceiling_min", &self.limits.flight_time_ceiling_min),
            ("limits.top_speed_ceiling_kmh", &self.limits.top_speed_ceiling_kmh),
        ]
    }

    /// Reject configurations that would break the estimator guarantees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, table) in self.band_tables() {
            if !table.is_ordered() {
                return Err(ConfigError::UnorderedBands { table: name.to_string() });
            }
            // Ceilings must leave room to fly; every other table is a multiplier
            let is_ceiling = CEILING_TABLES.contains(&name);
            if let Some(factor) = table.factors().find(|f| !(*f > 0.0 || (!is_ceiling && *f == 0.0))) {
                return Err(ConfigError::InvalidFactor { table: name.to_string(), factor });
            }
        }

        let fractions = [
            ("battery.usable_capacity_fraction", self.battery.usable_capacity_fraction),
            ("battery.age_factor", self.battery.age_factor),
            ("propeller.hover_figure_of_merit", self.propeller.hover_figure_of_merit),
            ("system.wiring_efficiency", self.system.wiring_efficiency),
            ("system.esc_current_cap_fraction", self.system.esc_current_cap_fraction),
            ("aero.top_speed_load_efficiency", self.aero.top_speed_load_efficiency),
        ];
        for (field, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::FractionOutOfRange { field: field.to_string(), value });
            }
        }

        let positives = [
            ("battery.nominal_cell_voltage", self.battery.nominal_cell_voltage),
            ("battery.default_cell_count", self.battery.default_cell_count as f64),
            ("system.default_esc_current_a", self.system.default_esc_current_a),
            ("motor.optimal_kv_constant", self.motor.optimal_kv_constant),
            ("flight_style.power_exponent", self.flight_style.power_exponent),
            ("limits.racing_ceiling_factor", self.limits.racing_ceiling_factor),
            ("limits.high_power_ceiling_factor", self.limits.high_power_ceiling_factor),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field: field.to_string(), value });
            }
        }

        let bounds = [
            ("limits.twr", self.limits.twr_min, self.limits.twr_max),
            ("thrust.match_factor", self.thrust.match_factor_min, self.thrust.match_factor_max),
            ("thrust.blend_ratio", self.thrust.blend_lower_ratio, self.thrust.blend_upper_ratio),
            (
                "system.current_per_kg",
                self.system.min_current_per_kg,
                self.system.max_current_per_kg,
            ),
        ];
        for (field, min, max) in bounds {
            if min > max {
                return Err(ConfigError::InvertedBounds { field: field.to_string(), min, max });
            }
        }

        let phases = &self.flight_style.phases;
        let ratio_sum = phases.hover.time_ratio
            + phases.cruise.time_ratio
            + phases.sport.time_ratio
            + phases.aggressive.time_ratio;
        if !(ratio_sum > 0.0) {
            return Err(ConfigError::EmptyPhaseMix);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ModelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_shared_default_matches_default() {
        assert_eq!(ModelConfig::shared_default(), &ModelConfig::default());
        // Same allocation every time
        assert!(std::ptr::eq(ModelConfig::shared_default(), ModelConfig::shared_default()));
    }

    #[test]
    fn test_default_phase_mix() {
        let phases = ModelConfig::default().flight_style.phases;
        let sum = phases.hover.time_ratio
            + phases.cruise.time_ratio
            + phases.sport.time_ratio
            + phases.aggressive.time_ratio;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let text = r#"
            [environment]
            altitude_m = 1500.0
            temperature_c = 5.0

            [limits]
            twr_max = 12.0
        "#;
        let config = ModelConfig::from_toml_str(text).unwrap();
        assert_eq!(config.environment.altitude_m, 1500.0);
        assert_eq!(config.environment.temperature_c, 5.0);
        assert_eq!(config.environment.humidity_percent, 50.0);
        assert_eq!(config.limits.twr_max, 12.0);
        assert_eq!(config.limits.twr_min, 1.0);
        assert_eq!(config.battery, BatteryModelConfig::default());
    }

    #[test]
    fn test_band_table_from_toml() {
        let text = r#"
            [limits.flight_time_ceiling_min]
            bands = [[500.0, 6.0], [1500.0, 11.0]]
            otherwise = 40.0
        "#;
        let config = ModelConfig::from_toml_str(text).unwrap();
        assert_eq!(config.limits.flight_time_ceiling_min.lookup(450.0), 6.0);
        assert_eq!(config.limits.flight_time_ceiling_min.lookup(9000.0), 40.0);
    }

    #[test]
    fn test_rejects_negative_ceiling() {
        let text = r#"
            [limits.flight_time_ceiling_min]
            bands = [[600.0, -5.0]]
            otherwise = -5.0
        "#;
        let err = ModelConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(
            err,
            PerformanceError::Config(ConfigError::InvalidFactor { ref table, .. })
                if table == "limits.flight_time_ceiling_min"
        ));

        let mut config = ModelConfig::default();
        config.limits.top_speed_ceiling_kmh.otherwise = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidFactor { .. })));
    }

    #[test]
    fn test_rejects_negative_efficiency() {
        let mut config = ModelConfig::default();
        config.system.esc_efficiency.bands[0].1 = -0.9;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidFactor {
                table: "system.esc_efficiency".to_string(),
                factor: -0.9,
            })
        );

        let mut config = ModelConfig::default();
        config.battery.voltage_sag.otherwise = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = ModelConfig::default();
        config.limits.racing_ceiling_factor = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn test_rejects_unordered_bands() {
        let text = r#"
            [system.esc_efficiency]
            bands = [[50.0, 0.95], [20.0, 0.92]]
            otherwise = 0.96
        "#;
        match ModelConfig::from_toml_str(text) {
            Err(PerformanceError::Config(ConfigError::UnorderedBands { table })) => {
                assert_eq!(table, "system.esc_efficiency");
            }
            other => panic!("expected unordered band error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_fraction() {
        let mut config = ModelConfig::default();
        config.battery.usable_capacity_fraction = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FractionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_twr_bounds() {
        let mut config = ModelConfig::default();
        config.limits.twr_min = 20.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvertedBounds { .. })));
    }

    #[test]
    fn test_rejects_empty_phase_mix() {
        let mut config = ModelConfig::default();
        config.flight_style.phases.hover.time_ratio = 0.0;
        config.flight_style.phases.cruise.time_ratio = 0.0;
        config.flight_style.phases.sport.time_ratio = 0.0;
        config.flight_style.phases.aggressive.time_ratio = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyPhaseMix));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            ModelConfig::from_toml_str("limits = 3"),
            Err(PerformanceError::Toml(_))
        ));
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = toml::to_string(&ModelConfig::default()).unwrap();
        let parsed = ModelConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, ModelConfig::default());
    }
}
