//! Air density for the flight environment.
//!
//! Pressure follows the ICAO Standard Atmosphere for the configured altitude while the
//! temperature is the ambient value from the model configuration, so a hot day at sea
//! level and a cold day in the mountains both move the density the props work against.

use crate::constants::G_ACCEL_MPS2;

/// ICAO Standard Atmosphere layer definitions
#[derive(Debug, Clone)]
struct AtmosphereLayer {
    /// Base altitude of this layer (m)
    base_altitude: f64,
    /// Base temperature at layer start (K)
    base_temperature: f64,
    /// Base pressure at layer start (Pa)
    base_pressure: f64,
    /// Temperature lapse rate (K/m)
    lapse_rate: f64,
}

const R_AIR: f64 = 287.0531;  // Specific gas constant for dry air (J/(kg·K))
const R_DRY: f64 = 287.05;    // Gas constant for dry air
const R_VAPOR: f64 = 461.495; // Gas constant for water vapor

/// Layers a multirotor can plausibly reach; anything above is clamped to the top one.
const ICAO_LAYERS: &[AtmosphereLayer] = &[
    // Troposphere (0 - 11 km)
    AtmosphereLayer {
        base_altitude: 0.0,
        base_temperature: 288.15,   // 15°C
        base_pressure: 101325.0,    // 1013.25 hPa
        lapse_rate: -0.0065,        // -6.5 K/km
    },
    // Tropopause (11 - 20 km)
    AtmosphereLayer {
        base_altitude: 11000.0,
        base_temperature: 216.65,   // -56.5°C
        base_pressure: 22632.1,     // 226.32 hPa
        lapse_rate: 0.0,            // Isothermal
    },
];

/// Standard temperature (K) and pressure (Pa) at an altitude.
fn standard_conditions(altitude_m: f64) -> (f64, f64) {
    let altitude = altitude_m.clamp(0.0, 20000.0);

    let layer = ICAO_LAYERS.iter()
        .rev()
        .find(|layer| altitude >= layer.base_altitude)
        .unwrap_or(&ICAO_LAYERS[0]);

    let height_diff = altitude - layer.base_altitude;
    let temperature = layer.base_temperature + layer.lapse_rate * height_diff;

    let pressure = if layer.lapse_rate.abs() < 1e-10 {
        layer.base_pressure * (-G_ACCEL_MPS2 * height_diff / (R_AIR * layer.base_temperature)).exp()
    } else {
        let temp_ratio = temperature / layer.base_temperature;
        layer.base_pressure * temp_ratio.powf(-G_ACCEL_MPS2 / (layer.lapse_rate * R_AIR))
    };

    (temperature, pressure)
}

/// Saturation vapor pressure in hPa (Arden Buck).
fn saturation_vapor_pressure_hpa(temp_c: f64) -> f64 {
    if temp_c >= 0.0 {
        // Over water
        6.1121 * ((18.678 - temp_c / 234.5) * (temp_c / (257.14 + temp_c))).exp()
    } else {
        // Over ice
        6.1115 * ((23.036 - temp_c / 333.7) * (temp_c / (279.82 + temp_c))).exp()
    }
}

/// Moist air density at the given altitude, ambient temperature and relative humidity.
///
/// # Arguments
/// * `altitude_m` - Altitude above sea level in meters
/// * `temperature_c` - Ambient temperature in Celsius
/// * `humidity_percent` - Relative humidity (0-100)
///
/// # Returns
/// Air density in kg/m³
pub fn air_density(altitude_m: f64, temperature_c: f64, humidity_percent: f64) -> f64 {
    let (_, pressure_pa) = standard_conditions(altitude_m);
    // Keep the gas law away from absolute zero for nonsense configuration values
    let temp_k = (temperature_c + 273.15).max(173.15);
    let temp_c = temp_k - 273.15;

    let humidity = humidity_percent.clamp(0.0, 100.0);
    let vapor_pressure_pa = humidity / 100.0 * saturation_vapor_pressure_hpa(temp_c) * 100.0;
    let dry_pressure_pa = (pressure_pa - vapor_pressure_pa).max(0.0);

    dry_pressure_pa / (R_DRY * temp_k) + vapor_pressure_pa / (R_VAPOR * temp_k)
}
