/// Physical constants and documented fallbacks used by the performance estimators

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Standard air density at sea level (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Conversion factor: inches to meters
pub const INCH_TO_M: f64 = 0.0254;

/// Conversion factor: inches to millimeters
pub const INCH_TO_MM: f64 = 25.4;

/// Conversion factor: meters per second to kilometers per hour
pub const MPS_TO_KMH: f64 = 3.6;

/// Conversion factor: ounces to grams
pub const OZ_TO_G: f64 = 28.349523;

/// Conversion factor: pounds to grams
pub const LB_TO_G: f64 = 453.59237;

/// Number of motors (and propellers) on the airframe.
///
/// The catalog builds are quadcopters; every per-motor quantity is scaled by this.
pub const MOTOR_COUNT: f64 = 4.0;

// Numerical stability constants
/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

/// Minimum mass (g) below which mass-normalised quantities are not evaluated
pub const MIN_MASS_G: f64 = 1e-6;

// Component fallbacks
//
// Used when a present component omits a field or the text carries no number.
// Values are typical of a 5" freestyle build so a partially described component
// still produces a plausible report.

/// Motor mass fallback (g), typical 2207 motor
pub const MOTOR_MASS_FALLBACK_G: f64 = 30.0;

/// Motor KV fallback
pub const MOTOR_KV_FALLBACK: f64 = 2400.0;

/// Stator dimension fallback (mm), width and height of a 2207
pub const STATOR_WIDTH_FALLBACK_MM: f64 = 22.0;
pub const STATOR_HEIGHT_FALLBACK_MM: f64 = 7.0;

/// Propeller mass fallback (g)
pub const PROP_MASS_FALLBACK_G: f64 = 4.0;

/// Propeller geometry fallbacks (inches, blade count)
pub const PROP_DIAMETER_FALLBACK_IN: f64 = 5.0;
pub const PROP_PITCH_TO_DIAMETER_FALLBACK: f64 = 0.85;
pub const PROP_BLADES_FALLBACK: f64 = 3.0;

/// Frame mass fallback (g)
pub const FRAME_MASS_FALLBACK_G: f64 = 110.0;

/// Frame wheelbase fallback (mm)
pub const FRAME_WHEELBASE_FALLBACK_MM: f64 = 220.0;

/// Camera mass fallback (g)
pub const CAMERA_MASS_FALLBACK_G: f64 = 8.0;

/// Battery mass fallback (g)
pub const BATTERY_MASS_FALLBACK_G: f64 = 180.0;

/// Battery capacity fallback (mAh)
pub const BATTERY_CAPACITY_FALLBACK_MAH: f64 = 1300.0;

/// Battery C-rating fallback
pub const BATTERY_C_RATING_FALLBACK: f64 = 75.0;

/// Auxiliary weight mass fallback (g)
pub const AUX_MASS_FALLBACK_G: f64 = 0.0;
