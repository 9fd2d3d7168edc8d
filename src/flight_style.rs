//! Build classification from motor KV and frame size.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model_config::{FlightStyleConfig, StyleFactors};
use crate::profile::BuildProfile;

/// How the build is expected to be flown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStyle {
    Whoop,
    Racing,
    Freestyle,
    Cinematic,
    LongRange,
}

impl FlightStyle {
    /// Classify by KV and wheelbase. First matching rule wins:
    /// tiny frames are whoops, high KV on a small frame races, big frames or low KV
    /// cruise long range, small frames film, everything else is freestyle.
    pub fn classify(kv: f64, wheelbase_mm: f64, config: &FlightStyleConfig) -> Self {
        if wheelbase_mm < config.whoop_max_wheelbase_mm {
            FlightStyle::Whoop
        } else if kv >= config.racing_min_kv && wheelbase_mm <= config.racing_max_wheelbase_mm {
            FlightStyle::Racing
        } else if wheelbase_mm >= config.long_range_min_wheelbase_mm || kv < config.long_range_max_kv {
            FlightStyle::LongRange
        } else if wheelbase_mm <= config.cinematic_max_wheelbase_mm {
            FlightStyle::Cinematic
        } else {
            FlightStyle::Freestyle
        }
    }

    /// This style's entry in a per-style factor set.
    pub fn factor(&self, factors: &StyleFactors) -> f64 {
        match self {
            FlightStyle::Whoop => factors.whoop,
            FlightStyle::Racing => factors.racing,
            FlightStyle::Freestyle => factors.freestyle,
            FlightStyle::Cinematic => factors.cinematic,
            FlightStyle::LongRange => factors.long_range,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStyle::Whoop => "whoop",
            FlightStyle::Racing => "racing",
            FlightStyle::Freestyle => "freestyle",
            FlightStyle::Cinematic => "cinematic",
            FlightStyle::LongRange => "long_range",
        }
    }
}

impl fmt::Display for FlightStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Style of a build, `None` without a motor.
pub fn classify_build(profile: &BuildProfile, config: &FlightStyleConfig) -> Option<FlightStyle> {
    let motor = profile.motor.as_ref()?;
    Some(FlightStyle::classify(motor.kv, profile.wheelbase_mm(), config))
}

/// Style factor, 1.0 when the style is unknown.
pub fn style_factor(style: Option<FlightStyle>, factors: &StyleFactors) -> f64 {
    style.map(|s| s.factor(factors)).unwrap_or(1.0)
}
