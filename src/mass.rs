use serde::{Deserialize, Serialize};

use crate::catalog::ComponentSlot;
use crate::model_config::ModelConfig;
use crate::profile::BuildProfile;

/// All-up mass split by category, in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MassBreakdown {
    pub motors_g: f64,
    pub propellers_g: f64,
    pub frame_g: f64,
    pub stack_g: f64,
    pub camera_g: f64,
    pub battery_g: f64,
    pub aux_g: f64,
    pub total_g: f64,
}

impl MassBreakdown {
    pub fn total_kg(&self) -> f64 {
        self.total_g / 1000.0
    }
}

/// Sum the mass of every selected component.
///
/// Motors and propellers count four times. A stack without a declared weight is
/// looked up by its type text; any other present component without a weight uses
/// its category fallback. Absent components contribute nothing.
pub fn aggregate_mass(profile: &BuildProfile, config: &ModelConfig) -> MassBreakdown {
    let motors_g = profile
        .motor
        .as_ref()
        .map(|m| m.mass_g * ComponentSlot::Motor.quantity())
        .unwrap_or(0.0);
    let propellers_g = profile
        .propeller
        .as_ref()
        .map(|p| p.mass_g * ComponentSlot::Propeller.quantity())
        .unwrap_or(0.0);
    let frame_g = profile.frame.as_ref().map(|f| f.mass_g).unwrap_or(0.0);
    let stack_g = profile
        .stack
        .as_ref()
        .map(|s| {
            s.mass_g
                .unwrap_or_else(|| config.mass.stack_type_mass_g.lookup(&s.kind))
        })
        .unwrap_or(0.0);
    let camera_g = profile.camera.as_ref().map(|c| c.mass_g).unwrap_or(0.0);
    let battery_g = profile.battery.as_ref().map(|b| b.mass_g).unwrap_or(0.0);
    let aux_g: f64 = profile.aux.iter().map(|a| a.mass_g).sum();

    MassBreakdown {
        motors_g,
        propellers_g,
        frame_g,
        stack_g,
        camera_g,
        battery_g,
        aux_g,
        total_g: motors_g + propellers_g + frame_g + stack_g + camera_g + battery_g + aux_g,
    }
}
