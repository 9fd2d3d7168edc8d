//! Component selection as handed over by the catalog.
//!
//! Everything here is raw text exactly as the catalog stores it. Typed, unit-explicit
//! values are produced once by [`crate::profile::BuildProfile`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MOTOR_COUNT;
use crate::error::PerformanceError;

/// Specification field names understood by the estimators.
pub mod fields {
    pub const WEIGHT: &str = "weight";
    pub const PRICE: &str = "price";
    pub const TYPE: &str = "type";
    pub const MATERIAL: &str = "material";

    // Motor
    pub const KV: &str = "kv";
    pub const STATOR_SIZE: &str = "stator_size";
    pub const MAX_THRUST: &str = "max_thrust";
    pub const VOLTAGE_COMPATIBILITY: &str = "voltage_compatibility";

    // Propeller
    pub const SIZE: &str = "size";
    pub const PITCH: &str = "pitch";
    pub const BLADES: &str = "blades";
    pub const RECOMMENDED_MOTOR_SIZE: &str = "recommended_motor_size";

    // Frame
    pub const WHEELBASE: &str = "wheelbase";
    pub const STACK_MOUNTING: &str = "stack_mounting";
    pub const PROP_SIZE_COMPATIBILITY: &str = "prop_size_compatibility";

    // Stack
    pub const ESC_CURRENT: &str = "esc_current";
    pub const MOUNTING_SIZE: &str = "mounting_size";
    pub const VOLTAGE_INPUT: &str = "voltage_input";

    // Battery
    pub const CAPACITY: &str = "capacity";
    pub const CELL_COUNT: &str = "cell_count";
    pub const DISCHARGE_RATE: &str = "discharge_rate";
}

/// Component slots of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSlot {
    Motor,
    Frame,
    Stack,
    Camera,
    Propeller,
    Battery,
}

impl ComponentSlot {
    pub const ALL: [ComponentSlot; 6] = [
        ComponentSlot::Motor,
        ComponentSlot::Frame,
        ComponentSlot::Stack,
        ComponentSlot::Camera,
        ComponentSlot::Propeller,
        ComponentSlot::Battery,
    ];

    /// How many units of this slot's component go on the airframe.
    pub fn quantity(&self) -> f64 {
        match self {
            ComponentSlot::Motor | ComponentSlot::Propeller => MOTOR_COUNT,
            _ => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentSlot::Motor => "motor",
            ComponentSlot::Frame => "frame",
            ComponentSlot::Stack => "stack",
            ComponentSlot::Camera => "camera",
            ComponentSlot::Propeller => "propeller",
            ComponentSlot::Battery => "battery",
        }
    }
}

impl fmt::Display for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog product: a name plus its text specification fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogComponent {
    pub name: String,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
}

impl CatalogComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specs: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_spec(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.specs.insert(key.into(), value.into());
        self
    }

    /// Field text by name: exact key first, then ASCII case-insensitive.
    /// Blank values count as absent.
    pub fn spec(&self, key: &str) -> Option<&str> {
        let value = self.specs.get(key).or_else(|| {
            self.specs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })?;

        let trimmed = value.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Extra mass carried by the build (GPS, action camera mount, lights...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryWeight {
    pub name: String,
    pub weight: String,
    #[serde(default)]
    pub price: Option<String>,
}

impl AuxiliaryWeight {
    pub fn new(name: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: weight.into(),
            price: None,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }
}

/// The components a user picked for one build. Every slot is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSelection {
    pub motor: Option<CatalogComponent>,
    pub frame: Option<CatalogComponent>,
    pub stack: Option<CatalogComponent>,
    pub camera: Option<CatalogComponent>,
    pub propeller: Option<CatalogComponent>,
    pub battery: Option<CatalogComponent>,
    pub aux_weights: Vec<AuxiliaryWeight>,
}

impl ComponentSelection {
    /// Parse a selection from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, PerformanceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, slot: ComponentSlot) -> Option<&CatalogComponent> {
        match slot {
            ComponentSlot::Motor => self.motor.as_ref(),
            ComponentSlot::Frame => self.frame.as_ref(),
            ComponentSlot::Stack => self.stack.as_ref(),
            ComponentSlot::Camera => self.camera.as_ref(),
            ComponentSlot::Propeller => self.propeller.as_ref(),
            ComponentSlot::Battery => self.battery.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ComponentSlot) -> &mut Option<CatalogComponent> {
        match slot {
            ComponentSlot::Motor => &mut self.motor,
            ComponentSlot::Frame => &mut self.frame,
            ComponentSlot::Stack => &mut self.stack,
            ComponentSlot::Camera => &mut self.camera,
            ComponentSlot::Propeller => &mut self.propeller,
            ComponentSlot::Battery => &mut self.battery,
        }
    }

    /// Copy of the selection with `slot` populated.
    pub fn with(mut self, slot: ComponentSlot, component: CatalogComponent) -> Self {
        *self.slot_mut(slot) = Some(component);
        self
    }

    /// Copy of the selection with `slot` emptied.
    pub fn without(mut self, slot: ComponentSlot) -> Self {
        *self.slot_mut(slot) = None;
        self
    }

    pub fn with_aux(mut self, aux: AuxiliaryWeight) -> Self {
        self.aux_weights.push(aux);
        self
    }

    /// Slots that currently hold a component.
    pub fn populated_slots(&self) -> Vec<ComponentSlot> {
        ComponentSlot::ALL
            .iter()
            .copied()
            .filter(|slot| self.get(*slot).is_some())
            .collect()
    }
}
