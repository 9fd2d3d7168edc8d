//! Pairwise compatibility checks on the raw catalog text.
//!
//! Every check passes when either side is missing: the component is not selected,
//! or the field it would be compared on is not filled in.

use serde::{Deserialize, Serialize};

use crate::catalog::{fields, CatalogComponent, ComponentSelection};
use crate::spec_value::parse_series_cells;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub motor_prop: bool,
    pub voltage: bool,
    pub mounting: bool,
    pub frame_prop: bool,
}

impl Default for CompatibilityReport {
    fn default() -> Self {
        Self {
            motor_prop: true,
            voltage: true,
            mounting: true,
            frame_prop: true,
        }
    }
}

impl CompatibilityReport {
    pub fn all_compatible(&self) -> bool {
        self.motor_prop && self.voltage && self.mounting && self.frame_prop
    }

    /// Names of the failed checks.
    pub fn issues(&self) -> Vec<&'static str> {
        [
            (self.motor_prop, "motor_prop"),
            (self.voltage, "voltage"),
            (self.mounting, "mounting"),
            (self.frame_prop, "frame_prop"),
        ]
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, name)| name)
        .collect()
    }
}

fn field<'a>(component: Option<&'a CatalogComponent>, key: &str) -> Option<&'a str> {
    component.and_then(|c| c.spec(key))
}

/// True when `haystack` contains `needle` verbatim, or either is absent.
fn contains_or_absent(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match (haystack, needle) {
        (Some(haystack), Some(needle)) => haystack.contains(needle),
        _ => true,
    }
}

/// Propeller lists the motor's stator size among its recommended motors.
pub fn motor_prop_compatible(selection: &ComponentSelection) -> bool {
    contains_or_absent(
        field(selection.propeller.as_ref(), fields::RECOMMENDED_MOTOR_SIZE),
        field(selection.motor.as_ref(), fields::STATOR_SIZE),
    )
}

/// Battery cell count ("4S") appears in the motor's and the stack's voltage fields.
pub fn voltage_compatible(selection: &ComponentSelection) -> bool {
    let Some(cells) = parse_series_cells(field(selection.battery.as_ref(), fields::CELL_COUNT)) else {
        return true;
    };
    let label = format!("{cells}S");

    contains_or_absent(field(selection.motor.as_ref(), fields::VOLTAGE_COMPATIBILITY), Some(label.as_str()))
        && contains_or_absent(field(selection.stack.as_ref(), fields::VOLTAGE_INPUT), Some(label.as_str()))
}

/// Frame accepts the stack's mounting pattern.
pub fn mounting_compatible(selection: &ComponentSelection) -> bool {
    contains_or_absent(
        field(selection.frame.as_ref(), fields::STACK_MOUNTING),
        field(selection.stack.as_ref(), fields::MOUNTING_SIZE),
    )
}

/// Frame accepts the propeller size.
pub fn frame_prop_compatible(selection: &ComponentSelection) -> bool {
    let prop_size = field(selection.propeller.as_ref(), fields::SIZE).map(|size| size.replace(" inch", ""));
    contains_or_absent(
        field(selection.frame.as_ref(), fields::PROP_SIZE_COMPATIBILITY),
        prop_size.as_deref(),
    )
}

pub fn check_compatibility(selection: &ComponentSelection) -> CompatibilityReport {
    CompatibilityReport {
        motor_prop: motor_prop_compatible(selection),
        voltage: voltage_compatible(selection),
        mounting: mounting_compatible(selection),
        frame_prop: frame_prop_compatible(selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentSlot;

    fn full_selection() -> ComponentSelection {
        ComponentSelection::default()
            .with(
                ComponentSlot::Motor,
                CatalogComponent::new("Motor")
                    .with_spec("stator_size", "2207")
                    .with_spec("voltage_compatibility", "3S, 4S, 5S, 6S"),
            )
            .with(
                ComponentSlot::Propeller,
                CatalogComponent::new("Prop")
                    .with_spec("size", "5x4.3x3")
                    .with_spec("recommended_motor_size", "2205, 2207, 2306"),
            )
            .with(
                ComponentSlot::Frame,
                CatalogComponent::new("Frame")
                    .with_spec("stack_mounting", "20x20, 30.5x30.5")
                    .with_spec("prop_size_compatibility", "5x4.3x3, 5.1x3.6x3"),
            )
            .with(
                ComponentSlot::Stack,
                CatalogComponent::new("Stack")
                    .with_spec("mounting_size", "30.5x30.5")
                    .with_spec("voltage_input", "3S/4S/5S/6S"),
            )
            .with(
                ComponentSlot::Battery,
                CatalogComponent::new("Pack").with_spec("cell_count", "4S"),
            )
    }

    #[test]
    fn test_matching_build() {
        let report = check_compatibility(&full_selection());
        assert!(report.all_compatible());
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_empty_selection_is_compatible() {
        assert_eq!(check_compatibility(&ComponentSelection::default()), CompatibilityReport::default());
    }

    #[test]
    fn test_wrong_stator() {
        let selection = full_selection().with(
            ComponentSlot::Motor,
            CatalogComponent::new("Motor").with_spec("stator_size", "2806.5"),
        );
        let report = check_compatibility(&selection);
        assert!(!report.motor_prop);
        assert_eq!(report.issues(), vec!["motor_prop"]);
    }

    #[test]
    fn test_voltage_mismatch_on_stack() {
        let selection = full_selection().with(
            ComponentSlot::Battery,
            CatalogComponent::new("Pack").with_spec("cell_count", "6S"),
        );
        assert!(check_compatibility(&selection).voltage);

        let selection = selection.with(
            ComponentSlot::Stack,
            CatalogComponent::new("Stack").with_spec("voltage_input", "2S-4S"),
        );
        assert!(!check_compatibility(&selection).voltage);
    }

    #[test]
    fn test_voltage_from_pack_voltage() {
        let selection = full_selection().with(
            ComponentSlot::Battery,
            CatalogComponent::new("Pack").with_spec("cell_count", "22.2V"),
        );
        assert!(check_compatibility(&selection).voltage);
    }

    #[test]
    fn test_missing_field_counts_as_compatible() {
        let selection = full_selection().with(ComponentSlot::Stack, CatalogComponent::new("Bare stack"));
        let report = check_compatibility(&selection);
        assert!(report.mounting);
        assert!(report.voltage);
    }

    #[test]
    fn test_mounting_mismatch() {
        let selection = full_selection().with(
            ComponentSlot::Stack,
            CatalogComponent::new("Stack").with_spec("mounting_size", "25.5x25.5"),
        );
        assert!(!check_compatibility(&selection).mounting);
    }

    #[test]
    fn test_frame_prop_strips_inch() {
        let selection = full_selection()
            .with(
                ComponentSlot::Propeller,
                CatalogComponent::new("Prop").with_spec("size", "5 inch"),
            )
            .with(
                ComponentSlot::Frame,
                CatalogComponent::new("Frame").with_spec("prop_size_compatibility", "up to 5"),
            );
        assert!(check_compatibility(&selection).frame_prop);

        let selection = selection.with(
            ComponentSlot::Propeller,
            CatalogComponent::new("Prop").with_spec("size", "7 inch"),
        );
        assert!(!check_compatibility(&selection).frame_prop);
    }

    #[test]
    fn test_comparisons_are_case_sensitive() {
        let selection = full_selection().with(
            ComponentSlot::Motor,
            CatalogComponent::new("Motor")
                .with_spec("stator_size", "2207")
                .with_spec("voltage_compatibility", "3s, 4s"),
        );
        assert!(!check_compatibility(&selection).voltage);

        let selection = full_selection()
            .with(
                ComponentSlot::Propeller,
                CatalogComponent::new("Prop").with_spec("size", "5 Inch"),
            )
            .with(
                ComponentSlot::Frame,
                CatalogComponent::new("Frame").with_spec("prop_size_compatibility", "up to 5"),
            );
        // Only the lowercase unit is stripped
        assert!(!check_compatibility(&selection).frame_prop);
    }

    #[test]
    fn test_absent_component_passes_each_check() {
        for slot in ComponentSlot::ALL {
            let report = check_compatibility(&full_selection().without(slot));
            assert!(report.all_compatible(), "without {slot}");
        }
    }
}
