//! Estimate a 5" freestyle build and show how altitude changes it.
//!
//! Run with: cargo run --example basic_build

use drone_performance::{estimate, AuxiliaryWeight, CatalogComponent, ComponentSelection, ComponentSlot, ModelConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let selection = ComponentSelection::default()
        .with(
            ComponentSlot::Motor,
            CatalogComponent::new("Xing2 2207 1855KV")
                .with_spec("kv", "1855KV")
                .with_spec("stator_size", "2207")
                .with_spec("weight", "33g")
                .with_spec("voltage_compatibility", "4S-6S, 6S"),
        )
        .with(
            ComponentSlot::Propeller,
            CatalogComponent::new("HQ 5.1x4.6x3")
                .with_spec("size", "5.1x4.6x3")
                .with_spec("weight", "4.4g")
                .with_spec("recommended_motor_size", "2207, 2306"),
        )
        .with(
            ComponentSlot::Frame,
            CatalogComponent::new("Apex 5\"")
                .with_spec("wheelbase", "225mm")
                .with_spec("weight", "120g")
                .with_spec("material", "Carbon fiber"),
        )
        .with(
            ComponentSlot::Stack,
            CatalogComponent::new("F7 stack")
                .with_spec("esc_current", "55A")
                .with_spec("voltage_input", "3S-6S"),
        )
        .with(
            ComponentSlot::Battery,
            CatalogComponent::new("Tattu R-Line 6S 1050mAh")
                .with_spec("capacity", "1050mAh")
                .with_spec("cell_count", "6S")
                .with_spec("discharge_rate", "120C")
                .with_spec("weight", "205g"),
        )
        .with_aux(AuxiliaryWeight::new("GoPro Hero 11 Bones", "56g"));

    let report = estimate(&selection, None);
    println!("Sea level:");
    println!("{}", serde_json::to_string_pretty(&report)?);

    let alpine = ModelConfig::from_toml_str(
        r#"
        [environment]
        altitude_m = 2500.0
        temperature_c = 5.0
        "#,
    )?;
    let high = estimate(&selection, Some(&alpine));
    println!(
        "\nAt 2500 m, 5 °C: thrust {:.0} g -> {:.0} g, flight time {:.2} min -> {:.2} min",
        report.max_thrust_g, high.max_thrust_g, report.flight_time_min, high.flight_time_min
    );

    Ok(())
}
