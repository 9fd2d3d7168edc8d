use drone_performance::flight_time::capacity_tier_ceiling;
use drone_performance::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn scenario(name: &str) -> ComponentSelection {
    let json = match name {
        "a" => include_str!("fixtures/scenario_a.json"),
        "b" => include_str!("fixtures/scenario_b.json"),
        "c" => include_str!("fixtures/scenario_c.json"),
        other => panic!("unknown scenario {other}"),
    };
    ComponentSelection::from_json(json).expect("fixture should parse")
}

#[test]
fn test_scenario_a_five_inch_racer() {
    let report = estimate(&scenario("a"), None);

    assert!(
        (450.0..=650.0).contains(&report.total_mass_g),
        "mass {}",
        report.total_mass_g
    );
    assert!(
        (2.0..=5.0).contains(&report.thrust_to_weight),
        "twr {}",
        report.thrust_to_weight
    );
    assert_eq!(report.flight_style, Some(FlightStyle::Racing));
    assert!(report.flight_time_min > 0.0);
    assert!(report.flight_time_min <= capacity_tier_ceiling(1300.0, ModelConfig::shared_default()));
    assert!(report.top_speed_kmh > 100.0 && report.top_speed_kmh <= 160.0);
    assert!(report.hover.throttle_percent > 30.0 && report.hover.throttle_percent < 80.0);
    assert!(report.hover.time_min > report.flight_time_min);
    assert!(report.compatibility.all_compatible());
    assert_eq!(report.battery.cell_count, 4);
    assert!((report.battery.max_discharge_current_a - 123.5).abs() < 1e-9);
}

#[test]
fn test_scenario_b_without_propeller() {
    let with_prop = estimate(&scenario("a"), None);
    let report = estimate(&scenario("b"), None);

    assert_eq!(report.max_thrust_g, 0.0);
    assert_eq!(report.top_speed_kmh, 0.0);
    assert_eq!(report.thrust_to_weight, 1.0);
    assert_eq!(report.power_draw_w, 0.0);
    assert_eq!(report.flight_time_min, 0.0);
    assert_eq!(report.motor.prop_size, None);

    // Mass and price lose exactly the propeller contribution
    let prop_mass = with_prop.mass_breakdown.propellers_g;
    assert!((with_prop.total_mass_g - prop_mass - report.total_mass_g).abs() < 1e-9);
    assert_eq!(report.mass_breakdown.propellers_g, 0.0);
    assert_eq!(report.price.propellers, 0.0);
    assert_eq!(report.price.motors, with_prop.price.motors);
    assert_eq!(report.price.battery, with_prop.price.battery);
    assert!((with_prop.price.total - with_prop.price.propellers - report.price.total).abs() < 0.011);

    // Nothing to compare the propeller against
    assert!(report.compatibility.motor_prop);
    assert!(report.compatibility.frame_prop);
}

#[test]
fn test_scenario_c_small_pack_lowest_ceiling() {
    let report = estimate(&scenario("c"), None);
    let lowest_tier = capacity_tier_ceiling(450.0, ModelConfig::shared_default());

    assert_eq!(lowest_tier, 8.0);
    assert!(report.flight_time_min <= 10.0);
    assert!(report.flight_time_min <= lowest_tier);
    assert!(report.flight_time_min > 0.0);
    assert!(report.hover.time_min <= lowest_tier);
    // Mini stack without a declared weight
    assert_eq!(report.mass_breakdown.stack_g, 10.0);
    assert_eq!(report.mass_breakdown.aux_g, 2.0);
    assert_eq!(report.price.aux, 14.0);
    assert!(report.compatibility.all_compatible());
}

#[test]
fn test_missing_motor_zeroes_thrust() {
    let selection = scenario("a").without(ComponentSlot::Motor);
    let report = estimate(&selection, None);
    assert_eq!(report.max_thrust_g, 0.0);
    assert_eq!(report.thrust_to_weight, 1.0);
    assert_eq!(report.average_current_a, 0.0);
    assert_eq!(report.flight_style, None);
}

#[test]
fn test_no_battery_no_flight_time() {
    let report = estimate(&scenario("a").without(ComponentSlot::Battery), None);
    assert_eq!(report.flight_time_min, 0.0);
    assert_eq!(report.hover.time_min, 0.0);
    // Voltage falls back to the default pack
    assert!((report.motor.voltage - 14.8).abs() < 1e-12);
    assert!(report.max_thrust_g > 0.0);
}

#[test]
fn test_reports_are_deterministic() {
    let selection = scenario("a");
    let first = serde_json::to_string(&estimate(&selection, None)).unwrap();
    let second = serde_json::to_string(&estimate(&selection, None)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_report_round_trips_through_json() {
    let report = estimate(&scenario("c"), None);
    let json = serde_json::to_string(&report).unwrap();
    let parsed: PerformanceReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_batch_matches_sequential() {
    let selections = vec![scenario("a"), scenario("b"), scenario("c"), ComponentSelection::default()];
    let batch = estimate_many(&selections, None);
    let sequential: Vec<PerformanceReport> = selections.iter().map(|s| estimate(s, None)).collect();
    assert_eq!(batch, sequential);
}

#[test]
fn test_batch_fixture_parses() {
    let selections: Vec<ComponentSelection> =
        serde_json::from_str(include_str!("fixtures/batch.json")).unwrap();
    assert_eq!(selections.len(), 3);
    assert_eq!(selections[0], scenario("a"));
    assert_eq!(selections[1], scenario("b"));
}

#[test]
fn test_compatibility_true_when_component_absent() {
    let mismatched = scenario("a").with(
        ComponentSlot::Stack,
        CatalogComponent::new("Odd stack")
            .with_spec("mounting_size", "16x16")
            .with_spec("voltage_input", "1S"),
    );
    let report = estimate(&mismatched, None);
    assert!(!report.compatibility.mounting);
    assert!(!report.compatibility.voltage);

    let report = estimate(&mismatched.clone().without(ComponentSlot::Frame), None);
    assert!(report.compatibility.mounting);

    let report = estimate(&mismatched.without(ComponentSlot::Battery), None);
    assert!(report.compatibility.voltage);
}

#[test]
fn test_mass_monotonic_in_aux_weights() {
    let mut rng = StdRng::seed_from_u64(0x5eed_d00e);
    let mut selection = scenario("a");
    let mut previous = estimate(&selection, None).total_mass_g;

    for i in 0..25 {
        let grams: f64 = rng.gen_range(0.0..80.0);
        selection = selection.with_aux(AuxiliaryWeight::new(format!("payload {i}"), format!("{grams:.2}g")));
        let mass = estimate(&selection, None).total_mass_g;
        assert!(mass >= previous, "aux {i}: {mass} < {previous}");
        previous = mass;
    }
}

#[test]
fn test_random_builds_respect_limits() {
    let mut rng = StdRng::seed_from_u64(42);
    let config = ModelConfig::default();

    for _ in 0..200 {
        let kv = rng.gen_range(900..4000);
        let stator = format!("{}{:02}", rng.gen_range(11..31), rng.gen_range(3..10));
        let diameter = rng.gen_range(2.0..8.0f64);
        let pitch = diameter * rng.gen_range(0.4..1.3f64);
        let capacity = rng.gen_range(200..6000);
        let cells = rng.gen_range(1..7);

        let selection = ComponentSelection::default()
            .with(
                ComponentSlot::Motor,
                CatalogComponent::new("Motor")
                    .with_spec("kv", format!("{kv}KV"))
                    .with_spec("stator_size", stator)
                    .with_spec("weight", format!("{:.1}g", rng.gen_range(4.0..80.0f64))),
            )
            .with(
                ComponentSlot::Propeller,
                CatalogComponent::new("Prop").with_spec("size", format!("{diameter:.1}x{pitch:.1}x{}", rng.gen_range(2..5))),
            )
            .with(
                ComponentSlot::Frame,
                CatalogComponent::new("Frame")
                    .with_spec("wheelbase", format!("{}mm", rng.gen_range(65..450)))
                    .with_spec("weight", format!("{}g", rng.gen_range(20..400))),
            )
            .with(
                ComponentSlot::Battery,
                CatalogComponent::new("Pack")
                    .with_spec("capacity", format!("{capacity}mAh"))
                    .with_spec("cell_count", format!("{cells}S"))
                    .with_spec("discharge_rate", format!("{}C", rng.gen_range(20..150)))
                    .with_spec("weight", format!("{}g", rng.gen_range(20..900))),
            );

        let report = estimate(&selection, Some(&config));
        let ceiling = capacity_tier_ceiling(capacity as f64, &config);

        assert!(
            (config.limits.twr_min..=config.limits.twr_max).contains(&report.thrust_to_weight),
            "twr {}",
            report.thrust_to_weight
        );
        assert!(report.flight_time_min >= 0.0);
        assert!(report.flight_time_min <= ceiling, "{} > {}", report.flight_time_min, ceiling);
        assert!(report.hover.time_min <= ceiling);
        assert!((0.0..=100.0).contains(&report.hover.throttle_percent));
        assert!(report.top_speed_kmh >= 0.0);
        assert!(report.top_speed_kmh.is_finite());
        assert!(report.power_draw_w.is_finite());
    }
}

#[test]
fn test_extreme_inputs_respect_limits() {
    let config = ModelConfig::default();
    let overflowing = "9".repeat(400);
    let huge_but_finite = "9".repeat(300);
    let motor = |kv: &str, stator: &str| {
        CatalogComponent::new("Motor")
            .with_spec("kv", kv)
            .with_spec("stator_size", stator)
            .with_spec("weight", "33g")
    };

    let cases = vec![
        ("overflowing kv", scenario("a").with(ComponentSlot::Motor, motor(format!("{overflowing}KV").as_str(), "2207"))),
        ("huge kv", scenario("a").with(ComponentSlot::Motor, motor(huge_but_finite.as_str(), "2207"))),
        ("zero kv", scenario("a").with(ComponentSlot::Motor, motor("0KV", "2207"))),
        ("zero stator", scenario("a").with(ComponentSlot::Motor, motor("2750KV", "0000"))),
        (
            "tiny prop",
            scenario("a").with(
                ComponentSlot::Propeller,
                CatalogComponent::new("Prop").with_spec("size", "0.01x4.3x3"),
            ),
        ),
        (
            "overflowing capacity",
            scenario("a").with(
                ComponentSlot::Battery,
                CatalogComponent::new("Pack")
                    .with_spec("capacity", format!("{overflowing}mAh"))
                    .with_spec("cell_count", "4S"),
            ),
        ),
        ("100 kg payload", scenario("a").with_aux(AuxiliaryWeight::new("Ballast", "100kg"))),
    ];

    for (label, selection) in cases {
        let report = estimate(&selection, Some(&config));
        let ceiling = capacity_tier_ceiling(report.battery.capacity_mah, &config);

        assert!(
            (config.limits.twr_min..=config.limits.twr_max).contains(&report.thrust_to_weight),
            "{label}: twr {}",
            report.thrust_to_weight
        );
        assert!(report.max_thrust_g.is_finite() && report.max_thrust_g >= 0.0, "{label}: thrust");
        assert!(report.flight_time_min.is_finite() && report.flight_time_min >= 0.0, "{label}: flight time");
        assert!(report.flight_time_min <= ceiling, "{label}: {} > {}", report.flight_time_min, ceiling);
        assert!(report.top_speed_kmh.is_finite() && report.top_speed_kmh >= 0.0, "{label}: top speed");
        assert!(report.hover.time_min.is_finite() && report.hover.time_min >= 0.0, "{label}: hover time");
        assert!((0.0..=100.0).contains(&report.hover.throttle_percent), "{label}: throttle");
        assert!(report.power_draw_w.is_finite(), "{label}: power");
    }
}

#[test]
fn test_propeller_size_read_from_product_name() {
    let selection = scenario("a").with(ComponentSlot::Propeller, CatalogComponent::new("Ethix S4 5x4.3x3"));
    let report = estimate(&selection, None);
    assert_eq!(report.motor.prop_size.as_deref(), Some("5x4.3x3"));
}

#[test]
fn test_partial_config_from_toml() {
    let config = ModelConfig::from_toml_str(
        r#"
        [environment]
        altitude_m = 2500.0
        temperature_c = 0.0
        "#,
    )
    .unwrap();

    let sea_level = estimate(&scenario("a"), None);
    let alpine = estimate(&scenario("a"), Some(&config));
    assert!(alpine.max_thrust_g < sea_level.max_thrust_g);
    assert!(alpine.flight_time_min < sea_level.flight_time_min);
}

#[test]
fn test_invalid_config_rejected() {
    let err = ModelConfig::from_toml_str(
        r#"
        [limits]
        twr_min = 5.0
        twr_max = 2.0
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, PerformanceError::Config(ConfigError::InvertedBounds { .. })));

    let err = ModelConfig::from_toml_str(
        r#"
        [limits.flight_time_ceiling_min]
        bands = [[600.0, -5.0]]
        otherwise = -5.0
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, PerformanceError::Config(ConfigError::InvalidFactor { .. })));
}

#[test]
fn test_unvalidated_negative_ceiling_never_negative_flight_time() {
    let mut config = ModelConfig::default();
    config.limits.flight_time_ceiling_min.bands = vec![(600.0, -5.0)];
    config.limits.flight_time_ceiling_min.otherwise = -5.0;
    let report = estimate(&scenario("a"), Some(&config));
    assert_eq!(report.flight_time_min, 0.0);
    assert_eq!(report.hover.time_min, 0.0);
}
