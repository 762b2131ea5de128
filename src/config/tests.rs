//! Unit tests for configuration loading and resolution.

use ortho_config::{MergeComposer, OrthoConfig};
use rstest::rstest;
use serde_json::{Value, json};

use super::{BeamConfig, OperationMode};
use crate::listing::ListingKind;
use crate::telemetry::LogFormat;

/// Applies a configuration layer to the composer based on the layer type.
fn apply_layer(composer: &mut MergeComposer, layer_type: &str, value: Value) {
    match layer_type {
        "defaults" => composer.push_defaults(value),
        "file" => composer.push_file(value, None),
        "environment" => composer.push_environment(value),
        "cli" => composer.push_cli(value),
        _ => panic!("unknown layer type: {layer_type}"),
    }
}

fn build_config_from_layers(layers: &[(&str, Value)]) -> BeamConfig {
    let mut composer = MergeComposer::new();
    for (layer_type, value) in layers {
        apply_layer(&mut composer, layer_type, value.clone());
    }
    BeamConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}

#[rstest]
#[case::file_overrides_defaults(
    vec![
        ("defaults", json!({"bind_addr": "127.0.0.1:1"})),
        ("file", json!({"bind_addr": "127.0.0.1:2"})),
    ],
    "127.0.0.1:2"
)]
#[case::environment_overrides_file(
    vec![
        ("file", json!({"bind_addr": "127.0.0.1:2"})),
        ("environment", json!({"bind_addr": "127.0.0.1:3"})),
    ],
    "127.0.0.1:3"
)]
#[case::cli_overrides_environment(
    vec![
        ("environment", json!({"bind_addr": "127.0.0.1:3"})),
        ("cli", json!({"bind_addr": "127.0.0.1:4"})),
    ],
    "127.0.0.1:4"
)]
fn layers_merge_in_precedence_order(#[case] layers: Vec<(&str, Value)>, #[case] expected: &str) {
    let config = build_config_from_layers(&layers);

    assert_eq!(config.bind_addr, expected);
}

#[rstest]
fn defaults_fill_unset_fields() {
    let config = build_config_from_layers(&[("file", json!({"listing": "hubs"}))]);

    assert_eq!(config.listing.as_deref(), Some("hubs"));
    assert_eq!(config.bind_addr, "127.0.0.1:3000");
    assert_eq!(config.fetch_timeout_secs, 10);
    assert_eq!(config.log_format, "pretty");
}

#[rstest]
#[case(None, false, false, OperationMode::Serve)]
#[case(Some("projects"), false, true, OperationMode::Serve)]
#[case(Some("projects"), true, true, OperationMode::Serve)]
#[case(Some("classes"), true, false, OperationMode::Watch)]
#[case(Some("hubs"), false, false, OperationMode::List)]
fn operation_mode_follows_flags(
    #[case] listing: Option<&str>,
    #[case] watch: bool,
    #[case] serve: bool,
    #[case] expected: OperationMode,
) {
    let config = BeamConfig {
        listing: listing.map(str::to_owned),
        watch,
        serve,
        ..Default::default()
    };

    assert_eq!(config.operation_mode(), expected);
}

#[rstest]
fn require_listing_parses_name() {
    let config = BeamConfig {
        listing: Some("Classes".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.require_listing().ok(), Some(ListingKind::Classes));
}

#[rstest]
#[case(None)]
#[case(Some("donors"))]
fn require_listing_rejects_missing_or_unknown(#[case] listing: Option<&str>) {
    let config = BeamConfig {
        listing: listing.map(str::to_owned),
        ..Default::default()
    };

    assert!(config.require_listing().is_err());
}

#[rstest]
fn requested_filters_map_hub_type_to_type_field() {
    let config = BeamConfig {
        city: Some("Boston".to_owned()),
        hub_type: Some("lab".to_owned()),
        ..Default::default()
    };

    let filters = config.requested_filters();

    assert_eq!(filters.get("city"), Some("Boston"));
    assert_eq!(filters.get("type"), Some("lab"));
    assert_eq!(filters.get("status"), None);
}

#[rstest]
fn store_url_prefers_configured_value() {
    let _guard = env_lock::lock_env([("SUPABASE_URL", Some("https://env.supabase.co"))]);
    let config = BeamConfig {
        store_url: Some("https://config.supabase.co".to_owned()),
        ..Default::default()
    };

    assert_eq!(
        config.resolve_store_url().ok().as_deref(),
        Some("https://config.supabase.co")
    );
}

#[rstest]
fn store_credentials_fall_back_to_legacy_variables() {
    let _guard = env_lock::lock_env([
        ("SUPABASE_URL", None),
        ("NEXT_PUBLIC_SUPABASE_URL", Some("https://legacy.supabase.co")),
        ("SUPABASE_ANON_KEY", Some("anon")),
    ]);
    let config = BeamConfig::default();

    assert_eq!(
        config.resolve_store_url().ok().as_deref(),
        Some("https://legacy.supabase.co")
    );
    assert_eq!(config.resolve_store_key().ok().as_deref(), Some("anon"));
}

#[rstest]
fn payment_key_falls_back_to_stripe_variable() {
    let _guard = env_lock::lock_env([("STRIPE_SECRET_KEY", Some("sk_test_env"))]);
    let config = BeamConfig::default();

    assert_eq!(
        config.resolve_payment_key().ok().as_deref(),
        Some("sk_test_env")
    );
}

#[rstest]
fn missing_payment_key_is_a_configuration_error() {
    let _guard = env_lock::lock_env([("STRIPE_SECRET_KEY", None::<&str>)]);
    let config = BeamConfig {
        payment_secret_key: Some("   ".to_owned()),
        ..Default::default()
    };

    assert!(config.resolve_payment_key().is_err());
}

#[rstest]
fn bind_addr_and_log_format_are_validated() {
    let config = BeamConfig {
        bind_addr: "not an address".to_owned(),
        log_format: "JSON".to_owned(),
        ..Default::default()
    };

    assert!(config.resolve_bind_addr().is_err());
    assert_eq!(config.resolve_log_format().ok(), Some(LogFormat::Json));
}

#[rstest]
fn zero_durations_are_raised() {
    let config = BeamConfig {
        fetch_timeout_secs: 0,
        poll_interval_secs: 0,
        ..Default::default()
    };

    assert_eq!(config.fetch_timeout().as_secs(), 1);
    assert_eq!(config.poll_interval().as_secs(), 1);
}

#[rstest]
fn short_flags_parse_from_the_command_line() {
    let _guard = env_lock::lock_env([
        ("BEAM_LISTING", None::<&str>),
        ("BEAM_CITY", None),
        ("BEAM_STATUS", None),
        ("BEAM_TEMPLATE", None),
    ]);

    let config = BeamConfig::load_from_iter([
        "beam",
        "-l",
        "classes",
        "-c",
        "Boston",
        "-s",
        "active",
        "-w",
        "--template",
        "page.j2",
    ])
    .expect("command line should parse");

    assert_eq!(config.listing.as_deref(), Some("classes"));
    assert_eq!(config.city.as_deref(), Some("Boston"));
    assert_eq!(config.status.as_deref(), Some("active"));
    assert_eq!(config.template.as_deref(), Some("page.j2"));
    assert_eq!(config.operation_mode(), OperationMode::Watch);
}

#[rstest]
fn serve_flag_overrides_a_named_listing() {
    let _guard = env_lock::lock_env([("BEAM_LISTING", None::<&str>)]);

    let config = BeamConfig::load_from_iter(["beam", "--listing", "hubs", "-S"])
        .expect("command line should parse");

    assert!(config.serve);
    assert_eq!(config.operation_mode(), OperationMode::Serve);
}
