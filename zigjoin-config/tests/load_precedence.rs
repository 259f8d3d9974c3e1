use std::{collections::HashMap, fs};

use tempfile::TempDir;
use zigjoin_config::{Config, ConfigSource, FlowControl};
use zigjoin_model::{NodeRole, ScanType};

fn lookup(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

const DEVICE_TOML: &str = r#"
[device]
path = "/dev/ttyUSB0"
baudrate = 57600
flow_control = "hardware"

[commission]
channels = [15, 20, 25]
scan_duration = 4
node_role = "end_device"
join_timeout_ms = 10000

[commission.stack_config]
CONFIG_PACKET_BUFFER_COUNT = 255
"#;

#[test]
fn defaults_when_nothing_is_configured() {
    let dir = TempDir::new().expect("tempdir");
    let (config, source) =
        Config::load_with(lookup(&[]), dir.path()).expect("load");
    assert_eq!(source, ConfigSource::Default);
    assert_eq!(config, Config::default());
}

#[test]
fn toml_file_from_env_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("coordinator.toml");
    fs::write(&path, DEVICE_TOML).expect("write config");

    let (config, source) = Config::load_with(
        lookup(&[("ZIGJOIN_CONFIG_PATH", path.display().to_string())]),
        dir.path(),
    )
    .expect("load");

    assert_eq!(source, ConfigSource::EnvPath(path));
    assert_eq!(config.device.path, "/dev/ttyUSB0");
    assert_eq!(config.device.flow_control, FlowControl::Hardware);
    assert_eq!(config.commission.channels, vec![15, 20, 25]);
    assert_eq!(config.commission.node_role, NodeRole::EndDevice);
    assert_eq!(config.commission.scan_type, ScanType::Active);
    assert_eq!(
        config.commission.stack_config.get("CONFIG_PACKET_BUFFER_COUNT"),
        Some(255)
    );
    config.validate().expect("valid");
}

#[test]
fn inline_json_is_used_without_a_path() {
    let dir = TempDir::new().expect("tempdir");
    let (config, source) = Config::load_with(
        lookup(&[(
            "ZIGJOIN_CONFIG_JSON",
            r#"{"commission":{"channels":[26],"skip_if_joined":false}}"#
                .to_string(),
        )]),
        dir.path(),
    )
    .expect("load");

    assert_eq!(source, ConfigSource::EnvInline);
    assert_eq!(config.commission.channels, vec![26]);
    assert!(!config.commission.skip_if_joined);
    assert_eq!(config.device.baudrate, 115_200);
}

#[test]
fn env_path_wins_over_inline_json_and_default_files() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("zigjoin.json"),
        r#"{"commission":{"channels":[12]}}"#,
    )
    .expect("write default");
    let explicit = dir.path().join("explicit.toml");
    fs::write(&explicit, "[commission]\nchannels = [13]\n")
        .expect("write explicit");

    let (config, source) = Config::load_with(
        lookup(&[
            ("ZIGJOIN_CONFIG_PATH", explicit.display().to_string()),
            (
                "ZIGJOIN_CONFIG_JSON",
                r#"{"commission":{"channels":[14]}}"#.into(),
            ),
        ]),
        dir.path(),
    )
    .expect("load");
    assert_eq!(source, ConfigSource::EnvPath(explicit));
    assert_eq!(config.commission.channels, vec![13]);

    let (config, source) = Config::load_with(
        lookup(&[("ZIGJOIN_CONFIG_PATH", "   ".into())]),
        dir.path(),
    )
    .expect("load");
    assert_eq!(source, ConfigSource::File(dir.path().join("zigjoin.json")));
    assert_eq!(config.commission.channels, vec![12]);
}

#[test]
fn toml_default_file_wins_over_json_and_config_dir() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir(dir.path().join("config")).expect("mkdir");
    fs::write(
        dir.path().join("config/zigjoin.toml"),
        "[commission]\nchannels = [21]\n",
    )
    .expect("write nested");
    fs::write(
        dir.path().join("zigjoin.toml"),
        "[commission]\nchannels = [22]\n",
    )
    .expect("write root");

    let (config, source) =
        Config::load_with(lookup(&[]), dir.path()).expect("load");
    assert_eq!(source, ConfigSource::File(dir.path().join("zigjoin.toml")));
    assert_eq!(config.commission.channels, vec![22]);
}

#[test]
fn broken_file_is_an_error_naming_the_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write");

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));

    let err =
        Config::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(err.to_string().contains("failed to read zigjoin config"));
}

#[test]
fn explicit_path_bypasses_the_environment() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("settings");
    fs::write(&path, DEVICE_TOML).expect("write");

    let (config, source) = Config::load(Some(&path)).expect("load");
    assert_eq!(source, ConfigSource::Explicit(path));
    assert_eq!(config.device.baudrate, 57_600);
}
