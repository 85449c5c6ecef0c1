use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("location_analysis_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(DEFAULT_CONFIG_FILE);
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_when_no_file_or_env() {
    let settings =
        load_settings_with_env(Path::new("does/not/exist.toml"), no_env).expect("defaults");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.endpoint, "http://localhost:8000/api/analyze/");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        r#"
endpoint = "http://analysis.internal:9000/api/analyze/"
export_dir = "exports"
export_quoting = "non_numeric"
"#,
    );

    let settings = load_settings_with_env(&path, no_env).expect("file settings");

    assert_eq!(settings.endpoint, "http://analysis.internal:9000/api/analyze/");
    assert_eq!(settings.export_dir, PathBuf::from("exports"));
    assert_eq!(settings.export_quoting, ExportQuoting::NonNumeric);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let path = temp_config(r#"endpoint = "http://from-file/api/analyze/""#);
    let vars: HashMap<&str, &str> = HashMap::from([
        ("ANALYSIS_ENDPOINT", "http://legacy-var/api/"),
        ("APP__ENDPOINT", "http://app-var/api/analyze/"),
        ("APP__EXPORT_QUOTING", "non-numeric"),
    ]);

    let settings = load_settings_with_env(&path, |name| vars.get(name).map(|v| v.to_string()))
        .expect("env settings");

    assert_eq!(settings.endpoint, "http://app-var/api/analyze/");
    assert_eq!(settings.export_quoting, ExportQuoting::NonNumeric);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_config("endpoint = [");

    assert!(load_settings_with_env(&path, no_env).is_err());

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn rejects_unknown_quoting_from_env() {
    let err = load_settings_with_env(Path::new("missing.toml"), |name| {
        (name == "APP__EXPORT_QUOTING").then(|| "always".to_string())
    })
    .expect_err("bad quoting");
    assert!(format!("{err:#}").contains("unknown export quoting"));
}

#[test]
fn normalizes_bare_host_to_http_url() {
    assert_eq!(
        normalize_endpoint("localhost:8000/api/analyze/").expect("normalize"),
        "http://localhost:8000/api/analyze/"
    );
}

#[test]
fn blank_endpoint_falls_back_to_default() {
    assert_eq!(normalize_endpoint("   ").expect("default"), DEFAULT_ENDPOINT);
}

#[test]
fn rejects_non_http_schemes() {
    assert!(normalize_endpoint("ftp://example.com/analyze").is_err());
}
