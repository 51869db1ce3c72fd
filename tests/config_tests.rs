//! Configuration loading tests

use portal_gate::access_control::{RequiredRoles, Role};
use portal_gate::config::{LogFormat, load_config, load_config_from_str};

const MINIMAL_CONFIG: &str = r#"
[supabase]
url = "https://abcd.supabase.co"
"#;

const FULL_CONFIG: &str = r#"
[supabase]
url = "https://abcd.supabase.co/"
anon_key = "anon-key"
timeout_secs = 5
max_retries = 1
profiles_table = "staff_profiles"
user_id_column = "user_id"

[portal]
login_path = "/signin"
setup_path = "/onboarding"
client_portal_url = "https://clients.example.com"
default_required_roles = ["admin", "client_manager"]

[gate]
evaluation_timeout_ms = 2500

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.supabase.url, "https://abcd.supabase.co");
    assert!(config.supabase.anon_key.is_none());
    assert_eq!(config.portal.login_path, "/login");
    assert_eq!(config.portal.setup_path, "/setup-profile");
    assert_eq!(
        config.portal.client_portal_url,
        "https://app.rule27design.com"
    );
    assert_eq!(config.portal.default_roles(), RequiredRoles::portal_staff());
    assert_eq!(config.gate.evaluation_timeout_ms, 10_000);
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    assert_eq!(config.supabase.base_url(), "https://abcd.supabase.co");
    assert_eq!(
        config.supabase.anon_key.as_ref().map(|k| k.expose_secret()),
        Some("anon-key")
    );
    assert_eq!(config.supabase.timeout_secs, 5);
    assert_eq!(config.supabase.max_retries, 1);
    assert_eq!(config.supabase.profiles_table, "staff_profiles");
    assert_eq!(config.supabase.user_id_column, "user_id");

    assert_eq!(config.portal.login_path, "/signin");
    assert_eq!(config.portal.setup_path, "/onboarding");
    assert_eq!(config.portal.client_portal_url, "https://clients.example.com");
    assert_eq!(
        config.portal.default_roles(),
        RequiredRoles::new([Role::Admin, Role::ClientManager])
    );

    assert_eq!(config.gate.evaluation_timeout_ms, 2500);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_anon_key_not_in_debug_output() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    let debug = format!("{:?}", config);
    assert!(!debug.contains("anon-key"));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
fn test_invalid_client_portal_url() {
    let config_str = r#"
[portal]
client_portal_url = "app.rule27design.com"
"#;

    assert!(load_config_from_str(config_str).is_err());
}

#[test]
fn test_zero_timeout_rejected() {
    let config_str = r#"
[supabase]
timeout_secs = 0
"#;

    assert!(load_config_from_str(config_str).is_err());
}

#[test]
fn test_zero_evaluation_timeout_disables_bound() {
    let config_str = r#"
[gate]
evaluation_timeout_ms = 0
"#;

    let config = load_config_from_str(config_str).unwrap();
    assert_eq!(config.gate.evaluation_timeout(), None);
}

#[test]
fn test_explicit_missing_file() {
    let result = load_config(Some("/definitely/not/here/portal-gate.toml"));
    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn test_supabase_env_vars_override_file() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("portal-gate.toml");
    fs::write(
        &config_path,
        r#"
[supabase]
url = "https://from-file.supabase.co"
anon_key = "file-key"
"#,
    )
    .unwrap();

    unsafe {
        env::set_var("SUPABASE_URL", "https://from-env.supabase.co");
        env::set_var("SUPABASE_ANON_KEY", "env-key");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("SUPABASE_URL");
        env::remove_var("SUPABASE_ANON_KEY");
    }

    let config = config.unwrap();
    assert_eq!(config.supabase.url, "https://from-env.supabase.co");
    assert_eq!(
        config.supabase.anon_key.as_ref().map(|k| k.expose_secret()),
        Some("env-key")
    );
}

#[test]
#[serial_test::serial]
fn test_missing_anon_key_rejected() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("portal-gate.toml");
    fs::write(
        &config_path,
        r#"
[supabase]
url = "https://abcd.supabase.co"
"#,
    )
    .unwrap();

    unsafe {
        env::remove_var("SUPABASE_ANON_KEY");
    }

    let result = load_config(Some(config_path.to_str().unwrap()));
    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn test_prefixed_env_var() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("portal-gate.toml");
    fs::write(
        &config_path,
        r#"
[supabase]
url = "https://abcd.supabase.co"
anon_key = "file-key"
"#,
    )
    .unwrap();

    unsafe {
        env::set_var("PORTAL_GATE__PORTAL__LOGIN_PATH", "/sign-in");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("PORTAL_GATE__PORTAL__LOGIN_PATH");
    }

    assert_eq!(config.unwrap().portal.login_path, "/sign-in");
}

#[test]
#[serial_test::serial]
fn test_required_roles_from_env_list() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("portal-gate.toml");
    fs::write(
        &config_path,
        r#"
[supabase]
url = "https://abcd.supabase.co"
anon_key = "file-key"

[portal]
default_required_roles = ["contributor"]
"#,
    )
    .unwrap();

    unsafe {
        env::set_var(
            "PORTAL_GATE__PORTAL__DEFAULT_REQUIRED_ROLES",
            "admin,client_manager",
        );
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("PORTAL_GATE__PORTAL__DEFAULT_REQUIRED_ROLES");
    }

    assert_eq!(
        config.unwrap().portal.default_roles(),
        RequiredRoles::new([Role::Admin, Role::ClientManager])
    );
}
