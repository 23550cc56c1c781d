//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use ds_config::{DsConfig, StorageBackend};
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_github_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[github]
token = "ghp_toml"
owner = "someone"
repo = "room-tracker"
branch = "photos"
"#,
        )?;

        let config: DsConfig = Figment::from(Serialized::defaults(DsConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.github.token, "ghp_toml");
        assert_eq!(config.github.owner, "someone");
        assert_eq!(config.github.repo, "room-tracker");
        assert_eq!(config.github.branch(), Some("photos"));
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.is_configured());
        Ok(())
    });
}

#[test]
fn loads_gemini_and_general_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[gemini]
api_key = "AIza-toml"
timeout_secs = 15

[general]
data_root = "rooms"
sectors = ["Desk", "Window Sill"]
require_baseline = true

[storage]
backend = "local"
local_path = "/tmp/photos"
"#,
        )?;

        let config: DsConfig = Figment::from(Serialized::defaults(DsConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.gemini.is_configured());
        assert_eq!(config.gemini.timeout_secs, 15);
        assert_eq!(config.gemini.model, "gemini-1.5-flash-001");
        assert_eq!(config.general.sectors, vec!["Desk", "Window Sill"]);
        assert!(config.general.require_baseline);
        assert_eq!(config.layout().root(), "rooms");
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.storage.local_path, "/tmp/photos");
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_figment_for() {
    Jail::expect_with(|jail| {
        jail.create_dir(".diffshame")?;
        jail.create_file(
            ".diffshame/config.toml",
            r#"
[general]
data_root = "from-project"
"#,
        )?;

        let config = DsConfig::load_from(jail.directory()).expect("config loads");
        assert_eq!(config.general.data_root, "from-project");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[gemini]
api_key = "from-toml"
"#,
        )?;
        jail.set_env("DIFFSHAME_GEMINI__API_KEY", "from-env");

        let config: DsConfig = Figment::from(Serialized::defaults(DsConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("DIFFSHAME_").split("__"))
            .extract()?;

        assert_eq!(config.gemini.api_key, "from-env");
        Ok(())
    });
}

#[test]
fn unknown_backend_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
backend = "ftp"
"#,
        )?;

        let result: Result<DsConfig, _> = Figment::from(Serialized::defaults(DsConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract();

        assert!(result.is_err());
        Ok(())
    });
}
