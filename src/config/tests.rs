use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tapedeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", "/tmp/tapedeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tapedeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn log_file_defaults_under_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    let s = Settings::default();
    assert_eq!(
        s.log_file().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("tapedeck")
            .join("tapedeck.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 0.8
tick_ms = 100

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "AWESOME MIX"
show_reels = false
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[catalog]
path = "/srv/mixtapes.toml"
autoload_first = true
extensions = ["mp3"]
recursive = false
display_fields = ["filename"]
display_separator = "::"

[logging]
filter = "tapedeck=debug"
file = "/tmp/tapedeck.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TAPEDECK__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert!((s.audio.initial_volume - 0.8).abs() < f32::EPSILON);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert!((s.controls.volume_step - 0.1).abs() < f32::EPSILON);
    assert_eq!(s.ui.header_text, "AWESOME MIX");
    assert!(!s.ui.show_reels);
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(
        s.catalog.path.as_deref(),
        Some(std::path::Path::new("/srv/mixtapes.toml"))
    );
    assert!(s.catalog.autoload_first);
    assert_eq!(s.catalog.extensions, vec!["mp3".to_string()]);
    assert!(!s.catalog.recursive);
    assert_eq!(s.catalog.display_fields, vec![TrackDisplayField::Filename]);
    assert_eq!(s.catalog.display_separator, "::");
    assert_eq!(s.logging.filter, "tapedeck=debug");
    assert_eq!(
        s.log_file().unwrap(),
        std::path::PathBuf::from("/tmp/tapedeck.log")
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TAPEDECK__AUDIO__TICK_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 40);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());
    s.audio.initial_volume = 0.5;

    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());
    s.audio.tick_ms = 250;

    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());
}
