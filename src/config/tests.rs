use super::load::{default_config_path, default_data_dir, resolve_config_path};
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
fn resolve_config_path_prefers_jukebox_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", "/tmp/jukebox-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/jukebox-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("jukebox")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_DATA_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("jukebox")
            .join("config.toml")
    );
    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local/share")
            .join("jukebox")
    );
}

#[test]
fn data_dir_setting_wins_over_xdg() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data");

    let mut s = Settings::default();
    assert_eq!(
        s.data_dir(),
        std::path::PathBuf::from("/tmp/xdg-data").join("jukebox")
    );

    s.storage.data_dir = Some("/tmp/custom-data".into());
    assert_eq!(s.data_dir(), std::path::PathBuf::from("/tmp/custom-data"));
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
source = "https://example.org/music.json"
album_size = 12
covers = ["cover1.png", "cover2.png"]

[audio]
crossfade_ms = 0
crossfade_steps = 3
quit_fade_out_ms = 123
initial_volume = 40

[ui]
header_text = "hello"
notice_ms = 1000
animations = false
albums_start_expanded = false
recommendations = 3
side_panel = false

[controls]
seek_seconds = 9
volume_step = 10

[[radio.stations]]
name = "FIP"
url = "https://stream.example/fip.mp3"

[[radio.stations]]
name = "Nova"
url = "https://stream.example/nova.mp3"

[storage]
favorites = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("JUKEBOX__AUDIO__CROSSFADE_MS");

    let s = Settings::load().unwrap();
    assert!(s.validate().is_ok());
    assert_eq!(
        s.catalog.source.as_deref(),
        Some("https://example.org/music.json")
    );
    assert_eq!(s.catalog.album_size, 12);
    assert_eq!(s.catalog.covers.len(), 2);
    assert_eq!(s.audio.crossfade_ms, 0);
    assert_eq!(s.audio.crossfade_steps, 3);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.audio.initial_volume, 40);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.notice_ms, 1000);
    assert!(!s.ui.animations);
    assert!(!s.ui.albums_start_expanded);
    assert_eq!(s.ui.recommendations, 3);
    assert!(!s.ui.side_panel);
    assert_eq!(s.controls.seek_seconds, 9);
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(
        s.radio.stations,
        vec![
            RadioStation {
                name: "FIP".into(),
                url: "https://stream.example/fip.mp3".into()
            },
            RadioStation {
                name: "Nova".into(),
                url: "https://stream.example/nova.mp3".into()
            },
        ]
    );
    assert!(!s.storage.favorites);
    assert!(s.storage.data_dir.is_none());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[catalog]
album_size = 20
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("JUKEBOX__CATALOG__ALBUM_SIZE", "7");

    let s = Settings::load().unwrap();
    assert_eq!(s.catalog.album_size, 7);
}

#[test]
fn defaults_are_valid_and_validation_catches_bad_values() {
    let s = Settings::default();
    assert_eq!(s.catalog.album_size, 15);
    assert_eq!(s.ui.notice_ms, 2500);
    assert!(s.validate().is_ok());

    let mut bad = Settings::default();
    bad.catalog.album_size = 0;
    assert!(bad.validate().is_err());

    let mut bad = Settings::default();
    bad.controls.volume_step = 0;
    assert!(bad.validate().is_err());

    let mut bad = Settings::default();
    bad.audio.initial_volume = 101;
    assert!(bad.validate().is_err());

    let mut bad = Settings::default();
    bad.radio.stations.push(RadioStation {
        name: "empty".into(),
        url: " ".into(),
    });
    assert!(bad.validate().is_err());
}

#[test]
fn settings_serialize_to_toml_and_back() {
    let s = Settings::default();
    let text = toml::to_string_pretty(&s).unwrap();
    assert!(text.contains("album_size = 15"));
    let back: Settings = toml::from_str(&text).unwrap();
    assert_eq!(back.catalog.album_size, 15);
    assert_eq!(back.ui.header_text, s.ui.header_text);
}
