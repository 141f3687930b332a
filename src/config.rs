// config.rs — viewer settings
//
// Optional read-only file: assets/viewer.json
// - Searched in <exe_dir>/assets then ./assets (dev working dir)
// - Every field may be omitted; missing fields take the built-in defaults
// - Env: PANORAMA_LANG overrides "lang"

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "viewer.json";
pub const LANG_ENV: &str = "PANORAMA_LANG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view, degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 90.0,
            near: 0.1,
            far: 10000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub radius: f32,
    pub divisions: usize,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            divisions: 96,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Pixels of pointer travel ignored on each axis before rotating.
    pub dead_zone: f32,
    pub degrees_per_pixel: f32,
    pub pitch_limit: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            dead_zone: 3.0,
            degrees_per_pixel: 0.1,
            pitch_limit: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: 4000,
            height: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub sphere: SphereConfig,
    pub orbit: OrbitConfig,
    pub texture: TextureConfig,
    pub lang: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            sphere: SphereConfig::default(),
            orbit: OrbitConfig::default(),
            texture: TextureConfig::default(),
            lang: "en".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load the config file if one exists, then apply the env override.
    /// A broken file is reported and replaced by defaults; it never stops startup.
    pub fn load() -> Self {
        let mut config = match find_config_file() {
            Some(path) => match Self::from_path(&path) {
                Ok(c) => {
                    log::info!("Loaded config from {}", path.display());
                    c
                }
                Err(e) => {
                    log::warn!("{e}; using defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        };

        if let Ok(v) = std::env::var(LANG_ENV) {
            config.apply_lang_override(&v);
        }
        config
    }

    fn apply_lang_override(&mut self, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.lang = value.to_string();
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join(CONFIG_FILE);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join(CONFIG_FILE);
    p.exists().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_classic_viewer() {
        let c = ViewerConfig::default();
        assert_eq!((c.window.width, c.window.height), (800, 600));
        assert_eq!(c.camera.fov, 90.0);
        assert_eq!(c.sphere.divisions, 96);
        assert_eq!(c.orbit.dead_zone, 3.0);
        assert_eq!((c.texture.width, c.texture.height), (4000, 2000));
        assert_eq!(c.lang, "en");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let c = ViewerConfig::from_json(r#"{ "orbit": { "dead_zone": 5 }, "lang": "zh-Hans" }"#)
            .unwrap();
        assert_eq!(c.orbit.dead_zone, 5.0);
        assert_eq!(c.orbit.degrees_per_pixel, 0.1);
        assert_eq!(c.lang, "zh-Hans");
        assert_eq!(c.camera, CameraConfig::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "texture": {{ "width": 2048, "height": 1024 }} }}"#).unwrap();
        let c = ViewerConfig::from_path(f.path()).unwrap();
        assert_eq!((c.texture.width, c.texture.height), (2048, 1024));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();
        let err = ViewerConfig::from_path(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ViewerConfig::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn blank_lang_override_is_ignored() {
        let mut c = ViewerConfig::default();
        c.apply_lang_override("   ");
        assert_eq!(c.lang, "en");
        c.apply_lang_override("zh-Hans");
        assert_eq!(c.lang, "zh-Hans");
    }
}
