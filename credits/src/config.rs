use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animator::{AnimatorParams, RotationModel, SharpBand};
use crate::track::DEFAULT_SCROLL_SPEED;

const BUNDLED_CREDITS: &str = include_str!("../assets/credits.txt");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatorProfile {
    #[default]
    Classic,
    Shifted,
}

/// Per-constant overrides applied on top of the chosen profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorOverrides {
    pub rotation: Option<RotationModel>,
    pub sharp_band: Option<SharpBand>,
    pub wave_speed: Option<f32>,
    pub wave_amplitude: Option<f32>,
    pub drift_speed: Option<f32>,
    pub depth_frequency: Option<f32>,
    pub depth_phase: Option<f32>,
    pub depth_amplitude: Option<f32>,
    pub bloom_broad_radius: Option<f32>,
    pub bloom_sharp_radius: Option<f32>,
    pub bloom_sharp_peek_y_offset: Option<f32>,
    pub bloom_sharp_gain: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditsConfig {
    pub version: u32,
    /// Plain-text credits, one line per row. The bundled list is used when unset.
    pub lines_path: Option<PathBuf>,
    pub audio_path: Option<PathBuf>,
    pub volume: f32,
    pub scroll_speed: f32,
    /// World height above which a line counts as having left the screen.
    pub exit_height: f32,
    pub profile: AnimatorProfile,
    pub overrides: AnimatorOverrides,
    pub window: WindowConfig,
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            lines_path: None,
            audio_path: None,
            volume: 0.8,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            exit_height: 6.0,
            profile: AnimatorProfile::default(),
            overrides: AnimatorOverrides::default(),
            window: WindowConfig::default(),
        }
    }
}

impl CreditsConfig {
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.version = defaults.version;
        if !(self.scroll_speed.is_finite() && self.scroll_speed > 0.0) {
            self.scroll_speed = defaults.scroll_speed;
        }
        if !self.exit_height.is_finite() {
            self.exit_height = defaults.exit_height;
        }
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            defaults.volume
        };
        self.window.width = self.window.width.max(1);
        self.window.height = self.window.height.max(1);
        self
    }

    pub fn animator_params(&self) -> AnimatorParams {
        let mut params = match self.profile {
            AnimatorProfile::Classic => AnimatorParams::classic(),
            AnimatorProfile::Shifted => AnimatorParams::shifted(),
        };
        let o = &self.overrides;
        if let Some(rotation) = o.rotation.filter(rotation_is_usable) {
            params.rotation = rotation;
        }
        if let Some(band) = o.sharp_band {
            params.sharp_band = band;
        }
        let finite = |v: Option<f32>| v.filter(|v| v.is_finite());
        if let Some(v) = finite(o.wave_speed) {
            params.wave_speed = v;
        }
        if let Some(v) = finite(o.wave_amplitude) {
            params.wave_amplitude = v;
        }
        if let Some(v) = finite(o.drift_speed) {
            params.drift_speed = v;
        }
        if let Some(v) = finite(o.depth_frequency) {
            params.depth_frequency = v;
        }
        if let Some(v) = finite(o.depth_phase) {
            params.depth_phase = v;
        }
        if let Some(v) = finite(o.depth_amplitude) {
            params.depth_amplitude = v;
        }
        if let Some(v) = finite(o.bloom_broad_radius) {
            params.bloom_broad_radius = v;
        }
        // The sharp radius divides the band bounds.
        if let Some(v) = finite(o.bloom_sharp_radius).filter(|v| *v != 0.0) {
            params.bloom_sharp_radius = v;
        }
        if let Some(v) = finite(o.bloom_sharp_peek_y_offset) {
            params.bloom_sharp_peek_y_offset = v;
        }
        if let Some(v) = finite(o.bloom_sharp_gain) {
            params.bloom_sharp_gain = v;
        }
        params
    }

    /// The configured credits, or the bundled list when no file is set.
    pub fn load_lines(&self) -> Result<Vec<String>, ConfigError> {
        match &self.lines_path {
            Some(path) => load_lines(path),
            None => Ok(default_lines()),
        }
    }
}

fn rotation_is_usable(rotation: &RotationModel) -> bool {
    match *rotation {
        RotationModel::Divided {
            speed,
            peek_offset,
            amount,
        } => speed != 0.0 && speed.is_finite() && peek_offset.is_finite() && amount.is_finite(),
        RotationModel::Scaled { speed, peek_offset } => speed.is_finite() && peek_offset.is_finite(),
    }
}

pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| line.trim_end_matches('\r').to_string()).collect()
}

/// Reads one credit per row. Blank rows are kept as spacers.
pub fn load_lines(path: &Path) -> Result<Vec<String>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_lines(&text))
}

pub fn default_lines() -> Vec<String> {
    parse_lines(BUNDLED_CREDITS)
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("CREDITS_CONFIG_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("credits-roll").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means defaults; a present but broken file is an error.
    pub fn load(&self) -> Result<CreditsConfig, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no config file; using defaults");
                return Ok(CreditsConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let config = serde_json::from_slice::<CreditsConfig>(&bytes).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(config.sanitized())
    }

    pub fn save(&self, config: &CreditsConfig) -> Result<(), ConfigError> {
        let write_err = |source: io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_repairs_bad_values() {
        let config = CreditsConfig {
            version: 42,
            scroll_speed: -3.0,
            exit_height: f32::NAN,
            volume: 4.0,
            window: WindowConfig {
                width: 0,
                height: 0,
                vsync: false,
            },
            ..CreditsConfig::default()
        }
        .sanitized();

        assert_eq!(config.version, 1);
        assert_eq!(config.scroll_speed, DEFAULT_SCROLL_SPEED);
        assert_eq!(config.exit_height, 6.0);
        assert_eq!(config.volume, 1.0);
        assert_eq!((config.window.width, config.window.height), (1, 1));
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: CreditsConfig = serde_json::from_str(r#"{"scroll_speed": 2.0, "profile": "shifted"}"#)
            .expect("config JSON should parse");
        assert_eq!(parsed.scroll_speed, 2.0);
        assert_eq!(parsed.profile, AnimatorProfile::Shifted);
        assert_eq!(parsed.window, WindowConfig::default());
        assert!(parsed.lines_path.is_none());
    }

    #[test]
    fn profile_selects_preset_and_overrides_apply() {
        let mut config = CreditsConfig {
            profile: AnimatorProfile::Shifted,
            ..CreditsConfig::default()
        };
        assert_eq!(config.animator_params(), AnimatorParams::shifted());

        config.overrides.sharp_band = Some(SharpBand::Centered);
        config.overrides.bloom_sharp_radius = Some(0.0);
        config.overrides.wave_amplitude = Some(1.5);
        let params = config.animator_params();
        assert_eq!(params.sharp_band, SharpBand::Centered);
        assert_eq!(params.bloom_sharp_radius, 0.8);
        assert_eq!(params.wave_amplitude, 1.5);
    }

    #[test]
    fn drift_and_depth_overrides_come_from_json() {
        let parsed: CreditsConfig = serde_json::from_str(
            r#"{"overrides": {"drift_speed": 0.5, "depth_frequency": 1.2, "depth_phase": 0.0, "depth_amplitude": 2.0}}"#,
        )
        .expect("config JSON should parse");
        let params = parsed.animator_params();
        assert_eq!(params.drift_speed, 0.5);
        assert_eq!(params.depth_frequency, 1.2);
        assert_eq!(params.depth_phase, 0.0);
        assert_eq!(params.depth_amplitude, 2.0);

        let mut config = CreditsConfig::default();
        config.overrides.drift_speed = Some(f32::NAN);
        config.overrides.depth_amplitude = Some(f32::INFINITY);
        let params = config.animator_params();
        assert_eq!(params.drift_speed, AnimatorParams::classic().drift_speed);
        assert_eq!(params.depth_amplitude, AnimatorParams::classic().depth_amplitude);
    }

    #[test]
    fn rotation_override_parses_tagged_model() {
        let parsed: CreditsConfig = serde_json::from_str(
            r#"{"overrides": {"rotation": {"kind": "scaled", "speed": 0.3, "peek_offset": 1.0}}}"#,
        )
        .expect("config JSON should parse");
        assert_eq!(
            parsed.animator_params().rotation,
            RotationModel::Scaled {
                speed: 0.3,
                peek_offset: 1.0
            }
        );
    }

    #[test]
    fn parse_lines_keeps_blank_spacers_and_strips_cr() {
        assert_eq!(
            parse_lines("XEBEC\r\n\r\nHideaki Anno\n"),
            vec!["XEBEC".to_string(), String::new(), "Hideaki Anno".to_string()]
        );
    }

    #[test]
    fn bundled_credits_are_not_empty() {
        let lines = default_lines();
        assert!(lines.len() > 100);
        assert!(lines.iter().any(|l| l.is_empty()));
        assert!(lines.iter().any(|l| l == "XEBEC"));
    }
}
