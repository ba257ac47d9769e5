//! Configuration loading and typed config structures for the Cornfield
//! simulation.
//!
//! The canonical configuration lives in `cornfield-config.yaml` at the
//! project root. Every section and field has a default, so an empty file
//! (or no file at all) yields a playable session.

use std::path::Path;

use cornfield_types::{Rgb, SoundCue};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The file parsed but a value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level field configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldConfig {
    /// Growth timer and visual growth deltas.
    #[serde(default)]
    pub growth: GrowthConfig,

    /// Disease flicker timing and colors.
    #[serde(default)]
    pub disease: DiseaseConfig,

    /// Delays for follow-up hint messages.
    #[serde(default)]
    pub messages: MessageConfig,

    /// Per-cue playback volumes.
    #[serde(default)]
    pub sounds: SoundConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FieldConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `CORNFIELD_LOG_LEVEL` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.logging.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth.period_ms == 0 {
            return Err(invalid("growth.period_ms must be at least 1"));
        }
        if self.disease.flicker_period_ms == 0 {
            return Err(invalid("disease.flicker_period_ms must be at least 1"));
        }
        if self.growth.disease_stage == 0 {
            return Err(invalid("growth.disease_stage must be at least 1"));
        }
        if self.growth.disease_stage >= self.growth.maturity_stage {
            return Err(invalid(
                "growth.disease_stage must be below growth.maturity_stage",
            ));
        }
        for cue in ALL_CUES {
            let volume = self.sounds.volume(cue);
            if !(0.0..=1.0).contains(&volume) {
                return Err(ConfigError::Invalid {
                    reason: format!("sounds.{} volume {volume} is outside 0..=1", cue.key()),
                });
            }
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

const ALL_CUES: [SoundCue; 6] = [
    SoundCue::Plant,
    SoundCue::Water,
    SoundCue::Fertilizer,
    SoundCue::Disease,
    SoundCue::Heal,
    SoundCue::Harvest,
];

/// Growth timer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GrowthConfig {
    /// Milliseconds between growth ticks.
    #[serde(default = "default_growth_period_ms")]
    pub period_ms: u64,

    /// Stage at which the next tick declares the crop mature.
    #[serde(default = "default_maturity_stage")]
    pub maturity_stage: u32,

    /// Stage at which an uncured plant falls ill.
    #[serde(default = "default_disease_stage")]
    pub disease_stage: u32,

    /// Added to the plant's Y scale on every growth tick.
    #[serde(default = "default_scale_step")]
    pub scale_step: f32,

    /// Added to the plant's Y position on every growth tick.
    #[serde(default = "default_lift_step")]
    pub lift_step: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            period_ms: default_growth_period_ms(),
            maturity_stage: default_maturity_stage(),
            disease_stage: default_disease_stage(),
            scale_step: default_scale_step(),
            lift_step: default_lift_step(),
        }
    }
}

/// Disease effect configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiseaseConfig {
    /// Milliseconds between flicker color toggles.
    #[serde(default = "default_flicker_period_ms")]
    pub flicker_period_ms: u64,

    /// Diseased color shown while the intensity bit is set.
    #[serde(default = "default_bright_hue")]
    pub bright_hue: Rgb,

    /// Diseased color shown while the intensity bit is clear.
    #[serde(default = "default_dim_hue")]
    pub dim_hue: Rgb,

    /// Color every paintable part returns to after a cure.
    #[serde(default = "default_healthy_color")]
    pub healthy_color: Rgb,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            flicker_period_ms: default_flicker_period_ms(),
            bright_hue: default_bright_hue(),
            dim_hue: default_dim_hue(),
            healthy_color: default_healthy_color(),
        }
    }
}

/// Delayed message configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageConfig {
    /// Delay before the next-step hint after planting or watering.
    #[serde(default = "default_hint_delay_ms")]
    pub hint_delay_ms: u64,

    /// Delay before the "growth resumed" note after a cure.
    #[serde(default = "default_cure_followup_delay_ms")]
    pub cure_followup_delay_ms: u64,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            hint_delay_ms: default_hint_delay_ms(),
            cure_followup_delay_ms: default_cure_followup_delay_ms(),
        }
    }
}

/// Playback volume per sound cue, each in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoundConfig {
    /// Volume of the `plant` cue.
    #[serde(default = "default_volume_plant")]
    pub plant: f32,
    /// Volume of the `water` cue.
    #[serde(default = "default_volume_water")]
    pub water: f32,
    /// Volume of the `fertilizer` cue.
    #[serde(default = "default_volume_fertilizer")]
    pub fertilizer: f32,
    /// Volume of the `disease` cue.
    #[serde(default = "default_volume_disease")]
    pub disease: f32,
    /// Volume of the `heal` cue.
    #[serde(default = "default_volume_heal")]
    pub heal: f32,
    /// Volume of the `harvest` cue.
    #[serde(default = "default_volume_harvest")]
    pub harvest: f32,
}

impl SoundConfig {
    /// Volume configured for a cue.
    pub const fn volume(&self, cue: SoundCue) -> f32 {
        match cue {
            SoundCue::Plant => self.plant,
            SoundCue::Water => self.water,
            SoundCue::Fertilizer => self.fertilizer,
            SoundCue::Disease => self.disease,
            SoundCue::Heal => self.heal,
            SoundCue::Harvest => self.harvest,
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            plant: default_volume_plant(),
            water: default_volume_water(),
            fertilizer: default_volume_fertilizer(),
            disease: default_volume_disease(),
            heal: default_volume_heal(),
            harvest: default_volume_harvest(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `CORNFIELD_LOG_LEVEL` when it is set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CORNFIELD_LOG_LEVEL") {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_growth_period_ms() -> u64 {
    5000
}

const fn default_maturity_stage() -> u32 {
    5
}

const fn default_disease_stage() -> u32 {
    3
}

const fn default_scale_step() -> f32 {
    0.5
}

const fn default_lift_step() -> f32 {
    0.3
}

const fn default_flicker_period_ms() -> u64 {
    500
}

const fn default_bright_hue() -> Rgb {
    Rgb::new(0.9, 0.3, 0.1)
}

const fn default_dim_hue() -> Rgb {
    Rgb::new(0.8, 0.3, 0.1)
}

fn default_healthy_color() -> Rgb {
    Rgb::from_hex(0x2e_cc_71)
}

const fn default_hint_delay_ms() -> u64 {
    3000
}

const fn default_cure_followup_delay_ms() -> u64 {
    2000
}

const fn default_volume_plant() -> f32 {
    0.7
}

const fn default_volume_water() -> f32 {
    0.6
}

const fn default_volume_fertilizer() -> f32 {
    0.7
}

const fn default_volume_disease() -> f32 {
    0.8
}

const fn default_volume_heal() -> f32 {
    0.7
}

const fn default_volume_harvest() -> f32 {
    0.8
}

fn default_log_level() -> String {
    "info".to_owned()
}
