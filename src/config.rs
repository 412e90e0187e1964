use crate::DisplayColorMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid surface configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown display color mode {0:?}")]
    UnknownDisplayColorMode(String),
}

/// Scribble strip colors are supported with Behringer's sys-ex dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelColorSupport {
    Behringer,
}

/// User-facing settings of a surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceConfig {
    pub display_color_mode: DisplayColorMode,
    /// Whether each channel has its own display. If not, neighboring channel texts would run
    /// into each other, so one character of each channel cell is kept blank.
    pub has_individual_scribble_strips: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_color_support: Option<ChannelColorSupport>,
}

impl SurfaceConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Number of characters available for the texts of one channel.
    pub fn channel_width(&self) -> usize {
        if self.has_individual_scribble_strips {
            7
        } else {
            6
        }
    }

    pub fn supports_channel_colors(&self) -> bool {
        self.channel_color_support.is_some()
    }
}

/// Parses a display color mode name as used in configuration files.
pub fn parse_display_color_mode(name: &str) -> Result<DisplayColorMode, ConfigError> {
    DisplayColorMode::from_str(name)
        .map_err(|_| ConfigError::UnknownDisplayColorMode(name.to_string()))
}
