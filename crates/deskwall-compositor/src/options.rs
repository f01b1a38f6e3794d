use deskwall_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating [`WallOptions`].
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid wall options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gap size must not be negative, got {0}")]
    NegativeGap(i32),

    #[error("Background color channels must lie in 0.0..=1.0, got {0:?}")]
    InvalidBackground(Color),
}

/// Named visual variants of the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallPreset {
    #[default]
    Standard,
    /// Wall shown to a remote viewer: always opaque, saturated green background.
    RemoteView,
}

/// How the background instruction treats the `transparent_background` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransparencyPolicy {
    #[default]
    FollowConfig,
    ForceOpaque,
    ForceTransparent,
}

/// Variation points of the compositor. The scheduling and render algorithms
/// are fixed; everything a variant changes is threaded through here.
#[derive(Debug, Clone, Copy)]
pub struct WallStyle {
    pub transparency: TransparencyPolicy,
    /// Applied to the configured background color before clearing.
    pub background_transform: Option<fn(Color) -> Color>,
}

impl Default for WallStyle {
    fn default() -> Self {
        Self {
            transparency: TransparencyPolicy::FollowConfig,
            background_transform: None,
        }
    }
}

impl WallStyle {
    pub fn remote_view() -> Self {
        Self {
            transparency: TransparencyPolicy::ForceOpaque,
            background_transform: Some(green_only),
        }
    }

    /// Color the background instruction clears with.
    ///
    /// A transparent background still clears, with a zero-alpha color, so the
    /// region counts as drawn for whatever composites this output next.
    pub fn background_color(&self, configured: Color, transparent_background: bool) -> Color {
        let transparent = match self.transparency {
            TransparencyPolicy::FollowConfig => transparent_background,
            TransparencyPolicy::ForceOpaque => false,
            TransparencyPolicy::ForceTransparent => true,
        };
        if transparent {
            return Color::TRANSPARENT;
        }
        match self.background_transform {
            Some(transform) => transform(configured).clamped(),
            None => configured,
        }
    }
}

impl From<WallPreset> for WallStyle {
    fn from(preset: WallPreset) -> Self {
        match preset {
            WallPreset::Standard => WallStyle::default(),
            WallPreset::RemoteView => WallStyle::remote_view(),
        }
    }
}

/// Green channel gain of the remote-view background. Any visible green
/// saturates once the result is clamped.
const REMOTE_VIEW_GREEN_GAIN: f32 = 255.8;

fn green_only(color: Color) -> Color {
    Color::new(0.0, color.g * REMOTE_VIEW_GREEN_GAIN, 0.0, color.a)
}

/// User-facing wall settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallOptions {
    /// Gap between adjacent workspaces, in pixels.
    pub gap_size: i32,
    pub background_color: Color,
    pub transparent_background: bool,
    pub preset: WallPreset,
}

impl Default for WallOptions {
    fn default() -> Self {
        Self {
            gap_size: 0,
            background_color: Color::BLACK,
            transparent_background: false,
            preset: WallPreset::Standard,
        }
    }
}

impl WallOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.gap_size < 0 {
            return Err(OptionsError::NegativeGap(self.gap_size));
        }
        if !self.background_color.is_valid() {
            return Err(OptionsError::InvalidBackground(self.background_color));
        }
        Ok(())
    }

    pub fn style(&self) -> WallStyle {
        WallStyle::from(self.preset)
    }

    pub fn to_json(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate options. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: WallOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}
