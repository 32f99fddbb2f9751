//! Sheet-level output formats and the container aspect ratio they define.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use serde::{Deserialize, Serialize};

/// The sheet's output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    /// 16:9.
    #[default]
    Landscape,
    /// 9:16.
    Portrait,
    /// 1:1.
    Square,
    /// Aspect ratio taken from the sheet's [`CustomFormat`].
    Custom,
}

/// Pixel dimensions defining the aspect ratio of a custom-format sheet. Only
/// the ratio matters; the export consumer picks the actual output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
    pub width: u32,
    pub height: u32,
}

impl Default for CustomFormat {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

impl CustomFormat {
    /// Width/height ratio. A zero side would make every derived height
    /// degenerate, so it falls back to a square container instead.
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }
}

impl SheetFormat {
    /// Container width/height ratio for this format.
    #[must_use]
    pub fn aspect_ratio(self, custom: CustomFormat) -> f64 {
        match self {
            Self::Landscape => 16.0 / 9.0,
            Self::Portrait => 9.0 / 16.0,
            Self::Square => 1.0,
            Self::Custom => custom.aspect_ratio(),
        }
    }
}
