//! User choices for a single render cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label of the area selector option that disables filtering.
pub const ALL_AREAS: &str = "ALL";

/// Area filter chosen by the user.
///
/// "No filter" is a separate variant rather than a magic string, so it cannot collide with a
/// real area name even if some area is literally called `ALL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AreaFilter {
    /// Keep every record.
    #[default]
    All,
    /// Keep only records of the named area.
    Area(String),
}

impl AreaFilter {
    /// Interprets an option of the area selector.
    ///
    /// [`ALL_AREAS`] maps to [`AreaFilter::All`], any other value names an area.
    pub fn from_choice(choice: &str) -> Self {
        if choice == ALL_AREAS {
            Self::All
        } else {
            Self::Area(choice.to_string())
        }
    }

    /// Name of the selected area, `None` for [`AreaFilter::All`].
    pub fn area(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Area(name) => Some(name),
        }
    }
}

impl fmt::Display for AreaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_AREAS),
            Self::Area(name) => f.write_str(name),
        }
    }
}

/// Overlay layers drawn on top of the boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerSet {
    /// One marker per incident.
    pub points: bool,
    /// Density layer.
    pub heatmap: bool,
}

impl LayerSet {
    /// Boundaries only.
    pub const NONE: Self = Self {
        points: false,
        heatmap: false,
    };

    /// Markers and density layer.
    pub const BOTH: Self = Self {
        points: true,
        heatmap: true,
    };
}

impl Default for LayerSet {
    fn default() -> Self {
        Self {
            points: false,
            heatmap: true,
        }
    }
}

/// Upper bound on the number of incidents drawn.
///
/// Always a multiple of [`SampleCap::STEP`] within [`SampleCap::MIN`]..=[`SampleCap::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct SampleCap(usize);

impl SampleCap {
    /// Smallest allowed cap.
    pub const MIN: usize = 100;
    /// Largest allowed cap.
    pub const MAX: usize = 2000;
    /// Slider step.
    pub const STEP: usize = 100;
    /// Initial slider position.
    pub const DEFAULT: usize = 500;

    /// Clamps the value into the allowed range and snaps it to the nearest step.
    pub fn clamped(value: usize) -> Self {
        let clamped = value.clamp(Self::MIN, Self::MAX);
        let snapped = (clamped + Self::STEP / 2) / Self::STEP * Self::STEP;

        Self(snapped.clamp(Self::MIN, Self::MAX))
    }

    /// Cap value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for SampleCap {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<usize> for SampleCap {
    fn from(value: usize) -> Self {
        Self::clamped(value)
    }
}

impl From<SampleCap> for usize {
    fn from(value: SampleCap) -> Self {
        value.0
    }
}

/// Everything the user chose for one render cycle.
///
/// Built fresh from the controls on every interaction and passed to
/// [`render_view`](crate::render_view) explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewSelection {
    /// Area filter.
    pub area: AreaFilter,
    /// Overlay layers.
    pub layers: LayerSet,
    /// Sampling cap.
    pub sample_cap: SampleCap,
}
