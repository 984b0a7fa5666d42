use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// The fixed set of managed panels.
///
/// Adding a panel means adding a variant here and giving it bounds and an anchor;
/// the rest of the crate iterates `PanelId::ALL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelId {
    Sidebar,
    EditorArea,
    Terminal,
    AiPanel,
}

/// Which viewport edge a resizable panel hangs off. Decides the drag sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Grows as the pointer moves right.
    Left,
    /// Grows as the pointer moves left.
    Right,
    /// Grows as the pointer moves up.
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    #[serde(rename = "minSize")]
    pub min: f64,
    #[serde(rename = "maxSize")]
    pub max: f64,
}

impl SizeBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [
        PanelId::Sidebar,
        PanelId::EditorArea,
        PanelId::Terminal,
        PanelId::AiPanel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Sidebar => "sidebar",
            PanelId::EditorArea => "editorArea",
            PanelId::Terminal => "terminal",
            PanelId::AiPanel => "aiPanel",
        }
    }

    /// Parse a panel key. `editor` is accepted for records written before the
    /// editor panel was renamed.
    pub fn parse(name: &str) -> Result<Self, LayoutError> {
        match name {
            "sidebar" => Ok(PanelId::Sidebar),
            "editorArea" | "editor" => Ok(PanelId::EditorArea),
            "terminal" => Ok(PanelId::Terminal),
            "aiPanel" => Ok(PanelId::AiPanel),
            other => Err(LayoutError::UnknownPanel(other.to_string())),
        }
    }

    /// Size bounds, or `None` for the flex-fill editor area.
    pub fn bounds(&self) -> Option<SizeBounds> {
        match self {
            PanelId::Sidebar => Some(SizeBounds::new(200.0, 500.0)),
            PanelId::EditorArea => None,
            PanelId::Terminal => Some(SizeBounds::new(150.0, 500.0)),
            PanelId::AiPanel => Some(SizeBounds::new(300.0, 600.0)),
        }
    }

    pub fn anchor(&self) -> Option<Anchor> {
        match self {
            PanelId::Sidebar => Some(Anchor::Left),
            PanelId::EditorArea => None,
            PanelId::Terminal => Some(Anchor::Bottom),
            PanelId::AiPanel => Some(Anchor::Right),
        }
    }

    pub fn is_resizable(&self) -> bool {
        self.bounds().is_some()
    }

    /// Built-in state used before any preset or persisted record is applied.
    pub fn default_state(&self) -> PanelState {
        let size = match self {
            PanelId::Sidebar => Some(250.0),
            PanelId::EditorArea => None,
            PanelId::Terminal => Some(250.0),
            PanelId::AiPanel => Some(380.0),
        };
        PanelState {
            visible: true,
            size,
            bounds: self.bounds(),
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::parse(s)
    }
}

/// Visibility and size of one panel. `size` and `bounds` are `None` for
/// panels that fill the remaining space.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelState {
    pub visible: bool,
    pub size: Option<f64>,
    /// Serialized inline as `minSize` / `maxSize`.
    #[serde(flatten)]
    pub bounds: Option<SizeBounds>,
}

impl PanelState {
    pub fn min_size(&self) -> Option<f64> {
        self.bounds.map(|b| b.min)
    }

    pub fn max_size(&self) -> Option<f64> {
        self.bounds.map(|b| b.max)
    }
}
