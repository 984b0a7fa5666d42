use std::collections::BTreeMap;

use serde::Serialize;

use crate::panel::PanelId;

/// What a preset sets on one panel. A missing `size` keeps the panel's current size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelOverride {
    pub visible: bool,
    pub size: Option<f64>,
}

impl PanelOverride {
    pub const fn shown(size: f64) -> Self {
        Self {
            visible: true,
            size: Some(size),
        }
    }

    pub const fn hidden() -> Self {
        Self {
            visible: false,
            size: None,
        }
    }

    /// Visible with no size, for the flex-fill editor area.
    pub const fn fill() -> Self {
        Self {
            visible: true,
            size: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPreset {
    pub name: String,
    pub label: String,
    pub description: String,
    /// Panels not listed here are left untouched when the preset is applied.
    pub panels: BTreeMap<PanelId, PanelOverride>,
}

/// Menu entry for a preset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub name: String,
    pub display_label: String,
    pub description: String,
}

impl LayoutPreset {
    pub fn new(
        name: &str,
        label: &str,
        description: &str,
        panels: impl IntoIterator<Item = (PanelId, PanelOverride)>,
    ) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            panels: panels.into_iter().collect(),
        }
    }

    pub fn summary(&self) -> PresetSummary {
        PresetSummary {
            name: self.name.clone(),
            display_label: self.label.clone(),
            description: self.description.clone(),
        }
    }
}

/// Named presets in registration order.
#[derive(Clone, Debug)]
pub struct PresetTable {
    presets: Vec<LayoutPreset>,
}

impl Default for PresetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetTable {
    pub fn empty() -> Self {
        Self {
            presets: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        use PanelId::*;

        let mut table = Self::empty();
        table.register(LayoutPreset::new(
            "default",
            "Default Layout",
            "Sidebar, editor, terminal and AI panel",
            [
                (Sidebar, PanelOverride::shown(250.0)),
                (EditorArea, PanelOverride::fill()),
                (Terminal, PanelOverride::shown(250.0)),
                (AiPanel, PanelOverride::shown(380.0)),
            ],
        ));
        table.register(LayoutPreset::new(
            "focus",
            "Focus Mode",
            "Editor only",
            [
                (Sidebar, PanelOverride::hidden()),
                (EditorArea, PanelOverride::fill()),
                (Terminal, PanelOverride::hidden()),
                (AiPanel, PanelOverride::hidden()),
            ],
        ));
        table.register(LayoutPreset::new(
            "coding",
            "Coding Layout",
            "Sidebar, editor and terminal",
            [
                (Sidebar, PanelOverride::shown(250.0)),
                (EditorArea, PanelOverride::fill()),
                (Terminal, PanelOverride::shown(250.0)),
                (AiPanel, PanelOverride::hidden()),
            ],
        ));
        table.register(LayoutPreset::new(
            "debugging",
            "Debugging",
            "Everything visible with a taller terminal",
            [
                (Sidebar, PanelOverride::shown(250.0)),
                (EditorArea, PanelOverride::fill()),
                (Terminal, PanelOverride::shown(350.0)),
                (AiPanel, PanelOverride::shown(380.0)),
            ],
        ));
        table.register(LayoutPreset::new(
            "aiAssist",
            "AI Assist",
            "Wide AI panel next to the editor",
            [
                (Sidebar, PanelOverride::shown(250.0)),
                (EditorArea, PanelOverride::fill()),
                (Terminal, PanelOverride::hidden()),
                (AiPanel, PanelOverride::shown(450.0)),
            ],
        ));
        table.register(LayoutPreset::new(
            "minimal",
            "Minimal",
            "Editor with a short terminal",
            [
                (Sidebar, PanelOverride::hidden()),
                (EditorArea, PanelOverride::fill()),
                (Terminal, PanelOverride::shown(200.0)),
                (AiPanel, PanelOverride::hidden()),
            ],
        ));
        table
    }

    /// Add a preset. A preset with the same name is replaced where it stands,
    /// so menu order stays stable.
    pub fn register(&mut self, preset: LayoutPreset) {
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LayoutPreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn list(&self) -> Vec<PresetSummary> {
        self.presets.iter().map(LayoutPreset::summary).collect()
    }
}
