use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::layout::DEFAULT_LAYOUT;
use crate::layout_presets::{LayoutPreset, PanelOverride, PresetTable};
use crate::panel::PanelId;
use crate::session::store;

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Config {
    /// Preset applied when there is no saved layout yet.
    pub initial_layout: String,
    pub state_file: PathBuf,
    /// `tracing` filter directives; `IDE_LAYOUT_LOG` takes precedence.
    pub log_filter: Option<String>,
    /// Extra presets registered after the built-in ones.
    pub presets: Vec<LayoutPreset>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_layout: DEFAULT_LAYOUT.to_string(),
            state_file: store::state_file_path(),
            log_filter: None,
            presets: Vec::new(),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("ide-layout").join("config.toml"))
        .unwrap_or_default()
}

impl Config {
    /// Missing file is `Ok(default)`; unreadable or malformed files are errors.
    pub fn try_load(path: &Path) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    /// Built-in presets followed by the configured ones.
    pub fn preset_table(&self) -> PresetTable {
        let mut table = PresetTable::builtin();
        for preset in &self.presets {
            table.register(preset.clone());
        }
        table
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();

        if let Some(l) = raw.layout {
            if let Some(name) = l.initial {
                config.initial_layout = name;
            }
            if let Some(path) = l.state_file {
                config.state_file = path;
            }
        }

        if let Some(log) = raw.log {
            config.log_filter = log.filter;
        }

        for p in raw.presets.unwrap_or_default() {
            let mut panels = BTreeMap::new();
            for (key, panel) in p.panels {
                match PanelId::parse(&key) {
                    Ok(id) => {
                        panels.insert(
                            id,
                            PanelOverride {
                                visible: panel.visible.unwrap_or(true),
                                size: panel.size,
                            },
                        );
                    }
                    Err(e) => tracing::warn!(preset = %p.name, "ignoring preset entry: {}", e),
                }
            }
            config.presets.push(LayoutPreset {
                label: p.label.unwrap_or_else(|| p.name.clone()),
                description: p.description.unwrap_or_default(),
                name: p.name,
                panels,
            });
        }

        config
    }
}

// ---------------------------------------------------------------------------
// Raw TOML shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
struct RawConfig {
    layout: Option<RawLayout>,
    log: Option<RawLog>,
    presets: Option<Vec<RawPreset>>,
}

#[derive(Deserialize, Default)]
struct RawLayout {
    initial: Option<String>,
    state_file: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
struct RawLog {
    filter: Option<String>,
}

#[derive(Deserialize)]
struct RawPreset {
    name: String,
    label: Option<String>,
    description: Option<String>,
    /// Remaining keys are panel names.
    #[serde(flatten)]
    panels: BTreeMap<String, RawPanel>,
}

#[derive(Deserialize, Default)]
struct RawPanel {
    visible: Option<bool>,
    size: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.initial_layout, DEFAULT_LAYOUT);
        assert!(config.log_filter.is_none());
        assert!(config.presets.is_empty());
        assert_eq!(config.preset_table().list().len(), 6);
    }

    #[test]
    fn test_layout_and_log_sections() {
        let config = Config::from_toml_str(
            r#"
            [layout]
            initial = "focus"
            state_file = "/tmp/ide/layout.json"

            [log]
            filter = "ide_layout=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.initial_layout, "focus");
        assert_eq!(config.state_file, PathBuf::from("/tmp/ide/layout.json"));
        assert_eq!(config.log_filter.as_deref(), Some("ide_layout=debug"));
    }

    #[test]
    fn test_presets_register_in_order() {
        let config = Config::from_toml_str(
            r#"
            [[presets]]
            name = "review"
            label = "Code Review"
            description = "Wide sidebar, no terminal"
            sidebar = { visible = true, size = 400 }
            terminal = { visible = false }

            [[presets]]
            name = "focus"
            label = "Zen"
            editorArea = { visible = true }
            "#,
        )
        .unwrap();
        assert_eq!(config.presets.len(), 2);

        let review = &config.presets[0];
        assert_eq!(review.label, "Code Review");
        assert_eq!(review.panels[&PanelId::Sidebar], PanelOverride::shown(400.0));
        assert!(!review.panels[&PanelId::Terminal].visible);
        assert!(!review.panels.contains_key(&PanelId::AiPanel));

        let table = config.preset_table();
        let names: Vec<String> = table.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names[1], "focus");
        assert_eq!(names.last().map(String::as_str), Some("review"));
        assert_eq!(table.get("focus").unwrap().label, "Zen");
    }

    #[test]
    fn test_preset_label_defaults_to_name() {
        let config = Config::from_toml_str(
            r#"
            [[presets]]
            name = "bare"
            "#,
        )
        .unwrap();
        assert_eq!(config.presets[0].label, "bare");
        assert_eq!(config.presets[0].description, "");
    }

    #[test]
    fn test_unknown_preset_panel_is_skipped() {
        let config = Config::from_toml_str(
            r#"
            [[presets]]
            name = "odd"
            minimap = { visible = true }
            aiPanel = { visible = true, size = 500 }
            "#,
        )
        .unwrap();
        assert_eq!(config.presets[0].panels.len(), 1);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml_str("[layout\ninitial = ").is_err());
    }

    #[test]
    fn test_try_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::try_load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.initial_layout, DEFAULT_LAYOUT);
    }

    #[test]
    fn test_try_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[layout]\ninitial = \"minimal\"\n").unwrap();
        assert_eq!(Config::try_load(&path).unwrap().initial_layout, "minimal");
    }
}
