pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layout::LayoutState;

pub const RECORD_VERSION: u32 = 1;

/// The on-disk layout record.
///
/// Every field except the panel map is optional on read so records written by
/// older or newer builds still load; anything missing falls back to defaults
/// when the record is merged into a `LayoutState`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub revision: u64,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub current_layout_name: Option<String>,
    /// Keyed by panel name. Unknown keys are kept here and ignored on merge.
    #[serde(default)]
    pub panels: BTreeMap<String, SavedPanel>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedPanel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, alias = "width", alias = "height", skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl SavedLayout {
    pub fn from_state(state: &LayoutState, revision: u64) -> Self {
        let panels = state
            .panels
            .iter()
            .map(|(id, panel)| {
                (
                    id.to_string(),
                    SavedPanel {
                        visible: Some(panel.visible),
                        size: panel.size,
                    },
                )
            })
            .collect();
        Self {
            version: RECORD_VERSION,
            revision,
            updated_at: Utc::now(),
            current_layout_name: Some(state.current_layout_name.clone()),
            panels,
        }
    }
}
