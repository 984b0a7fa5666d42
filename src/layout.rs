use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::LayoutError;
use crate::event::{LayoutEvent, SubscriptionId, Subscribers};
use crate::layout_presets::{PresetTable, PresetSummary};
use crate::panel::{PanelId, PanelState};
use crate::session::store::LayoutStore;
use crate::session::SavedLayout;

pub const DEFAULT_LAYOUT: &str = "default";

/// Layout name plus the state of every panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    pub current_layout_name: String,
    pub panels: BTreeMap<PanelId, PanelState>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            current_layout_name: DEFAULT_LAYOUT.to_string(),
            panels: PanelId::ALL
                .iter()
                .map(|id| (*id, id.default_state()))
                .collect(),
        }
    }
}

impl LayoutState {
    pub fn panel(&self, id: PanelId) -> &PanelState {
        // Every constructor fills all of PanelId::ALL.
        &self.panels[&id]
    }

    fn panel_mut(&mut self, id: PanelId) -> &mut PanelState {
        self.panels.entry(id).or_insert_with(|| id.default_state())
    }

    /// Overlay a persisted record field by field. Unknown panel keys are
    /// skipped and sizes are clamped into each panel's bounds.
    pub fn merge_saved(&mut self, saved: &SavedLayout) {
        if let Some(name) = &saved.current_layout_name {
            self.current_layout_name = name.clone();
        }
        for (key, entry) in &saved.panels {
            let id = match PanelId::parse(key) {
                Ok(id) => id,
                Err(_) => {
                    tracing::debug!(panel = %key, "skipping unknown panel in saved layout");
                    continue;
                }
            };
            let panel = self.panel_mut(id);
            if let Some(visible) = entry.visible {
                panel.visible = visible;
            }
            if let (Some(size), Some(bounds)) = (entry.size, panel.bounds) {
                if size.is_finite() {
                    panel.size = Some(bounds.clamp(size));
                }
            }
        }
    }
}

/// Owns the layout state: every visibility and size change goes through here,
/// gets persisted, and is announced to subscribers.
pub struct LayoutManager {
    state: LayoutState,
    presets: PresetTable,
    store: Box<dyn LayoutStore>,
    subscribers: Subscribers,
    revision: u64,
    persist_failures: usize,
}

impl LayoutManager {
    /// Built-in defaults, nothing loaded.
    pub fn new(presets: PresetTable, store: Box<dyn LayoutStore>) -> Self {
        Self {
            state: LayoutState::default(),
            presets,
            store,
            subscribers: Subscribers::default(),
            revision: 0,
            persist_failures: 0,
        }
    }

    /// Start from defaults and overlay the persisted record if there is one.
    /// Without a record, `initial_layout` is applied (when it names a preset).
    pub fn load(presets: PresetTable, store: Box<dyn LayoutStore>, initial_layout: &str) -> Self {
        let mut manager = Self::new(presets, store);
        match manager.store.load() {
            Some(saved) => {
                manager.revision = saved.revision;
                manager.state.merge_saved(&saved);
                tracing::info!(
                    layout = %manager.state.current_layout_name,
                    revision = saved.revision,
                    "restored saved layout"
                );
            }
            None => {
                if !manager.apply_layout(initial_layout) {
                    tracing::warn!(layout = initial_layout, "initial layout not found, using defaults");
                }
            }
        }
        manager
    }

    /// Copy of the current state. Changing it does not touch the manager.
    pub fn state(&self) -> LayoutState {
        self.state.clone()
    }

    pub fn current_layout_name(&self) -> &str {
        &self.state.current_layout_name
    }

    pub fn panel(&self, id: PanelId) -> PanelState {
        self.state.panel(id).clone()
    }

    /// Look a panel up by its key, for callers holding strings.
    pub fn panel_by_name(&self, name: &str) -> Result<PanelState, LayoutError> {
        Ok(self.panel(PanelId::parse(name)?))
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn list_presets(&self) -> Vec<PresetSummary> {
        self.presets.list()
    }

    /// Saves that failed and were absorbed since construction.
    pub fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    /// Register a change callback. It receives the event and the state after
    /// the change; the manager itself is mutably borrowed while it runs.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&LayoutEvent, &LayoutState) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Set visibility and return it. Unchanged values are neither persisted
    /// nor announced.
    pub fn set_panel_visible(&mut self, id: PanelId, visible: bool) -> bool {
        let panel = self.state.panel_mut(id);
        if panel.visible == visible {
            return visible;
        }
        panel.visible = visible;
        tracing::debug!(panel = %id, visible, "panel visibility changed");
        self.persist();
        self.subscribers.notify(
            &LayoutEvent::PanelVisibilityChanged { panel: id, visible },
            &self.state,
        );
        visible
    }

    pub fn toggle_panel(&mut self, id: PanelId) -> bool {
        let visible = !self.state.panel(id).visible;
        self.set_panel_visible(id, visible)
    }

    /// Clamp and store a size without persisting or notifying. This is the
    /// live update used while a drag is in progress; see [`Self::commit_size`].
    ///
    /// Non-finite requests leave the size as it was.
    pub fn set_panel_size(&mut self, id: PanelId, requested: f64) -> Result<f64, LayoutError> {
        let panel = self.state.panel_mut(id);
        let bounds = panel.bounds.ok_or(LayoutError::NotResizable(id))?;
        let current = panel.size.unwrap_or(bounds.min);
        let applied = if requested.is_finite() {
            bounds.clamp(requested)
        } else {
            current
        };
        panel.size = Some(applied);
        Ok(applied)
    }

    /// Persist the panel's current size and announce it.
    pub fn commit_size(&mut self, id: PanelId) -> Result<f64, LayoutError> {
        let size = self
            .state
            .panel(id)
            .size
            .ok_or(LayoutError::NotResizable(id))?;
        self.persist();
        self.subscribers
            .notify(&LayoutEvent::PanelResized { panel: id, size }, &self.state);
        Ok(size)
    }

    /// One-shot resize outside of a drag: clamp, store, persist, notify.
    pub fn resize_panel(&mut self, id: PanelId, requested: f64) -> Result<f64, LayoutError> {
        self.set_panel_size(id, requested)?;
        self.commit_size(id)
    }

    /// Apply a named preset. Returns `false` and changes nothing when the
    /// name is unknown.
    pub fn apply_layout(&mut self, name: &str) -> bool {
        let preset = match self.presets.get(name) {
            Some(p) => p.clone(),
            None => {
                tracing::debug!(layout = name, "unknown layout preset");
                return false;
            }
        };
        for (id, over) in &preset.panels {
            let panel = self.state.panel_mut(*id);
            panel.visible = over.visible;
            if let (Some(size), Some(bounds)) = (over.size, panel.bounds) {
                panel.size = Some(bounds.clamp(size));
            }
        }
        self.state.current_layout_name = preset.name.clone();
        tracing::info!(layout = name, "applied layout");
        self.persist();
        self.subscribers.notify(
            &LayoutEvent::LayoutApplied { name: preset.name },
            &self.state,
        );
        true
    }

    pub fn reset_to_default(&mut self) -> bool {
        self.apply_layout(DEFAULT_LAYOUT)
    }

    /// Write the current state. Failures are logged and counted; the
    /// in-memory state stays authoritative either way.
    fn persist(&mut self) {
        self.revision += 1;
        let record = SavedLayout::from_state(&self.state, self.revision);
        if let Err(e) = self.store.save(&record) {
            self.persist_failures += 1;
            tracing::warn!(revision = self.revision, "failed to persist layout: {:#}", e);
        }
    }
}
