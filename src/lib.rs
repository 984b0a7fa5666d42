//! Panel layout core for the IDE shell.
//!
//! [`LayoutManager`] owns which panels are shown and how large they are,
//! applies named presets, persists every change through a [`LayoutStore`]
//! and tells subscribers about it. [`ResizeController`] turns pointer drags on
//! resize handles into clamped size updates with a single commit on release.
//! Rendering stays outside: hosts subscribe to [`LayoutEvent`]s and read
//! [`LayoutState`] snapshots.

pub mod config;
pub mod error;
pub mod event;
pub mod layout;
pub mod layout_presets;
pub mod logging;
pub mod panel;
pub mod resize;
pub mod session;

pub use error::LayoutError;
pub use event::{LayoutEvent, SubscriptionId};
pub use layout::{LayoutManager, LayoutState, DEFAULT_LAYOUT};
pub use layout_presets::{LayoutPreset, PanelOverride, PresetSummary, PresetTable};
pub use panel::{Anchor, PanelId, PanelState, SizeBounds};
pub use resize::{PointerEvent, ResizeController, ResizeOutcome};
pub use session::store::{FileStore, LayoutStore, MemoryStore, QueuedStore};
pub use session::SavedLayout;
