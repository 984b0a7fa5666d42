//! Pointer-driven panel resizing.
//!
//! A drag starts on a panel's resize handle, updates the panel size live on
//! every move (clamped, not persisted) and commits once on release. The
//! controller is `Idle` or `Dragging`; a drag that never saw its release is
//! closed by the next pointer-down or an explicit [`ResizeController::cancel`].
//!
//! Pressing a handle while a drag is already open commits the open drag
//! first, then starts the new one. Pressing anywhere else commits and ends it.
//!
//! If the dragged panel gets hidden mid-drag (a preset or toggle), the drag is
//! dropped on the next pointer event without touching the size or committing.
//! A preset that changes the size of a still-visible panel does not end the
//! drag; the next move resizes from the drag's starting point again.

use crate::layout::LayoutManager;
use crate::panel::{Anchor, PanelId};

/// Pointer input as delivered by the host. Coordinates are in the same units
/// as panel sizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// `handle` is the panel whose resize handle was hit, if any.
    Down { x: f64, y: f64, handle: Option<PanelId> },
    Move { x: f64, y: f64 },
    Up,
}

/// What a pointer event did, so the host knows whether to redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeOutcome {
    Ignored,
    Started { panel: PanelId },
    Updated { panel: PanelId, size: f64 },
    Committed { panel: PanelId, size: f64 },
    Cancelled { panel: PanelId, size: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ResizeSession {
    panel: PanelId,
    anchor: Anchor,
    start_pos: f64,
    start_size: f64,
}

impl ResizeSession {
    fn candidate(&self, x: f64, y: f64) -> f64 {
        match self.anchor {
            Anchor::Left => self.start_size + (x - self.start_pos),
            Anchor::Right => self.start_size + (self.start_pos - x),
            Anchor::Bottom => self.start_size + (self.start_pos - y),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Panel being dragged, for cursor styling.
    pub fn active_panel(&self) -> Option<PanelId> {
        self.session.map(|s| s.panel)
    }

    pub fn handle(&mut self, layout: &mut LayoutManager, event: PointerEvent) -> ResizeOutcome {
        match event {
            PointerEvent::Down { x, y, handle } => self.pointer_down(layout, x, y, handle),
            PointerEvent::Move { x, y } => self.pointer_move(layout, x, y),
            PointerEvent::Up => self.pointer_up(layout),
        }
    }

    fn pointer_down(
        &mut self,
        layout: &mut LayoutManager,
        x: f64,
        y: f64,
        handle: Option<PanelId>,
    ) -> ResizeOutcome {
        if let Some(stale) = self.session {
            tracing::debug!(panel = %stale.panel, "pointer down during drag, committing open drag");
            self.pointer_up(layout);
        }

        let panel = match handle {
            Some(p) => p,
            None => return ResizeOutcome::Ignored,
        };
        let anchor = match panel.anchor() {
            Some(a) => a,
            None => return ResizeOutcome::Ignored,
        };
        let state = layout.panel(panel);
        // A hidden panel has no handle to grab.
        if !state.visible {
            return ResizeOutcome::Ignored;
        }
        let start_size = match state.size {
            Some(size) => size,
            None => return ResizeOutcome::Ignored,
        };
        let start_pos = match anchor {
            Anchor::Left | Anchor::Right => x,
            Anchor::Bottom => y,
        };

        self.session = Some(ResizeSession {
            panel,
            anchor,
            start_pos,
            start_size,
        });
        tracing::debug!(panel = %panel, start_size, "resize drag started");
        ResizeOutcome::Started { panel }
    }

    /// Drop the session when its panel was hidden underneath it.
    fn live_session(&mut self, layout: &LayoutManager) -> Option<ResizeSession> {
        let session = self.session?;
        if !layout.panel(session.panel).visible {
            tracing::debug!(panel = %session.panel, "panel hidden during drag, dropping drag");
            self.session = None;
            return None;
        }
        Some(session)
    }

    fn pointer_move(&mut self, layout: &mut LayoutManager, x: f64, y: f64) -> ResizeOutcome {
        let session = match self.live_session(layout) {
            Some(s) => s,
            None => return ResizeOutcome::Ignored,
        };
        match layout.set_panel_size(session.panel, session.candidate(x, y)) {
            Ok(size) => ResizeOutcome::Updated {
                panel: session.panel,
                size,
            },
            Err(e) => {
                tracing::warn!("dropping resize drag: {}", e);
                self.session = None;
                ResizeOutcome::Ignored
            }
        }
    }

    fn pointer_up(&mut self, layout: &mut LayoutManager) -> ResizeOutcome {
        let session = match self.live_session(layout) {
            Some(s) => s,
            None => return ResizeOutcome::Ignored,
        };
        self.session = None;
        match layout.commit_size(session.panel) {
            Ok(size) => {
                tracing::debug!(panel = %session.panel, size, "resize drag committed");
                ResizeOutcome::Committed {
                    panel: session.panel,
                    size,
                }
            }
            Err(e) => {
                tracing::warn!("could not commit resize: {}", e);
                ResizeOutcome::Ignored
            }
        }
    }

    /// Abort the drag and put the panel back at its starting size. Nothing is
    /// persisted or announced.
    pub fn cancel(&mut self, layout: &mut LayoutManager) -> ResizeOutcome {
        let session = match self.session.take() {
            Some(s) => s,
            None => return ResizeOutcome::Ignored,
        };
        match layout.set_panel_size(session.panel, session.start_size) {
            Ok(size) => ResizeOutcome::Cancelled {
                panel: session.panel,
                size,
            },
            Err(_) => ResizeOutcome::Ignored,
        }
    }
}
