use thiserror::Error;

use crate::panel::PanelId;

/// Caller errors raised by the layout core.
///
/// Environment failures (storage, corrupt records, unknown preset names) are
/// absorbed by the store and never show up here.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A panel key outside the fixed panel set.
    #[error("unknown panel: {0}")]
    UnknownPanel(String),

    /// Size operation on a panel that fills the remaining space.
    #[error("panel {0} has no adjustable size")]
    NotResizable(PanelId),
}
