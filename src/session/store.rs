use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use super::{SavedLayout, RECORD_VERSION};

/// Key-value persistence for the layout record.
///
/// `load` never fails: missing, unreadable and corrupt data all mean "no prior
/// state". `save` reports failures so the caller can log them.
pub trait LayoutStore {
    fn save(&mut self, record: &SavedLayout) -> Result<()>;
    fn load(&mut self) -> Option<SavedLayout>;
}

fn state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ide-layout")
}

pub fn state_file_path() -> PathBuf {
    state_dir().join("layout.json")
}

pub fn save_to(record: &SavedLayout, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_from(path: &Path) -> Option<SavedLayout> {
    let json = fs::read_to_string(path).ok()?;
    let mut record: SavedLayout = match serde_json::from_str(&json) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(path = %path.display(), "ignoring corrupt layout record: {}", e);
            return None;
        }
    };
    migrate(&mut record);
    Some(record)
}

/// Bring an older record up to the current schema.
fn migrate(record: &mut SavedLayout) {
    if record.version < RECORD_VERSION {
        if let Some(editor) = record.panels.remove("editor") {
            record.panels.entry("editorArea".to_string()).or_insert(editor);
        }
        record.version = RECORD_VERSION;
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutStore for FileStore {
    fn save(&mut self, record: &SavedLayout) -> Result<()> {
        save_to(record, &self.path)
    }

    fn load(&mut self) -> Option<SavedLayout> {
        load_from(&self.path)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryInner {
    record: Option<SavedLayout>,
    saves: usize,
    fail_writes: bool,
}

/// In-process store. Clones share the same slot, so a test can keep a handle
/// while the layout manager owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SavedLayout) -> Self {
        let store = Self::default();
        store.lock().record = Some(record);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    pub fn record(&self) -> Option<SavedLayout> {
        self.lock().record.clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl LayoutStore for MemoryStore {
    fn save(&mut self, record: &SavedLayout) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_writes {
            anyhow::bail!("layout store is not writable");
        }
        inner.record = Some(record.clone());
        inner.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> Option<SavedLayout> {
        self.lock().record.clone()
    }
}

// ---------------------------------------------------------------------------
// QueuedStore
// ---------------------------------------------------------------------------

enum WriteRequest {
    Save(SavedLayout),
    Flush(oneshot::Sender<()>),
}

/// Write-behind wrapper around a [`FileStore`].
///
/// Saves are handed to a background task and return immediately. The task
/// writes one record at a time and, when several are queued, only writes the
/// newest, so the file always ends on the last record enqueued.
pub struct QueuedStore {
    file: FileStore,
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl QueuedStore {
    /// Spawn the writer task. Must be called inside a tokio runtime.
    pub fn spawn(file: FileStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(file.path.clone(), rx));
        Self { file, tx }
    }

    /// Wait until every save queued before this call has been written.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteRequest::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

impl LayoutStore for QueuedStore {
    fn save(&mut self, record: &SavedLayout) -> Result<()> {
        self.tx
            .send(WriteRequest::Save(record.clone()))
            .map_err(|_| anyhow::anyhow!("layout writer task has stopped"))
    }

    fn load(&mut self) -> Option<SavedLayout> {
        self.file.load()
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriteRequest>) {
    while let Some(request) = rx.recv().await {
        let mut pending = None;
        let mut waiters = Vec::new();
        match request {
            WriteRequest::Save(record) => pending = Some(record),
            WriteRequest::Flush(done) => waiters.push(done),
        }
        // Coalesce whatever else is already queued.
        while let Ok(next) = rx.try_recv() {
            match next {
                WriteRequest::Save(record) => pending = Some(record),
                WriteRequest::Flush(done) => waiters.push(done),
            }
        }

        if let Some(record) = pending {
            let target = path.clone();
            let revision = record.revision;
            let written = tokio::task::spawn_blocking(move || save_to(&record, &target)).await;
            match written {
                Ok(Ok(())) => tracing::debug!(revision, "layout record written"),
                Ok(Err(e)) => tracing::warn!(revision, "failed to write layout record: {}", e),
                Err(e) => tracing::warn!(revision, "layout writer join error: {}", e),
            }
        }
        for done in waiters {
            let _ = done.send(());
        }
    }
}
