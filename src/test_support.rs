use crate::context::{STORE_DIR_NAME, StoreContext};
use crate::store::{FileStore, NewPrompt, PromptStore};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A temp directory holding an initialized, empty store.
pub(crate) fn create_test_store() -> (TempDir, FileStore) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = StoreContext::at(temp_dir.path().join(STORE_DIR_NAME));
    for dir in ctx.required_dirs() {
        std::fs::create_dir_all(dir).unwrap();
    }
    (temp_dir, FileStore::new(ctx))
}

/// Create a prompt with the given content and return its id.
pub(crate) fn add_prompt(store: &FileStore, title: &str, content: &str) -> String {
    store
        .create(NewPrompt {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        })
        .unwrap()
        .id()
        .to_string()
}
