use quillpost_shared::{KeyValueStore, StorageError};
use web_sys::{window, Storage};

/// `window.localStorage`, looked up on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage() -> Result<Storage, StorageError> {
    window()
        .ok_or_else(|| StorageError::Unavailable("no window".into()))?
        .local_storage()
        .map_err(|_| StorageError::Unavailable("localStorage access denied".into()))?
        .ok_or_else(|| StorageError::Unavailable("localStorage missing".into()))
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        local_storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable(format!("could not read `{key}`")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write {
                key: key.to_owned(),
                reason: "quota exceeded or storage disabled".into(),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        local_storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Write {
                key: key.to_owned(),
                reason: "could not remove".into(),
            })
    }
}
