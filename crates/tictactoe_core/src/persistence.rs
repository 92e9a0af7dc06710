//! Key-value persistence for the game in progress.
//!
//! [`GameStorage`] writes two string entries: the board as a JSON array of
//! nine marks (`null` for empty) and the turn as a bare mark. Any
//! [`KeyValueStore`] can back it.

use crate::error::StorageError;
use crate::types::{Board, Player};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// String-valued key-value store with no expiry.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Stores several entries.
    ///
    /// The default writes them one by one, so a failure part way leaves
    /// the earlier entries updated. Stores that can do better override it.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Removes several keys, one by one unless the store overrides it.
    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        (**self).set_many(entries)
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        (**self).remove_many(keys)
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The file is read on every `get` and rewritten on every change, so two
/// instances pointed at the same path see each other's writes. Writes go
/// through a `.tmp` sibling and `rename`. A file that is not a JSON object
/// is reported by `get` and replaced by the next write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_raw(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match self.read_raw()? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(HashMap::new()),
        }
    }

    /// Reads the entries to be modified. The flag is set when the file held
    /// something other than a JSON object and must be rewritten regardless.
    fn read_for_update(&self) -> Result<(HashMap<String, String>, bool), StorageError> {
        let Some(content) = self.read_raw()? else {
            return Ok((HashMap::new(), false));
        };
        match serde_json::from_str(&content) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt state file");
                Ok((HashMap::new(), true))
            }
        }
    }

    #[instrument(skip(self, entries), fields(path = %self.path.display()))]
    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(entries = entries.len(), "State file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_many(&[(key, value)])
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key])
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let (mut stored, _) = self.read_for_update()?;
        for (key, value) in entries {
            stored.insert(key.to_string(), value.to_string());
        }
        self.write_all(&stored)
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<(), StorageError> {
        let (mut stored, corrupt) = self.read_for_update()?;
        let removed = keys.iter().filter(|key| stored.remove(**key).is_some()).count();
        if removed > 0 || corrupt {
            self.write_all(&stored)?;
        }
        Ok(())
    }
}

/// Saves, loads and clears the board and turn entries.
#[derive(Debug, Clone)]
pub struct GameStorage<S> {
    store: S,
    board_key: String,
    turn_key: String,
}

impl<S: KeyValueStore> GameStorage<S> {
    /// Default key for the board entry.
    pub const BOARD_KEY: &'static str = "board";
    /// Default key for the turn entry.
    pub const TURN_KEY: &'static str = "turn";

    /// Wraps `store` using the default keys.
    pub fn new(store: S) -> Self {
        Self::with_keys(store, Self::BOARD_KEY, Self::TURN_KEY)
    }

    /// Wraps `store` using custom keys.
    pub fn with_keys(store: S, board_key: impl Into<String>, turn_key: impl Into<String>) -> Self {
        Self {
            store,
            board_key: board_key.into(),
            turn_key: turn_key.into(),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes the board and turn entries in one [`KeyValueStore::set_many`]
    /// call. Whether the pair lands atomically is up to the store;
    /// [`FileStore`] writes both in a single file replace.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store rejects the write.
    #[instrument(skip(self, board))]
    pub fn save(&mut self, board: &Board, turn: Player) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(board)?;
        let turn_token = turn.to_string();
        self.store.set_many(&[
            (self.board_key.as_str(), encoded.as_str()),
            (self.turn_key.as_str(), turn_token.as_str()),
        ])?;
        debug!(board = %encoded, %turn, "Game saved");
        Ok(())
    }

    /// Removes both entries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store rejects the removal.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove_many(&[self.board_key.as_str(), self.turn_key.as_str()])?;
        debug!("Saved game cleared");
        Ok(())
    }

    /// Reads both entries back.
    ///
    /// A missing entry comes back as `None`. So does an entry that cannot
    /// be decoded (a board that is not nine valid marks, a turn that is not
    /// `X` or `O`); it is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only if the store itself fails.
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<(Option<Board>, Option<Player>), StorageError> {
        let board = self
            .store
            .get(&self.board_key)?
            .and_then(|raw| match serde_json::from_str::<Board>(&raw) {
                Ok(board) => Some(board),
                Err(e) => {
                    warn!(key = %self.board_key, error = %e, "Discarding malformed saved board");
                    None
                }
            });

        let turn = self
            .store
            .get(&self.turn_key)?
            .and_then(|raw| match raw.parse::<Player>() {
                Ok(turn) => Some(turn),
                Err(_) => {
                    warn!(key = %self.turn_key, value = %raw, "Discarding malformed saved turn");
                    None
                }
            });

        debug!(has_board = board.is_some(), has_turn = turn.is_some(), "Saved game loaded");
        Ok((board, turn))
    }
}
