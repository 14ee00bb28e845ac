//! # File Directory
//!
//! In-memory map from object name to its current access code.
//!
//! ## Invariants
//! - Each filename has exactly one current code; re-registering overwrites it
//! - Codes may be shared between filenames
//! - No operation fails; a poisoned lock is recovered, since every write
//!   leaves the map in a consistent state

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::code::AccessCode;

/// Access-gated file directory
#[derive(Debug, Default)]
pub struct Directory {
    entries: RwLock<HashMap<String, AccessCode>>,
}

impl Directory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, AccessCode>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, AccessCode>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite the code for `filename`
    pub fn register(&self, filename: &str, code: AccessCode) {
        self.write().insert(filename.to_string(), code);
    }

    /// Every filename whose current code equals `code`, sorted by name.
    ///
    /// An empty code matches nothing.
    pub fn query(&self, code: &str) -> Vec<String> {
        if code.is_empty() {
            return Vec::new();
        }

        let mut files: Vec<String> = self
            .read()
            .iter()
            .filter(|(_, current)| current.matches(code))
            .map(|(filename, _)| filename.clone())
            .collect();
        files.sort();
        files
    }

    /// Remove `filename`; absent entries are ignored
    pub fn unregister(&self, filename: &str) -> Option<AccessCode> {
        self.write().remove(filename)
    }

    /// Current code for `filename`
    pub fn code_for(&self, filename: &str) -> Option<AccessCode> {
        self.read().get(filename).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
