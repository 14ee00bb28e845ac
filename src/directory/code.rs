//! # Access Codes

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of digits in an access code
pub const ACCESS_CODE_LEN: usize = 5;

/// A short numeric code granting list visibility over files.
///
/// Not a credential: codes are not unique and are easily guessed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessCode(String);

impl AccessCode {
    /// Draw a fresh code from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a fresh code from `rng`, each digit uniform over `0-9`
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ACCESS_CODE_LEN)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `candidate` is this code
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccessCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}
