//! Store identifiers: 24-character hex strings (12 bytes: timestamp, random, counter).

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

const ID_LEN: usize = 24;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Per-process random component, fixed for the lifetime of the process.
fn process_bytes() -> &'static [u8; 5] {
    static BYTES: OnceLock<[u8; 5]> = OnceLock::new();
    BYTES.get_or_init(|| {
        let random = uuid::Uuid::new_v4();
        let mut out = [0u8; 5];
        out.copy_from_slice(&random.as_bytes()[..5]);
        out
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Mint a fresh identifier.
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_bytes());
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        DocumentId(hex)
    }

    /// Validate an external string. Accepts upper or lower case hex; stored lowercase.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        if Self::is_valid(s) {
            Ok(DocumentId(s.to_ascii_lowercase()))
        } else {
            Err(AppError::validation(
                "_id",
                format!("'{}' is not a valid identifier (expected {} hex characters)", s, ID_LEN),
            ))
        }
    }

    pub fn is_valid(s: &str) -> bool {
        s.len() == ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DocumentId::parse(&s).map_err(serde::de::Error::custom)
    }
}
