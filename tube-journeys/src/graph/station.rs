//! Station identity and details.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::letters::LetterMask;

/// A NaPTAN stop point id, e.g. `940GZZLUBST`.
///
/// Ids are opaque: they are compared and hashed as given by the API and
/// never parsed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        StationId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        StationId::new(s)
    }
}

impl From<String> for StationId {
    fn from(s: String) -> Self {
        StationId(s)
    }
}

/// A station and the letters of its name.
///
/// The letter mask is computed from the name on construction (and again on
/// deserialization), so the two always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredStation")]
pub struct Station {
    id: StationId,
    name: String,
    #[serde(skip_serializing)]
    letters: LetterMask,
}

/// On-disk shape of a station: the mask is derived, so not stored.
#[derive(Deserialize)]
struct StoredStation {
    id: StationId,
    name: String,
}

impl From<StoredStation> for Station {
    fn from(stored: StoredStation) -> Self {
        Station::new(stored.id, stored.name)
    }
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            letters: LetterMask::of(&name),
            name,
        }
    }

    /// Build a station from the API's display name by removing every
    /// occurrence of the mode suffix (e.g. `" Underground Station"`).
    pub fn from_common_name(id: impl Into<StationId>, common_name: &str, suffix: &str) -> Self {
        let name = if suffix.is_empty() {
            common_name.to_string()
        } else {
            common_name.replace(suffix, "")
        };
        Self::new(id, name)
    }

    pub fn id(&self) -> &StationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn letters(&self) -> LetterMask {
        self.letters
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.name, self.letters.bits())
    }
}
