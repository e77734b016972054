use crate::error::{ModelError, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

/// Schemes a streaming locator may use unless the host configures otherwise.
pub const DEFAULT_STREAMING_SCHEMES: [&str; 2] = ["http", "https"];

/// Resource locator for a single video.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MediaLocator(Url);

impl MediaLocator {
    pub fn parse(raw: &str) -> Result<Self> {
        Url::parse(raw.trim())
            .map(Self)
            .map_err(|err| ModelError::InvalidLocator {
                locator: raw.to_string(),
                reason: err.to_string(),
            })
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Accepts the locator only when its scheme is in `allowed` (case-insensitive).
    pub fn ensure_scheme<S: AsRef<str>>(&self, allowed: &[S]) -> Result<()> {
        let scheme = self.scheme();
        if allowed
            .iter()
            .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(scheme))
        {
            Ok(())
        } else {
            Err(ModelError::UnsupportedScheme(scheme.to_string()))
        }
    }

    pub fn is_streamable(&self) -> bool {
        self.ensure_scheme(&DEFAULT_STREAMING_SCHEMES).is_ok()
    }
}

impl FromStr for MediaLocator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Url> for MediaLocator {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playable video as handed to the controller by its host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VideoItem {
    pub id: Uuid,
    pub title: String,
    pub locator: MediaLocator,
}

impl VideoItem {
    pub fn new(title: impl Into<String>, locator: MediaLocator) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            locator,
        }
    }

    /// Convenience constructor parsing the locator from a string.
    pub fn from_url(title: impl Into<String>, raw: &str) -> Result<Self> {
        Ok(Self::new(title, MediaLocator::parse(raw)?))
    }
}
