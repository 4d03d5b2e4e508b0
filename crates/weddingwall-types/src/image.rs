//! Stored image types.
//!
//! Images are identified by a generated filename of the form
//! `{yyyyMMdd-HHmm}-{6 base36 chars}.jpg`. Files dropped into a bucket by
//! hand are accepted as long as the name is a plain `.jpg` filename.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bucket::Bucket;
use crate::error::StorageError;

/// Content type served for every slide.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Length of the random suffix in generated names.
pub const NAME_SUFFIX_LEN: usize = 6;

const EXTENSION: &str = ".jpg";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M";

/// A validated, path-safe image filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageName(String);

impl ImageName {
    /// Validate an existing filename.
    ///
    /// The name must be a single path component ending in `.jpg`
    /// (case-insensitive) with a non-empty stem.
    pub fn parse(name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::InvalidName(format!(
                "'{name}' must not contain path separators or '..'"
            )));
        }
        if name.starts_with('.') {
            return Err(StorageError::InvalidName(format!(
                "'{name}' is a hidden file"
            )));
        }
        if !is_jpg_filename(&name) || name.len() <= EXTENSION.len() {
            return Err(StorageError::InvalidName(format!(
                "'{name}' is not a .jpg filename"
            )));
        }
        Ok(Self(name))
    }

    /// Build a name from a local wall-clock timestamp and a random suffix.
    ///
    /// The suffix must be exactly six lowercase base36 characters.
    pub fn from_parts(timestamp: NaiveDateTime, suffix: &str) -> Result<Self, StorageError> {
        if suffix.len() != NAME_SUFFIX_LEN || !suffix.chars().all(is_base36_lower) {
            return Err(StorageError::InvalidName(format!(
                "suffix '{suffix}' must be {NAME_SUFFIX_LEN} base36 characters"
            )));
        }
        Ok(Self(format!(
            "{}-{suffix}{EXTENSION}",
            timestamp.format(TIMESTAMP_FORMAT)
        )))
    }

    /// Whether this name follows the generated `{yyyyMMdd-HHmm}-{suffix}.jpg` layout.
    pub fn is_generated(&self) -> bool {
        let Some(stem) = self.0.strip_suffix(EXTENSION) else {
            return false;
        };
        // yyyyMMdd-HHmm-xxxxxx
        if stem.len() != 13 + 1 + NAME_SUFFIX_LEN {
            return false;
        }
        let (stamp, rest) = stem.split_at(13);
        let Some(suffix) = rest.strip_prefix('-') else {
            return false;
        };
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok()
            && suffix.chars().all(is_base36_lower)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ImageName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImageName> for String {
    fn from(name: ImageName) -> Self {
        name.0
    }
}

impl AsRef<str> for ImageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a filename has a `.jpg` extension (case-insensitive).
pub fn is_jpg_filename(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(EXTENSION)
}

fn is_base36_lower(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase()
}

/// An image file held in one of the buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub name: ImageName,
    pub bucket: Bucket,
    /// Creation time; the oldest pending image is shown next.
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl StoredImage {
    /// Ordering key used to pick the oldest entry. Ties fall back to the name.
    pub fn age_key(&self) -> (DateTime<Utc>, &ImageName) {
        (self.created_at, &self.name)
    }
}

/// Pick the oldest image by creation time, breaking ties by name.
pub fn oldest_of(images: impl IntoIterator<Item = StoredImage>) -> Option<StoredImage> {
    images
        .into_iter()
        .min_by(|a, b| a.age_key().cmp(&b.age_key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 14)
            .unwrap()
            .and_hms_opt(15, 7, 42)
            .unwrap()
    }

    #[test]
    fn test_from_parts_layout() {
        let name = ImageName::from_parts(stamp(), "a1b2c3").unwrap();
        assert_eq!(name.as_str(), "20250614-1507-a1b2c3.jpg");
        assert!(name.is_generated());
    }

    #[test]
    fn test_from_parts_rejects_bad_suffix() {
        assert!(ImageName::from_parts(stamp(), "abc").is_err());
        assert!(ImageName::from_parts(stamp(), "ABCDEF").is_err());
        assert!(ImageName::from_parts(stamp(), "ab-def").is_err());
    }

    #[test]
    fn test_parse_accepts_hand_dropped_jpg() {
        let name = ImageName::parse("IMG_0001.JPG").unwrap();
        assert!(!name.is_generated());
    }

    #[test]
    fn test_parse_rejects_unsafe_names() {
        assert!(ImageName::parse("../etc/passwd.jpg").is_err());
        assert!(ImageName::parse("a/b.jpg").is_err());
        assert!(ImageName::parse(".hidden.jpg").is_err());
        assert!(ImageName::parse("photo.png").is_err());
        assert!(ImageName::parse(".jpg").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let ok: ImageName = serde_json::from_str("\"20250614-1507-zzzzzz.jpg\"").unwrap();
        assert!(ok.is_generated());
        assert!(serde_json::from_str::<ImageName>("\"x/y.jpg\"").is_err());
    }

    fn image(name: &str, secs: i64) -> StoredImage {
        StoredImage {
            name: ImageName::parse(name).unwrap(),
            bucket: Bucket::Pending,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            size_bytes: 1,
        }
    }

    #[test]
    fn test_oldest_of_by_creation_time() {
        let picked = oldest_of(vec![image("b.jpg", 20), image("a.jpg", 30), image("c.jpg", 10)]);
        assert_eq!(picked.unwrap().name.as_str(), "c.jpg");
    }

    #[test]
    fn test_oldest_of_ties_break_by_name() {
        let picked = oldest_of(vec![image("b.jpg", 10), image("a.jpg", 10)]);
        assert_eq!(picked.unwrap().name.as_str(), "a.jpg");
    }

    #[test]
    fn test_oldest_of_empty() {
        assert!(oldest_of(Vec::new()).is_none());
    }
}
