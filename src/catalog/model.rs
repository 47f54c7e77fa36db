use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Target audience for a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    Boys,
    Girls,
    Unisex,
}

impl Gender {
    /// All valid values, in canonical order.
    pub const ALL: [Gender; 5] = [
        Gender::Men,
        Gender::Women,
        Gender::Boys,
        Gender::Girls,
        Gender::Unisex,
    ];

    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Boys => "Boys",
            Gender::Girls => "Girls",
            Gender::Unisex => "Unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "boys" => Ok(Gender::Boys),
            "girls" => Ok(Gender::Girls),
            "unisex" => Ok(Gender::Unisex),
            _ => Err(CatalogError::UnknownGender {
                value: s.to_string(),
            }),
        }
    }
}

/// One catalog row. Immutable once loaded.
///
/// `embedding` has the same length as every other row in the catalog; the
/// loader rejects rows that do not match instead of padding them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogItem {
    /// Unique within the catalog.
    pub id: u64,
    pub gender: Gender,
    /// Article category (e.g. "Jackets"); never recommended against itself.
    pub category: String,
    pub base_colour: String,
    pub usage: String,
    pub display_name: String,
    /// Reference handed to the image loader.
    pub image: String,
    /// Precomputed embedding vector.
    #[serde(skip_serializing)]
    pub embedding: Vec<f32>,
}
