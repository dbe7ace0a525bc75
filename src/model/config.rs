//! Site configuration (`config.json`).
//!
//! The configuration names the evaluation project, the people involved and
//! the manifest of evaluation files offered for selection.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::EvalviewError;

/// Project metadata and the evaluation file manifest.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SiteConfig {
    /// Short project identifier, used in titles.
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub translator: String,
    #[serde(default)]
    pub evaluator: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub organization: String,
    /// Evaluation files in manifest order.
    #[serde(default)]
    pub evaluation_files: Manifest,
}

impl SiteConfig {
    /// Page and document title.
    pub fn page_title(&self) -> String {
        format!("{} - Translation Evaluations", self.identifier)
    }

    /// Footer attribution line.
    pub fn footer(&self) -> String {
        format!(
            "Evaluation conducted by {} for {} - {} at {}",
            self.evaluator, self.identifier, self.period, self.organization
        )
    }
}

/// One selectable evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    /// File name relative to the configuration's directory.
    pub file_name: String,
    /// Name shown in the selector.
    pub display_name: String,
}

/// Ordered file name → display name mapping.
///
/// Deserialized from a JSON object; key order is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest(pub Vec<ManifestEntry>);

impl Manifest {
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "an object mapping file names to display names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Manifest, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((file_name, display_name)) = map.next_entry::<String, String>()? {
                    entries.push(ManifestEntry {
                        file_name,
                        display_name,
                    });
                }
                Ok(Manifest(entries))
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

/// Read a site configuration file.
pub fn read_config(path: &Path) -> Result<SiteConfig, EvalviewError> {
    let file = File::open(path).map_err(EvalviewError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| EvalviewError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a site configuration from a string.
pub fn from_config_str(json: &str) -> Result<SiteConfig, EvalviewError> {
    serde_json::from_str(json).map_err(|source| EvalviewError::ConfigParse {
        path: Path::new("<string>").to_path_buf(),
        source,
    })
}
