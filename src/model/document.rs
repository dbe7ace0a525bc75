//! Evaluation documents: reading and the on-disk JSON schema.
//!
//! An evaluation document is one Label Studio task reduced to what the
//! viewer needs: the translation text (`source_text`) and the flat list of
//! result records (`annotation_data.result`). The `split` subcommand
//! produces these files from a full Label Studio export.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Annotation, AnnotationValue, ResultId};
use crate::error::EvalviewError;

// ============================================================================
// On-disk schema
// ============================================================================

/// The JSON layout of an evaluation file.
///
/// Fields are declared in alphabetical order so written files have sorted
/// keys.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct EvaluationFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_data: Option<AnnotationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub meta_info: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(default)]
    pub task_id: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct AnnotationData {
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub lead_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub result_count: Option<Value>,
    #[serde(default)]
    pub task_id: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}

// ============================================================================
// Domain type
// ============================================================================

/// A loaded evaluation: the translation text and its result records.
#[derive(Clone, Debug, Default)]
pub struct EvaluationDocument {
    /// Name of the source file the task was created from, if recorded.
    pub file_name: Option<String>,
    /// The translation text that span offsets refer to.
    pub source_text: String,
    /// All result records in document order.
    pub records: Vec<Annotation>,
}

impl EvaluationDocument {
    /// Creates a document from text and records.
    pub fn new(source_text: impl Into<String>, records: Vec<Annotation>) -> Self {
        Self {
            file_name: None,
            source_text: source_text.into(),
            records,
        }
    }

    /// Iterates over span records in document order.
    pub fn labels(&self) -> impl Iterator<Item = &Annotation> {
        self.records.iter().filter(|record| record.is_label())
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Read an evaluation document from a file.
pub fn read_evaluation(path: &Path) -> Result<EvaluationDocument, EvalviewError> {
    let file = File::open(path).map_err(EvalviewError::Io)?;
    let reader = BufReader::new(file);

    let parsed: EvaluationFile =
        serde_json::from_reader(reader).map_err(|source| EvalviewError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;

    file_to_document(parsed, path)
}

/// Parse an evaluation document from a string.
pub fn from_evaluation_str(json: &str) -> Result<EvaluationDocument, EvalviewError> {
    let path = Path::new("<string>");
    let parsed: EvaluationFile =
        serde_json::from_str(json).map_err(|source| EvalviewError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;
    file_to_document(parsed, path)
}

/// Parse an evaluation document from bytes.
pub fn from_evaluation_slice(bytes: &[u8]) -> Result<EvaluationDocument, EvalviewError> {
    let path = Path::new("<bytes>");
    let parsed: EvaluationFile =
        serde_json::from_slice(bytes).map_err(|source| EvalviewError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;
    file_to_document(parsed, path)
}

// ============================================================================
// Conversion
// ============================================================================

fn file_to_document(file: EvaluationFile, path: &Path) -> Result<EvaluationDocument, EvalviewError> {
    let source_text = file
        .source_text
        .ok_or_else(|| invalid(path, "missing source_text"))?;

    let results = file
        .annotation_data
        .ok_or_else(|| invalid(path, "missing annotation_data"))?
        .result
        .ok_or_else(|| invalid(path, "missing annotation_data.result"))?;

    let mut records = Vec::with_capacity(results.len());
    for (idx, raw) in results.iter().enumerate() {
        match record_from_json(raw) {
            Some(record) => records.push(record),
            None => debug!(index = idx, "skipping non-object result record"),
        }
    }

    Ok(EvaluationDocument {
        file_name: file.file_name,
        source_text,
        records,
    })
}

/// Converts one raw result record; `None` if it is not a JSON object.
pub(crate) fn record_from_json(raw: &Value) -> Option<Annotation> {
    let object = raw.as_object()?;
    let text_field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let id = match object.get("id") {
        Some(Value::String(id)) => Some(ResultId::new(id.clone())),
        Some(Value::Number(id)) => Some(ResultId::new(id.to_string())),
        _ => None,
    };

    let value = object
        .get("value")
        .map(AnnotationValue::from_json)
        .unwrap_or_default();

    Some(Annotation::new(
        id,
        text_field("type"),
        text_field("from_name"),
        text_field("to_name"),
        value,
    ))
}

fn invalid(path: &Path, message: impl Into<String>) -> EvalviewError {
    EvalviewError::DocumentInvalid {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

// ============================================================================
// Tests
// ============================================================================
