//! Splitting a Label Studio export into evaluation documents.
//!
//! An export is a JSON array of tasks, each holding the source text and the
//! annotation sets made on it. Every annotated task becomes one evaluation
//! file named after the markdown file the task was prepared from.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::write_json;
use crate::error::EvalviewError;
use crate::model::document::{AnnotationData, EvaluationFile};

/// Suffix appended to the base name of each evaluation file.
pub const DEFAULT_SUFFIX: &str = "-evaluation";

/// Source names containing one of these are answer keys, not evaluations.
const ANSWER_KEY_MARKERS: [&str; 3] = ["answer-key", "answer_key", "answerkey"];

/// One task of a Label Studio export.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportTask {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub annotations: Vec<ExportAnnotation>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}

/// One annotation set on a task.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportAnnotation {
    #[serde(default)]
    pub result: Vec<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(default)]
    pub lead_time: Option<Value>,
    #[serde(default)]
    pub result_count: Option<Value>,
    #[serde(default)]
    pub task: Option<Value>,
}

impl ExportTask {
    /// The markdown file the task came from, or `task_{id}`.
    pub fn source_file(&self) -> String {
        if let Some(name) = self
            .meta
            .as_ref()
            .and_then(|meta| meta.get("source_file"))
            .and_then(Value::as_str)
        {
            return name.to_string();
        }
        let id = match &self.id {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => "unknown".to_string(),
        };
        format!("task_{id}")
    }
}

/// Options for splitting.
#[derive(Clone, Debug)]
pub struct SplitOptions {
    pub suffix: String,
    /// Undo UTF-8 text that was decoded as Latin-1 somewhere on the way out
    /// of Label Studio.
    pub repair_encoding: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            repair_encoding: true,
        }
    }
}

/// Why a task produced no evaluation file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NoAnnotations,
    AnswerKey,
    NoBaseName,
}

/// A task that was not split out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedTask {
    pub source_file: String,
    pub reason: SkipReason,
}

/// An evaluation file ready to be written.
#[derive(Debug)]
pub struct SplitFile {
    pub file_name: String,
    pub(crate) contents: EvaluationFile,
}

/// Result of splitting an export on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedTask>,
}

/// Reads a Label Studio export file.
pub fn read_export(path: &Path) -> Result<Vec<ExportTask>, EvalviewError> {
    let file = File::open(path).map_err(EvalviewError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| EvalviewError::ExportParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a Label Studio export from a string.
pub fn from_export_str(json: &str) -> Result<Vec<ExportTask>, EvalviewError> {
    serde_json::from_str(json).map_err(|source| EvalviewError::ExportParse {
        path: PathBuf::from("<string>"),
        source,
    })
}

/// Turns tasks into evaluation files, in export order.
pub fn split_tasks(tasks: &[ExportTask], opts: &SplitOptions) -> (Vec<SplitFile>, Vec<SkippedTask>) {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for task in tasks {
        let source_file = task.source_file();
        let skip = |reason| SkippedTask {
            source_file: source_file.clone(),
            reason,
        };

        let Some(annotation) = task.annotations.first() else {
            info!(source = %source_file, "skipping task without annotations");
            skipped.push(skip(SkipReason::NoAnnotations));
            continue;
        };

        let lowered = source_file.to_lowercase();
        if ANSWER_KEY_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            info!(source = %source_file, "skipping answer key");
            skipped.push(skip(SkipReason::AnswerKey));
            continue;
        }

        let base_name = Path::new(&source_file)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        if base_name.is_empty() {
            warn!(source = %source_file, "cannot derive a file name, skipping");
            skipped.push(skip(SkipReason::NoBaseName));
            continue;
        }

        let data = task.data.clone().unwrap_or_else(|| Value::Object(Default::default()));
        let mut contents = EvaluationFile {
            annotation_data: Some(AnnotationData {
                created_at: annotation.created_at.clone(),
                lead_time: annotation.lead_time.clone(),
                result: Some(annotation.result.clone()),
                result_count: annotation.result_count.clone(),
                task_id: annotation.task.clone(),
                updated_at: annotation.updated_at.clone(),
            }),
            base_name: Some(base_name.clone()),
            created_at: task.created_at.clone(),
            source_text: Some(
                data.get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            ),
            data: Some(data),
            file_name: Some(source_file.clone()),
            meta_info: Some(
                task.meta
                    .clone()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            ),
            task_id: task.id.clone(),
            updated_at: task.updated_at.clone(),
        };
        if opts.repair_encoding {
            repair_file(&mut contents);
        }

        files.push(SplitFile {
            file_name: format!("{}{}.json", base_name, opts.suffix),
            contents,
        });
    }

    (files, skipped)
}

/// Splits the export at `export` into `out_dir`.
pub fn split_export(
    export: &Path,
    out_dir: &Path,
    opts: &SplitOptions,
) -> Result<SplitOutcome, EvalviewError> {
    let tasks = read_export(export)?;
    let (files, skipped) = split_tasks(&tasks, opts);

    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.file_name);
        write_json(&path, &file.contents)?;
        info!(path = %path.display(), "created evaluation file");
        written.push(path);
    }

    Ok(SplitOutcome { written, skipped })
}

/// Reverses UTF-8 bytes that were decoded as Latin-1.
///
/// Returns `None` when the text has nothing to repair or the repair would
/// not yield valid UTF-8.
pub fn repair_encoding(text: &str) -> Option<String> {
    if text.is_ascii() {
        return None;
    }
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

fn repair_file(file: &mut EvaluationFile) {
    if let Some(result) = file
        .annotation_data
        .as_mut()
        .and_then(|data| data.result.as_mut())
    {
        result.iter_mut().for_each(repair_value);
    }
    for value in [&mut file.data, &mut file.meta_info].into_iter().flatten() {
        repair_value(value);
    }
    for text in [&mut file.source_text, &mut file.file_name, &mut file.base_name]
        .into_iter()
        .flatten()
    {
        if let Some(repaired) = repair_encoding(text) {
            *text = repaired;
        }
    }
}

fn repair_value(value: &mut Value) {
    match value {
        Value::String(text) => {
            if let Some(repaired) = repair_encoding(text) {
                *text = repaired;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(repair_value),
        Value::Object(map) => map.values_mut().for_each(repair_value),
        _ => {}
    }
}
