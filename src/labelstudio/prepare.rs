//! Preparing markdown sources for annotation.
//!
//! Each markdown file becomes one Label Studio import task whose text is
//! what annotators will highlight. Span offsets recorded later refer to
//! this text, so the cleanup here must stay stable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::write_json;
use crate::error::EvalviewError;

/// Recorded in each task's metadata.
pub const CONVERTER_NAME: &str = concat!("evalview ", env!("CARGO_PKG_VERSION"));

const TASK_TYPE: &str = "text_for_annotation";
const FRONT_MATTER_FENCE: &str = "---";

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank-run regex"));

/// A Label Studio import task.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportTask {
    pub data: TaskData,
    pub annotations: Vec<Value>,
    pub predictions: Vec<Value>,
    pub id: u64,
    pub meta: TaskMeta,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskData {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskMeta {
    pub source_file: String,
    pub text_name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub converter: String,
}

/// Removes a leading YAML front matter block.
///
/// The block is only removed when the document starts with a `---` line,
/// a closing `---` line follows, and the lines between parse as a YAML
/// mapping (or are empty). The result is trimmed either way.
pub fn strip_front_matter(content: &str) -> &str {
    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return content.trim();
    };
    if first.trim() != FRONT_MATTER_FENCE {
        return content.trim();
    }

    let mut consumed = first.len();
    let mut yaml = String::new();
    for line in lines {
        consumed += line.len();
        if line.trim() == FRONT_MATTER_FENCE {
            if is_yaml_mapping(&yaml) {
                return content[consumed..].trim();
            }
            break;
        }
        yaml.push_str(line);
    }

    content.trim()
}

fn is_yaml_mapping(yaml: &str) -> bool {
    if yaml.trim().is_empty() {
        return true;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(yaml),
        Ok(serde_yaml::Value::Mapping(_))
    )
}

/// Trims every line and collapses runs of blank lines to one.
pub fn clean_text(text: &str) -> String {
    let joined = text.split('\n').map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_RUN.replace_all(&joined, "\n\n").into_owned()
}

/// Builds the import task for one markdown file's content.
pub fn task_from_markdown(file_name: &str, content: &str) -> ImportTask {
    let text_name = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    ImportTask {
        data: TaskData {
            text: clean_text(strip_front_matter(content)),
        },
        annotations: Vec::new(),
        predictions: Vec::new(),
        id: 1,
        meta: TaskMeta {
            source_file: file_name.to_string(),
            text_name,
            task_type: TASK_TYPE.to_string(),
            converter: CONVERTER_NAME.to_string(),
        },
    }
}

/// The `*.md` files directly inside `dir`, sorted by name.
pub fn discover_markdown(dir: &Path) -> Result<Vec<PathBuf>, EvalviewError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let is_markdown = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if entry.file_type().is_file() && is_markdown {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Converts every markdown file in `dir` into `{stem}.json` under `out_dir`.
pub fn prepare_dir(dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, EvalviewError> {
    let sources = discover_markdown(dir)?;
    debug!(count = sources.len(), dir = %dir.display(), "found markdown files");
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let content = fs::read_to_string(&source)?;
        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let task = task_from_markdown(&file_name, &content);

        let target = out_dir.join(format!("{}.json", task.meta.text_name));
        write_json(&target, &task)?;
        info!(
            source = %file_name,
            target = %target.display(),
            chars = task.data.text.chars().count(),
            "prepared task"
        );
        written.push(target);
    }

    Ok(written)
}
