//! Static site generation from a configuration manifest.
//!
//! Each listed evaluation that exists becomes its own page next to an
//! `index.html`; every page carries the same selector, so choosing an entry
//! loads a fresh page rather than patching the current one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::page::{render_error_page, render_index, render_page_with_selector, Selector};
use super::RenderContext;
use crate::error::EvalviewError;
use crate::model::document::read_evaluation;
use crate::model::{ManifestEntry, SiteConfig};

/// Name of the generated index page.
pub const INDEX_FILE: &str = "index.html";

/// What a site build produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteSummary {
    /// Pages written, index excluded.
    pub pages: Vec<PathBuf>,
    /// Manifest entries whose files do not exist.
    pub skipped: Vec<String>,
    /// Manifest entries whose files could not be loaded.
    pub failed: Vec<String>,
}

/// Page file name for a manifest entry: the evaluation file's stem plus
/// `.html`.
pub fn page_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    format!("{stem}.html")
}

/// Assigns each entry its own page name, in manifest order.
///
/// Names are compared case-insensitively. [`INDEX_FILE`] is reserved, and a
/// stem that is already taken gets a numeric suffix (`a-2.html`).
fn unique_page_names(entries: &[&ManifestEntry]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::from([INDEX_FILE.to_string()]);
    let mut names = Vec::with_capacity(entries.len());

    for entry in entries {
        let base = page_file_name(&entry.file_name);
        let mut name = base.clone();
        let mut counter = 2;
        while !taken.insert(name.to_lowercase()) {
            let stem = base.strip_suffix(".html").unwrap_or(&base);
            name = format!("{stem}-{counter}.html");
            counter += 1;
        }
        if name != base {
            warn!(file = %entry.file_name, page = %name, "page name already taken, renaming");
        }
        names.push(name);
    }

    names
}

/// Renders every available evaluation in `config` plus the index page.
///
/// Evaluation file names resolve against `input_dir`. Files that fail to
/// load get an error page instead of aborting the build.
pub fn build_site(
    config: &SiteConfig,
    input_dir: &Path,
    out_dir: &Path,
) -> Result<SiteSummary, EvalviewError> {
    fs::create_dir_all(out_dir)?;

    let mut summary = SiteSummary::default();
    let mut available: Vec<&ManifestEntry> = Vec::new();
    for entry in config.evaluation_files.iter() {
        if input_dir.join(&entry.file_name).is_file() {
            available.push(entry);
        } else {
            warn!(file = %entry.file_name, "evaluation file not found, skipping");
            summary.skipped.push(entry.file_name.clone());
        }
    }

    let hrefs = unique_page_names(&available);
    let selector = Selector::new(
        hrefs
            .iter()
            .cloned()
            .zip(available.iter().map(|entry| entry.display_name.clone())),
    );

    for (entry, href) in available.into_iter().zip(hrefs) {
        let selector = selector.with_selected(&href);
        let source = input_dir.join(&entry.file_name);

        let html = match read_evaluation(&source) {
            Ok(document) => {
                debug!(
                    file = %entry.file_name,
                    records = document.records.len(),
                    "loaded evaluation"
                );
                let ctx = RenderContext::new(&document, Some(config));
                render_page_with_selector(&ctx, Some(&selector))?
            }
            Err(err) => {
                warn!(file = %entry.file_name, error = %err, "failed to load evaluation");
                summary.failed.push(entry.file_name.clone());
                render_error_page(Some(config), Some(&selector), &entry.file_name)?
            }
        };

        let target = out_dir.join(&href);
        fs::write(&target, html)?;
        info!(page = %target.display(), "wrote page");
        summary.pages.push(target);
    }

    let index = out_dir.join(INDEX_FILE);
    fs::write(&index, render_index(config, &selector)?)?;
    info!(page = %index.display(), "wrote index");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::from_config_str;

    const EVALUATION: &str = r#"{
        "source_text": "The cat sat.",
        "annotation_data": {
            "result": [
                {"id": "a", "type": "labels", "from_name": "label", "to_name": "text",
                 "value": {"start": 4, "end": 7, "text": "cat", "labels": ["Accuracy"]}}
            ]
        }
    }"#;

    fn config() -> SiteConfig {
        from_config_str(
            r#"{
                "identifier": "ACME",
                "translator": "Jo",
                "evaluator": "QA",
                "period": "2024",
                "organization": "Org",
                "evaluation_files": {
                    "second.json": "Second",
                    "missing.json": "Missing",
                    "first.json": "First",
                    "broken.json": "Broken"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn page_names_use_the_file_stem() {
        assert_eq!(page_file_name("doc-evaluation.json"), "doc-evaluation.html");
        assert_eq!(page_file_name("plain"), "plain.html");
    }

    #[test]
    fn builds_pages_and_index() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("first.json"), EVALUATION).unwrap();
        fs::write(input.path().join("second.json"), EVALUATION).unwrap();
        fs::write(input.path().join("broken.json"), "{not json").unwrap();

        let summary = build_site(&config(), input.path(), output.path()).unwrap();

        assert_eq!(summary.pages.len(), 3);
        assert_eq!(summary.skipped, vec!["missing.json".to_string()]);
        assert_eq!(summary.failed, vec!["broken.json".to_string()]);

        let index = fs::read_to_string(output.path().join(INDEX_FILE)).unwrap();
        let second = index.find("Second").unwrap();
        let first = index.find("First").unwrap();
        assert!(second < first, "manifest order is kept");
        assert!(!index.contains("Missing"));

        let page = fs::read_to_string(output.path().join("first.html")).unwrap();
        assert!(page.contains("<option value=\"first.html\" selected>First</option>"));
        assert!(page.contains("data-annotation-index=\"0\">cat</span>"));

        let broken = fs::read_to_string(output.path().join("broken.html")).unwrap();
        assert!(broken.contains("Error loading broken.json"));
    }

    #[test]
    fn page_names_never_collide() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let other = EVALUATION.replace("The cat sat.", "The dog ran.").replace("cat", "dog");
        fs::write(input.path().join("index.json"), EVALUATION).unwrap();
        fs::write(input.path().join("a.json"), EVALUATION).unwrap();
        fs::write(input.path().join("a.txt"), &other).unwrap();
        let config = from_config_str(
            r#"{"evaluation_files": {"index.json": "Index", "a.json": "A", "a.txt": "B"}}"#,
        )
        .unwrap();

        let summary = build_site(&config, input.path(), output.path()).unwrap();

        let names: Vec<_> = summary
            .pages
            .iter()
            .map(|page| page.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["index-2.html", "a.html", "a-2.html"]);

        let renamed = fs::read_to_string(output.path().join("index-2.html")).unwrap();
        assert!(renamed.contains(">cat</span>"));
        let first = fs::read_to_string(output.path().join("a.html")).unwrap();
        assert!(first.contains(">cat</span>"));
        let second = fs::read_to_string(output.path().join("a-2.html")).unwrap();
        assert!(second.contains(">dog</span>"));

        let index = fs::read_to_string(output.path().join(INDEX_FILE)).unwrap();
        assert!(index.contains("<option value=\"index-2.html\">Index</option>"));
        assert!(index.contains("<option value=\"a-2.html\">B</option>"));
        assert!(!index.contains("cat</span>"));
    }

    #[test]
    fn empty_manifest_still_writes_index() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();

        let summary = build_site(&config, input.path(), output.path()).unwrap();

        assert!(summary.pages.is_empty());
        let index = fs::read_to_string(output.path().join(INDEX_FILE)).unwrap();
        assert!(index.contains("No evaluation files found"));
    }
}
