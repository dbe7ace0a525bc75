//! Validation report types for structured error reporting.
//!
//! Reports can be printed for people or serialized to JSON for scripts.

use std::fmt;

use serde::Serialize;

/// The result of validating an evaluation document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found, in the order the checks ran.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count == 0
    }

    /// Returns true if there are no errors or warnings.
    pub fn is_ok_strict(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues carrying a given code.
    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count, self.warning_count
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// A stable code for the issue type.
    pub code: IssueCode,
    pub message: String,
    /// Where the issue occurred.
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Renders, but the result may not show what the evaluator meant.
    Warning,
    /// Part of the evaluation cannot be rendered.
    Error,
}

/// A stable code identifying the type of validation issue.
///
/// These codes are part of the JSON output and should remain stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // Span offsets (errors: the span is not highlighted)
    /// A span record has no usable `start`/`end`.
    MissingSpanOffsets,
    /// A span ends before it starts.
    InvalidSpanOrdering,
    /// A span offset lies beyond the end of the text.
    SpanOutOfBounds,
    /// A span offset falls between the halves of a surrogate pair.
    SplitSurrogate,

    // Span content
    /// A span covers no text.
    ZeroLengthSpan,
    /// The span's recorded text differs from the text at its offsets.
    SpanTextMismatch,
    /// The span's label is not one of the known error dimensions.
    UnknownCategory,

    // Facets
    /// More than one facet record of the same kind shares a span id.
    DuplicateFacet,
    /// A facet record's id matches no span.
    OrphanFacet,

    // Document level
    /// An overall rating is absent.
    MissingOverallRating,
}

/// Where a validation issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum IssueContext {
    /// The document as a whole.
    Document,
    /// A result record, by position and id.
    Record { index: usize, id: Option<String> },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Document => write!(f, "document"),
            IssueContext::Record {
                index,
                id: Some(id),
            } => write!(f, "record {} (id {})", index, id),
            IssueContext::Record { index, id: None } => write!(f, "record {}", index),
        }
    }
}
