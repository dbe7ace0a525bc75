//! Annotation records and error categories.
//!
//! An evaluation is stored as a flat list of Label Studio result records.
//! One logical issue is spread over several records (the highlighted span,
//! its subcategory, severity and comment) that share a [`ResultId`].

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::ResultId;

/// Well-known `from_name` values of the evaluation labeling interface.
pub mod names {
    pub const LABEL: &str = "label";
    pub const SUBCATEGORIES: &str = "subcategories";
    pub const SEVERITY: &str = "severity";
    pub const COMMENTS: &str = "comments";
    pub const OVERALL_CORRESPONDENCE: &str = "overall_correspondence";
    pub const OVERALL_READABILITY: &str = "overall_readability";
    pub const CORRESPONDENCE_COMMENTS: &str = "correspondence_comments";
    pub const READABILITY_COMMENTS: &str = "readability_comments";
    pub const DOCUMENT_ISSUES: &str = "document_issues";

    /// The `type` of span records.
    pub const LABELS_TYPE: &str = "labels";
    /// The `to_name` of records attached to the translation text.
    pub const TEXT_TARGET: &str = "text";
}

/// What facet of an evaluation a record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationKind {
    /// A highlighted span with its error category.
    Label,
    /// The subcategory chosen for a span.
    Subcategory,
    /// The severity chosen for a span.
    Severity,
    /// Free-text comment on a span.
    Comment,
    /// A document- or dimension-level score.
    OverallRating,
    /// A document- or dimension-level free-text comment.
    DocumentComment,
    /// Anything the viewer does not know about.
    Other,
}

impl AnnotationKind {
    /// Derives the kind of a record from its Label Studio control names.
    pub fn classify(result_type: &str, from_name: &str, to_name: &str) -> Self {
        match from_name {
            names::LABEL
                if result_type == names::LABELS_TYPE && to_name == names::TEXT_TARGET =>
            {
                AnnotationKind::Label
            }
            names::SUBCATEGORIES => AnnotationKind::Subcategory,
            names::SEVERITY => AnnotationKind::Severity,
            names::COMMENTS => AnnotationKind::Comment,
            names::OVERALL_CORRESPONDENCE | names::OVERALL_READABILITY => {
                AnnotationKind::OverallRating
            }
            names::CORRESPONDENCE_COMMENTS
            | names::READABILITY_COMMENTS
            | names::DOCUMENT_ISSUES => AnnotationKind::DocumentComment,
            _ => AnnotationKind::Other,
        }
    }

    /// Returns true for the per-span facets linked to a label by id.
    pub fn is_span_facet(&self) -> bool {
        matches!(
            self,
            AnnotationKind::Subcategory | AnnotationKind::Severity | AnnotationKind::Comment
        )
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnnotationKind::Label => "label",
            AnnotationKind::Subcategory => "subcategory",
            AnnotationKind::Severity => "severity",
            AnnotationKind::Comment => "comment",
            AnnotationKind::OverallRating => "overall-rating",
            AnnotationKind::DocumentComment => "document-comment",
            AnnotationKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// The payload of a record.
///
/// Every field is optional; which ones are present depends on the control
/// that produced the record. Parsing never fails: fields of the wrong JSON
/// type are treated as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationValue {
    pub start: Option<i64>,
    pub end: Option<i64>,
    /// Span text, or the entries of a free-text area.
    pub text: Vec<String>,
    pub labels: Vec<String>,
    pub choices: Vec<String>,
    pub rating: Option<f64>,
}

impl AnnotationValue {
    /// Reads a value object leniently.
    pub fn from_json(value: &Value) -> Self {
        let text = match value.get("text") {
            Some(Value::String(text)) => vec![text.clone()],
            Some(Value::Array(items)) => strings(items),
            _ => Vec::new(),
        };

        Self {
            start: value.get("start").and_then(Value::as_i64),
            end: value.get("end").and_then(Value::as_i64),
            text,
            labels: string_list(value.get("labels")),
            choices: string_list(value.get("choices")),
            rating: value.get("rating").and_then(Value::as_f64),
        }
    }

    /// The first text entry, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.text.first().map(String::as_str)
    }

    /// The first choice, if any.
    pub fn first_choice(&self) -> Option<&str> {
        self.choices.first().map(String::as_str)
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => strings(items),
        _ => Vec::new(),
    }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

/// One Label Studio result record.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// Shared id linking the facets of one issue.
    pub id: Option<ResultId>,
    pub kind: AnnotationKind,
    pub result_type: String,
    pub from_name: String,
    pub to_name: String,
    pub value: AnnotationValue,
}

impl Annotation {
    /// Builds a record, deriving its kind from the control names.
    pub fn new(
        id: Option<ResultId>,
        result_type: impl Into<String>,
        from_name: impl Into<String>,
        to_name: impl Into<String>,
        value: AnnotationValue,
    ) -> Self {
        let result_type = result_type.into();
        let from_name = from_name.into();
        let to_name = to_name.into();
        let kind = AnnotationKind::classify(&result_type, &from_name, &to_name);
        Self {
            id,
            kind,
            result_type,
            from_name,
            to_name,
            value,
        }
    }

    /// Convenience constructor for a span record.
    pub fn label(
        id: impl Into<ResultId>,
        start: i64,
        end: i64,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self::new(
            Some(id.into()),
            names::LABELS_TYPE,
            names::LABEL,
            names::TEXT_TARGET,
            AnnotationValue {
                start: Some(start),
                end: Some(end),
                text: vec![text.into()],
                labels: vec![category.into()],
                ..Default::default()
            },
        )
    }

    /// Convenience constructor for a choice record (subcategory, severity).
    pub fn choice(
        id: impl Into<ResultId>,
        from_name: impl Into<String>,
        choice: impl Into<String>,
    ) -> Self {
        Self::new(
            Some(id.into()),
            "choices",
            from_name,
            names::TEXT_TARGET,
            AnnotationValue {
                choices: vec![choice.into()],
                ..Default::default()
            },
        )
    }

    /// Convenience constructor for a free-text record.
    pub fn textarea(
        id: impl Into<ResultId>,
        from_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            Some(id.into()),
            "textarea",
            from_name,
            names::TEXT_TARGET,
            AnnotationValue {
                text: vec![text.into()],
                ..Default::default()
            },
        )
    }

    /// Convenience constructor for a rating record.
    pub fn rating(id: impl Into<ResultId>, from_name: impl Into<String>, rating: f64) -> Self {
        Self::new(
            Some(id.into()),
            "rating",
            from_name,
            names::TEXT_TARGET,
            AnnotationValue {
                rating: Some(rating),
                ..Default::default()
            },
        )
    }

    pub fn is_label(&self) -> bool {
        self.kind == AnnotationKind::Label
    }

    /// Span offsets as code units, if both are present and non-negative.
    pub fn offsets(&self) -> Option<(usize, usize)> {
        let start = usize::try_from(self.value.start?).ok()?;
        let end = usize::try_from(self.value.end?).ok()?;
        Some((start, end))
    }

    /// The text the annotator selected, if non-empty.
    pub fn span_text(&self) -> Option<&str> {
        self.value.first_text().filter(|text| !text.is_empty())
    }

    /// The raw category label (first entry of `labels`).
    pub fn category_label(&self) -> Option<&str> {
        self.value.labels.first().map(String::as_str)
    }

    /// The error category; unknown or missing labels map to [`Category::Other`].
    pub fn category(&self) -> Category {
        self.category_label()
            .and_then(Category::from_label)
            .unwrap_or(Category::Other)
    }
}

/// The closed set of error dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Terminology,
    Accuracy,
    Style,
    LocaleConventions,
    AudienceAppropriateness,
    LinguisticConventions,
    Other,
}

impl Category {
    /// Named dimensions in legend order.
    pub const NAMED: [Category; 6] = [
        Category::Terminology,
        Category::Accuracy,
        Category::Style,
        Category::LinguisticConventions,
        Category::LocaleConventions,
        Category::AudienceAppropriateness,
    ];

    /// Maps a raw label onto a named dimension.
    ///
    /// Matching ignores case and accepts spaces, hyphens or underscores
    /// between words. Returns `None` for labels outside the closed set.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        match normalized.as_str() {
            "terminology" => Some(Category::Terminology),
            "accuracy" => Some(Category::Accuracy),
            "style" => Some(Category::Style),
            "locale conventions" => Some(Category::LocaleConventions),
            "audience appropriateness" => Some(Category::AudienceAppropriateness),
            "linguistic conventions" => Some(Category::LinguisticConventions),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    /// Lower-case name with spaces ("locale conventions").
    pub fn name(&self) -> &'static str {
        match self {
            Category::Terminology => "terminology",
            Category::Accuracy => "accuracy",
            Category::Style => "style",
            Category::LocaleConventions => "locale conventions",
            Category::AudienceAppropriateness => "audience appropriateness",
            Category::LinguisticConventions => "linguistic conventions",
            Category::Other => "other",
        }
    }

    /// Title-case name for the legend ("Locale Conventions").
    pub fn title(&self) -> &'static str {
        match self {
            Category::Terminology => "Terminology",
            Category::Accuracy => "Accuracy",
            Category::Style => "Style",
            Category::LocaleConventions => "Locale Conventions",
            Category::AudienceAppropriateness => "Audience Appropriateness",
            Category::LinguisticConventions => "Linguistic Conventions",
            Category::Other => "Other",
        }
    }

    /// Sentence-case name for tables and tooltips ("Locale conventions").
    pub fn capitalized(&self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// CSS class used on highlights ("locale-conventions").
    pub fn css_class(&self) -> String {
        self.name().replace(' ', "-")
    }

    /// Highlight colour.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Terminology => "#6CD97E",
            Category::Accuracy => "#FF4A4A",
            Category::Style => "#D89EFF",
            Category::LocaleConventions => "#FFAF4F",
            Category::AudienceAppropriateness => "#FFC0CB",
            Category::LinguisticConventions => "#5AA3E8",
            Category::Other => "#95a5a6",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
