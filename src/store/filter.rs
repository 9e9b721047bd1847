//! # Filter Expressions
//!
//! Mongo-style predicates evaluated against JSON documents.
//! Filters are AND-combined at the top level; `$and`/`$or` clauses
//! nest whole filters.

use std::cmp::Ordering;

use regex::RegexBuilder;
use serde_json::Value;

/// A single field predicate
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Exact equality
    Eq(Value),

    /// Not equal (matches when the field is absent)
    Ne(Value),

    /// Value is one of the listed values
    In(Vec<Value>),

    /// Value is none of the listed values (matches when absent)
    Nin(Vec<Value>),

    /// Field presence check
    Exists(bool),

    /// Regular expression match on string fields
    Regex {
        pattern: String,
        case_insensitive: bool,
    },

    /// Array field shares at least one element with the listed values
    Overlaps(Vec<Value>),

    /// Less than
    Lt(Value),

    /// Less than or equal
    Lte(Value),

    /// Greater than
    Gt(Value),

    /// Greater than or equal
    Gte(Value),
}

/// One clause of a filter
#[derive(Debug, Clone)]
pub enum Clause {
    /// A predicate on a single top-level field
    Field { field: String, predicate: Predicate },

    /// All nested filters must match
    And(Vec<Filter>),

    /// At least one nested filter must match
    Or(Vec<Filter>),
}

/// A set of clauses combined with AND logic
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Create an empty filter (matches everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for an empty filter, for readable call sites
    pub fn all() -> Self {
        Self::default()
    }

    fn field(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.clauses.push(Clause::Field {
            field: field.into(),
            predicate,
        });
        self
    }

    /// Add an equality predicate
    pub fn eq(self, field: impl Into<String>, value: Value) -> Self {
        self.field(field, Predicate::Eq(value))
    }

    /// Add a not-equal predicate
    pub fn ne(self, field: impl Into<String>, value: Value) -> Self {
        self.field(field, Predicate::Ne(value))
    }

    /// Add an "in list" predicate
    pub fn is_in(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.field(field, Predicate::In(values))
    }

    /// Add a "not in list" predicate
    pub fn not_in(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.field(field, Predicate::Nin(values))
    }

    /// Add a field presence predicate
    pub fn exists(self, field: impl Into<String>, exists: bool) -> Self {
        self.field(field, Predicate::Exists(exists))
    }

    /// Add a regex predicate
    pub fn regex(
        self,
        field: impl Into<String>,
        pattern: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        self.field(
            field,
            Predicate::Regex {
                pattern: pattern.into(),
                case_insensitive,
            },
        )
    }

    /// Add an array-overlap predicate
    pub fn overlaps(self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.field(field, Predicate::Overlaps(values))
    }

    /// Add a less-than predicate
    pub fn lt(self, field: impl Into<String>, value: Value) -> Self {
        self.field(field, Predicate::Lt(value))
    }

    /// Add a less-than-or-equal predicate
    pub fn lte(self, field: impl Into<String>, value: Value) -> Self {
        self.field(field, Predicate::Lte(value))
    }

    /// Add a greater-than predicate
    pub fn gt(self, field: impl Into<String>, value: Value) -> Self {
        self.field(field, Predicate::Gt(value))
    }

    /// Add a greater-than-or-equal predicate
    pub fn gte(self, field: impl Into<String>, value: Value) -> Self {
        self.field(field, Predicate::Gte(value))
    }

    /// Add a nested AND clause
    pub fn and(mut self, filters: Vec<Filter>) -> Self {
        self.clauses.push(Clause::And(filters));
        self
    }

    /// Add a nested OR clause
    pub fn or(mut self, filters: Vec<Filter>) -> Self {
        self.clauses.push(Clause::Or(filters));
        self
    }

    /// Check if a document matches all clauses
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Field { field, predicate } => {
                Self::matches_predicate(doc.get(field), predicate)
            }
            Clause::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Clause::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        })
    }

    fn matches_predicate(field_value: Option<&Value>, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Exists(wanted) => field_value.is_some() == *wanted,
            Predicate::Ne(expected) => match field_value {
                // Absent counts as "not equal"
                None => true,
                Some(actual) => actual != expected,
            },
            Predicate::Nin(values) => match field_value {
                None => true,
                Some(actual) => !Self::list_contains(values, actual),
            },
            _ => match field_value {
                None => false,
                Some(actual) => Self::matches_present(actual, predicate),
            },
        }
    }

    fn matches_present(actual: &Value, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Eq(expected) => actual == expected,
            Predicate::In(values) => Self::list_contains(values, actual),
            Predicate::Regex {
                pattern,
                case_insensitive,
            } => {
                let Some(text) = actual.as_str() else {
                    return false;
                };
                match RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                {
                    Ok(re) => re.is_match(text),
                    // An unparseable pattern matches nothing
                    Err(_) => false,
                }
            }
            Predicate::Overlaps(values) => match actual.as_array() {
                Some(elements) => elements.iter().any(|e| values.contains(e)),
                None => false,
            },
            Predicate::Lt(bound) => {
                matches!(compare_values(actual, bound), Some(Ordering::Less))
            }
            Predicate::Lte(bound) => matches!(
                compare_values(actual, bound),
                Some(Ordering::Less) | Some(Ordering::Equal)
            ),
            Predicate::Gt(bound) => {
                matches!(compare_values(actual, bound), Some(Ordering::Greater))
            }
            Predicate::Gte(bound) => matches!(
                compare_values(actual, bound),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            ),
            // Handled in matches_predicate
            Predicate::Ne(_) | Predicate::Nin(_) | Predicate::Exists(_) => false,
        }
    }

    /// `$in` on an array field matches if any element is listed
    fn list_contains(values: &[Value], actual: &Value) -> bool {
        if values.contains(actual) {
            return true;
        }
        match actual.as_array() {
            Some(elements) => elements.iter().any(|e| values.contains(e)),
            None => false,
        }
    }
}

/// Compares two JSON values of the same comparable type.
///
/// No type coercion: mismatched types are incomparable and range
/// predicates on them match nothing.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let (a_f, b_f) = (a.as_f64()?, b.as_f64()?);
            a_f.partial_cmp(&b_f)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::all().matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_eq_no_type_coercion() {
        let doc = json!({"upvotes": 123});

        assert!(Filter::new().eq("upvotes", json!(123)).matches(&doc));
        assert!(!Filter::new().eq("upvotes", json!("123")).matches(&doc));
    }

    #[test]
    fn test_ne_matches_absent_field() {
        let doc = json!({"status": "live"});

        assert!(Filter::new().ne("plan", json!("premium")).matches(&doc));
        assert!(Filter::new().ne("status", json!("draft")).matches(&doc));
        assert!(!Filter::new().ne("status", json!("live")).matches(&doc));
    }

    #[test]
    fn test_in_and_nin() {
        let doc = json!({"status": "active"});

        let f = Filter::new().is_in("status", vec![json!("active"), json!("upcoming")]);
        assert!(f.matches(&doc));

        let f = Filter::new().not_in("status", vec![json!("completed"), json!("cancelled")]);
        assert!(f.matches(&doc));

        let f = Filter::new().not_in("status", vec![json!("active")]);
        assert!(!f.matches(&doc));

        // Absent field: $in never matches, $nin always does
        assert!(!Filter::new().is_in("plan", vec![json!("standard")]).matches(&doc));
        assert!(Filter::new().not_in("plan", vec![json!("standard")]).matches(&doc));
    }

    #[test]
    fn test_in_over_array_field() {
        let doc = json!({"categories": ["devtools", "ai"]});

        let f = Filter::new().is_in("categories", vec![json!("ai")]);
        assert!(f.matches(&doc));
    }

    #[test]
    fn test_exists() {
        let doc = json!({"weekly_position": 1});

        assert!(Filter::new().exists("weekly_position", true).matches(&doc));
        assert!(!Filter::new().exists("weekly_position", false).matches(&doc));
        assert!(Filter::new().exists("rejection_reason", false).matches(&doc));
    }

    #[test]
    fn test_regex_case_insensitive() {
        let doc = json!({"name": "LaunchBoard"});

        assert!(Filter::new().regex("name", "^launch", true).matches(&doc));
        assert!(!Filter::new().regex("name", "^launch", false).matches(&doc));
    }

    #[test]
    fn test_invalid_regex_matches_nothing() {
        let doc = json!({"name": "abc"});
        assert!(!Filter::new().regex("name", "(unclosed", false).matches(&doc));
    }

    #[test]
    fn test_overlaps() {
        let doc = json!({"categories": ["ai", "productivity"]});

        let f = Filter::new().overlaps("categories", vec![json!("productivity"), json!("games")]);
        assert!(f.matches(&doc));

        let f = Filter::new().overlaps("categories", vec![json!("games")]);
        assert!(!f.matches(&doc));
    }

    #[test]
    fn test_range_predicates() {
        let doc = json!({"total_submissions": 14});

        assert!(Filter::new().lt("total_submissions", json!(15)).matches(&doc));
        assert!(!Filter::new().lt("total_submissions", json!(14)).matches(&doc));
        assert!(Filter::new().lte("total_submissions", json!(14)).matches(&doc));
        assert!(Filter::new().gte("total_submissions", json!(14)).matches(&doc));
        assert!(!Filter::new().gt("total_submissions", json!(14)).matches(&doc));
    }

    #[test]
    fn test_range_on_rfc3339_strings() {
        // Whole-second RFC3339 UTC strings order chronologically
        let doc = json!({"end_date": "2024-03-04T08:00:00Z"});

        let f = Filter::new().lt("end_date", json!("2024-03-11T08:00:00Z"));
        assert!(f.matches(&doc));

        let f = Filter::new().gt("end_date", json!("2024-03-11T08:00:00Z"));
        assert!(!f.matches(&doc));
    }

    #[test]
    fn test_or_clause() {
        let f = Filter::new().or(vec![
            Filter::new().eq("status", json!("upcoming")),
            Filter::new().eq("status", json!("active")),
        ]);

        assert!(f.matches(&json!({"status": "active"})));
        assert!(f.matches(&json!({"status": "upcoming"})));
        assert!(!f.matches(&json!({"status": "completed"})));
    }

    #[test]
    fn test_mixed_types_incomparable() {
        let doc = json!({"upvotes": "many"});
        assert!(!Filter::new().gt("upvotes", json!(3)).matches(&doc));
    }
}
