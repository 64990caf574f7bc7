//! Query builder for collection filters
//!
//! A list request carries query-string pairs. Only the kind's queryable
//! fields become conditions; two reserved keys change how they combine:
//!
//! - `any=<value>` matches `<value>` against every queryable field (OR)
//! - `fuzzy` switches to case-insensitive substring matching unless its value
//!   is the literal `false`
//!
//! Without `any`, each queryable field present in the query adds a condition
//! and all conditions must hold (AND). No condition matches everything.
//!
//! The resulting [`Predicate`] is evaluated in memory by the memory store and
//! can be rendered as a parameterized SQL `WHERE` fragment for SQL backends.

use tracker_model::Collaboratable;

/// Reserved key selecting substring matching.
pub const FUZZY_KEY: &str = "fuzzy";

/// Reserved key matching one value against every queryable field.
pub const ANY_KEY: &str = "any";

/// Raw query-string pairs of a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect parameters from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Value of `key`. A repeated key yields its last value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Fuzzy matching is on when `fuzzy` is present with any value but `false`.
    pub fn is_fuzzy(&self) -> bool {
        self.get(FUZZY_KEY).is_some_and(|v| v != "false")
    }

    /// Value of the `any` parameter.
    pub fn any(&self) -> Option<&str> {
        self.get(ANY_KEY)
    }
}

/// How a field value is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Field equals the value.
    Exact(String),
    /// Field contains the value, ignoring case. Holds the lowercased needle.
    Contains(String),
}

impl Matcher {
    fn new(value: &str, fuzzy: bool) -> Self {
        if fuzzy {
            Matcher::Contains(value.to_lowercase())
        } else {
            Matcher::Exact(value.to_string())
        }
    }

    fn matches(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        match self {
            Matcher::Exact(value) => candidate == value,
            Matcher::Contains(needle) => candidate.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// One field comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Field compared
    pub field: String,
    /// Comparison applied
    pub matcher: Matcher,
}

/// Filter over one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// No condition; everything matches.
    All,
    /// Every condition must hold.
    And(Vec<Condition>),
    /// At least one condition must hold.
    Or(Vec<Condition>),
}

impl Predicate {
    /// Build the predicate for `params` over the `queryable` fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracker_store::{Predicate, QueryParams};
    ///
    /// let params = QueryParams::new().with("title", "foo").with("fuzzy", "true");
    /// let predicate = Predicate::build(&params, &["title", "description"]);
    ///
    /// let (sql, binds) = predicate.to_sql();
    /// assert_eq!(sql, "title ILIKE $1");
    /// assert_eq!(binds, vec!["%foo%".to_string()]);
    /// ```
    pub fn build(params: &QueryParams, queryable: &[&str]) -> Self {
        let fuzzy = params.is_fuzzy();

        if let Some(any) = params.any() {
            let conditions: Vec<Condition> = queryable
                .iter()
                .map(|field| Condition {
                    field: field.to_string(),
                    matcher: Matcher::new(any, fuzzy),
                })
                .collect();
            return if conditions.is_empty() {
                Predicate::All
            } else {
                Predicate::Or(conditions)
            };
        }

        let conditions: Vec<Condition> = queryable
            .iter()
            .filter_map(|field| {
                params.get(field).map(|value| Condition {
                    field: field.to_string(),
                    matcher: Matcher::new(value, fuzzy),
                })
            })
            .collect();

        if conditions.is_empty() {
            Predicate::All
        } else {
            Predicate::And(conditions)
        }
    }

    /// Check if `resource` satisfies the predicate.
    pub fn matches<T: Collaboratable>(&self, resource: &T) -> bool {
        let check = |c: &Condition| c.matcher.matches(resource.attribute(&c.field));
        match self {
            Predicate::All => true,
            Predicate::And(conditions) => conditions.iter().all(check),
            Predicate::Or(conditions) => conditions.iter().any(check),
        }
    }

    /// Keep the resources satisfying the predicate, preserving order.
    pub fn filter<T: Collaboratable>(&self, resources: Vec<T>) -> Vec<T> {
        resources.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// Render as a SQL `WHERE` fragment with `$n` placeholders.
    ///
    /// Substring binds escape `%`, `_` and `\` so the value matches literally.
    /// Field names come from the registration's queryable list, never from the
    /// request.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let (conditions, joiner) = match self {
            Predicate::All => return ("TRUE".to_string(), Vec::new()),
            Predicate::And(conditions) => (conditions, " AND "),
            Predicate::Or(conditions) => (conditions, " OR "),
        };

        let mut binds = Vec::with_capacity(conditions.len());
        let clauses: Vec<String> = conditions
            .iter()
            .map(|condition| {
                let (operator, bind) = match &condition.matcher {
                    Matcher::Exact(value) => ("=", value.clone()),
                    Matcher::Contains(needle) => ("ILIKE", format!("%{}%", escape_like(needle))),
                };
                binds.push(bind);
                format!("{} {} ${}", condition.field, operator, binds.len())
            })
            .collect();

        let sql = clauses.join(joiner);
        match self {
            Predicate::Or(_) if clauses.len() > 1 => (format!("({})", sql), binds),
            _ => (sql, binds),
        }
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_model::Project;

    const QUERYABLE: &[&str] = &["title", "description"];

    fn projects() -> Vec<Project> {
        vec![
            Project::new("Foo").with_description("Bar"),
            Project::new("Bar").with_description("Something"),
            Project::new("Another foo"),
        ]
    }

    fn titles(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_fuzzy_flag() {
        assert!(!QueryParams::new().is_fuzzy());
        assert!(QueryParams::new().with("fuzzy", "true").is_fuzzy());
        assert!(QueryParams::new().with("fuzzy", "").is_fuzzy());
        assert!(QueryParams::new().with("fuzzy", "1").is_fuzzy());
        assert!(!QueryParams::new().with("fuzzy", "false").is_fuzzy());
    }

    #[test]
    fn test_repeated_key_uses_last_value() {
        let params = QueryParams::from_pairs([("title", "a"), ("title", "b")]);
        assert_eq!(params.get("title"), Some("b"));
    }

    #[test]
    fn test_no_conditions_matches_all() {
        let params = QueryParams::new().with("fuzzy", "true").with("secret", "x");
        let predicate = Predicate::build(&params, QUERYABLE);

        assert_eq!(predicate, Predicate::All);
        assert_eq!(predicate.filter(projects()).len(), 3);
        assert_eq!(predicate.to_sql(), ("TRUE".to_string(), vec![]));
    }

    #[test]
    fn test_exact_match() {
        let predicate = Predicate::build(&QueryParams::new().with("title", "Foo"), QUERYABLE);
        assert_eq!(titles(&predicate.filter(projects())), vec!["Foo"]);

        let predicate = Predicate::build(&QueryParams::new().with("title", "foo"), QUERYABLE);
        assert!(predicate.filter(projects()).is_empty());
    }

    #[test]
    fn test_exact_match_combines_with_and() {
        let params = QueryParams::new().with("title", "Foo").with("description", "Bar");
        let predicate = Predicate::build(&params, QUERYABLE);
        assert_eq!(titles(&predicate.filter(projects())), vec!["Foo"]);

        let params = QueryParams::new().with("title", "Foo").with("description", "Something");
        let predicate = Predicate::build(&params, QUERYABLE);
        assert!(predicate.filter(projects()).is_empty());

        assert_eq!(
            predicate.to_sql(),
            (
                "title = $1 AND description = $2".to_string(),
                vec!["Foo".to_string(), "Something".to_string()]
            )
        );
    }

    #[test]
    fn test_fuzzy_match_is_case_insensitive_substring() {
        let params = QueryParams::new().with("title", "FOO").with("fuzzy", "true");
        let predicate = Predicate::build(&params, QUERYABLE);

        assert_eq!(titles(&predicate.filter(projects())), vec!["Foo", "Another foo"]);
    }

    #[test]
    fn test_fuzzy_false_is_exact() {
        let params = QueryParams::new().with("title", "fo").with("fuzzy", "false");
        let predicate = Predicate::build(&params, QUERYABLE);

        assert!(predicate.filter(projects()).is_empty());
    }

    #[test]
    fn test_any_exact_matches_any_field() {
        let predicate = Predicate::build(&QueryParams::new().with("any", "Bar"), QUERYABLE);

        assert_eq!(titles(&predicate.filter(projects())), vec!["Foo", "Bar"]);
        assert_eq!(
            predicate.to_sql(),
            (
                "(title = $1 OR description = $2)".to_string(),
                vec!["Bar".to_string(), "Bar".to_string()]
            )
        );
    }

    #[test]
    fn test_any_fuzzy() {
        let params = QueryParams::new().with("any", "thing").with("fuzzy", "yes");
        let predicate = Predicate::build(&params, QUERYABLE);

        assert_eq!(titles(&predicate.filter(projects())), vec!["Bar"]);
    }

    #[test]
    fn test_any_takes_precedence_over_fields() {
        let params = QueryParams::new().with("any", "Bar").with("title", "Another foo");
        let predicate = Predicate::build(&params, QUERYABLE);

        assert_eq!(titles(&predicate.filter(projects())), vec!["Foo", "Bar"]);
    }

    #[test]
    fn test_null_field_never_matches() {
        let params = QueryParams::new().with("description", "").with("fuzzy", "true");
        let predicate = Predicate::build(&params, QUERYABLE);

        // "Another foo" has no description
        assert_eq!(titles(&predicate.filter(projects())), vec!["Foo", "Bar"]);
    }

    #[test]
    fn test_fuzzy_wildcards_are_literal() {
        let items = vec![Project::new("100% done"), Project::new("100 done")];
        let params = QueryParams::new().with("title", "0%").with("fuzzy", "true");
        let predicate = Predicate::build(&params, QUERYABLE);

        assert_eq!(titles(&predicate.filter(items)), vec!["100% done"]);
        assert_eq!(
            predicate.to_sql(),
            ("title ILIKE $1".to_string(), vec!["%0\\%%".to_string()])
        );
    }
}
