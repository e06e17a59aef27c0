//! Translation of column default values.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::issues::messages;
use crate::model::DefaultValue;

/// DB2 special registers and their Snowflake spelling.
const DB2_FUNCTIONS: &[(&str, &str)] = &[
    ("CURRENT TIMESTAMP", "CURRENT_TIMESTAMP"),
    ("CURRENT_TIMESTAMP", "CURRENT_TIMESTAMP"),
    ("CURRENT DATE", "CURRENT_DATE"),
    ("CURRENT_DATE", "CURRENT_DATE"),
    ("CURRENT TIME", "CURRENT_TIME"),
    ("CURRENT_TIME", "CURRENT_TIME"),
    ("USER", "CURRENT_USER"),
    ("CURRENT USER", "CURRENT_USER"),
    ("CURRENT_USER", "CURRENT_USER"),
];

/// Rewrites parsed defaults into Snowflake defaults.
///
/// Literals are kept exactly as written. Function keywords are looked up
/// case-insensitively with whitespace runs collapsed, so
/// `current   timestamp` and `CURRENT TIMESTAMP` are the same keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTranslator {
    functions: HashMap<String, &'static str>,
}

impl Default for DefaultTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultTranslator {
    /// Create a translator seeded with the DB2 special registers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            functions: DB2_FUNCTIONS
                .iter()
                .map(|&(keyword, target)| (normalize(keyword), target))
                .collect(),
        }
    }

    /// Add a function keyword, or replace the translation of an existing one.
    #[must_use]
    pub fn with_function(mut self, keyword: &str, target: &'static str) -> Self {
        self.functions.insert(normalize(keyword), target);
        self
    }

    /// Translate one default. Returns the Snowflake default and the issue
    /// message when the default needs review.
    ///
    /// # Example
    ///
    /// ```rust
    /// use db2_snowflake_ddl::defaults::DefaultTranslator;
    /// use db2_snowflake_ddl::model::DefaultValue;
    ///
    /// let translator = DefaultTranslator::new();
    /// let (value, issue) = translator.translate(&DefaultValue::Function("current timestamp".into()));
    /// assert_eq!(value, DefaultValue::Function("CURRENT_TIMESTAMP".into()));
    /// assert_eq!(issue, None);
    /// ```
    #[must_use]
    pub fn translate(&self, value: &DefaultValue) -> (DefaultValue, Option<&'static str>) {
        match value {
            DefaultValue::None => (DefaultValue::None, None),
            DefaultValue::Ambiguous => (DefaultValue::None, Some(messages::AMBIGUOUS_DEFAULT)),
            DefaultValue::Literal(raw) => (DefaultValue::Literal(raw.clone()), None),
            DefaultValue::Function(raw) => match self.functions.get(&normalize(raw)) {
                Some(&target) => (DefaultValue::Function(target.into()), None),
                None => (
                    DefaultValue::Expression(raw.clone()),
                    Some(messages::UNTRANSLATED_DEFAULT),
                ),
            },
            DefaultValue::Expression(raw) => (
                DefaultValue::Expression(raw.clone()),
                Some(messages::UNTRANSLATED_DEFAULT),
            ),
        }
    }
}

/// Uppercase and join the words with single spaces.
fn normalize(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}
