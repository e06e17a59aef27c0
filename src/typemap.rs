//! Table-driven mapping from DB2 column types to Snowflake column types.
//!
//! Every base type name maps to one [`TypeRule`]. The rule decides the
//! Snowflake name, what happens to the size parameters, and whether the
//! conversion needs a human to look at it. Snowflake's own spellings are
//! identity entries, so mapping is idempotent: a converted type mapped again
//! comes back unchanged and without an issue.

use alloc::string::String;

use hashbrown::HashMap;

use crate::issues::messages;
use crate::model::TypeDescriptor;

/// What a [`TypeRule::Reinterpret`] does with the size parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Params {
    /// Precision, scale and unit are carried over.
    Keep,
    /// The target type is unsized.
    Drop,
}

/// How one base type converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRule {
    /// Same meaning under another name; size parameters pass through.
    Rename(&'static str),
    /// Rename and drop the size parameters, reporting `note` either always
    /// or only when a size was actually discarded.
    DropSize {
        /// Snowflake type name.
        target: &'static str,
        /// Issue message.
        note: &'static str,
        /// Report even when the source type was unsized.
        always: bool,
    },
    /// Rename with a change of semantics and a fixed parameter policy.
    Reinterpret {
        /// Snowflake type name.
        target: &'static str,
        /// What happens to the size parameters.
        params: Params,
        /// Issue message, when the reinterpretation deserves review.
        note: Option<&'static str>,
    },
}

impl TypeRule {
    /// The Snowflake base name this rule produces.
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            Self::Rename(target)
            | Self::DropSize { target, .. }
            | Self::Reinterpret { target, .. } => target,
        }
    }

    /// Apply the rule to a type whose base name selected it.
    #[must_use]
    pub fn apply(&self, source: &TypeDescriptor) -> (TypeDescriptor, Option<&'static str>) {
        match *self {
            Self::Rename(target) => (source.renamed(target), None),
            Self::DropSize {
                target,
                note,
                always,
            } => (
                TypeDescriptor::new(target),
                (always || source.has_size()).then_some(note),
            ),
            Self::Reinterpret {
                target,
                params: Params::Keep,
                note,
            } => (source.renamed(target), note),
            Self::Reinterpret {
                target,
                params: Params::Drop,
                note,
            } => (TypeDescriptor::new(target), note),
        }
    }
}

/// Built-in rules for DB2 for LUW and z/OS column types.
const DB2_RULES: &[(&str, TypeRule)] = &[
    // Exact numerics
    ("SMALLINT", TypeRule::Rename("SMALLINT")),
    ("INTEGER", TypeRule::Rename("INTEGER")),
    ("INT", TypeRule::Rename("INTEGER")),
    ("BIGINT", TypeRule::Rename("BIGINT")),
    ("DECIMAL", TypeRule::Rename("NUMBER")),
    ("DEC", TypeRule::Rename("NUMBER")),
    ("NUMERIC", TypeRule::Rename("NUMBER")),
    ("NUM", TypeRule::Rename("NUMBER")),
    ("NUMBER", TypeRule::Rename("NUMBER")),
    // Approximate numerics
    ("REAL", float(None)),
    ("DOUBLE", float(None)),
    ("DOUBLE PRECISION", float(None)),
    ("FLOAT", float(None)),
    ("DECFLOAT", float(Some(messages::DECFLOAT_TO_FLOAT))),
    // Character strings
    ("CHAR", TypeRule::Rename("CHAR")),
    ("CHARACTER", TypeRule::Rename("CHAR")),
    ("VARCHAR", TypeRule::Rename("VARCHAR")),
    ("CHARACTER VARYING", TypeRule::Rename("VARCHAR")),
    ("CHAR VARYING", TypeRule::Rename("VARCHAR")),
    (
        "LONG VARCHAR",
        TypeRule::Reinterpret {
            target: "VARCHAR",
            params: Params::Drop,
            note: None,
        },
    ),
    (
        "CLOB",
        TypeRule::DropSize {
            target: "VARCHAR",
            note: messages::CLOB_SIZE_LOSS,
            always: true,
        },
    ),
    // Graphic strings
    (
        "GRAPHIC",
        TypeRule::Reinterpret {
            target: "VARCHAR",
            params: Params::Keep,
            note: Some(messages::GRAPHIC_TO_VARCHAR),
        },
    ),
    (
        "VARGRAPHIC",
        TypeRule::Reinterpret {
            target: "VARCHAR",
            params: Params::Keep,
            note: Some(messages::GRAPHIC_TO_VARCHAR),
        },
    ),
    (
        "LONG VARGRAPHIC",
        TypeRule::Reinterpret {
            target: "VARCHAR",
            params: Params::Drop,
            note: Some(messages::GRAPHIC_TO_VARCHAR),
        },
    ),
    (
        "DBCLOB",
        TypeRule::DropSize {
            target: "VARCHAR",
            note: messages::DBCLOB_SIZE_LOSS,
            always: true,
        },
    ),
    // Binary strings
    ("BINARY", TypeRule::Rename("BINARY")),
    ("VARBINARY", TypeRule::Rename("BINARY")),
    (
        "BLOB",
        TypeRule::DropSize {
            target: "BINARY",
            note: messages::BLOB_SIZE_LOSS,
            always: true,
        },
    ),
    // Datetime
    ("DATE", TypeRule::Rename("DATE")),
    ("TIME", TypeRule::Rename("TIME")),
    (
        "TIMESTAMP",
        TypeRule::Reinterpret {
            target: "TIMESTAMP_NTZ",
            params: Params::Keep,
            note: None,
        },
    ),
    (
        "TIMESTAMP WITH TIME ZONE",
        TypeRule::Reinterpret {
            target: "TIMESTAMP_TZ",
            params: Params::Keep,
            note: None,
        },
    ),
    ("TIMESTAMP_NTZ", TypeRule::Rename("TIMESTAMP_NTZ")),
    ("TIMESTAMP_TZ", TypeRule::Rename("TIMESTAMP_TZ")),
    // Other
    (
        "XML",
        TypeRule::Reinterpret {
            target: "VARIANT",
            params: Params::Drop,
            note: Some(messages::XML_TO_VARIANT),
        },
    ),
    ("VARIANT", TypeRule::Rename("VARIANT")),
    ("BOOLEAN", TypeRule::Rename("BOOLEAN")),
];

const fn float(note: Option<&'static str>) -> TypeRule {
    TypeRule::Reinterpret {
        target: "FLOAT",
        params: Params::Drop,
        note,
    }
}

/// Maps [`TypeDescriptor`]s from DB2 to Snowflake.
///
/// # Example
///
/// ```rust
/// use db2_snowflake_ddl::model::TypeDescriptor;
/// use db2_snowflake_ddl::typemap::TypeMapper;
///
/// let mapper = TypeMapper::new();
/// let decimal = TypeDescriptor::new("DECIMAL").with_precision(18).with_scale(2);
/// let (mapped, issue) = mapper.map(&decimal);
/// assert_eq!(mapped.to_string(), "NUMBER(18,2)");
/// assert_eq!(issue, None);
///
/// let (mapped, issue) = mapper.map(&TypeDescriptor::new("CLOB"));
/// assert_eq!(mapped.to_string(), "VARCHAR");
/// assert!(issue.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    rules: HashMap<String, TypeRule>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapper {
    /// Create a mapper seeded with the built-in DB2 rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: DB2_RULES
                .iter()
                .map(|&(base, rule)| (String::from(base), rule))
                .collect(),
        }
    }

    /// Add a rule, or replace the rule for an existing base name. The name
    /// is matched case-insensitively.
    #[must_use]
    pub fn with_rule(mut self, base: &str, rule: TypeRule) -> Self {
        self.rules.insert(base.to_ascii_uppercase(), rule);
        self
    }

    /// The rule for a base name, if any.
    #[must_use]
    pub fn rule(&self, base: &str) -> Option<&TypeRule> {
        self.rules.get(base.to_ascii_uppercase().as_str())
    }

    /// All rules, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &TypeRule)> {
        self.rules.iter().map(|(base, rule)| (base.as_str(), rule))
    }

    /// Rules whose output name is itself mapped to a different name, as
    /// `(input, output)` pairs. A consistent table yields nothing.
    pub fn inconsistencies(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.rules.iter().filter_map(|(base, rule)| {
            let target = rule.target();
            let next = self.rules.get(target)?;
            (next.target() != target).then_some((base.as_str(), target))
        })
    }

    /// Map one type. Returns the Snowflake type and the issue message when
    /// the conversion needs review.
    ///
    /// `FOR BIT DATA` character types become `BINARY` of the same length. A
    /// base name without a rule is passed through unchanged and reported.
    #[must_use]
    pub fn map(&self, source: &TypeDescriptor) -> (TypeDescriptor, Option<&'static str>) {
        if source.is_bit_data() {
            return (
                source.renamed("BINARY"),
                Some(messages::BIT_DATA_TO_BINARY),
            );
        }
        match self.rules.get(source.base()) {
            Some(rule) => rule.apply(source),
            None => (source.clone(), Some(messages::UNMAPPED_TYPE)),
        }
    }
}
