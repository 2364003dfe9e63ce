//! Resolution of list filters into a typed predicate.
//!
//! # Design
//! The list endpoint accepts `status`, `priority`, `category` and `search_q`.
//! Exactly one filter rule applies per request, chosen by walking [`RULES`]
//! top to bottom and taking the first rule whose fields are all present.
//! The order is fixed and is not "most specific wins": a request carrying
//! both `status` and `priority` matches the `status` rule.
//!
//! Before a rule is chosen, every supplied `status`, `priority` and
//! `category` value is validated, in that order; the first bad value rejects
//! the whole request with that field's error, whichever rule would have
//! applied. When [`apply_rule`] is handed a paired rule directly, a bad value
//! yields no rows instead. The free-text search is ANDed into every
//! predicate.
//!
//! The output is a list of conditions over [`Field`]s. Values are bound as
//! parameters by the executor and never spliced into SQL.

use serde::Deserialize;

use crate::error::ServiceError;
use crate::model::{EnumField, Field};
use crate::validate::check_enum;

/// Query string of `GET /todos/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search_q: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    fn value(&self, field: EnumField) -> Option<&str> {
        match field {
            EnumField::Status => self.status.as_deref(),
            EnumField::Priority => self.priority.as_deref(),
            EnumField::Category => self.category.as_deref(),
        }
    }
}

/// How a condition compares a column with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    /// Case-sensitive substring match at any position.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: Field,
    pub op: Op,
    pub value: String,
}

/// Conditions ANDed together, plus the name of the rule that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub rule: &'static str,
    pub conditions: Vec<Condition>,
}

/// One entry of the precedence table.
#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    /// Fields that must all be present for the rule to match.
    pub fields: &'static [EnumField],
}

impl Rule {
    fn matches(&self, query: &ListQuery) -> bool {
        self.fields.iter().all(|f| query.value(*f).is_some())
    }

    fn paired(&self) -> bool {
        self.fields.len() > 1
    }
}

/// Filter rules in precedence order. The last entry always matches.
pub const RULES: &[Rule] = &[
    Rule { name: "status", fields: &[EnumField::Status] },
    Rule { name: "priority", fields: &[EnumField::Priority] },
    Rule { name: "priority+status", fields: &[EnumField::Priority, EnumField::Status] },
    Rule { name: "category+status", fields: &[EnumField::Category, EnumField::Status] },
    Rule { name: "category", fields: &[EnumField::Category] },
    Rule { name: "category+priority", fields: &[EnumField::Category, EnumField::Priority] },
    Rule { name: "search", fields: &[] },
];

/// Why a filter produced no predicate.
#[derive(Debug)]
pub enum FilterRejection {
    /// A supplied filter value is outside its enumeration.
    Invalid(ServiceError),
    /// A paired rule saw a bad value; the request yields no rows.
    NoMatch,
}

#[derive(Debug)]
pub enum Resolution {
    Matched(Predicate),
    Rejected(FilterRejection),
}

/// The first rule in [`RULES`] that applies to `query`.
pub fn select_rule(query: &ListQuery) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| rule.matches(query))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Validate every supplied filter, then build the predicate of the first
/// matching rule.
pub fn resolve(query: &ListQuery) -> Resolution {
    for field in EnumField::ALL {
        if let Some(raw) = query.value(field) {
            if let Err(error) = check_enum(field, raw) {
                return Resolution::Rejected(FilterRejection::Invalid(error));
            }
        }
    }
    apply_rule(select_rule(query), query)
}

/// Validate the values `rule` filters on and build its predicate.
pub fn apply_rule(rule: &Rule, query: &ListQuery) -> Resolution {
    let mut conditions = Vec::with_capacity(rule.fields.len() + 1);
    conditions.push(Condition {
        field: Field::Todo,
        op: Op::Contains,
        value: query.search_q.clone(),
    });

    for field in rule.fields {
        let raw = query.value(*field).unwrap_or_default();
        match check_enum(*field, raw) {
            Ok(value) => conditions.push(Condition {
                field: field.field(),
                op: Op::Eq,
                value,
            }),
            Err(_) if rule.paired() => return Resolution::Rejected(FilterRejection::NoMatch),
            Err(error) => return Resolution::Rejected(FilterRejection::Invalid(error)),
        }
    }

    Resolution::Matched(Predicate {
        rule: rule.name,
        conditions,
    })
}
