//! Categorization of requirement type labels
//!
//! Type labels arrive in several languages and spellings ("fonctionnelle",
//! "non-functional", "NON_FONCTIONNELLE", ...). Classification lowercases
//! the label and walks an ordered rule table; the first matching rule wins.
//! Anything unrecognized lands in [`Category::Other`] so no record is ever
//! dropped.

use serde::{Deserialize, Serialize};

use crate::requirement::Requirement;

/// Semantic bucket for a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Functional,
    NonFunctional,
    /// Label did not match any known spelling, or was empty.
    Other,
}

/// One classification rule. Rules are evaluated in declaration order.
struct Rule {
    category: Category,
    matches: fn(&str) -> bool,
}

/// Negation markers must be checked before the function stems they contain,
/// otherwise "non fonctionnelle" would classify as functional.
const RULES: &[Rule] = &[
    Rule {
        category: Category::NonFunctional,
        matches: negated_function,
    },
    Rule {
        category: Category::Functional,
        matches: function_stem,
    },
    Rule {
        category: Category::NonFunctional,
        matches: bare_non,
    },
];

/// Fused spellings where the negation and the stem form a single token.
const FUSED_NEGATIONS: &[&str] = &[
    "non_fonctionnelle",
    "nonfonctionnel",
    "non-fonction",
    "non_function",
    "nonfunctional",
];

fn negated_function(label: &str) -> bool {
    (has_token(label, "non") && (label.contains("fonction") || label.contains("function")))
        || FUSED_NEGATIONS.iter().any(|fused| label.contains(fused))
}

fn function_stem(label: &str) -> bool {
    ["fonction", "func", "function"]
        .iter()
        .any(|stem| label.contains(stem))
}

fn bare_non(label: &str) -> bool {
    has_token(label, "non")
}

/// Whether `label` contains `token` as a standalone word.
fn has_token(label: &str, token: &str) -> bool {
    label
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == token)
}

/// Classify a raw type label.
pub fn classify(raw_type: &str) -> Category {
    let label = raw_type.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&label))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}

/// Requirements partitioned by category.
///
/// All three buckets are always present; relative order within each bucket
/// matches the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementGroups {
    pub functional: Vec<Requirement>,
    pub non_functional: Vec<Requirement>,
    pub other: Vec<Requirement>,
}

impl RequirementGroups {
    pub fn is_empty(&self) -> bool {
        self.functional.is_empty() && self.non_functional.is_empty() && self.other.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functional.len() + self.non_functional.len() + self.other.len()
    }
}

/// Stable partition of `requirements` into category buckets.
pub fn group(requirements: Vec<Requirement>) -> RequirementGroups {
    let mut groups = RequirementGroups::default();
    for requirement in requirements {
        let bucket = match classify(&requirement.raw_type) {
            Category::Functional => &mut groups.functional,
            Category::NonFunctional => &mut groups.non_functional,
            Category::Other => &mut groups.other,
        };
        bucket.push(requirement);
    }
    groups
}
