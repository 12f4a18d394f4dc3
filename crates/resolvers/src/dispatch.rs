// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Precedence-ordered predicate dispatch
//!
//! Every resolver declares its endpoint variants as an ordered slice of
//! `(matcher, variant)` rules. The first rule satisfied by the extracted
//! predicates wins and every lower-precedence predicate is ignored.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use shared_types::{FilterValue, Operator, Predicate};

/// Everything but RFC 3986 unreserved characters is escaped in a path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Matches predicates on one `(field, operator)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateMatcher {
    /// Column the predicate must filter on
    pub field: &'static str,
    /// Operator the predicate must use
    pub operator: Operator,
}

impl PredicateMatcher {
    /// Matcher for `field = value`
    pub const fn eq(field: &'static str) -> Self {
        Self {
            field,
            operator: Operator::Eq,
        }
    }

    /// Matcher for `field IN (...)`
    pub const fn is_in(field: &'static str) -> Self {
        Self {
            field,
            operator: Operator::In,
        }
    }

    /// Value bound by this matcher, if any predicate satisfies it
    ///
    /// When several predicates bind the same pair the last one wins, and a
    /// bound value that is empty or null counts as no match. Equality only
    /// binds scalars.
    pub fn bind<'p>(&self, predicates: &'p [Predicate]) -> Option<&'p FilterValue> {
        predicates
            .iter()
            .rev()
            .find(|p| p.field == self.field && p.operator == self.operator)
            .map(|p| &p.value)
            .filter(|value| value.is_present())
            .filter(|value| {
                self.operator == Operator::In || matches!(value, FilterValue::Scalar(_))
            })
    }
}

/// Text of a bound scalar, escaped so it stays exactly one endpoint path segment
///
/// Dot segments have no such form: `..` would be normalised into the parent
/// endpoint by the URL parser.
pub fn path_segment(value: &FilterValue) -> Option<String> {
    let text = value.as_text()?;
    if matches!(text.as_str(), "." | "..") {
        return None;
    }
    Some(utf8_percent_encode(&text, SEGMENT).to_string())
}

/// Picks the highest-precedence variant the predicates satisfy
pub fn select_variant<'p, V: Copy>(
    rules: &[(PredicateMatcher, V)],
    predicates: &'p [Predicate],
) -> Option<(V, &'p FilterValue)> {
    rules
        .iter()
        .find_map(|(matcher, variant)| matcher.bind(predicates).map(|value| (*variant, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Variant {
        First,
        Second,
    }

    const RULES: &[(PredicateMatcher, Variant)] = &[
        (PredicateMatcher::eq("hash"), Variant::First),
        (PredicateMatcher::eq("height"), Variant::Second),
    ];

    #[test]
    fn first_rule_in_order_wins() {
        let predicates = vec![Predicate::eq("height", 1), Predicate::eq("hash", "abc")];
        let (variant, value) = select_variant(RULES, &predicates).unwrap();
        assert_eq!(variant, Variant::First);
        assert_eq!(value.as_text().as_deref(), Some("abc"));
    }

    #[test]
    fn falls_through_to_lower_precedence() {
        let predicates = vec![Predicate::eq("height", 42)];
        let (variant, value) = select_variant(RULES, &predicates).unwrap();
        assert_eq!(variant, Variant::Second);
        assert_eq!(value.as_text().as_deref(), Some("42"));
    }

    #[test]
    fn operator_must_match() {
        let predicates = vec![Predicate::is_in("hash", vec!["abc"])];
        assert!(select_variant(RULES, &predicates).is_none());
    }

    #[test]
    fn unrelated_predicates_are_ignored() {
        let predicates = vec![Predicate::eq("size", 1000)];
        assert!(select_variant(RULES, &predicates).is_none());
        assert!(select_variant(RULES, &[]).is_none());
    }

    #[test]
    fn last_binding_wins_and_empty_values_do_not_match() {
        let predicates = vec![Predicate::eq("hash", "a"), Predicate::eq("hash", "b")];
        let (_, value) = select_variant(RULES, &predicates).unwrap();
        assert_eq!(value.as_text().as_deref(), Some("b"));

        let predicates = vec![Predicate::eq("hash", "a"), Predicate::eq("hash", "")];
        assert!(PredicateMatcher::eq("hash").bind(&predicates).is_none());
    }

    #[test]
    fn equality_does_not_bind_lists() {
        let predicates = vec![Predicate::eq("hash", vec!["abc", "def"])];
        assert!(PredicateMatcher::eq("hash").bind(&predicates).is_none());
        assert!(select_variant(RULES, &predicates).is_none());

        let predicates = vec![Predicate::is_in("address", "abc")];
        assert!(PredicateMatcher::is_in("address").bind(&predicates).is_some());
    }

    #[test]
    fn path_segments_are_escaped() {
        let segment = |text: &str| path_segment(&FilterValue::from(text));

        assert_eq!(segment("market-price").as_deref(), Some("market-price"));
        assert_eq!(segment("00000abc").as_deref(), Some("00000abc"));
        assert_eq!(segment("../latestblock").as_deref(), Some("..%2Flatestblock"));
        assert_eq!(segment("abc?format=csv").as_deref(), Some("abc%3Fformat%3Dcsv"));
        assert_eq!(segment("abc#frag").as_deref(), Some("abc%23frag"));
        assert_eq!(segment("%2e%2e").as_deref(), Some("%252e%252e"));
        assert_eq!(segment(".."), None);
        assert_eq!(segment("."), None);
        assert_eq!(path_segment(&FilterValue::from(700_000)).as_deref(), Some("700000"));
    }
}
