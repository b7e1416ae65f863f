use crate::models::{FilterClause, PreferenceSet, Product};

/// Points awarded for each satisfied rule
pub const RULE_POINTS: u32 = 25;

/// Upper bound of a match score
pub const MAX_SCORE: u32 = 100;

/// What part of a product a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    Categories,
    Attribute(&'static str),
}

/// A single preference -> product rule
///
/// A rule fires when the preference set holds exactly `value` under
/// `preference`. It is satisfied when the product's target hits one of
/// the `accepted` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRule {
    pub preference: &'static str,
    pub value: &'static str,
    pub target: RuleTarget,
    pub accepted: &'static [&'static str],
    pub reason: &'static str,
}

impl StyleRule {
    #[inline]
    pub fn applies_to(&self, preferences: &PreferenceSet) -> bool {
        preferences.get(self.preference) == Some(self.value)
    }

    #[inline]
    pub fn is_satisfied_by(&self, product: &Product) -> bool {
        match self.target {
            RuleTarget::Categories => product.has_category_in(self.accepted),
            RuleTarget::Attribute(key) => product.attribute_in(key, self.accepted),
        }
    }

    /// Catalog constraint equivalent to this rule
    pub fn clause(&self) -> FilterClause {
        let values = self.accepted.iter().map(|v| v.to_string()).collect();
        match self.target {
            RuleTarget::Categories => FilterClause::CategoryIn(values),
            RuleTarget::Attribute(key) => FilterClause::AttributeIn {
                key: key.to_string(),
                values,
            },
        }
    }
}

/// Style rules in evaluation order: occasion rules before color rules.
///
/// New preference categories are added by appending rows.
pub const STYLE_RULES: &[StyleRule] = &[
    StyleRule {
        preference: "occasion",
        value: "formal",
        target: RuleTarget::Categories,
        accepted: &["formal", "business"],
        reason: "Matches your formal style preference",
    },
    StyleRule {
        preference: "occasion",
        value: "casual",
        target: RuleTarget::Categories,
        accepted: &["casual", "everyday"],
        reason: "Perfect for your casual style",
    },
    StyleRule {
        preference: "color_palette",
        value: "neutrals",
        target: RuleTarget::Attribute("color"),
        accepted: &["black", "white", "gray", "beige"],
        reason: "Fits your neutral color palette",
    },
    StyleRule {
        preference: "color_palette",
        value: "earth_tones",
        target: RuleTarget::Attribute("color"),
        accepted: &["brown", "olive", "rust"],
        reason: "Complements your earth tone preference",
    },
];

/// Rules from `rules` that fire for `preferences`, in table order
pub fn active_rules<'a>(
    preferences: &'a PreferenceSet,
    rules: &'a [StyleRule],
) -> impl Iterator<Item = &'a StyleRule> + 'a {
    rules.iter().filter(move |rule| rule.applies_to(preferences))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_fires_on_exact_value_only() {
        let rule = &STYLE_RULES[0];

        assert!(rule.applies_to(&PreferenceSet::new().with("occasion", "formal")));
        assert!(!rule.applies_to(&PreferenceSet::new().with("occasion", "Formal")));
        assert!(!rule.applies_to(&PreferenceSet::new().with("style", "formal")));
    }

    #[test]
    fn test_one_rule_per_preference_value() {
        for (i, a) in STYLE_RULES.iter().enumerate() {
            for b in &STYLE_RULES[i + 1..] {
                assert!(
                    a.preference != b.preference || a.value != b.value,
                    "duplicate rule for {}={}",
                    a.preference,
                    a.value
                );
            }
        }
    }

    #[test]
    fn test_occasion_rules_come_first() {
        let first_color = STYLE_RULES
            .iter()
            .position(|r| r.preference == "color_palette")
            .unwrap();
        assert!(STYLE_RULES[..first_color]
            .iter()
            .all(|r| r.preference == "occasion"));
    }

    #[test]
    fn test_attribute_clause() {
        let clause = STYLE_RULES[3].clause();
        assert_eq!(
            clause,
            FilterClause::AttributeIn {
                key: "color".to_string(),
                values: vec!["brown".into(), "olive".into(), "rust".into()],
            }
        );
    }

    #[test]
    fn test_active_rules_ignores_unknown_keys() {
        let prefs = PreferenceSet::new()
            .with("fit_preference", "fitted")
            .with("occasion", "mixed");

        assert_eq!(active_rules(&prefs, STYLE_RULES).count(), 0);
    }
}
