use crate::core::rules::{active_rules, StyleRule, MAX_SCORE, RULE_POINTS, STYLE_RULES};
use crate::models::{PreferenceSet, Product, StyleMatch};

/// Score how well a product fits a user's style preferences
///
/// Scoring is additive: each firing rule the product satisfies adds
/// [`RULE_POINTS`] and its reason, in rule-table order. The total is capped
/// at [`MAX_SCORE`]. Without preferences the result is an empty
/// "no profile" match.
pub fn score_product(product: &Product, preferences: Option<&PreferenceSet>) -> StyleMatch {
    score_with_rules(product, preferences, STYLE_RULES)
}

/// Same as [`score_product`] over an explicit rule table
pub fn score_with_rules(
    product: &Product,
    preferences: Option<&PreferenceSet>,
    rules: &[StyleRule],
) -> StyleMatch {
    let Some(preferences) = preferences else {
        return StyleMatch::no_profile();
    };

    let mut total: u32 = 0;
    let mut reasons = Vec::new();

    for rule in active_rules(preferences, rules) {
        if rule.is_satisfied_by(product) {
            total = total.saturating_add(RULE_POINTS);
            reasons.push(rule.reason.to_string());
        }
    }

    StyleMatch {
        has_profile: true,
        score: total.min(MAX_SCORE) as u8,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::RuleTarget;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn create_test_product(categories: &[&str], color: Option<&str>) -> Product {
        let mut attributes = BTreeMap::new();
        attributes.insert("material".to_string(), "cotton".to_string());
        if let Some(color) = color {
            attributes.insert("color".to_string(), color.to_string());
        }

        Product {
            id: Uuid::new_v4(),
            name: "Test Product".to_string(),
            description: "Test description".to_string(),
            price: 59.99,
            image_url: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            attributes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_preferences() {
        let product = create_test_product(&["formal"], Some("black"));
        let result = score_product(&product, None);

        assert!(!result.has_profile);
        assert_eq!(result.score, 0);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_formal_and_neutral_match() {
        let product = create_test_product(&["formal", "business"], Some("black"));
        let prefs = PreferenceSet::new()
            .with("occasion", "formal")
            .with("color_palette", "neutrals");

        let result = score_product(&product, Some(&prefs));

        assert!(result.has_profile);
        assert_eq!(result.score, 50);
        assert_eq!(
            result.reasons,
            vec![
                "Matches your formal style preference",
                "Fits your neutral color palette",
            ]
        );
    }

    #[test]
    fn test_casual_and_earth_tone_match() {
        let product = create_test_product(&["clothing", "everyday"], Some("olive"));
        let prefs = PreferenceSet::new()
            .with("color_palette", "earth_tones")
            .with("occasion", "casual");

        let result = score_product(&product, Some(&prefs));

        assert_eq!(result.score, 50);
        assert_eq!(
            result.reasons,
            vec![
                "Perfect for your casual style",
                "Complements your earth tone preference",
            ]
        );
    }

    #[test]
    fn test_partial_match() {
        let product = create_test_product(&["casual"], Some("navy"));
        let prefs = PreferenceSet::new()
            .with("occasion", "casual")
            .with("color_palette", "neutrals");

        let result = score_product(&product, Some(&prefs));

        assert_eq!(result.score, 25);
        assert_eq!(result.reasons, vec!["Perfect for your casual style"]);
    }

    #[test]
    fn test_profile_without_hits() {
        let product = create_test_product(&["casual"], None);
        let prefs = PreferenceSet::new()
            .with("occasion", "formal")
            .with("color_palette", "neutrals");

        let result = score_product(&product, Some(&prefs));

        assert!(result.has_profile);
        assert_eq!(result.score, 0);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_unknown_preferences_score_zero() {
        let product = create_test_product(&["formal"], Some("black"));
        let prefs = PreferenceSet::new().with("budget", "premium");

        let result = score_product(&product, Some(&prefs));

        assert!(result.has_profile);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_score_is_capped() {
        let rules: Vec<StyleRule> = (0..6)
            .map(|_| StyleRule {
                preference: "occasion",
                value: "formal",
                target: RuleTarget::Categories,
                accepted: &["formal"],
                reason: "Formal",
            })
            .collect();
        let product = create_test_product(&["formal"], None);
        let prefs = PreferenceSet::new().with("occasion", "formal");

        let result = score_with_rules(&product, Some(&prefs), &rules);

        assert_eq!(result.score, 100);
        assert_eq!(result.reasons.len(), 6);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let product = create_test_product(&["formal"], Some("white"));
        let prefs = PreferenceSet::new()
            .with("occasion", "formal")
            .with("color_palette", "neutrals");

        assert_eq!(
            score_product(&product, Some(&prefs)),
            score_product(&product, Some(&prefs))
        );
    }
}
