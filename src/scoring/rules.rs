//! Cross-label rules: prefix-match boosts against an entity's label set.

use crate::config::model::CrossLabelRule;

/// Rules whose prefix matches any of `labels`, in rule order. The case
/// rule applies to the comparison only.
pub fn matching_rules<'a>(
    labels: &[String],
    rules: &'a [CrossLabelRule],
) -> Vec<&'a CrossLabelRule> {
    rules
        .iter()
        .filter(|rule| rule_matches(rule, labels))
        .collect()
}

fn rule_matches(rule: &CrossLabelRule, labels: &[String]) -> bool {
    if rule.case_insensitive {
        let prefix = rule.prefix.to_lowercase();
        labels.iter().any(|l| l.to_lowercase().starts_with(&prefix))
    } else {
        labels.iter().any(|l| l.starts_with(&rule.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(prefix: &str, weight: f64, case_insensitive: bool) -> CrossLabelRule {
        CrossLabelRule {
            prefix: prefix.to_string(),
            description: String::new(),
            weight,
            case_insensitive,
        }
    }

    #[test]
    fn case_insensitive_prefix_matches_lowercase_label() {
        let labels = vec!["legal/contract".to_string()];
        let insensitive = rule("LEGAL", 10.0, true);
        assert_eq!(matching_rules(&labels, &[insensitive]).len(), 1);
        let sensitive = rule("LEGAL", 10.0, false);
        assert!(matching_rules(&labels, &[sensitive]).is_empty());
    }

    #[test]
    fn any_label_can_satisfy_the_prefix() {
        let labels = vec!["tour-2026".to_string(), "VIP/agent".to_string()];
        let r = rule("VIP", 25.0, false);
        assert_eq!(matching_rules(&labels, &[r]).len(), 1);
    }

    #[test]
    fn no_labels_no_match() {
        let r = rule("VIP", 25.0, true);
        assert!(matching_rules(&[], &[r]).is_empty());
    }

    #[test]
    fn rule_order_is_preserved() {
        let labels = vec!["VIP/agent".to_string()];
        let first = rule("VIP", 10.0, false);
        let second = rule("VIP/a", 5.0, false);
        let rules = [first, second];
        let matched = matching_rules(&labels, &rules);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].weight, 10.0);
        assert_eq!(matched[1].weight, 5.0);
    }
}
