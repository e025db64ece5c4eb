//! Advanced boosts: multi-criteria conditional score adjustments.
//!
//! A criterion list that is empty (or `None` for the scalar criteria) is a
//! wildcard. Non-empty lists match if any element matches; distinct
//! criterion kinds AND together. `minPriority` compares against the
//! running score at evaluation time, so boosts later in the array can key
//! off earlier ones.

use crate::config::model::AdvancedBoost;
use crate::types::EntitySnapshot;

/// Whether `boost` applies to `entity` given the score accumulated so far.
pub fn boost_applies(boost: &AdvancedBoost, entity: &EntitySnapshot, running_score: f64) -> bool {
    let c = &boost.criteria;

    if let Some(min) = c.min_priority {
        if running_score < min {
            return false;
        }
    }
    if let Some(required) = c.has_attachment {
        if entity.has_attachments != required {
            return false;
        }
    }
    if !c.senders.is_empty() && !sender_matches(&c.senders, entity.from_email.as_deref()) {
        return false;
    }
    if !c.domains.is_empty() && !domain_matches(&c.domains, entity.from_email.as_deref()) {
        return false;
    }
    if !c.keywords.is_empty() && !keyword_matches(&c.keywords, entity.subject.as_deref()) {
        return false;
    }
    if !c.labels.is_empty() && !label_matches(&c.labels, &entity.labels) {
        return false;
    }
    if !c.categories.is_empty() && !category_matches(&c.categories, entity.category.as_deref()) {
        return false;
    }
    true
}

/// Sender patterns are case-insensitive substrings of the address, so both
/// full addresses and fragments like "noreply" or "@promoter.example" work.
fn sender_matches(patterns: &[String], from_email: Option<&str>) -> bool {
    let Some(addr) = from_email else {
        return false;
    };
    let addr = addr.to_lowercase();
    patterns.iter().any(|p| addr.contains(&p.to_lowercase()))
}

fn domain_matches(domains: &[String], from_email: Option<&str>) -> bool {
    let Some(addr) = from_email else {
        return false;
    };
    let domain = extract_domain(addr);
    if domain.is_empty() {
        return false;
    }
    domains.iter().any(|d| d.to_lowercase() == domain)
}

fn keyword_matches(keywords: &[String], subject: Option<&str>) -> bool {
    let Some(subject) = subject else {
        return false;
    };
    let subject = subject.to_lowercase();
    keywords.iter().any(|k| subject.contains(&k.to_lowercase()))
}

fn label_matches(wanted: &[String], labels: &[String]) -> bool {
    labels
        .iter()
        .any(|l| wanted.iter().any(|w| w.eq_ignore_ascii_case(l)))
}

fn category_matches(categories: &[String], category: Option<&str>) -> bool {
    let Some(category) = category else {
        return false;
    };
    categories.iter().any(|c| c.eq_ignore_ascii_case(category))
}

/// Domain part of an email address, lowercased.
fn extract_domain(email_addr: &str) -> String {
    match email_addr.rfind('@') {
        Some(at_pos) => email_addr[at_pos + 1..].to_lowercase(),
        None => String::new(),
    }
}
