//! Subscription id derivation and legacy id repair.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use super::Subscription;

/// Base used when a name yields an empty slug.
const FALLBACK_ID: &str = "subscription";

/// Derive a slug-like id from a subscription name.
///
/// Lower-cases the name, turns runs of whitespace and underscores into a
/// single hyphen, strips everything that is not a letter, number, or
/// hyphen (Unicode-aware), collapses repeated hyphens, and trims hyphens
/// from both ends. Two names can derive the same id; callers do not
/// deduplicate.
///
/// ```
/// use sublog_core::subscription::generate_id;
///
/// assert_eq!(generate_id("Netflix "), "netflix");
/// assert_eq!(generate_id("YouTube Premium"), "youtube-premium");
/// ```
pub fn generate_id(name: &str) -> String {
    let lowered = name.to_lowercase();
    let hyphenated = GAPS.replace_all(&lowered, "-");
    let stripped = NOT_SLUG.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUNS.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

static GAPS: LazyLock<Regex> = LazyLock::new(|| slug_pattern(r"[\s_]+"));
static NOT_SLUG: LazyLock<Regex> = LazyLock::new(|| slug_pattern(r"[^\p{L}\p{N}-]"));
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| slug_pattern(r"-+"));

fn slug_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).expect("slug patterns are valid")
}

/// Id for a newly created subscription.
///
/// Uses [`generate_id`] and falls back to a random id when the name has no
/// letters or numbers at all.
pub fn new_subscription_id(name: &str) -> String {
    let slug = generate_id(name);
    if slug.is_empty() {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{}-{}", FALLBACK_ID, &uuid[..8])
    } else {
        slug
    }
}

/// Assign ids to records that lack one.
///
/// Each repaired id is derived from the record's name and suffixed `-2`,
/// `-3`, ... until it is unique within the collection. The result depends
/// only on the collection, so repairing the same stored document always
/// yields the same ids, and repairing a repaired collection changes
/// nothing. Returns the number of records repaired.
pub fn repair_missing_ids(subscriptions: &mut [Subscription]) -> usize {
    let mut taken: HashSet<String> = subscriptions
        .iter()
        .filter(|s| !s.id.is_empty())
        .map(|s| s.id.clone())
        .collect();

    let mut repaired = 0;
    for sub in subscriptions.iter_mut().filter(|s| s.id.is_empty()) {
        let base = match generate_id(&sub.name) {
            slug if slug.is_empty() => FALLBACK_ID.to_string(),
            slug => slug,
        };

        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }

        taken.insert(candidate.clone());
        sub.id = candidate;
        repaired += 1;
    }

    repaired
}
