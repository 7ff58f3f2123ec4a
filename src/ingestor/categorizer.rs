//! Keyword-based channel categorization

use crate::models::GroupTag;

/// Ordered keyword sets; the first set with a keyword contained in the
/// lower-cased channel name decides the tag
const CATEGORY_KEYWORDS: &[(GroupTag, &[&str])] = &[
    (
        GroupTag::Sports,
        &["sport", "bein", "ssc", "kass", "رياضية", "الرياضية"],
    ),
    (
        GroupTag::Entertainment,
        &["mbc", "osn", "movie", "film", "أكشن", "دراما"],
    ),
    (
        GroupTag::News,
        &["news", "الشرقية", "العراقية", "السومرية", "اخبار", "نيوز"],
    ),
];

pub fn categorize(name: &str) -> GroupTag {
    let name_lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name_lower.contains(k)))
        .map(|(tag, _)| tag.clone())
        .unwrap_or(GroupTag::General)
}
