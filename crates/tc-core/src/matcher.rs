//! Keyword matching of event titles against categories.
//!
//! A title matches a category when the category label occurs anywhere in it,
//! or when the title starts with the category code. Both checks ignore case.

use crate::category::{Category, CategoryCode, CategoryTable};

/// Returns true if the lower-cased title belongs to the category.
fn matches_lowered(category: &Category, title: &str) -> bool {
    let label = category.label.to_lowercase();
    if title.contains(&label) {
        return true;
    }

    let code = category.code.as_str().to_lowercase();
    let prefix: String = title.chars().take(code.chars().count()).collect();
    prefix == code
}

/// Returns true if `title` belongs to `category`.
pub fn matches(category: &Category, title: &str) -> bool {
    matches_lowered(category, &title.to_lowercase())
}

/// Every category in the table that `title` belongs to, in table order.
pub fn classify<'a>(table: &'a CategoryTable, title: &str) -> Vec<&'a CategoryCode> {
    let title = title.to_lowercase();
    table
        .categories()
        .iter()
        .filter(|category| matches_lowered(category, &title))
        .map(|category| &category.code)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, CategoryTable};

    fn table() -> CategoryTable {
        CategoryTable::new(
            vec![
                Category::new("CV", "Computer Vision", 20.0).unwrap(),
                Category::new("Coding", "Coding", 12.0).unwrap(),
                Category::new("***", "Chill Time", 11.0).unwrap(),
            ],
            vec![],
        )
        .unwrap()
    }

    fn codes(table: &CategoryTable, title: &str) -> Vec<String> {
        classify(table, title)
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_label_substring_is_case_insensitive() {
        let table = table();
        assert_eq!(codes(&table, "Deep CODING session"), ["Coding"]);
        assert_eq!(codes(&table, "review: computer vision notes"), ["CV"]);
    }

    #[test]
    fn test_code_prefix() {
        let table = table();
        assert_eq!(codes(&table, "cv office hours"), ["CV"]);
        assert_eq!(codes(&table, "*** movie night"), ["***"]);
        // The code must lead the title.
        assert!(codes(&table, "office hours cv").is_empty());
    }

    #[test]
    fn test_title_shorter_than_code() {
        let table = table();
        assert!(codes(&table, "c").is_empty());
        assert!(codes(&table, "").is_empty());
    }

    #[test]
    fn test_one_title_may_match_several_categories() {
        let table = table();
        assert_eq!(codes(&table, "CV: Coding the tracker"), ["CV", "Coding"]);
    }

    #[test]
    fn test_label_and_prefix_on_same_category_counts_once() {
        let table = table();
        assert_eq!(codes(&table, "coding coding"), ["Coding"]);
    }

    #[test]
    fn test_matches_single_category() {
        let category = Category::new("LT", "LemonTree", 3.0).unwrap();
        assert!(matches(&category, "Sync with lemontree team"));
        assert!(matches(&category, "LT standup"));
        assert!(!matches(&category, "Lunch"));
    }

    #[test]
    fn test_non_ascii_prefix() {
        let category = Category::new("Été", "Summer school", 1.0).unwrap();
        assert!(matches(&category, "ÉTÉ planning"));
    }
}
