//! Bestseller categories and their page URLs.

/// Bestseller landing page; category pages append `/<category id>`.
pub const BESTSELLER_URL: &str = "https://www.coupang.com/np/best100/bestseller";

/// A bestseller category known by a short key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    /// Storefront category id; `None` for the overall ranking.
    pub id: Option<&'static str>,
}

impl Category {
    pub fn url(&self) -> String {
        match self.id {
            Some(id) => format!("{}/{}", BESTSELLER_URL, id),
            None => BESTSELLER_URL.to_string(),
        }
    }
}

pub const CATEGORIES: &[Category] = &[
    Category { key: "all", id: None },
    Category { key: "fashion", id: Some("564553") },
    Category { key: "beauty", id: Some("176422") },
    Category { key: "baby", id: Some("221834") },
    Category { key: "food", id: Some("194176") },
    Category { key: "kitchen", id: Some("185569") },
    Category { key: "living", id: Some("115573") },
    Category { key: "interior", id: Some("184455") },
    Category { key: "digital", id: Some("178155") },
    Category { key: "sports", id: Some("317678") },
    Category { key: "car", id: Some("183960") },
    Category { key: "books", id: Some("317677") },
    Category { key: "toys", id: Some("317679") },
    Category { key: "office", id: Some("177195") },
    Category { key: "pet", id: Some("115574") },
    Category { key: "health", id: Some("305698") },
];

pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Resolve requested keys against the table.
///
/// An empty request selects every category in table order. Unknown keys are
/// returned separately so the caller can report them and carry on.
pub fn resolve_categories(keys: &[String]) -> (Vec<&'static Category>, Vec<String>) {
    if keys.is_empty() {
        return (CATEGORIES.iter().collect(), Vec::new());
    }

    let mut known = Vec::new();
    let mut unknown = Vec::new();
    for key in keys {
        match find_category(key) {
            Some(category) => known.push(category),
            None => unknown.push(key.clone()),
        }
    }
    (known, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_urls() {
        assert_eq!(
            find_category("all").unwrap().url(),
            "https://www.coupang.com/np/best100/bestseller"
        );
        assert_eq!(
            find_category("beauty").unwrap().url(),
            "https://www.coupang.com/np/best100/bestseller/176422"
        );
    }

    #[test]
    fn test_resolve_categories_empty_means_all() {
        let (known, unknown) = resolve_categories(&[]);
        assert_eq!(known.len(), CATEGORIES.len());
        assert_eq!(known[0].key, "all");
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_resolve_categories_reports_unknown_keys() {
        let keys = vec!["pet".to_string(), "garden".to_string(), "food".to_string()];
        let (known, unknown) = resolve_categories(&keys);
        let known_keys: Vec<_> = known.iter().map(|c| c.key).collect();
        assert_eq!(known_keys, vec!["pet", "food"]);
        assert_eq!(unknown, vec!["garden".to_string()]);
    }
}
