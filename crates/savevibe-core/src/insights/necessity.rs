//! Necessity vs. want classification of category labels

/// Keywords that mark an unknown category as a necessity
const NECESSITY_KEYWORDS: [&str; 8] = [
    "bill",
    "utility",
    "rent",
    "food",
    "grocery",
    "health",
    "medical",
    "transport",
];

/// Look up a normalized label in the fixed category table
fn known_category(label: &str) -> Option<bool> {
    let necessity = match label {
        "rent" | "mortgage" | "groceries" | "grocery" | "food" | "utilities" | "electricity"
        | "water" | "gas" | "insurance" | "healthcare" | "medical" | "transportation"
        | "transport" | "education" | "childcare" | "debt" | "loan" => true,
        "dining" | "restaurants" | "entertainment" | "shopping" | "travel" | "subscriptions"
        | "clothing" | "hobbies" | "gifts" | "personal care" | "coffee" | "alcohol" => false,
        _ => return None,
    };
    Some(necessity)
}

/// Whether spending in this category is a necessity (as opposed to a want)
///
/// Known labels come from a fixed table; anything else is a necessity only
/// if it contains one of the necessity keywords. Case-insensitive.
pub fn is_necessity(category: &str) -> bool {
    let label = category.trim().to_lowercase();

    known_category(&label)
        .unwrap_or_else(|| NECESSITY_KEYWORDS.iter().any(|kw| label.contains(kw)))
}

/// Whether the category is money set aside rather than spent
pub fn is_savings_category(category: &str) -> bool {
    matches!(category.trim().to_lowercase().as_str(), "savings" | "investment")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        assert!(is_necessity("rent"));
        assert!(is_necessity("groceries"));
        assert!(is_necessity("food"));
        assert!(is_necessity("utilities"));
        assert!(!is_necessity("dining"));
        assert!(!is_necessity("shopping"));
        assert!(!is_necessity("entertainment"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_necessity("Groceries"));
        assert!(is_necessity("  RENT "));
        assert!(!is_necessity("Dining"));
    }

    #[test]
    fn test_keyword_fallback() {
        assert!(is_necessity("phone bill"));
        assert!(is_necessity("Water Utility Co"));
        assert!(is_necessity("public transport pass"));
        assert!(is_necessity("health club"));
        assert!(is_necessity("fast food"));
        assert!(!is_necessity("video games"));
        assert!(!is_necessity(""));
    }

    #[test]
    fn test_savings_labels() {
        assert!(is_savings_category("savings"));
        assert!(is_savings_category("Investment"));
        assert!(!is_savings_category("investments fund"));
        assert!(!is_savings_category("rent"));
    }
}
