//! Inventory ledger models

use uuid::Uuid;

/// Generate an item code for inventory records auto-created on receipt
/// of goods with a previously unseen name.
///
/// Format: `AUTO-<slug>-<suffix>` where the slug is the first eight
/// alphanumeric characters of the name, uppercased, and the suffix is
/// taken from the new record's id to keep codes unique.
pub fn auto_item_code(name: &str, id: Uuid) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_ascii_uppercase();
    let slug = if slug.is_empty() { "ITEM".to_string() } else { slug };
    let suffix = id.simple().to_string().to_ascii_uppercase();
    format!("AUTO-{}-{}", slug, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_item_code_format() {
        let id = Uuid::new_v4();
        let code = auto_item_code("Support bearings", id);
        assert!(code.starts_with("AUTO-SUPPORTB-"));
        assert_eq!(code.len(), "AUTO-SUPPORTB-".len() + 8);
    }

    #[test]
    fn test_auto_item_code_strips_punctuation() {
        let id = Uuid::new_v4();
        let code = auto_item_code("M8 hex-bolt", id);
        assert!(code.starts_with("AUTO-M8HEXBOL-"));
    }

    #[test]
    fn test_auto_item_code_empty_name() {
        let id = Uuid::new_v4();
        let code = auto_item_code("---", id);
        assert!(code.starts_with("AUTO-ITEM-"));
    }

    #[test]
    fn test_auto_item_code_unique_per_id() {
        let a = auto_item_code("Lubricant", Uuid::new_v4());
        let b = auto_item_code("Lubricant", Uuid::new_v4());
        assert_ne!(a, b);
    }
}
