//! Hero products: catalog titles that also appear in homepage text.

use shopintel_core::ProductRecord;

/// Maximum number of hero products reported.
pub const MAX_HERO_PRODUCTS: usize = 5;

/// Titles of catalog products whose lower-cased title occurs in
/// `homepage_text`, in catalog order, at most [`MAX_HERO_PRODUCTS`].
///
/// `homepage_text` must already be lower-cased.
#[must_use]
pub fn find_hero_products(catalog: &[ProductRecord], homepage_text: &str) -> Vec<String> {
    catalog
        .iter()
        .filter(|product| {
            !product.title.trim().is_empty()
                && homepage_text.contains(&product.title.to_lowercase())
        })
        .take(MAX_HERO_PRODUCTS)
        .map(|product| product.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(title: &str) -> ProductRecord {
        ProductRecord {
            id: 1,
            title: title.to_string(),
            vendor: String::new(),
            product_type: String::new(),
            handle: String::new(),
            created_at: String::new(),
            price: 0.0,
            variants: Vec::new(),
        }
    }

    #[test]
    fn matches_titles_case_insensitively_in_catalog_order() {
        let catalog = vec![product("Linen Shirt"), product("Silk Scarf"), product("Denim")];
        let heroes = find_hero_products(&catalog, "new in: denim and linen shirt styles");
        assert_eq!(heroes, vec!["Linen Shirt".to_string(), "Denim".to_string()]);
    }

    #[test]
    fn caps_at_five() {
        let catalog: Vec<_> = (1..=8).map(|i| product(&format!("Item {i}"))).collect();
        let text = (1..=8).map(|i| format!("item {i}")).collect::<Vec<_>>().join(" ");
        let heroes = find_hero_products(&catalog, &text);
        assert_eq!(heroes.len(), MAX_HERO_PRODUCTS);
        assert_eq!(heroes[0], "Item 1");
    }

    #[test]
    fn blank_titles_never_match() {
        let catalog = vec![product("  ")];
        assert!(find_hero_products(&catalog, "anything").is_empty());
    }

    #[test]
    fn title_whitespace_is_part_of_the_match() {
        let catalog = vec![product("Shirt "), product("Scarf")];
        let heroes = find_hero_products(&catalog, "our shirt, our scarf");
        assert_eq!(heroes, vec!["Scarf".to_string()]);
    }

    #[test]
    fn empty_catalog_has_no_heroes() {
        assert!(find_hero_products(&[], "some homepage text").is_empty());
    }
}
