//! Product catalog from the storefront's `products.json` endpoint.

use serde::Deserialize;
use serde_json::Value;
use shopintel_core::ProductRecord;

use crate::error::ScrapeError;
use crate::fetch::Fetcher;
use crate::target::ScrapeTarget;

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    id: i64,
    title: String,
    #[serde(deserialize_with = "string_or_null")]
    vendor: String,
    #[serde(deserialize_with = "string_or_null")]
    product_type: String,
    handle: String,
    created_at: String,
    #[serde(default)]
    variants: Vec<Value>,
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Fetches `<base>/products.json` and maps it to product records.
///
/// Never fails: an unreachable endpoint, a non-2xx status, or any malformed
/// product yields an empty catalog.
pub async fn fetch_catalog(fetcher: &Fetcher, target: &ScrapeTarget) -> Vec<ProductRecord> {
    let url = target.products_url();
    let body = match fetcher.fetch_catalog_body(&url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "catalog fetch failed; continuing without products");
            return Vec::new();
        }
    };

    match parse_catalog(&url, &body) {
        Ok(products) => {
            tracing::debug!(url = %url, count = products.len(), "catalog parsed");
            products
        }
        Err(e) => {
            tracing::warn!(error = %e, "catalog discarded");
            Vec::new()
        }
    }
}

/// Parses a `products.json` body. One bad product rejects the whole catalog.
///
/// # Errors
///
/// Returns [`ScrapeError::MalformedCatalog`] if the body is not JSON, a
/// required key is missing, or a price cannot be read as a number.
pub fn parse_catalog(url: &str, body: &str) -> Result<Vec<ProductRecord>, ScrapeError> {
    let malformed = |reason: String| ScrapeError::MalformedCatalog {
        url: url.to_owned(),
        reason,
    };

    let response: CatalogResponse =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    response
        .products
        .into_iter()
        .map(|raw| {
            let price = first_variant_price(&raw.variants)
                .map_err(|reason| malformed(format!("product {}: {reason}", raw.id)))?;
            Ok(ProductRecord {
                id: raw.id,
                title: raw.title,
                vendor: raw.vendor,
                product_type: raw.product_type,
                handle: raw.handle,
                created_at: raw.created_at,
                price,
                variants: raw.variants,
            })
        })
        .collect()
}

/// Price of the first variant. Shopify serializes it as a decimal string,
/// but plain numbers are accepted too. Non-finite prices are rejected since
/// they cannot be stored as JSON numbers.
fn first_variant_price(variants: &[Value]) -> Result<f64, String> {
    let Some(first) = variants.first() else {
        return Ok(0.0);
    };
    let price = match first.get("price") {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("price {n} is not representable")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("unparseable price \"{s}\"")),
        Some(other) => Err(format!("unexpected price value {other}")),
    }?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(format!("price {price} is not a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://shop.example/products.json";

    fn product(id: i64, variants: &Value) -> Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "vendor": "Brand",
            "product_type": "Dress",
            "handle": format!("product-{id}"),
            "created_at": "2024-03-01T10:00:00+05:30",
            "variants": variants,
            "tags": ["ignored"]
        })
    }

    #[test]
    fn price_comes_from_first_variant_string() {
        let body = json!({"products": [product(1, &json!([{"price": "1299.00"}, {"price": "5.00"}]))]});
        let products = parse_catalog(URL, &body.to_string()).expect("parse");
        assert_eq!(products.len(), 1);
        assert!((products[0].price - 1299.0).abs() < f64::EPSILON);
        assert_eq!(products[0].variants.len(), 2);
        assert_eq!(products[0].created_at, "2024-03-01T10:00:00+05:30");
    }

    #[test]
    fn numeric_price_is_accepted() {
        let body = json!({"products": [product(2, &json!([{"price": 49.5}]))]});
        let products = parse_catalog(URL, &body.to_string()).expect("parse");
        assert!((products[0].price - 49.5).abs() < f64::EPSILON);
    }

    #[test]
    fn no_variants_means_zero_price() {
        let body = json!({"products": [product(3, &json!([]))]});
        let products = parse_catalog(URL, &body.to_string()).expect("parse");
        assert!(products[0].price.abs() < f64::EPSILON);
    }

    #[test]
    fn variant_without_price_means_zero_price() {
        let body = json!({"products": [product(4, &json!([{"sku": "X"}]))]});
        let products = parse_catalog(URL, &body.to_string()).expect("parse");
        assert!(products[0].price.abs() < f64::EPSILON);
    }

    #[test]
    fn null_vendor_becomes_empty_string() {
        let mut raw = product(5, &json!([]));
        raw["vendor"] = Value::Null;
        let body = json!({"products": [raw]});
        let products = parse_catalog(URL, &body.to_string()).expect("parse");
        assert_eq!(products[0].vendor, "");
    }

    #[test]
    fn unparseable_price_rejects_whole_catalog() {
        let body = json!({"products": [
            product(6, &json!([{"price": "10.00"}])),
            product(7, &json!([{"price": "ten"}]))
        ]});
        let err = parse_catalog(URL, &body.to_string()).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedCatalog { .. }), "got: {err:?}");
    }

    #[test]
    fn non_finite_price_rejects_whole_catalog() {
        for price in ["NaN", "inf", "-Infinity", "1e400"] {
            let body = json!({"products": [product(10, &json!([{"price": price}]))]});
            let err = parse_catalog(URL, &body.to_string()).unwrap_err();
            assert!(
                matches!(err, ScrapeError::MalformedCatalog { .. }),
                "price {price}: {err:?}"
            );
        }
    }

    #[test]
    fn missing_required_key_rejects_whole_catalog() {
        let mut raw = product(8, &json!([]));
        raw.as_object_mut().expect("object").remove("handle");
        let body = json!({"products": [product(9, &json!([])), raw]});
        assert!(parse_catalog(URL, &body.to_string()).is_err());
    }

    #[test]
    fn non_json_body_is_rejected() {
        assert!(parse_catalog(URL, "<html>password page</html>").is_err());
        assert!(parse_catalog(URL, r#"{"items": []}"#).is_err());
    }

    #[test]
    fn empty_product_list_is_valid() {
        let products = parse_catalog(URL, r#"{"products": []}"#).expect("parse");
        assert!(products.is_empty());
    }
}
