//! Route templates for span names and metric labels.

/// Collections whose next path segment is a caller-chosen identifier.
const IDENTIFIED_COLLECTIONS: [(&str, &str, &[&str]); 3] = [
    ("products", "{product_id}", &[]),
    ("cart", "{sku}", &["validate"]),
    ("orders", "{order_id}", &["create", "verify-payment"]),
];

/// Collapse identifiers in a request path so label cardinality stays bounded.
pub(super) fn route_template(path: &str) -> String {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if segments.iter().all(|segment| segment.is_empty()) {
        return "/".to_owned();
    }

    let mut route = String::new();
    let mut previous: Option<&str> = None;

    for segment in segments {
        route.push('/');

        let placeholder = previous.and_then(|previous| {
            IDENTIFIED_COLLECTIONS
                .iter()
                .find(|(collection, _, literals)| {
                    *collection == previous && !literals.contains(&segment)
                })
                .map(|(_, placeholder, _)| *placeholder)
        });

        route.push_str(placeholder.unwrap_or(segment));
        previous = Some(segment);
    }

    route
}
