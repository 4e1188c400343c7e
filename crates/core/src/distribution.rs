//! Comma-joined distribution tags stored on a release.

use crate::credits::ProductType;
use crate::error::CoreError;

/// Separator used in the `releases.distribution` column.
pub const SEPARATOR: &str = ",";

/// Distribution string for a freshly created release.
pub fn initial() -> String {
    ProductType::Pr.as_str().to_string()
}

/// Parse the stored tag string. Unknown and empty tags are skipped.
pub fn parse(distribution: &str) -> Vec<ProductType> {
    let mut tags = Vec::new();
    for tag in distribution.split(SEPARATOR).map(str::trim) {
        if let Ok(product) = tag.parse::<ProductType>() {
            if !tags.contains(&product) {
                tags.push(product);
            }
        }
    }
    tags
}

/// Append an upgrade tag, returning the new column value.
///
/// Fails when `product` is not an upgrade or is already present.
pub fn add_upgrade(distribution: &str, product: ProductType) -> Result<String, CoreError> {
    if !product.is_upgrade() {
        return Err(CoreError::Validation(format!(
            "'{product}' is not a distribution upgrade"
        )));
    }
    let mut tags = parse(distribution);
    if tags.contains(&product) {
        return Err(CoreError::Conflict(format!(
            "Release already has '{product}' distribution"
        )));
    }
    tags.push(product);
    Ok(join(&tags))
}

fn join(tags: &[ProductType]) -> String {
    tags.iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
