//! Route slugs derived from tool display names.

/// Convert a display name into its URL slug.
///
/// Alphanumeric characters are lowercased and kept; every other run of
/// characters collapses into a single `-`. Leading and trailing separators
/// are dropped, so `"IPv4 Address Converter"` becomes `"ipv4-address-converter"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_names() {
        assert_eq!(slugify("Basic Auth Generator"), "basic-auth-generator");
        assert_eq!(slugify("IPv4 Address Converter"), "ipv4-address-converter");
        assert_eq!(slugify("JSON To CSV Formatter"), "json-to-csv-formatter");
        assert_eq!(slugify("  URL -- Encoder/Decoder! "), "url-encoder-decoder");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
    }
}
