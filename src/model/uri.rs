//! URI minting for recording resources.

use uuid::Uuid;

/// Mint a fresh URI relative to `base`.
///
/// - A base ending in `/` or `#` gets a fresh id appended.
/// - Otherwise the id becomes a child path segment (`base/<id>`).
/// - With `sibling`, the id replaces the last path segment of `base`, or its
///   fragment when the fragment follows the last `/`.
pub fn make_uri(base: &str, sibling: bool) -> String {
    let id = Uuid::new_v4();
    if base.ends_with('/') || base.ends_with('#') {
        return format!("{base}{id}");
    }
    if !sibling {
        return format!("{base}/{id}");
    }
    match (base.rfind('#'), base.rfind('/')) {
        (Some(hash), slash) if slash.map_or(true, |s| hash > s) => {
            format!("{}#{id}", &base[..hash])
        }
        (_, Some(slash)) => format!("{}/{id}", &base[..slash]),
        (_, None) => format!("{base}/{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(uri: &str) -> &str {
        &uri[..uri.len() - 36]
    }

    #[test]
    fn appends_to_container() {
        assert_eq!(prefix(&make_uri("http://ex.org/rec/", false)), "http://ex.org/rec/");
        assert_eq!(prefix(&make_uri("http://ex.org/rec#", true)), "http://ex.org/rec#");
    }

    #[test]
    fn child_segment() {
        assert_eq!(prefix(&make_uri("http://ex.org/rec", false)), "http://ex.org/rec/");
    }

    #[test]
    fn sibling_replaces_last_segment() {
        assert_eq!(
            prefix(&make_uri("http://ex.org/rec/timeline/abc", true)),
            "http://ex.org/rec/timeline/"
        );
        assert_eq!(
            prefix(&make_uri("http://ex.org/rec/timeline#abc", true)),
            "http://ex.org/rec/timeline#"
        );
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(make_uri("a/", false), make_uri("a/", false));
    }
}
