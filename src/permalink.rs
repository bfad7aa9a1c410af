use url::Url;

/// Query parameter appended to the next-step URL so the destination page
/// knows the visitor already went through the keyword search.
pub const NEXT_STEP_PARAM: &str = "lmh_receptionist";
pub const NEXT_STEP_VALUE: &str = "checked";

/// Maps a content-page identifier to its public URL.
pub trait PermalinkResolver: Send + Sync {
    fn permalink(&self, post_id: Option<u64>) -> Url;
}

/// Plain `?p=<id>` permalinks rooted at the site URL.
#[derive(Clone, Debug)]
pub struct SitePermalinks {
    site: Url,
}

impl SitePermalinks {
    pub fn new(site: Url) -> Self {
        Self { site }
    }
}

impl PermalinkResolver for SitePermalinks {
    fn permalink(&self, post_id: Option<u64>) -> Url {
        let mut url = self.site.clone();
        if let Some(id) = post_id {
            url.query_pairs_mut().append_pair("p", &id.to_string());
        }
        url
    }
}

/// Permalink of `post_id` carrying the next-step marker.
pub fn next_step_url(permalinks: &dyn PermalinkResolver, post_id: Option<u64>) -> String {
    let mut url = permalinks.permalink(post_id);
    url.query_pairs_mut()
        .append_pair(NEXT_STEP_PARAM, NEXT_STEP_VALUE);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SitePermalinks {
        SitePermalinks::new(Url::parse("https://example.com/").unwrap())
    }

    #[test]
    fn permalink_uses_post_query() {
        assert_eq!(
            site().permalink(Some(42)).as_str(),
            "https://example.com/?p=42"
        );
    }

    #[test]
    fn next_step_url_appends_marker() {
        assert_eq!(
            next_step_url(&site(), Some(42)),
            "https://example.com/?p=42&lmh_receptionist=checked"
        );
    }

    #[test]
    fn next_step_url_without_post_targets_site_root() {
        assert_eq!(
            next_step_url(&site(), None),
            "https://example.com/?lmh_receptionist=checked"
        );
    }

    #[test]
    fn existing_query_is_preserved() {
        let permalinks =
            SitePermalinks::new(Url::parse("https://example.com/help?lang=en").unwrap());
        assert_eq!(
            next_step_url(&permalinks, Some(7)),
            "https://example.com/help?lang=en&p=7&lmh_receptionist=checked"
        );
    }
}
