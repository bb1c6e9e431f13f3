use url::Url;

/// Extracts the lowercase host from a URL
///
/// ```
/// use url::Url;
/// use sewa_crawler::url::extract_domain;
///
/// let url = Url::parse("https://WWW.FazWaz.my/condo-for-rent").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.fazwaz.my".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// The set of hosts a crawl may follow links to
///
/// Built from the base URL: the host itself plus its bare form without a
/// leading `www.`. Each entry also admits its subdomains, so a portal that
/// serves images or paginates from `m.` or `www.` stays in bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedHosts {
    domains: Vec<String>,
}

impl AllowedHosts {
    /// Allowed hosts for a crawl rooted at `base`
    pub fn for_base(base: &Url) -> Self {
        let mut domains = Vec::new();
        if let Some(host) = extract_domain(base) {
            if let Some(bare) = host.strip_prefix("www.") {
                domains.push(bare.to_string());
            }
            domains.push(host);
        }
        Self { domains }
    }

    /// Returns true if `host` is one of the allowed domains or a subdomain
    pub fn contains(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.domains
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
    }

    /// Returns true if the URL's host is allowed
    pub fn allows(&self, url: &Url) -> bool {
        extract_domain(url)
            .map(|host| self.contains(&host))
            .unwrap_or(false)
    }

    /// The configured domains
    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}
