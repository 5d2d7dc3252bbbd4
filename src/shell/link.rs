//! Link navigation policy.

use url::Url;

use crate::config::SiteConfig;
use crate::error::ShellResult;

/// What to do with a navigation the page asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Stay in the view and let the page move itself.
    Follow,
    /// Swallow the navigation.
    Ignore,
    /// Hand the URL to the desktop's default handler.
    OpenExternal,
}

impl LinkDecision {
    /// Whether the webview may carry out the navigation itself.
    pub fn allows_in_view(self) -> bool {
        matches!(self, LinkDecision::Follow)
    }
}

/// Same-host links are followed unless they hit the ignored prefix, other
/// web hosts go to the desktop. Non-web schemes (`about:`, `data:`) stay in
/// the view.
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    site_host: String,
    ignored_path_prefix: String,
}

impl LinkPolicy {
    pub fn new(site: &SiteConfig) -> ShellResult<Self> {
        Ok(Self {
            site_host: site.site_host()?,
            ignored_path_prefix: site.ignored_path_prefix.clone(),
        })
    }

    pub fn decide(&self, url: &Url) -> LinkDecision {
        if !matches!(url.scheme(), "http" | "https") {
            return LinkDecision::Follow;
        }

        match url.host_str() {
            Some(host) if host.eq_ignore_ascii_case(&self.site_host) => {
                if !self.ignored_path_prefix.is_empty()
                    && url.path().starts_with(&self.ignored_path_prefix)
                {
                    LinkDecision::Ignore
                } else {
                    LinkDecision::Follow
                }
            },
            _ => LinkDecision::OpenExternal,
        }
    }
}
