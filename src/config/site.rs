//! Hosted site configuration.
//!
//! Everything the shell knows about the mobile site it embeds: where it lives,
//! which elements it touches and how often it pokes the page. The defaults
//! describe Twitter mobile; a `site` object in the settings store replaces
//! them field by field.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{OptionExt, ShellError, ShellResult};

/// Site the shell is pinned to, plus the markup conventions it relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Entry URL loaded at startup.
    pub url: String,

    /// Same-host paths with this prefix are never followed.
    pub ignored_path_prefix: String,

    /// Path suffix of the compose-reply view; forces the tweet box visible.
    pub compose_reply_suffix: String,

    /// Selector of the tweet compose box.
    pub tweet_box_selector: String,

    /// Selector of the page's own "update" button.
    pub update_button_selector: String,

    /// Class hidden by the injected stylesheet once a page has loaded.
    pub hidden_element_class: String,

    /// Page global controlling the page's refresh cadence, as `object.field`.
    pub refresh_variable: String,

    /// Value written into `refresh_variable`, in seconds.
    pub refresh_interval_secs: u64,

    /// Period of the poke timer, in seconds.
    pub poke_interval_secs: u64,

    /// Delay before reloading after a failed load, in seconds.
    pub retry_delay_secs: u64,

    /// Zoom factor used when none has been persisted yet.
    pub default_zoom: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://mobile.twitter.com/session".to_string(),
            ignored_path_prefix: "/settings/change_ui".to_string(),
            compose_reply_suffix: "compose_reply".to_string(),
            tweet_box_selector: "div[class=tweetbox]".to_string(),
            update_button_selector: "a[class=update]".to_string(),
            hidden_element_class: "timeline-refresh".to_string(),
            refresh_variable: "Tweets.REFRESH_TIME".to_string(),
            refresh_interval_secs: 60,
            poke_interval_secs: 10,
            retry_delay_secs: 10,
            default_zoom: 0.7,
        }
    }
}

impl SiteConfig {
    /// Check that the configuration can drive the shell.
    pub fn validate(&self) -> ShellResult<()> {
        self.entry_url()?;
        self.refresh_target()?;

        if self.poke_interval_secs == 0 || self.retry_delay_secs == 0 {
            return Err(ShellError::Other(
                "poke and retry intervals must be non-zero".to_string(),
            ));
        }
        if self.default_zoom.is_nan() || self.default_zoom <= 0.0 {
            return Err(ShellError::Other(format!(
                "default zoom must be positive, got {}",
                self.default_zoom
            )));
        }
        Ok(())
    }

    /// Parsed entry URL. Only http(s) URLs with a host are accepted.
    pub fn entry_url(&self) -> ShellResult<Url> {
        let url = Url::parse(&self.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ShellError::Other(format!(
                "site url must be http(s): {}",
                self.url
            )));
        }
        url.host_str().context("site url has no host")?;
        Ok(url)
    }

    /// Host every in-app navigation must stay on.
    pub fn site_host(&self) -> ShellResult<String> {
        let url = self.entry_url()?;
        url.host_str()
            .map(str::to_string)
            .context("site url has no host")
    }

    /// `refresh_variable` split into its object and field names.
    pub fn refresh_target(&self) -> ShellResult<(&str, &str)> {
        match self.refresh_variable.split_once('.') {
            Some((object, field))
                if !object.is_empty() && !field.is_empty() && !field.contains('.') =>
            {
                Ok((object, field))
            },
            _ => Err(ShellError::Other(format!(
                "refresh variable must look like object.field: {}",
                self.refresh_variable
            ))),
        }
    }

    /// Refresh interval as the page expects it (milliseconds).
    pub fn refresh_interval_millis(&self) -> i64 {
        (self.refresh_interval_secs as i64).saturating_mul(1000)
    }

    pub fn poke_interval(&self) -> Duration {
        Duration::from_secs(self.poke_interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SiteConfig::default();
        config.validate().unwrap();

        assert_eq!(config.site_host().unwrap(), "mobile.twitter.com");
        assert_eq!(config.refresh_interval_millis(), 60_000);
        assert_eq!(config.poke_interval(), Duration::from_secs(10));
        assert_eq!(config.retry_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_refresh_target_split() {
        let config = SiteConfig::default();
        assert_eq!(config.refresh_target().unwrap(), ("Tweets", "REFRESH_TIME"));

        let bad = SiteConfig {
            refresh_variable: "REFRESH_TIME".to_string(),
            ..SiteConfig::default()
        };
        assert!(bad.refresh_target().is_err());

        let nested = SiteConfig {
            refresh_variable: "a.b.c".to_string(),
            ..SiteConfig::default()
        };
        assert!(nested.validate().is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let config = SiteConfig {
            url: "file:///tmp/index.html".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_intervals() {
        let config = SiteConfig {
            poke_interval_secs: 0,
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{ "url": "https://m.example.org/home", "retryDelaySecs": 30 }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.site_host().unwrap(), "m.example.org");
        assert_eq!(config.retry_delay(), Duration::from_secs(30));
        assert_eq!(config.poke_interval_secs, 10);
        assert_eq!(config.tweet_box_selector, "div[class=tweetbox]");
    }
}
