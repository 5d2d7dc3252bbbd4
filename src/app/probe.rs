//! Load outcome probe.
//!
//! The webview reports when a page finished loading but not whether it
//! loaded. A finished load counts as successful when the same URL answers an
//! HTTP request; any status code will do, only transport failures count.

use std::time::Duration;

use url::Url;

/// Give up on the probe after this long.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn is_reachable(url: Url) -> bool {
    let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            // Without a client there is nothing to judge by; trust the webview.
            log::warn!("[PROBE] Could not build HTTP client: {}", e);
            return true;
        },
    };

    match client.head(url.clone()).send().await {
        Ok(response) => {
            log::debug!("[PROBE] {} answered {}", url, response.status());
            true
        },
        Err(e) => {
            log::debug!("[PROBE] {} unreachable: {}", url, e);
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    #[tokio::test]
    async fn test_any_http_status_counts_as_success() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                );
            }
        });

        let url = Url::parse(&format!("http://127.0.0.1:{}/session", port)).unwrap();
        assert!(is_reachable(url).await);
    }

    #[tokio::test]
    async fn test_refused_connection_is_failure() {
        // Bind then drop to get a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        assert!(!is_reachable(url).await);
    }
}
