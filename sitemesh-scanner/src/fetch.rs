use crate::error::{Result, ScanError};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_USER_AGENT: &str = concat!("sitemesh/", env!("CARGO_PKG_VERSION"));

/// Source of page bodies for the crawler.
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetches `url` and returns its HTML.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches pages over HTTP(S) with a fixed per-request timeout.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT)
    }

    pub fn with_options(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send {
        let request = self.client.get(url.clone());
        let url = url.to_string();

        async move {
            debug!("Fetching {}", url);
            let response = request.send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScanError::HttpStatus {
                    url,
                    status: status.as_u16(),
                });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_ascii_lowercase());

            if let Some(content_type) = content_type
                && !is_markup(&content_type)
            {
                return Err(ScanError::UnsupportedContent { url, content_type });
            }

            Ok(response.text().await?)
        }
    }
}

fn is_markup(content_type: &str) -> bool {
    content_type.contains("html") || content_type.contains("xml") || content_type.starts_with("text/")
}

/// Collects outbound link targets from `a[href]`, `link[href]` and
/// `<meta http-equiv="refresh">` elements, resolved against `base`.
///
/// Targets that cannot be resolved are skipped one by one; the rest of the
/// page is still scanned.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("a[href], link[href], meta[http-equiv]").expect("static link selector");

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let element = element.value();

        let target = match element.name() {
            "meta" => {
                let is_refresh = element
                    .attr("http-equiv")
                    .is_some_and(|v| v.trim().eq_ignore_ascii_case("refresh"));
                if !is_refresh {
                    continue;
                }
                element.attr("content").and_then(refresh_target)
            }
            _ => element.attr("href"),
        };

        let Some(target) = target else {
            continue;
        };

        match base.join(target) {
            Ok(resolved) => links.push(resolved),
            Err(e) => debug!("Skipping unresolvable link {:?} on {}: {}", target, base, e),
        }
    }

    links
}

/// `5; URL='/next'` -> `/next`
fn refresh_target(content: &str) -> Option<&str> {
    let idx = content.to_ascii_lowercase().find("url=")?;
    let target = content[idx + 4..]
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    Some(target)
}
