use url::Url;

/// Canonical form used as the crawl-visited key: `scheme://host/path` with a
/// leading `www.` dropped from the host, trailing slashes dropped from the
/// path, and query, fragment and port discarded.
///
/// Input that cannot be parsed or has no host comes back unchanged.
pub fn normalize_url(raw: &str) -> String {
    let parsed = if raw.starts_with("//") {
        // protocol-relative, assume https
        Url::parse(&format!("https:{}", raw))
    } else {
        Url::parse(raw)
    };

    let Ok(url) = parsed else {
        return raw.to_string();
    };
    let Some(host) = url.host_str() else {
        return raw.to_string();
    };

    let host = strip_www(host);
    let path = url.path().trim_end_matches('/');

    format!("{}://{}{}", url.scheme(), host, path)
}

/// Bare host of `url`, the vertex identity in the domain graph.
pub fn domain_of(url: &Url) -> Option<String> {
    url.host_str().map(str::to_string)
}

fn strip_www(host: &str) -> &str {
    let mut stripped = host;
    while let Some(rest) = stripped.strip_prefix("www.") {
        if rest.is_empty() {
            break;
        }
        stripped = rest;
    }
    stripped
}
