use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, trace};

/// Image formats in order of preference.
pub const FORMATS: [&str; 5] = [".webp", ".png", ".jpg", ".jpeg", ".svg"];

/// Checks whether an image can be loaded from a URL.
pub trait ImageProbe {
    async fn probe(&self, url: &str) -> bool;
}

impl ImageProbe for reqwest::Client {
    async fn probe(&self, url: &str) -> bool {
        let resp = match self.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                trace!("Probe of {} failed: {}", url, e);
                return false;
            }
        };
        if !resp.status().is_success() {
            trace!("Probe of {} answered {}", url, resp.status());
            return false;
        }
        // Servers that omit the header still get the benefit of the doubt.
        resp.headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|ct| ct.starts_with("image/"))
    }
}

/// First `{base}{format}` that loads, trying one format at a time in preference order.
#[tracing::instrument(name = "Probing thumbnail formats", level = "info", skip(probe))]
pub async fn resolve_thumbnail<P: ImageProbe>(probe: &P, base: &str) -> Option<String> {
    for format in FORMATS {
        let candidate = format!("{base}{format}");
        if probe.probe(&candidate).await {
            info!("Using {}", candidate);
            return Some(candidate);
        }
        debug!("{} is not available", candidate);
    }
    None
}

/// The `src` a thumbnail should end up with: the preferred format, or `default` when none load.
pub async fn thumbnail_src<P: ImageProbe>(probe: &P, base: &str, default: &str) -> String {
    resolve_thumbnail(probe, base)
        .await
        .unwrap_or_else(|| default.to_string())
}
