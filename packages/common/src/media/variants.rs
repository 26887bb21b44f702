use serde::Serialize;

/// Presentation-size URLs derived from an asset's base URL.
///
/// Variants are computed by URL transformation (resize parameters in
/// the query string), never stored as separate objects. The media host
/// or its CDN layer is expected to interpret them.
#[derive(Debug, Clone, Serialize)]
pub struct RenderVariants {
    /// 300x300 cover crop.
    pub thumbnail: String,
    /// Max width 800, scaled down only.
    pub medium: String,
    /// Max width 1920, scaled down only.
    pub large: String,
}

impl RenderVariants {
    pub fn for_url(url: &str) -> Self {
        Self {
            thumbnail: with_params(url, "width=300&height=300&fit=cover"),
            medium: with_params(url, "width=800&fit=scale-down"),
            large: with_params(url, "width=1920&fit=scale-down"),
        }
    }
}

fn with_params(url: &str, params: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{params}")
}
