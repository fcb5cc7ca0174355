/// Stable reference paths served by the conversion server.
const PREVIEW_PREFIX: &str = "/static/uploads/output/";
const DOWNLOAD_PREFIX: &str = "/download/";

/// Projection of [`crate::AppState`] for rendering. Rebuilt on every update,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub progress_visible: bool,
    pub percent: u8,
    pub status_line: String,
    pub stop_visible: bool,
    pub notice: Option<String>,
    pub gallery: Vec<GalleryRowView>,
}

/// One generated GIF with its preview and download references, relative to
/// the server base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRowView {
    pub artifact: String,
    pub preview_href: String,
    pub download_href: String,
}

impl GalleryRowView {
    pub(crate) fn for_artifact(name: &str) -> Self {
        Self {
            artifact: name.to_string(),
            preview_href: format!("{PREVIEW_PREFIX}{name}"),
            download_href: format!("{DOWNLOAD_PREFIX}{name}"),
        }
    }
}
