//! Canonical URLs the router and editor hand out.

use hashpad_types::ContentHash;

/// Editor page served from the static asset directory.
pub const EDITOR_PAGE: &str = "/editor.html";

/// Document opened when a request carries no hash.
pub const DEFAULT_DOCUMENT: &str = "/homepage.md";

/// `/download/<hex>.<ext>`
pub fn download_path(hash: &ContentHash, ext: &str) -> String {
    format!("/download/{}.{ext}", hash.to_hex())
}

/// Download extension for a stored content type: `html` for pages,
/// `md` for everything else.
pub fn extension_for(content_type: &str) -> &'static str {
    if content_type.starts_with("text/html") {
        "html"
    } else {
        "md"
    }
}

/// Editor view for `document`.
///
/// The reference goes into the query unencoded; the paths produced here only
/// contain `/`, `.` and alphanumerics.
pub fn editor_url(document: &str) -> String {
    format!("{EDITOR_PAGE}?document={document}")
}
