//! Reqwest-backed adapters for the outbound HTTP ports.

mod reference_source;
mod relay;

pub use reference_source::ReqwestReferenceSource;
pub use relay::ReqwestHttpRelay;

/// Collapse whitespace and cap an upstream body for error messages.
fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
