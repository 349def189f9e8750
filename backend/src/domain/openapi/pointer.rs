//! JSON pointer helpers shared by validation and dereferencing.

use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Decode one pointer segment, handling `~1`, `~0` and percent escapes.
pub(crate) fn decode_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}

/// Escape a key so it can be appended to a pointer.
pub(crate) fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Append an object key or array index to a pointer.
pub(crate) fn join(pointer: &str, segment: &str) -> String {
    format!("{pointer}/{}", escape_segment(segment))
}

/// Resolve a URI fragment such as `/components/schemas/Pet` against `root`.
///
/// The empty fragment addresses the whole document. Fragments that do not
/// start with `/` never resolve.
pub(crate) fn resolve<'a>(root: &'a Value, fragment: &str) -> Option<&'a Value> {
    if fragment.is_empty() {
        return Some(root);
    }
    let rest = fragment.strip_prefix('/')?;
    rest.split('/').try_fold(root, |node, raw| {
        let segment = decode_segment(raw);
        match node {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}
