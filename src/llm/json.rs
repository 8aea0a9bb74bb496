//! Locating structured data in free-text model replies.

use serde_json::{Map, Value};

/// Start positions tried before giving up on a reply.
const MAX_ATTEMPTS: usize = 32;

/// Find the first well-formed JSON object in `text`.
///
/// Models often wrap JSON in prose or code fences. Each `{` is tried as a
/// start position, up to [`MAX_ATTEMPTS`], and the first one that decodes as
/// a complete object wins; trailing text after the object is ignored.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .take(MAX_ATTEMPTS)
        .find_map(|(start, _)| {
            let mut stream =
                serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(Value::Object(map))) => Some(map),
                _ => None,
            }
        })
}
