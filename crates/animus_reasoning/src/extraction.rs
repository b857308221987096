//! Lenient parsing of a capability's text reply into a [`GenerativeResponse`].
//!
//! Providers that only return text (chat-style backends) wrap the structured
//! part in prose or a code fence more often than not.

use crate::llm::GenerativeResponse;
use animus_core::AnimusError;

/// Parse `text`, handling common formatting quirks:
///
/// 1. the whole reply is the JSON object
/// 2. the object is embedded in prose or a fenced block (first `{` to last `}`)
/// 3. a reply with no brace block at all is freeform text with no updates
///
/// A brace block that does not deserialize is a structural failure, never
/// prose.
pub fn parse_response(text: &str) -> Result<GenerativeResponse, AnimusError> {
    let trimmed = text.trim();

    if let Ok(resp) = serde_json::from_str::<GenerativeResponse>(trimmed) {
        return Ok(resp);
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => serde_json::from_str::<GenerativeResponse>(&trimmed[start..=end])
            .map_err(|e| AnimusError::InvalidResponse {
                errors: vec![format!("malformed structured block: {}", e)],
            }),
        _ => {
            tracing::debug!("reply carried no structured block, treating as prose");
            Ok(GenerativeResponse::text(trimmed))
        }
    }
}
