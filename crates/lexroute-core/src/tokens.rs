//! Token estimation heuristics
//!
//! Providers bill in their own token units. When a count is needed before
//! a call is made (routing, context-window checks) or a backend omits
//! usage data, we fall back to the character-length heuristic used across
//! the industry: roughly four characters per token.

/// Approximate characters per billed token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a piece of text.
///
/// Rounds up so short non-empty strings never estimate to zero.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    chars.div_ceil(CHARS_PER_TOKEN) as u32
}
