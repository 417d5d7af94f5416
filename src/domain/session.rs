//! Size accounting for values kept in the cookie session.

use serde::Serialize;

/// Longest cookie value browsers and the session store accept.
pub const SESSION_COOKIE_LIMIT: usize = 4064;

/// Room left for the identity entries written by the SSO login.
pub const IDENTITY_ALLOWANCE: usize = 800;

/// Largest seller draft, as stored in the session state.
pub const MAX_DRAFT_STORED_LEN: usize = 1400;

/// AES-GCM nonce and tag added by the private cookie jar.
const ENCRYPTION_OVERHEAD: usize = 28;

/// Bytes a value takes inside the session state. Every value is serialized
/// to JSON and the state map is then serialized again, escaping quotes.
pub fn stored_len<T: Serialize>(value: &T) -> usize {
    serde_json::to_string(value)
        .and_then(|json| serde_json::to_string(&json))
        .map(|encoded| encoded.len())
        .unwrap_or(usize::MAX)
}

/// Length of the encrypted, base64 encoded cookie carrying `state_len`
/// bytes of serialized state.
pub fn cookie_len(state_len: usize) -> usize {
    (state_len + ENCRYPTION_OVERHEAD).div_ceil(3) * 4
}
