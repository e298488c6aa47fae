//! Account token secrets

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};

/// Bytes of entropy in a generated secret
const SECRET_BYTES: usize = 32;

/// Generate an unguessable, URL-safe token secret
#[must_use]
pub fn generate_token_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
