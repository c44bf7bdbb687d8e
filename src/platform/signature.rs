//! HMAC-SHA256 request signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 signature of a request body.
///
/// The receiving side verifies against the exact transmitted bytes, so
/// callers must sign the same string they put on the wire.
pub fn sign_body(secret: &str, body: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
