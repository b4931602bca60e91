use hmac::{Hmac, Mac};
use sha2::Sha256;

/// §4.9: `HMAC-SHA256` of the raw body using the webhook's secret,
/// hex-encoded, carried in `X-Form-Signature`.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts a key of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
