use base64::{prelude::BASE64_URL_SAFE, Engine};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake128,
};

/// Canonical form of an email for challenge keys and identity derivation.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Derive the stable pseudo-identity for a guest from their verified email.
/// Deterministic: the same email always maps to the same identity, so a
/// returning guest is recognized without a persisted account.
pub fn guest_identity(email: &str) -> String {
    let mut hasher = Shake128::default();
    hasher.update(normalize_email(email).as_bytes());
    let mut reader = hasher.finalize_xof();
    let mut buf = [0u8; 12];
    reader.read(&mut buf);
    let suffix = BASE64_URL_SAFE.encode(buf);
    format!("guest_{}", suffix)
}

/// Human-readable label for a guest, taken from the email's local part.
pub fn guest_display_name(email: &str) -> String {
    let normalized = normalize_email(email);
    normalized
        .split('@')
        .next()
        .unwrap_or(normalized.as_str())
        .to_string()
}
