use std::time::Duration;

use time::OffsetDateTime;

pub const SESSION_COOKIE: &str = "billflow_session";

const KEY_CONTEXT: &str = "billflow 2024-05 session cookie signing key";

/// 9999-12-31T23:59:59Z, the last instant `OffsetDateTime` can hold.
const MAX_EXPIRY_UNIX: i64 = 253_402_300_799;

/// Issues and verifies session tokens of the form `<expires_unix>.<mac>`.
///
/// The MAC is a keyed BLAKE3 hash of the expiry timestamp, with the key
/// derived from the configured session secret.
pub struct SessionKeys {
    key: [u8; 32],
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Expiry is capped at `MAX_EXPIRY_UNIX` so an oversized TTL still
    /// yields a token that verifies.
    pub fn issue(&self, now: OffsetDateTime) -> String {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = now.unix_timestamp().saturating_add(ttl).min(MAX_EXPIRY_UNIX);
        format!("{expires}.{}", self.sign(expires).to_hex())
    }

    /// Expiry of a valid, unexpired token.
    pub fn verify(&self, token: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let (expires, mac) = token.split_once('.')?;
        let expires: i64 = expires.parse().ok()?;
        let mac = blake3::Hash::from_hex(mac).ok()?;

        // blake3::Hash equality is constant-time.
        if mac != self.sign(expires) || expires <= now.unix_timestamp() {
            return None;
        }
        OffsetDateTime::from_unix_timestamp(expires).ok()
    }

    fn sign(&self, expires: i64) -> blake3::Hash {
        blake3::keyed_hash(&self.key, expires.to_string().as_bytes())
    }

    pub fn set_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.ttl.as_secs()
        )
    }

    pub fn clear_cookie() -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Compare digests so the check does not leak the password length or a
/// matching prefix through timing.
pub fn password_matches(expected: &str, given: &str) -> bool {
    blake3::hash(expected.as_bytes()) == blake3::hash(given.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret", Duration::from_secs(3600))
    }

    #[test]
    fn issued_token_verifies_until_expiry() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let token = keys().issue(now);

        assert_eq!(keys().verify(&token, now), Some(datetime!(2024-05-01 13:00 UTC)));
        assert!(keys().verify(&token, datetime!(2024-05-01 12:59:59 UTC)).is_some());
        assert_eq!(keys().verify(&token, datetime!(2024-05-01 13:00 UTC)), None);
    }

    #[test]
    fn oversized_ttl_expires_at_end_of_representable_time() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let keys = SessionKeys::new("test-secret", Duration::from_secs(u64::MAX));
        let token = keys.issue(now);

        assert!(token.starts_with("253402300799."));
        assert_eq!(keys.verify(&token, now), Some(datetime!(9999-12-31 23:59:59 UTC)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let other = SessionKeys::new("another-secret", Duration::from_secs(3600));
        assert_eq!(keys().verify(&other.issue(now), now), None);
    }

    #[test]
    fn tampered_expiry_is_rejected() {
        let now = datetime!(2024-05-01 12:00 UTC);
        let token = keys().issue(now);
        let (_, mac) = token.split_once('.').unwrap();
        let forged = format!("{}.{mac}", now.unix_timestamp() + 86_400 * 365);
        assert_eq!(keys().verify(&forged, now), None);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let now = datetime!(2024-05-01 12:00 UTC);
        for token in ["", "abc", "123.", ".deadbeef", "1714564800.nothex"] {
            assert_eq!(keys().verify(token, now), None, "accepted {token:?}");
        }
    }

    #[test]
    fn password_comparison() {
        assert!(password_matches("hunter2", "hunter2"));
        assert!(!password_matches("hunter2", "hunter"));
        assert!(!password_matches("hunter2", ""));
    }
}
