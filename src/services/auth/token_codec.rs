//! Compact signed bearer tokens (JWS compact serialization, HS256).
//!
//! `header.payload.signature`, each segment base64url without padding.
//! The payload carries `sub`, `authorities` (comma-joined), `iat` and `exp`
//! as epoch seconds.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::auth::signing_key::SigningKey;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("authority {0:?} cannot be encoded (empty or contains ',')")]
    InvalidAuthority(String),
    #[error("validity duration overflows the expiry timestamp")]
    InvalidValidity,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Decoded, verified token content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    pub authorities: Vec<String>,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    authorities: String,
    iat: i64,
    exp: i64,
}

impl From<WireClaims> for Claims {
    fn from(wire: WireClaims) -> Self {
        Self {
            subject: wire.sub,
            authorities: wire
                .authorities
                .split(',')
                .filter(|a| !a.is_empty())
                .map(str::to_owned)
                .collect(),
            issued_at: wire.iat,
            expires_at: wire.exp,
        }
    }
}

/// The only component that touches the signing key.
///
/// Holds no mutable state, so a single instance behind an `Arc` serves every
/// concurrent request.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
    header: Header,
}

impl TokenCodec {
    pub fn new(key: SigningKey) -> Self {
        Self {
            key,
            header: Header::new(ALGORITHM),
        }
    }

    /// Sign a token valid from `issued_at` for `validity_seconds`.
    ///
    /// Deterministic: identical inputs produce the identical string.
    pub fn encode<S: AsRef<str>>(
        &self,
        subject: &str,
        authorities: &[S],
        issued_at: i64,
        validity_seconds: u64,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        if let Some(bad) = authorities
            .iter()
            .map(AsRef::as_ref)
            .find(|a| a.is_empty() || a.contains(','))
        {
            return Err(TokenError::InvalidAuthority(bad.to_owned()));
        }

        let expires_at = i64::try_from(validity_seconds)
            .ok()
            .and_then(|v| issued_at.checked_add(v))
            .ok_or(TokenError::InvalidValidity)?;

        let claims = WireClaims {
            sub: subject.to_owned(),
            authorities: authorities
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(","),
            iat: issued_at,
            exp: expires_at,
        };

        jsonwebtoken::encode(&self.header, &claims, self.key.encoding())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify and decode `token` as seen at epoch second `now`.
    ///
    /// Checks run in a fixed order: shape, signature, content, expiry. Nothing
    /// in the token is interpreted before its signature has been verified.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        // header + '.' + payload, borrowed from the original string.
        let message = &token[..header.len() + 1 + payload.len()];

        // The MAC is recomputed and compared in constant time by the crypto
        // backend. An undecodable signature segment is a signature failure too.
        match jsonwebtoken::crypto::verify(
            signature,
            message.as_bytes(),
            self.key.decoding(),
            ALGORITHM,
        ) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(TokenError::BadSignature),
        }

        let header: Header = decode_segment(header)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let wire: WireClaims = decode_segment(payload)?;
        if now >= wire.exp {
            return Err(TokenError::Expired);
        }

        Ok(wire.into())
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const B64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    fn codec() -> TokenCodec {
        TokenCodec::new(SigningKey::from_bytes(&[0x5a; 32]).unwrap())
    }

    fn admin_token(validity: u64) -> String {
        codec()
            .encode("alice", &["ROLE_ADMIN", "ROLE_USER"], NOW, validity)
            .unwrap()
    }

    // Flips the high bit of a base64url digit so the decoded bytes always change.
    fn flip(c: u8) -> u8 {
        let idx = B64URL.iter().position(|&a| a == c).unwrap();
        B64URL[idx ^ 0b10_0000]
    }

    #[test]
    fn round_trip_preserves_subject_and_authorities() {
        let claims = codec().decode_at(&admin_token(300), NOW + 10).unwrap();

        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.authorities, vec!["ROLE_ADMIN", "ROLE_USER"]);
        assert_eq!(claims.issued_at, NOW);
        assert_eq!(claims.expires_at, NOW + 300);
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(admin_token(300), admin_token(300));
    }

    #[test]
    fn empty_authorities_round_trip() {
        let codec = codec();
        let token = codec.encode::<&str>("bob", &[], NOW, 60).unwrap();
        let claims = codec.decode_at(&token, NOW).unwrap();
        assert!(claims.authorities.is_empty());
    }

    #[test]
    fn zero_validity_is_expired_immediately() {
        let token = admin_token(0);
        assert_eq!(codec().decode_at(&token, NOW), Err(TokenError::Expired));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let codec = codec();
        let token = admin_token(300);
        assert!(codec.decode_at(&token, NOW + 299).is_ok());
        assert_eq!(codec.decode_at(&token, NOW + 300), Err(TokenError::Expired));
    }

    #[test]
    fn every_flipped_signature_byte_is_detected() {
        let codec = codec();
        let token = admin_token(300);
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = flip(bytes[i]);
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                codec.decode_at(&tampered, NOW),
                Err(TokenError::BadSignature),
                "byte {i} not detected"
            );
        }
    }

    #[test]
    fn non_alphabet_signature_byte_is_bad_signature() {
        let mut token = admin_token(300);
        token.pop();
        token.push('*');
        assert_eq!(codec().decode_at(&token, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_payload_is_bad_signature() {
        let token = admin_token(300);
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = URL_SAFE_NO_PAD.encode(
            r#"{"sub":"mallory","authorities":"ROLE_ADMIN","iat":1700000000,"exp":1900000000}"#,
        );
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec().decode_at(&forged, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn foreign_key_is_bad_signature() {
        let foreign = TokenCodec::new(SigningKey::from_bytes(&[0x11; 32]).unwrap());
        let token = foreign.encode("alice", &["ROLE_ADMIN"], NOW, 300).unwrap();
        assert_eq!(codec().decode_at(&token, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let codec = codec();
        let valid = admin_token(300);
        let cases = [
            String::new(),
            "any".to_owned(),
            "a.b".to_owned(),
            "a.b.c.d".to_owned(),
            "....".to_owned(),
            format!("{valid}.extra"),
            valid.replacen('.', "", 1),
        ];

        for case in cases {
            assert_eq!(codec.decode_at(&case, NOW), Err(TokenError::Malformed), "{case:?}");
        }
    }

    #[test]
    fn signed_garbage_payload_is_malformed() {
        let codec = codec();
        let header = URL_SAFE_NO_PAD.encode(r#"{"typ":"JWT","alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode("not json");
        let message = format!("{header}.{payload}");
        let signature =
            jsonwebtoken::crypto::sign(message.as_bytes(), codec.key.encoding(), ALGORITHM)
                .unwrap();

        assert_eq!(
            codec.decode_at(&format!("{message}.{signature}"), NOW),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn payload_uses_documented_wire_keys() {
        let token = admin_token(300);
        let payload = token.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        assert_eq!(json["sub"], "alice");
        assert_eq!(json["authorities"], "ROLE_ADMIN,ROLE_USER");
        assert_eq!(json["iat"], NOW);
        assert_eq!(json["exp"], NOW + 300);

        let header = token.split('.').next().unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();
        assert_eq!(json["alg"], "HS256");
    }

    #[test]
    fn rejects_authorities_that_cannot_be_encoded() {
        let codec = codec();
        assert_eq!(
            codec.encode("alice", &["ROLE_A,ROLE_B"], NOW, 60),
            Err(TokenError::InvalidAuthority("ROLE_A,ROLE_B".to_owned()))
        );
        assert_eq!(
            codec.encode("alice", &[""], NOW, 60),
            Err(TokenError::InvalidAuthority(String::new()))
        );
    }

    #[test]
    fn rejects_empty_subject_and_overflowing_validity() {
        let codec = codec();
        assert_eq!(
            codec.encode("", &["ROLE_USER"], NOW, 60),
            Err(TokenError::EmptySubject)
        );
        assert_eq!(
            codec.encode("alice", &["ROLE_USER"], NOW, u64::MAX),
            Err(TokenError::InvalidValidity)
        );
    }

    #[test]
    fn is_valid_uses_wall_clock() {
        let codec = codec();
        let now = chrono::Utc::now().timestamp();
        let fresh = codec.encode("alice", &["ROLE_USER"], now, 300).unwrap();
        let stale = codec.encode("alice", &["ROLE_USER"], now - 600, 300).unwrap();

        assert!(codec.is_valid(&fresh));
        assert!(!codec.is_valid(&stale));
        assert!(!codec.is_valid("any"));
    }
}
