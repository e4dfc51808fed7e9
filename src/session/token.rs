use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::core::error::{DecodeError, EncodeError};
use crate::session::permission::Permissions;
use crate::types::user::User;

pub(crate) const TOKEN_LIFETIME: Duration = Duration::hours(24);

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionPayload {
    pub(crate) user: User,
    pub(crate) permissions: Permissions,
    pub(crate) access_token: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub(crate) struct Claims {
    #[serde(flatten)]
    pub(crate) payload: SessionPayload,
    pub(crate) iat: usize,
    pub(crate) exp: usize,
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub(crate) struct TokenCodec {
    keys: Option<Keys>,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("has_secret", &self.keys.is_some())
            .finish()
    }
}

impl TokenCodec {
    pub(crate) fn new(secret: &str) -> Self {
        let keys = (!secret.is_empty()).then(|| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        // expiry is checked against an explicit clock in `decode_at`
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self { keys, validation }
    }

    pub(crate) fn encode(&self, payload: &SessionPayload) -> Result<String, EncodeError> {
        self.encode_at(payload, Utc::now())
    }

    pub(crate) fn encode_at(
        &self,
        payload: &SessionPayload,
        issued_at: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        let keys = self.keys.as_ref().ok_or(EncodeError::MissingSecret)?;

        let expiration_time = issued_at + TOKEN_LIFETIME;

        let claims = Claims {
            payload: payload.clone(),
            iat: issued_at.timestamp() as usize,
            exp: expiration_time.timestamp() as usize,
        };

        Ok(jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            &claims,
            &keys.encoding,
        )?)
    }

    pub(crate) fn decode(&self, token: &str) -> Result<SessionPayload, DecodeError> {
        self.decode_at(token, Utc::now())
    }

    pub(crate) fn decode_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionPayload, DecodeError> {
        let keys = self.keys.as_ref().ok_or(DecodeError::MissingSecret)?;

        let token_data = jsonwebtoken::decode::<Claims>(token, &keys.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
                ErrorKind::ExpiredSignature => DecodeError::Expired,
                _ => DecodeError::Malformed,
            })?;

        if now.timestamp() > token_data.claims.exp as i64 {
            return Err(DecodeError::Expired);
        }

        Ok(token_data.claims.payload)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::session::permission::Permission;
    use serde_json::json;

    pub(crate) fn payload(user_type: &str, worker_type: Option<&str>) -> SessionPayload {
        let user: User = serde_json::from_value(json!({
            "id": 7,
            "userType": user_type,
            "workerType": worker_type,
            "email": "someone@garage.test"
        }))
        .unwrap();

        SessionPayload {
            permissions: Permissions::derive(&user.user_type, user.worker_type.as_deref()),
            user,
            access_token: "backend-bearer".into(),
        }
    }

    #[test]
    fn test_round_trip() {
        let codec = TokenCodec::new("test-secret");
        let payload = payload("WORKER", Some("RECEPTIONIST"));

        let token = codec.encode(&payload).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded, payload);
        assert!(decoded.permissions.contains(Permission::Receptionist));
        assert_eq!(decoded.access_token, "backend-bearer");
    }

    #[test]
    fn test_embeds_24_hour_expiry() {
        let codec = TokenCodec::new("test-secret");
        let issued_at = Utc::now();
        let token = codec.encode_at(&payload("CLIENT", None), issued_at).unwrap();

        let claims = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &codec.validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.iat, issued_at.timestamp() as usize);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_after_24_hours() {
        let codec = TokenCodec::new("test-secret");
        let issued_at = Utc::now();
        let token = codec.encode_at(&payload("CLIENT", None), issued_at).unwrap();

        assert!(
            codec
                .decode_at(&token, issued_at + TOKEN_LIFETIME)
                .is_ok()
        );
        assert_eq!(
            codec.decode_at(&token, issued_at + TOKEN_LIFETIME + Duration::seconds(1)),
            Err(DecodeError::Expired)
        );
    }

    #[test]
    fn test_expired_against_wall_clock() {
        let codec = TokenCodec::new("test-secret");
        let issued_at = Utc::now() - TOKEN_LIFETIME - Duration::seconds(1);
        let token = codec.encode_at(&payload("CLIENT", None), issued_at).unwrap();

        assert_eq!(codec.decode(&token), Err(DecodeError::Expired));
    }

    #[test]
    fn test_flipped_byte_is_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec.encode(&payload("ADMIN", None)).unwrap();

        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            if tampered == token {
                continue;
            }

            assert!(
                codec.decode(&tampered).is_err(),
                "tampered byte {index} was accepted"
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenCodec::new("one-secret")
            .encode(&payload("ADMIN", None))
            .unwrap();

        assert_eq!(
            TokenCodec::new("another-secret").decode(&token),
            Err(DecodeError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::new("test-secret");

        assert_eq!(codec.decode("not-a-token"), Err(DecodeError::Malformed));
        assert_eq!(codec.decode(""), Err(DecodeError::Malformed));
    }

    #[test]
    fn test_missing_secret() {
        let codec = TokenCodec::new("");

        assert!(matches!(
            codec.encode(&payload("CLIENT", None)),
            Err(EncodeError::MissingSecret)
        ));
        assert_eq!(codec.decode("a.b.c"), Err(DecodeError::MissingSecret));
    }
}
