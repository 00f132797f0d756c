use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ServiceError, classify},
    models::Identity,
};

/// Lifetime of every issued credential, in seconds.
pub const TOKEN_VALIDITY_SECS: i64 = 60 * 60;

/// Claims
///
/// The payload signed into every credential token: the caller identity plus
/// issue and expiry timestamps (seconds since the epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub fullname: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            fullname: claims.fullname,
            is_admin: claims.is_admin,
        }
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// CredentialIssuer
///
/// Issues and verifies HS256-signed tokens with the secret loaded once at
/// startup. Cloning is cheap and shares the keys.
#[derive(Clone)]
pub struct CredentialIssuer {
    keys: Arc<Keys>,
    validation: Arc<Validation>,
}

impl CredentialIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact: a token is dead the second its hour is up.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            validation: Arc::new(validation),
        }
    }

    /// issue
    ///
    /// Signs `identity` into a token valid for one hour from now.
    pub fn issue(&self, identity: &Identity) -> Result<String, ServiceError> {
        self.issue_at(identity, Utc::now())
    }

    /// Same as `issue` with an explicit issue time.
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let claims = Claims {
            user_id: identity.user_id,
            fullname: identity.fullname.clone(),
            is_admin: identity.is_admin,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_VALIDITY_SECS)).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)?)
    }

    /// verify
    ///
    /// Returns the embedded identity when `token` is well-formed, signed with our
    /// secret and not expired. Every other case is `ServiceError::Unauthorized`.
    pub fn verify(&self, token: Option<&str>) -> Result<Identity, ServiceError> {
        let token = token.ok_or_else(|| ServiceError::Unauthorized("Token missing".to_string()))?;

        match decode::<Claims>(token, &self.keys.decoding, &self.validation) {
            Ok(data) => Ok(data.claims.into()),
            Err(err) => {
                let message = match err.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    _ => "Token invalid",
                };
                tracing::debug!("credential rejected: {err}");
                Err(ServiceError::Unauthorized(message.to_string()))
            }
        }
    }
}

/// extract_token
///
/// Returns the second whitespace-separated segment of a bearer-style
/// authorization header, or `None` when there is no header or no second segment.
pub fn extract_token(header_value: Option<&str>) -> Option<&str> {
    header_value?.split_whitespace().nth(1)
}

/// AuthUser Extractor Result
///
/// The verified identity of an authenticated request. Handlers take it as an
/// argument; if it cannot be built the request is rejected with 401 before the
/// handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    CredentialIssuer: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let issuer = CredentialIssuer::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        issuer
            .verify(extract_token(header_value))
            .map(AuthUser)
            .map_err(|err| classify(err, "Error while authenticating the request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::from_u128(7),
            fullname: "Ada Lovelace".to_string(),
            is_admin: true,
        }
    }

    fn assert_unauthorized(result: Result<Identity, ServiceError>) {
        assert!(
            matches!(result, Err(ServiceError::Unauthorized(_))),
            "expected Unauthorized, got {result:?}"
        );
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let issuer = CredentialIssuer::new(SECRET);
        let token = issuer.issue(&identity()).unwrap();

        assert_eq!(issuer.verify(Some(&token)).unwrap(), identity());
    }

    #[test]
    fn token_expires_after_one_hour() {
        let issuer = CredentialIssuer::new(SECRET);

        let fresh = issuer
            .issue_at(&identity(), Utc::now() - Duration::minutes(59))
            .unwrap();
        assert!(issuer.verify(Some(&fresh)).is_ok());

        let stale = issuer
            .issue_at(&identity(), Utc::now() - Duration::minutes(61))
            .unwrap();
        assert_unauthorized(issuer.verify(Some(&stale)));
    }

    #[test]
    fn any_tampered_byte_is_rejected() {
        let issuer = CredentialIssuer::new(SECRET);
        let token = issuer.issue(&identity()).unwrap();

        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            assert_unauthorized(issuer.verify(Some(&tampered)));
        }
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = CredentialIssuer::new("another-secret")
            .issue(&identity())
            .unwrap();

        assert_unauthorized(CredentialIssuer::new(SECRET).verify(Some(&token)));
    }

    #[test]
    fn missing_and_malformed_tokens_are_rejected() {
        let issuer = CredentialIssuer::new(SECRET);

        assert_unauthorized(issuer.verify(None));
        assert_unauthorized(issuer.verify(Some("")));
        assert_unauthorized(issuer.verify(Some("not.a.jwt")));
    }

    #[test]
    fn extract_token_takes_second_segment() {
        assert_eq!(extract_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_token(Some("Bearer")), None);
        assert_eq!(extract_token(Some("Bearer ")), None);
        // Runs of whitespace count as one separator.
        assert_eq!(extract_token(Some("Bearer  abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_token(Some("")), None);
        assert_eq!(extract_token(None), None);
    }
}
