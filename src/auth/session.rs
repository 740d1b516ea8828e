//! Session management for authentication

use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use url::Url;

use super::User;
use crate::error::{Error, Result};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Session data, as returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,

    pub refresh_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Lifetime in seconds at issue time
    pub expires_in: i64,

    /// Unix timestamp the access token expires at
    #[serde(default)]
    pub expires_at: Option<i64>,

    pub user: User,
}

impl Session {
    /// Fill `expires_at` from `expires_in` when the server left it out
    pub fn with_expiry(mut self) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(Utc::now().timestamp() + self.expires_in);
        }
        self
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

/// Claims read from an access token
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Read the claims of an access token without verifying its signature.
///
/// The signing secret never reaches the client; the token is verified by the
/// auth service on the next call that carries it.
pub fn decode_claims(token: &str) -> Result<AccessTokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<AccessTokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Tokens handed back on the OAuth redirect
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Parse an OAuth callback URL (`/oauth/kakao#access_token=...`).
///
/// Tokens arrive in the fragment; provider errors arrive in either the
/// fragment or the query string.
pub fn parse_callback(callback_url: &str) -> Result<CallbackTokens> {
    let url = match Url::parse(callback_url) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost")?.join(callback_url)?
        }
        Err(e) => return Err(e.into()),
    };

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if let Some(fragment) = url.fragment() {
        pairs.extend(
            url::form_urlencoded::parse(fragment.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );
    }

    let lookup = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    if let Some(description) = lookup("error_description").or_else(|| lookup("error")) {
        return Err(Error::auth(description));
    }

    let access_token =
        lookup("access_token").ok_or_else(|| Error::auth("callback is missing access_token"))?;
    let refresh_token =
        lookup("refresh_token").ok_or_else(|| Error::auth("callback is missing refresh_token"))?;
    let expires_in = lookup("expires_in")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(3600);
    let token_type = lookup("token_type").unwrap_or_else(default_token_type);

    Ok(CallbackTokens {
        access_token,
        refresh_token,
        expires_in,
        token_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn user() -> User {
        serde_json::from_value(json!({ "id": "u1", "email": "a@b.c" })).unwrap()
    }

    #[test]
    fn test_session_expiry() {
        let session = Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            token_type: "bearer".into(),
            expires_in: 3600,
            expires_at: None,
            user: user(),
        }
        .with_expiry();
        assert!(!session.is_expired());

        let expired = Session {
            expires_at: Some(Utc::now().timestamp() - 10),
            ..session
        };
        assert!(expired.is_expired());
    }

    #[test]
    fn test_decode_claims_ignores_signature() {
        let token = encode(
            &Header::default(),
            &json!({ "sub": "u1", "exp": 1_900_000_000_i64, "email": "a@b.c" }),
            &EncodingKey::from_secret(b"server-only-secret"),
        )
        .unwrap();

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.exp, Some(1_900_000_000));
    }

    #[test]
    fn test_parse_callback_fragment() {
        let tokens = parse_callback(
            "/oauth/kakao#access_token=abc&expires_in=7200&refresh_token=def&token_type=bearer",
        )
        .unwrap();
        assert_eq!(tokens.access_token, "abc");
        assert_eq!(tokens.refresh_token, "def");
        assert_eq!(tokens.expires_in, 7200);
    }

    #[test]
    fn test_parse_callback_error() {
        let result = parse_callback(
            "https://site.example/oauth/google?error=access_denied&error_description=User+denied",
        );
        match result {
            Err(Error::Auth(msg)) => assert_eq!(msg, "User denied"),
            other => panic!("Expected Auth error, got {:?}", other),
        }
    }
}
