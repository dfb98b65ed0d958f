use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::Result;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Expected issuer and audience of identity tokens.
    pub website_url: String,
    pub jwt_algorithm: Algorithm,
    /// Shared secret of the external scheduler. Unset disables the cron routes.
    pub cron_secret: Option<String>,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            jwt_secret: env::var("JWT_SECRET")?,
            website_url: env::var("WEBSITE_URL")?,
            jwt_algorithm: Algorithm::HS256,
            cron_secret: env::var("CRON_SECRET").ok().filter(|s| !s.is_empty()),
        })
    }
}

/// Identity claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
    pub iss: String, // issuer
    pub aud: String, // audience
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

pub struct TokenService;

impl TokenService {
    pub fn validate_token(token: &str, config: &AuthConfig) -> Result<Claims> {
        let mut validation = Validation::new(config.jwt_algorithm);
        validation.set_audience(&[config.website_url.to_string()]);
        validation.set_issuer(&[config.website_url.to_string()]);

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &validation,
        )?;
        Ok(decoded.claims)
    }

    /// Constant-time comparison of the scheduler's bearer secret.
    pub fn check_cron_secret(provided: &str, config: &AuthConfig) -> bool {
        match &config.cron_secret {
            Some(expected) => {
                expected.len() == provided.len()
                    && expected
                        .bytes()
                        .zip(provided.bytes())
                        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                        == 0
            }
            None => false,
        }
    }
}
