use crate::claims::TokenClaims;
use crate::error::IssuerError;

use common::ErrorLocation;
use models::UserId;

use std::env;
use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{debug, info};

/// Environment variable holding the signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Creates an issuer from a raw secret.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Secret`] if the secret is empty.
    #[track_caller]
    pub fn new(secret: &str) -> Result<Self, IssuerError> {
        if secret.is_empty() {
            return Err(IssuerError::secret("Signing secret cannot be empty"));
        }

        // Tokens carry no `exp`, so neither expiry nor any registered claim is required.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Creates an issuer from `JWT_SECRET`, loading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Secret`] if the variable is missing or empty.
    #[track_caller]
    pub fn from_env() -> Result<Self, IssuerError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {:?}", path),
            Err(e) => debug!("No .env file loaded: {e}"),
        }

        let secret = env::var(JWT_SECRET_ENV).map_err(|e| IssuerError::Secret {
            message: format!("{JWT_SECRET_ENV} not available: {e}"),
            location: ErrorLocation::caller(),
        })?;

        Self::new(&secret)
    }

    /// Signs a token identifying `user_id`.
    #[track_caller]
    pub fn generate_token(&self, user_id: &UserId) -> Result<String, IssuerError> {
        let claims = TokenClaims {
            user_id: user_id.clone(),
            iat: Utc::now().timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            IssuerError::Encode {
                message: format!("Failed to encode token: {e}"),
                location: ErrorLocation::caller(),
            }
        })
    }

    /// Verifies the signature and returns the embedded claims.
    #[track_caller]
    pub fn verify(&self, token: &str) -> Result<TokenClaims, IssuerError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
