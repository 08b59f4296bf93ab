use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::ISSUER;
use super::errors::JwtError;

/// The only signing algorithm produced or accepted.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Compact token codec (`header.payload.signature`, base64url segments).
///
/// Signs with HMAC-SHA256 under a single shared secret. The header's `alg`
/// field is treated as untrusted input: decoding is pinned to HS256 and any
/// other declared algorithm is rejected.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec bound to a signing secret.
    ///
    /// # Arguments
    /// * `secret` - Shared symmetric key used to sign and verify
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Temporal claims are checked in `decode_at` against an explicit clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token against the current wall clock.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Decode and validate a token as of `now` (Unix timestamp).
    ///
    /// The signature is verified before any claim is looked at; expiry and
    /// not-before are then checked independently of it.
    ///
    /// # Errors
    /// * `MalformedToken` - Structure, encoding or payload cannot be parsed
    /// * `UnexpectedAlgorithm` - Header declares an algorithm other than HS256
    /// * `SignatureInvalid` - Signature does not match the secret
    /// * `IssuerMismatch` - Token was minted by another issuer
    /// * `Expired` - `now >= exp`
    /// * `NotYetValid` - `now < nbf`
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::SignatureInvalid,
                ErrorKind::InvalidAlgorithm => JwtError::UnexpectedAlgorithm,
                ErrorKind::InvalidIssuer => JwtError::IssuerMismatch,
                _ => JwtError::MalformedToken(e.to_string()),
            })?;

        if claims.is_expired(now) {
            return Err(JwtError::Expired);
        }

        if claims.is_not_yet_valid(now) {
            return Err(JwtError::NotYetValid);
        }

        Ok(claims)
    }
}
