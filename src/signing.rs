//! Keyed fingerprints for generated recipes.
//!
//! A fingerprint travels to the client with each generated recipe and must come
//! back unchanged on save. It doubles as the per-user idempotency key.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::ai::FinalRecipe;

type HmacSha256 = Hmac<Sha256>;

/// Errors from building a signer or signing a recipe.
#[derive(Error, Debug)]
pub enum SigningError {
    /// The secret was empty.
    #[error("signing secret must not be empty")]
    EmptySecret,

    /// The recipe couldn't be serialized.
    #[error("failed to serialize recipe: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// HMAC-SHA256 signer keyed with the server secret.
#[derive(Clone)]
pub struct RecipeSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for RecipeSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeSigner").finish_non_exhaustive()
    }
}

impl RecipeSigner {
    /// Builds a signer from the server-held secret.
    pub fn new(secret: &[u8]) -> Result<Self, SigningError> {
        if secret.is_empty() {
            return Err(SigningError::EmptySecret);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| SigningError::EmptySecret)?;
        Ok(Self { mac })
    }

    fn keyed_mac(&self, recipe: &FinalRecipe) -> Result<HmacSha256, SigningError> {
        // serde_json keeps struct field order, which makes this serialization canonical.
        let payload = serde_json::to_vec(recipe)?;
        let mut mac = self.mac.clone();
        mac.update(&payload);
        Ok(mac)
    }

    /// Lowercase hex fingerprint of the recipe.
    pub fn sign(&self, recipe: &FinalRecipe) -> Result<String, SigningError> {
        let mac = self.keyed_mac(recipe)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Checks a fingerprint in constant time.
    pub fn verify(&self, recipe: &FinalRecipe, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        match self.keyed_mac(recipe) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }
}
