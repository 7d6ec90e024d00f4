// Part of this code was adapted from ethers-rs and is distributed under their
// licenses:
// - https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/LICENSE-APACHE
// - https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/LICENSE-MIT
// For the original context see: https://github.com/gakonst/ethers-rs/blob/cba6f071aedafb766e82e4c2f469ed5e4638337d/ethers-core/src/types/signature.rs

#![warn(missing_docs)]
//! ECDSA secp256k1 signature recovery for Ethereum transactions.
//!
//! A validated block's transactions carry a signature but not the sender
//! address; [`rosetta_validator`](../rosetta_validator/index.html) recovers
//! it here and checks it against the `from` field the node reported.

mod recovery_id;
mod y_parity;

pub use recovery_id::SignatureWithRecoveryId;
pub use y_parity::SignatureWithYParity;

use k256::{elliptic_curve::sec1::ToEncodedPoint, FieldBytes, PublicKey, SecretKey};
use rosetta_primitives::{Address, B256};
use sha3::{Digest, Keccak256};

/// An error involving a signature.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Invalid length, ECDSA secp256k1 signatures with recovery are 65 bytes.
    #[error("invalid signature length, got {0}, expected 65")]
    InvalidLength(usize),
    /// Invalid secret key.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),
    /// Failed to parse a signature from a hex string.
    #[error(transparent)]
    DecodingError(#[from] hex::FromHexError),
    /// Thrown when signature verification failed, i.e. the address that
    /// produced the signature did not match the expected address.
    #[error("signature verification failed, expected {0}, got {1}")]
    VerificationError(Address, Address),
    /// Recovery id out of range, or other low-level ECDSA failure.
    #[error(transparent)]
    EcdsaError(#[from] k256::ecdsa::signature::Error),
    /// Elliptic curve error.
    #[error(transparent)]
    EllipticCurveError(#[from] k256::elliptic_curve::Error),
}

/// Trait for an ECDSA signature's R/S/V components.
pub trait Signature {
    /// Returns the signature's R-value.
    fn r(&self) -> rosetta_primitives::U256;

    /// Returns the signature's S-value.
    fn s(&self) -> rosetta_primitives::U256;

    /// Returns the signature's V-value, in the transaction's own encoding
    /// (legacy `{27,28}`/EIP-155, or EIP-2930+ `{0,1}`).
    fn v(&self) -> u64;

    /// Returns the signature's Y-parity, if known independently of `v`.
    fn y_parity(&self) -> Option<bool>;
}

/// Trait for a signature with a recoverable signer address.
pub trait Recoverable {
    /// Recovers the Ethereum address which was used to produce this
    /// signature over `message`.
    fn recover_address(&self, message: RecoveryMessage) -> Result<Address, SignatureError>;
}

/// Recovery message data: either raw bytes, hashed here per EIP-191, or a
/// message hash/transaction signing hash that has already been computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryMessage {
    /// Unhashed message bytes.
    Data(Vec<u8>),
    /// A precomputed message or transaction signing hash.
    Hash(B256),
}

impl From<&[u8]> for RecoveryMessage {
    fn from(s: &[u8]) -> Self {
        RecoveryMessage::Data(s.to_owned())
    }
}

impl From<Vec<u8>> for RecoveryMessage {
    fn from(s: Vec<u8>) -> Self {
        RecoveryMessage::Data(s)
    }
}

impl From<[u8; 32]> for RecoveryMessage {
    fn from(hash: [u8; 32]) -> Self {
        B256::from(hash).into()
    }
}

impl From<B256> for RecoveryMessage {
    fn from(hash: B256) -> Self {
        RecoveryMessage::Hash(hash)
    }
}

/// Hashes a message according to
/// [EIP-191](https://eips.ethereum.org/EIPS/eip-191) (`personal_sign`
/// convention): `keccak256("\x19Ethereum Signed Message:\n" + len(message) +
/// message)`.
pub fn hash_message<M: AsRef<[u8]>>(message: M) -> B256 {
    const PREFIX: &str = "\x19Ethereum Signed Message:\n";

    let message = message.as_ref();
    let mut bytes = Vec::with_capacity(PREFIX.len() + 8 + message.len());
    bytes.extend_from_slice(PREFIX.as_bytes());
    bytes.extend_from_slice(message.len().to_string().as_bytes());
    bytes.extend_from_slice(message);

    B256::from_slice(Keccak256::digest(&bytes).as_slice())
}

/// Converts a [`PublicKey`] to an [`Address`] by Keccak-256-hashing its
/// uncompressed SEC1 encoding (minus the leading tag byte) and taking the
/// lower 160 bits.
pub fn public_key_to_address(public_key: PublicKey) -> Address {
    let public_key = public_key.to_encoded_point(/* compress = */ false);
    let hash = Keccak256::digest(&public_key.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Converts a hex-encoded secret key (with or without a `0x` prefix) into a
/// [`SecretKey`].
pub fn secret_key_from_str(secret_key: &str) -> Result<SecretKey, SignatureError> {
    let secret_key = secret_key.strip_prefix("0x").unwrap_or(secret_key);
    let secret_key = hex::decode(secret_key).map_err(SignatureError::DecodingError)?;
    let secret_key = FieldBytes::from_exact_iter(secret_key.into_iter()).ok_or_else(|| {
        SignatureError::InvalidSecretKey("expected 32 byte secret key".to_string())
    })?;
    SecretKey::from_bytes(&secret_key).map_err(SignatureError::EllipticCurveError)
}

/// Converts a hex-encoded secret key to its corresponding Ethereum address.
pub fn secret_key_to_address(secret_key: &str) -> Result<Address, SignatureError> {
    let secret_key = secret_key_from_str(secret_key)?;
    Ok(public_key_to_address(secret_key.public_key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip191_hash_message_matches_known_vector() {
        // keccak256("\x19Ethereum Signed Message:\n11Hello World") from the
        // widely used eth_sign/personal_sign test vector.
        let hash = hash_message("Hello World");
        assert_eq!(
            hash,
            "0xa1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f"
                .parse()
                .unwrap()
        );
    }
}
