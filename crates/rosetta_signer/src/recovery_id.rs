use std::fmt;
use std::str::FromStr;

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use rosetta_primitives::{Address, U256};

use crate::{hash_message, public_key_to_address, Recoverable, RecoveryMessage, Signature, SignatureError};

/// An ECDSA signature with a legacy `v` value, as used by pre-EIP-2930
/// transactions (and EIP-155 transactions, where `v` encodes the chain id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignatureWithRecoveryId {
    /// R value.
    pub r: U256,
    /// S value.
    pub s: U256,
    /// V value, in `{27,28}` or EIP-155 `{chain_id*2+35, chain_id*2+36}` form.
    pub v: u64,
}

impl fmt::Display for SignatureWithRecoveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = <[u8; 65]>::from(self);
        write!(f, "{}", hex::encode(&sig[..]))
    }
}

impl SignatureWithRecoveryId {
    /// Whether the V value has odd Y-parity.
    pub fn odd_y_parity(&self) -> bool {
        normalize_recovery_id(self.v) == 1
    }

    /// Verifies that the signature over `message` was produced by `address`.
    pub fn verify<M, A>(&self, message: M, address: A) -> Result<(), SignatureError>
    where
        M: Into<RecoveryMessage>,
        A: Into<Address>,
    {
        let address = address.into();
        let recovered = self.recover(message)?;
        if recovered != address {
            return Err(SignatureError::VerificationError(address, recovered));
        }
        Ok(())
    }

    /// Recovers the Ethereum address which produced this signature over
    /// `message`.
    pub fn recover<M>(&self, message: M) -> Result<Address, SignatureError>
    where
        M: Into<RecoveryMessage>,
    {
        let message = message.into();
        let message_hash = match message {
            RecoveryMessage::Data(ref message) => hash_message(message),
            RecoveryMessage::Hash(hash) => hash,
        };

        let (signature, recovery_id) = self.as_signature()?;

        let verifying_key =
            VerifyingKey::recover_from_prehash(message_hash.as_slice(), &signature, recovery_id)?;

        Ok(public_key_to_address(verifying_key.into()))
    }

    fn as_signature(&self) -> Result<(EcdsaSignature, RecoveryId), SignatureError> {
        let recovery_id = self.recovery_id()?;
        let signature = {
            let r_bytes = self.r.to_be_bytes::<32>();
            let s_bytes = self.s.to_be_bytes::<32>();

            let mut bytes = [0u8; 64];
            bytes[..32].copy_from_slice(&r_bytes);
            bytes[32..64].copy_from_slice(&s_bytes);
            EcdsaSignature::from_slice(&bytes)?
        };

        Ok((signature, recovery_id))
    }

    /// Retrieves the normalized recovery id (`0` or `1`) from `v`.
    pub fn recovery_id(&self) -> Result<RecoveryId, SignatureError> {
        let standard_v = normalize_recovery_id(self.v);
        RecoveryId::try_from(standard_v).map_err(SignatureError::from)
    }
}

/// Normalizes a legacy `v` value to a `{0,1}` recovery id. Accepts bare
/// `{0,1}`, Bitcoin-style `{27,28}`, and EIP-155 `chain_id*2+{35,36}` forms.
fn normalize_recovery_id(v: u64) -> u8 {
    match v {
        0 | 27 => 0,
        1 | 28 => 1,
        v if v >= 35 => ((v - 1) % 2) as u8,
        _ => 4,
    }
}

impl Recoverable for SignatureWithRecoveryId {
    fn recover_address(&self, message: RecoveryMessage) -> Result<Address, SignatureError> {
        self.recover(message)
    }
}

impl Signature for SignatureWithRecoveryId {
    fn r(&self) -> U256 {
        self.r
    }

    fn s(&self) -> U256 {
        self.s
    }

    fn v(&self) -> u64 {
        self.v
    }

    fn y_parity(&self) -> Option<bool> {
        None
    }
}

impl<'a> TryFrom<&'a [u8]> for SignatureWithRecoveryId {
    type Error = SignatureError;

    /// Parses a raw 65-byte signature: 32 bytes `r`, 32 bytes `s`, 1 byte `v`
    /// in "Electrum" notation.
    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 65 {
            return Err(SignatureError::InvalidLength(bytes.len()));
        }

        let (r_bytes, remainder) = bytes.split_at(32);
        let r = U256::from_be_bytes::<32>(r_bytes.try_into().unwrap());

        let (s_bytes, remainder) = remainder.split_at(32);
        let s = U256::from_be_bytes::<32>(s_bytes.try_into().unwrap());

        let v = remainder[0];

        Ok(SignatureWithRecoveryId { r, s, v: v.into() })
    }
}

impl FromStr for SignatureWithRecoveryId {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(SignatureError::DecodingError)?;
        SignatureWithRecoveryId::try_from(&bytes[..])
    }
}

impl From<&SignatureWithRecoveryId> for [u8; 65] {
    fn from(src: &SignatureWithRecoveryId) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[..32].copy_from_slice(&src.r.to_be_bytes::<32>());
        sig[32..64].copy_from_slice(&src.s.to_be_bytes::<32>());
        sig[64] = src.v as u8;
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recover_known_vector() {
        // test vector taken from:
        // https://web3js.readthedocs.io/en/v1.2.2/web3-eth-accounts.html#sign
        let signature = SignatureWithRecoveryId::from_str(
            "0xb91467e570a6466aa9e9876cbcd013baba02900b8979d43fe208a4a4f339f5fd6007e74cd82e037b800186422fc2da167c747ef045e5d18a5f5d4300f8e1a0291c"
        ).expect("valid signature");

        assert_eq!(
            signature.recover("Some data").unwrap(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn eip155_v_normalizes_to_recovery_id() {
        let mainnet_even = SignatureWithRecoveryId { r: U256::from(1u8), s: U256::from(1u8), v: 37 };
        let mainnet_odd = SignatureWithRecoveryId { r: U256::from(1u8), s: U256::from(1u8), v: 38 };
        assert_eq!(normalize_recovery_id(mainnet_even.v), 0);
        assert_eq!(normalize_recovery_id(mainnet_odd.v), 1);
    }
}
