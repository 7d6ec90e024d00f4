use rosetta_primitives::{Address, U256};

use crate::{Recoverable, RecoveryMessage, Signature, SignatureError, SignatureWithRecoveryId};

/// An ECDSA signature with an explicit Y-parity bit, as used by EIP-2930 and
/// later typed transactions (access list, dynamic fee, blob, set-code).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SignatureWithYParity {
    /// R value.
    pub r: U256,
    /// S value.
    pub s: U256,
    /// Whether the Y value has odd parity.
    pub y_parity: bool,
}

impl From<SignatureWithRecoveryId> for SignatureWithYParity {
    fn from(value: SignatureWithRecoveryId) -> Self {
        Self {
            r: value.r,
            s: value.s,
            y_parity: value.odd_y_parity(),
        }
    }
}

impl Recoverable for SignatureWithYParity {
    fn recover_address(&self, message: RecoveryMessage) -> Result<Address, SignatureError> {
        let legacy = SignatureWithRecoveryId {
            r: self.r,
            s: self.s,
            v: self.v(),
        };

        legacy.recover(message)
    }
}

impl Signature for SignatureWithYParity {
    fn r(&self) -> U256 {
        self.r
    }

    fn s(&self) -> U256 {
        self.s
    }

    fn v(&self) -> u64 {
        u64::from(self.y_parity)
    }

    fn y_parity(&self) -> Option<bool> {
        Some(self.y_parity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn recovers_same_address_as_legacy_equivalent() {
        let legacy = SignatureWithRecoveryId::from_str(
            "0xb91467e570a6466aa9e9876cbcd013baba02900b8979d43fe208a4a4f339f5fd6007e74cd82e037b800186422fc2da167c747ef045e5d18a5f5d4300f8e1a0291c"
        ).unwrap();
        let typed = SignatureWithYParity::from(legacy);

        assert_eq!(
            typed.recover_address(RecoveryMessage::Data(b"Some data".to_vec())).unwrap(),
            legacy.recover("Some data").unwrap()
        );
    }
}
