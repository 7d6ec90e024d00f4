//! Block header hash validation (spec §4.5 "Block header validation").

use rosetta_types::Header;

use crate::errors::ValidatorError;

/// Recomputes `keccak256(rlp(header))` and compares it against the hash the
/// node claimed for this block.
pub fn validate_block_hash(header: &Header, claimed_hash: rosetta_primitives::B256) -> Result<(), ValidatorError> {
    let expected = header.hash();
    if expected != claimed_hash {
        return Err(ValidatorError::InvalidBlockHash {
            expected,
            claimed: claimed_hash,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_hash_passes() {
        let header = Header::default();
        let hash = header.hash();
        assert!(validate_block_hash(&header, hash).is_ok());
    }

    #[test]
    fn mismatched_hash_fails() {
        let header = Header::default();
        let wrong = rosetta_primitives::B256::repeat_byte(0xAB);
        assert!(matches!(
            validate_block_hash(&header, wrong),
            Err(ValidatorError::InvalidBlockHash { .. })
        ));
    }
}
