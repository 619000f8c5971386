//! Partition-key derivation.

use scribe_core::CharacterId;

/// Derive the bus partition key for a character.
///
/// Deterministic: the same character always maps to the same key, so all
/// events for one aggregate land on one partition and keep their relative
/// order. Cross-character ordering is not guaranteed.
pub fn partition_key(character_id: CharacterId) -> Vec<u8> {
    character_id.as_u32().to_be_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_character_same_key() {
        assert_eq!(
            partition_key(CharacterId::new(42)),
            partition_key(CharacterId::new(42))
        );
    }

    #[test]
    fn distinct_characters_distinct_keys() {
        assert_ne!(
            partition_key(CharacterId::new(1)),
            partition_key(CharacterId::new(2))
        );
    }
}
