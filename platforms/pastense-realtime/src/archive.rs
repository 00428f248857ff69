//! Compiled lexicon archives.

use pastense_protocol::Lexicon;
use rkyv::AlignedVec;

use crate::error::LexiconError;

pub fn write_lexicon(lexicon: &Lexicon) -> Result<AlignedVec, LexiconError> {
    rkyv::to_bytes::<_, 4096>(lexicon).map_err(|e| LexiconError::Serialize(e.to_string()))
}

/// Validate and deserialize an archive. The bytes need not be aligned.
pub fn read_lexicon(bytes: &[u8]) -> Result<Lexicon, LexiconError> {
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    rkyv::from_bytes::<Lexicon>(&aligned).map_err(|e| LexiconError::Invalid(e.to_string()))
}
