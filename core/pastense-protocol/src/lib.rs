#![no_std] // The vocabulary crate stays allocation-only so archives can be read anywhere

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod grammar;
pub mod findings;
pub mod recommendation;

// Re-export core types for convenience
pub use grammar::*;
pub use findings::*;
pub use recommendation::*;

pub mod lexicon;
mod builtin;
pub use lexicon::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rkyv::{to_bytes, from_bytes};

    #[test]
    fn test_enum_serialization() {
        let original = Recommendation::PastContinuous;

        let bytes = to_bytes::<_, 256>(&original).expect("Failed to serialize Recommendation");
        let deserialized: Recommendation = from_bytes(&bytes).expect("Failed to deserialize Recommendation");

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_builtin_lexicon_archive() {
        // The built-in tables must survive the same archive path the CLI uses
        let lexicon = Lexicon::builtin();

        let bytes = to_bytes::<_, 4096>(&lexicon).expect("Failed to serialize Lexicon");
        let restored: Lexicon = from_bytes(&bytes).expect("Failed to deserialize Lexicon");

        assert_eq!(restored.version, lexicon.version);
        assert_eq!(restored.irregular_verbs.len(), lexicon.irregular_verbs.len());
        assert_eq!(restored.past_of_irregular("go"), Some("went"));
    }

    #[test]
    fn test_role_flags_layout() {
        assert_eq!(core::mem::size_of::<RoleFlags>(), 1);
        assert_eq!(RoleFlags::all().bits().count_ones(), 7);
    }
}
