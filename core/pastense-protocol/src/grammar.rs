use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Person {
    First = 1,
    Second = 2,
    Third = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Number {
    Singular = 0,
    Plural = 1,
}

/// A grammatical slot a token can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum Role {
    Subject = 0,
    Auxiliary = 1,
    MainVerb = 2,
    Gerund = 3,
    Complement = 4,
    Connector = 5,
    TimeMarker = 6,
}

impl Role {
    /// Fixed detection order. A token claimed by an earlier role is never reclaimed.
    pub const DETECTION_ORDER: [Role; 7] = [
        Role::Subject,
        Role::Auxiliary,
        Role::MainVerb,
        Role::Gerund,
        Role::Complement,
        Role::Connector,
        Role::TimeMarker,
    ];

    pub const fn flag(self) -> RoleFlags {
        match self {
            Role::Subject => RoleFlags::SUBJECT,
            Role::Auxiliary => RoleFlags::AUXILIARY,
            Role::MainVerb => RoleFlags::MAIN_VERB,
            Role::Gerund => RoleFlags::GERUND,
            Role::Complement => RoleFlags::COMPLEMENT,
            Role::Connector => RoleFlags::CONNECTOR,
            Role::TimeMarker => RoleFlags::TIME_MARKER,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::Auxiliary => "auxiliary",
            Role::MainVerb => "mainVerb",
            Role::Gerund => "gerund",
            Role::Complement => "complement",
            Role::Connector => "connector",
            Role::TimeMarker => "timeMarker",
        }
    }
}

bitflags! {
    /// A set of roles, used for completed/missing/required role bookkeeping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct RoleFlags: u8 {
        const SUBJECT = 1;
        const AUXILIARY = 2;
        const MAIN_VERB = 4;
        const GERUND = 8;
        const COMPLEMENT = 16;
        const CONNECTOR = 32;
        const TIME_MARKER = 64;
    }
}

impl RoleFlags {
    /// Roles contained in this set, in detection order.
    pub fn roles(self) -> impl Iterator<Item = Role> {
        Role::DETECTION_ORDER
            .into_iter()
            .filter(move |role| self.contains(role.flag()))
    }

    pub fn names(self) -> alloc::vec::Vec<&'static str> {
        self.roles().map(Role::name).collect()
    }
}

/// Which tense a sentence was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum TenseType {
    PastContinuous,
    PastSimple,
    PresentError,
    Unknown,
}

impl TenseType {
    /// Roles that must be present and valid for the sentence to be complete.
    pub const fn required_roles(self) -> RoleFlags {
        match self {
            TenseType::PastContinuous | TenseType::PresentError => {
                RoleFlags::SUBJECT.union(RoleFlags::AUXILIARY).union(RoleFlags::GERUND)
            }
            TenseType::PastSimple | TenseType::Unknown => {
                RoleFlags::SUBJECT.union(RoleFlags::MAIN_VERB)
            }
        }
    }

    /// Percentage of required roles satisfied, rounded to the nearest percent.
    pub fn completion(self, satisfied: RoleFlags) -> u8 {
        let required = self.required_roles();
        let total = required.bits().count_ones();
        if total == 0 {
            return 0;
        }
        let done = (required & satisfied).bits().count_ones();
        ((done * 100 + total / 2) / total) as u8
    }

    pub const fn id(self) -> &'static str {
        match self {
            TenseType::PastContinuous => "pastContinuous",
            TenseType::PastSimple => "pastSimple",
            TenseType::PresentError => "presentError",
            TenseType::Unknown => "unknown",
        }
    }
}

/// Class of an auxiliary token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AuxiliaryClass {
    /// was / were
    Past,
    /// am / is / are
    Present,
    /// wasn't / weren't / didn't
    Negative,
}

/// Depth of analysis chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum AnalysisTier {
    None,
    Basic,
    Intermediate,
    Advanced,
}

impl AnalysisTier {
    pub fn runs_detector(self) -> bool {
        self >= AnalysisTier::Intermediate
    }

    pub fn runs_context(self) -> bool {
        self >= AnalysisTier::Advanced
    }
}
