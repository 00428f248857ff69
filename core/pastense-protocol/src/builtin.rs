//! Built-in English tables for Past Simple / Past Continuous practice.

use alloc::string::String;
use alloc::vec::Vec;

use crate::grammar::{Number, Person};
use crate::lexicon::*;
use crate::recommendation::Recommendation;

const PRONOUNS: &[(&str, Person, Number)] = &[
    ("i", Person::First, Number::Singular),
    ("you", Person::Second, Number::Singular),
    ("he", Person::Third, Number::Singular),
    ("she", Person::Third, Number::Singular),
    ("it", Person::Third, Number::Singular),
    ("we", Person::First, Number::Plural),
    ("they", Person::Third, Number::Plural),
];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "my", "your", "his", "her", "its", "our", "their", "this", "that",
    "these", "those",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("go", "went"), ("see", "saw"), ("eat", "ate"), ("have", "had"), ("do", "did"),
    ("make", "made"), ("take", "took"), ("come", "came"), ("get", "got"), ("give", "gave"),
    ("know", "knew"), ("think", "thought"), ("find", "found"), ("tell", "told"),
    ("become", "became"), ("leave", "left"), ("feel", "felt"), ("bring", "brought"),
    ("begin", "began"), ("keep", "kept"), ("hold", "held"), ("write", "wrote"),
    ("stand", "stood"), ("hear", "heard"), ("mean", "meant"), ("meet", "met"),
    ("run", "ran"), ("pay", "paid"), ("sit", "sat"), ("speak", "spoke"), ("lead", "led"),
    ("read", "read"), ("grow", "grew"), ("lose", "lost"), ("fall", "fell"), ("send", "sent"),
    ("build", "built"), ("understand", "understood"), ("draw", "drew"), ("break", "broke"),
    ("spend", "spent"), ("cut", "cut"), ("drive", "drove"), ("buy", "bought"),
    ("wear", "wore"), ("choose", "chose"), ("sleep", "slept"), ("sing", "sang"),
    ("swim", "swam"), ("drink", "drank"), ("ring", "rang"), ("catch", "caught"),
    ("teach", "taught"), ("fly", "flew"), ("forget", "forgot"), ("win", "won"),
    ("sell", "sold"), ("hit", "hit"), ("put", "put"), ("wake", "woke"), ("steal", "stole"),
    ("throw", "threw"), ("say", "said"), ("ride", "rode"), ("hide", "hid"), ("shake", "shook"),
    ("fight", "fought"), ("light", "lit"), ("lend", "lent"), ("bite", "bit"),
];

const BASE_VERBS: &[&str] = &[
    "walk", "play", "study", "watch", "cook", "work", "talk", "listen", "dance", "clean",
    "wait", "live", "arrive", "call", "rain", "snow", "visit", "travel", "open", "close",
    "start", "finish", "stay", "want", "like", "love", "help", "jump", "laugh", "cry", "try",
    "stop", "plan", "shop", "drop", "jog", "chat", "move", "use", "ask", "answer", "look",
    "paint", "climb", "knock", "happen", "learn", "relax", "explain", "enjoy", "shout",
    "enter", "appear", "explode", "crash", "interrupt", "decide", "die", "realize", "reach",
    "smile", "wash", "fix", "carry", "marry", "practice", "train",
];

const ED_EXCLUSIONS: &[&str] = &[
    "need", "feed", "seed", "shed", "speed", "breed", "bleed", "indeed", "hundred", "weed",
    "reed", "deed", "greed", "sacred", "naked", "wicked", "sled", "bred",
];

const ING_EXCLUSIONS: &[&str] = &[
    "thing", "something", "nothing", "anything", "everything", "morning", "evening",
    "ceiling", "during", "spring", "string", "swing", "sibling", "pudding", "interesting",
    "boring", "amazing", "exciting", "annoying", "surprising", "relaxing", "tiring",
    "charming", "lightning",
];

// (word, recommendation, confidence, context dependent)
const CONNECTORS: &[(&str, Recommendation, f32, bool)] = &[
    ("while", Recommendation::PastContinuous, 0.9, false),
    ("as", Recommendation::PastContinuous, 0.85, false),
    ("when", Recommendation::Either, 0.8, true),
    ("then", Recommendation::PastSimple, 0.6, false),
    ("after", Recommendation::PastSimple, 0.6, false),
    ("before", Recommendation::PastSimple, 0.6, false),
];

const TIME_MARKERS: &[(&str, TemporalKind, f32)] = &[
    ("yesterday", TemporalKind::SpecificMoment, 0.8),
    ("the day before yesterday", TemporalKind::SpecificMoment, 0.8),
    ("last night", TemporalKind::SpecificMoment, 0.8),
    ("last week", TemporalKind::SpecificMoment, 0.8),
    ("last weekend", TemporalKind::SpecificMoment, 0.8),
    ("last month", TemporalKind::SpecificMoment, 0.8),
    ("last summer", TemporalKind::SpecificMoment, 0.8),
    ("last year", TemporalKind::SpecificMoment, 0.8),
    ("ago", TemporalKind::SpecificMoment, 0.8),
    ("all day", TemporalKind::Duration, 0.8),
    ("all night", TemporalKind::Duration, 0.8),
    ("all morning", TemporalKind::Duration, 0.8),
    ("all afternoon", TemporalKind::Duration, 0.8),
    ("all evening", TemporalKind::Duration, 0.8),
    ("the whole day", TemporalKind::Duration, 0.8),
    ("the whole night", TemporalKind::Duration, 0.8),
    ("for hours", TemporalKind::Duration, 0.8),
    ("for a long time", TemporalKind::Duration, 0.8),
    ("suddenly", TemporalKind::SuddenAction, 0.85),
    ("all of a sudden", TemporalKind::SuddenAction, 0.85),
    ("at that moment", TemporalKind::SuddenAction, 0.85),
    ("immediately", TemporalKind::SuddenAction, 0.85),
];

const IRREGULAR_PLURALS: &[&str] = &[
    "children", "people", "men", "women", "mice", "feet", "teeth", "geese", "police",
    "oxen",
];

const PREPOSITIONS: &[&str] = &[
    "at", "in", "on", "to", "from", "with", "without", "for", "by", "about", "into", "of",
    "near", "under", "over", "during", "through", "around",
];

const FREQUENCY_ADVERBS: &[&str] = &["always", "never", "often", "usually", "sometimes", "rarely"];

const INTERRUPTION_VERBS: &[&str] = &[
    "rang", "knocked", "arrived", "called", "came", "broke", "fell", "started", "saw",
    "heard", "entered", "appeared", "exploded", "crashed", "interrupted", "shouted",
    "stopped", "began", "hit",
];

const VERB_CLASSES: &[(&str, VerbClass)] = &[
    ("walk", VerbClass::Activity), ("play", VerbClass::Activity), ("study", VerbClass::Activity),
    ("watch", VerbClass::Activity), ("read", VerbClass::Activity), ("cook", VerbClass::Activity),
    ("work", VerbClass::Activity), ("talk", VerbClass::Activity), ("listen", VerbClass::Activity),
    ("dance", VerbClass::Activity), ("sleep", VerbClass::Activity), ("run", VerbClass::Activity),
    ("swim", VerbClass::Activity), ("write", VerbClass::Activity), ("drive", VerbClass::Activity),
    ("rain", VerbClass::Activity), ("snow", VerbClass::Activity), ("sing", VerbClass::Activity),
    ("wait", VerbClass::Activity), ("travel", VerbClass::Activity), ("eat", VerbClass::Activity),
    ("arrive", VerbClass::Achievement), ("break", VerbClass::Achievement),
    ("fall", VerbClass::Achievement), ("die", VerbClass::Achievement),
    ("find", VerbClass::Achievement), ("leave", VerbClass::Achievement),
    ("start", VerbClass::Achievement), ("stop", VerbClass::Achievement),
    ("win", VerbClass::Achievement), ("lose", VerbClass::Achievement),
    ("knock", VerbClass::Achievement), ("ring", VerbClass::Achievement),
    ("hit", VerbClass::Achievement), ("open", VerbClass::Achievement),
    ("close", VerbClass::Achievement), ("finish", VerbClass::Achievement),
    ("realize", VerbClass::Achievement), ("reach", VerbClass::Achievement),
    ("explode", VerbClass::Achievement), ("crash", VerbClass::Achievement),
];

const IRREGULAR_MISSPELLINGS: &[(&str, &str)] = &[
    ("goed", "went"), ("eated", "ate"), ("runned", "ran"), ("buyed", "bought"),
    ("catched", "caught"), ("teached", "taught"), ("thinked", "thought"), ("bringed", "brought"),
    ("writed", "wrote"), ("drinked", "drank"), ("comed", "came"),
    ("taked", "took"), ("maked", "made"), ("gived", "gave"), ("knowed", "knew"),
    ("finded", "found"), ("telled", "told"), ("leaved", "left"), ("feeled", "felt"),
    ("sleeped", "slept"), ("swimmed", "swam"), ("singed", "sang"), ("ringed", "rang"),
    ("breaked", "broke"), ("falled", "fell"), ("speaked", "spoke"), ("drived", "drove"),
    ("flied", "flew"), ("winned", "won"), ("sayed", "said"), ("haved", "had"),
];

const MISSPELLINGS: &[(&str, &str)] = &[
    ("studing", "studying"), ("writting", "writing"), ("runing", "running"),
    ("swiming", "swimming"), ("stoped", "stopped"), ("begining", "beginning"),
    ("recieved", "received"), ("plaing", "playing"), ("comming", "coming"),
    ("shoping", "shopping"), ("siting", "sitting"),
    ("geting", "getting"), ("dansing", "dancing"), ("yesterdey", "yesterday"),
    ("wich", "which"), ("becuase", "because"), ("whit", "with"),
];

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| String::from(*w)).collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<Misspelling> {
    list.iter()
        .map(|(wrong, right)| Misspelling {
            wrong: String::from(*wrong),
            right: String::from(*right),
        })
        .collect()
}

impl Lexicon {
    pub const BUILTIN_VERSION: u32 = 1;

    /// The tables the engine ships with.
    pub fn builtin() -> Self {
        Self {
            version: Self::BUILTIN_VERSION,
            pronouns: PRONOUNS
                .iter()
                .map(|(word, person, number)| PronounEntry {
                    word: String::from(*word),
                    person: *person,
                    number: *number,
                })
                .collect(),
            determiners: words(DETERMINERS),
            past_auxiliaries: words(&["was", "were"]),
            present_auxiliaries: words(&["am", "is", "are"]),
            negative_auxiliaries: words(&["wasn't", "weren't", "didn't"]),
            irregular_verbs: IRREGULAR
                .iter()
                .map(|(base, past)| IrregularVerb {
                    base: String::from(*base),
                    past: String::from(*past),
                })
                .collect(),
            base_verbs: words(BASE_VERBS),
            ed_exclusions: words(ED_EXCLUSIONS),
            ing_exclusions: words(ING_EXCLUSIONS),
            connectors: CONNECTORS
                .iter()
                .map(|(word, recommendation, confidence, context_dependent)| ConnectorEntry {
                    word: String::from(*word),
                    recommendation: *recommendation,
                    confidence: *confidence,
                    context_dependent: *context_dependent,
                })
                .collect(),
            time_markers: TIME_MARKERS
                .iter()
                .map(|(phrase, kind, confidence)| TemporalMarker {
                    phrase: String::from(*phrase),
                    kind: *kind,
                    confidence: *confidence,
                })
                .collect(),
            frequency_adverbs: words(FREQUENCY_ADVERBS),
            interruption_verbs: words(INTERRUPTION_VERBS),
            verb_classes: VERB_CLASSES
                .iter()
                .map(|(verb, class)| VerbClassEntry {
                    verb: String::from(*verb),
                    class: *class,
                })
                .collect(),
            irregular_misspellings: pairs(IRREGULAR_MISSPELLINGS),
            misspellings: pairs(MISSPELLINGS),
            irregular_plurals: words(IRREGULAR_PLURALS),
            prepositions: words(PREPOSITIONS),
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
