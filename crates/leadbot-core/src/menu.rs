//! Fixed menus offered during intake and their callback tags.
//!
//! Tags have the form `<prefix>:<id>` (`aud:adult`, `lang:en`) and are what
//! the transport round-trips through button presses.

/// Tag prefix for audience buttons.
const AUDIENCE_PREFIX: &str = "aud";

/// Tag prefix for language buttons.
const LANGUAGE_PREFIX: &str = "lang";

/// Who the lessons are for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Adult,
    Minor,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Adult, Audience::Minor];

    fn id(self) -> &'static str {
        match self {
            Self::Adult => "adult",
            Self::Minor => "minor",
        }
    }

    /// Button label, also stored in the session and shown in the lead.
    pub fn label(self) -> &'static str {
        match self {
            Self::Adult => "I am 18 or older",
            Self::Minor => "I am under 18",
        }
    }
}

/// Languages offered for lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
    Chinese,
    Spanish,
    Italian,
    Turkish,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::French,
        Language::Chinese,
        Language::Spanish,
        Language::Italian,
        Language::Turkish,
    ];

    fn id(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
            Self::Chinese => "zh",
            Self::Spanish => "es",
            Self::Italian => "it",
            Self::Turkish => "tr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::French => "French",
            Self::Chinese => "Chinese",
            Self::Spanish => "Spanish",
            Self::Italian => "Italian",
            Self::Turkish => "Turkish",
        }
    }
}

/// A menu selection made by pressing a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Audience(Audience),
    Language(Language),
}

impl Choice {
    /// Parse a callback tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let (prefix, id) = tag.split_once(':')?;
        match prefix {
            AUDIENCE_PREFIX => Audience::ALL
                .into_iter()
                .find(|a| a.id() == id)
                .map(Self::Audience),
            LANGUAGE_PREFIX => Language::ALL
                .into_iter()
                .find(|l| l.id() == id)
                .map(Self::Language),
            _ => None,
        }
    }

    /// The callback tag for this selection.
    pub fn tag(self) -> String {
        match self {
            Self::Audience(a) => format!("{}:{}", AUDIENCE_PREFIX, a.id()),
            Self::Language(l) => format!("{}:{}", LANGUAGE_PREFIX, l.id()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Audience(a) => a.label(),
            Self::Language(l) => l.label(),
        }
    }
}
