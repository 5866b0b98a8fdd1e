//! Shared value types for the content assistant domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. a [`Prompt`] is never blank, every
//! enumerated field only admits its fixed wire values) and participate in
//! validation and routing decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for closed value sets with fixed wire spellings.
// Generates: enum, VALUES, as_str(), from_wire(), Display.
// ---------------------------------------------------------------------------
macro_rules! wire_enum {
    (
        $(#[$attr:meta])*
        $name:ident {
            $( $(#[$vattr:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vattr])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            /// Returns the wire spelling of this value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Looks up a value by its exact wire spelling.
            ///
            /// Matching is case-sensitive; anything outside [`Self::VALUES`]
            /// returns `None` rather than being coerced.
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Content kind
// ---------------------------------------------------------------------------

wire_enum! {
    /// The content category a generation attempt produces.
    ///
    /// Selects the schema, the system instruction, and the commit target.
    ContentKind {
        /// A rentable machinery listing.
        Machinery => "machinery",
        /// An operator training module.
        Training => "training",
    }
}

impl ContentKind {
    /// Both kinds, in selector order.
    pub const ALL: [ContentKind; 2] = [ContentKind::Machinery, ContentKind::Training];
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s.trim().to_ascii_lowercase().as_str()).ok_or_else(|| {
            format!(
                "unknown content kind '{s}' (expected one of: {})",
                Self::VALUES.join(", ")
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Machinery value sets
// ---------------------------------------------------------------------------

wire_enum! {
    /// Category of a machinery listing.
    MachineryType {
        Tractor => "Tractor",
        Harvester => "Harvester",
        Cultivator => "Cultivator",
        Sprayer => "Sprayer",
        Seeder => "Seeder",
    }
}

wire_enum! {
    /// Seasonal rental demand for a machinery listing.
    Demand {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

// ---------------------------------------------------------------------------
// Training value sets
// ---------------------------------------------------------------------------

wire_enum! {
    /// Presentation style of a training module.
    TrainingType {
        Video => "Video",
        Manual => "Manual",
        QuickTip => "Quick Tip",
    }
}

wire_enum! {
    /// Skill level a training module targets.
    Difficulty {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
    }
}

wire_enum! {
    /// Shape of a training module's body.
    ContentFormat {
        Checklist => "checklist",
        /// Video content must carry at least one link.
        Video => "video",
        Text => "text",
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Free-text operator intent for one generation attempt.
///
/// Never empty or whitespace-only; surrounding whitespace is trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prompt(String);

impl Prompt {
    /// Creates a prompt, returning `None` if the text is blank.
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Raw model output
// ---------------------------------------------------------------------------

/// Text returned by the generative service. Not yet trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelResponse(String);

impl RawModelResponse {
    /// Wraps raw response text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the response contains no visible characters.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_rejects_blank_text() {
        assert!(Prompt::new("").is_none());
        assert!(Prompt::new("   \n\t").is_none());
        assert_eq!(
            Prompt::new("  A 90 HP tractor  ").unwrap().as_str(),
            "A 90 HP tractor"
        );
    }

    #[test]
    fn wire_values_are_exact() {
        assert_eq!(TrainingType::QuickTip.as_str(), "Quick Tip");
        assert_eq!(Demand::from_wire("high"), Some(Demand::High));
        assert_eq!(Demand::from_wire("High"), None);
        assert_eq!(Demand::from_wire("extreme"), None);
        assert_eq!(MachineryType::VALUES.len(), 5);
    }

    #[test]
    fn wire_enum_serde_matches_as_str() {
        let json = serde_json::to_string(&TrainingType::QuickTip).unwrap();
        assert_eq!(json, "\"Quick Tip\"");
        let back: ContentFormat = serde_json::from_str("\"checklist\"").unwrap();
        assert_eq!(back, ContentFormat::Checklist);
    }

    #[test]
    fn content_kind_parses_case_insensitively() {
        assert_eq!("Machinery".parse::<ContentKind>(), Ok(ContentKind::Machinery));
        assert_eq!(" training ".parse::<ContentKind>(), Ok(ContentKind::Training));
        assert!("bookings".parse::<ContentKind>().is_err());
    }

    #[test]
    fn blank_raw_response_is_detected() {
        assert!(RawModelResponse::new("  \n").is_blank());
        assert!(!RawModelResponse::new("{}").is_blank());
    }
}
