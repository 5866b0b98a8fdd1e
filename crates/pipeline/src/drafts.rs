//! Drafts produced by validation and the records catalogs create from them.
//!
//! Field names on the wire follow the keys the generative service is asked to
//! produce (`price`, `image`, `suitable`, `machineryType`, ...). The Rust field
//! names describe what each value means.

use serde::{Deserialize, Serialize};

use crate::{
    ContentFormat, ContentKind, Demand, Difficulty, MachineryId, MachineryType, TrainingModuleId,
    TrainingType,
};

// ---------------------------------------------------------------------------
// Machinery
// ---------------------------------------------------------------------------

/// A schema-conforming machinery listing that has not been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineryDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub machinery_type: MachineryType,
    /// Free-form power rating, e.g. `"75 HP"`.
    pub power: String,
    /// Rental price per day.
    #[serde(rename = "price")]
    pub price_per_day: f64,
    /// A single emoji shown in place of a photo.
    #[serde(rename = "image")]
    pub image_glyph: String,
    pub location: String,
    /// Crops the machine is suited to.
    #[serde(rename = "suitable")]
    pub suitable_for: Vec<String>,
    pub demand: Demand,
    #[serde(rename = "soilSuitability")]
    pub soil_suitability: Vec<String>,
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// A titled link attached to video training content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

/// The body of a training module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingContent {
    #[serde(rename = "type")]
    pub format: ContentFormat,
    /// Ordered checklist steps, paragraphs, or video notes.
    pub items: Vec<String>,
    /// Non-empty whenever `format` is [`ContentFormat::Video`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ResourceLink>,
}

/// A schema-conforming training module that has not been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub training_type: TrainingType,
    /// Machinery categories or models the module applies to.
    #[serde(rename = "machineryType")]
    pub machinery_types: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(rename = "duration")]
    pub duration_minutes: f64,
    /// A single emoji shown next to the title.
    #[serde(rename = "icon")]
    pub icon_glyph: String,
    pub description: String,
    pub content: TrainingContent,
}

// ---------------------------------------------------------------------------
// Kind-tagged draft
// ---------------------------------------------------------------------------

/// A draft that passed schema conformance for its kind.
///
/// Only [`crate::validator::validate`] constructs these from model output, so
/// holding one is proof that every required, enumerated, and conditional
/// constraint of the kind's schema was met.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValidatedDraft {
    Machinery(MachineryDraft),
    Training(TrainingDraft),
}

impl ValidatedDraft {
    /// The kind this draft belongs to.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Machinery(_) => ContentKind::Machinery,
            Self::Training(_) => ContentKind::Training,
        }
    }

    /// Human-facing label: the machinery name or the training title.
    pub fn label(&self) -> &str {
        match self {
            Self::Machinery(m) => &m.name,
            Self::Training(t) => &t.title,
        }
    }

    /// Renders the draft as indented JSON for human review.
    pub fn to_preview_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Committed records
// ---------------------------------------------------------------------------

/// Contact details of the operator who lists generated machinery.
///
/// Catalogs copy these onto every committed machinery record; drafts never
/// supply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingOwner {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// A machinery listing owned by the machinery catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineryRecord {
    pub id: MachineryId,
    #[serde(flatten)]
    pub draft: MachineryDraft,
    /// Average renter rating; `None` until the first review.
    pub rating: Option<f32>,
    /// Distance from the viewing renter in kilometres; `None` when unknown.
    pub distance_km: Option<f64>,
    pub owner: String,
    pub phone: String,
    pub address: String,
}

/// A training module owned by the training catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingModuleRecord {
    pub id: TrainingModuleId,
    #[serde(flatten)]
    pub draft: TrainingDraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tractor() -> MachineryDraft {
        MachineryDraft {
            name: "Mahindra 575".to_string(),
            machinery_type: MachineryType::Tractor,
            power: "90 HP".to_string(),
            price_per_day: 2500.0,
            image_glyph: "🚜".to_string(),
            location: "Pune".to_string(),
            suitable_for: vec!["Sugarcane".to_string()],
            demand: Demand::High,
            soil_suitability: vec!["Black".to_string()],
        }
    }

    #[test]
    fn preview_uses_wire_keys() {
        let draft = ValidatedDraft::Machinery(tractor());
        let preview = draft.to_preview_json().unwrap();
        assert!(preview.contains("\"price\": 2500.0"));
        assert!(preview.contains("\"soilSuitability\""));
        assert!(!preview.contains("price_per_day"));
    }

    #[test]
    fn draft_reports_kind_and_label() {
        let draft = ValidatedDraft::Machinery(tractor());
        assert_eq!(draft.kind(), ContentKind::Machinery);
        assert_eq!(draft.label(), "Mahindra 575");
    }

    #[test]
    fn record_flattens_draft_fields() {
        let record = MachineryRecord {
            id: MachineryId::new(3),
            draft: tractor(),
            rating: None,
            distance_km: None,
            owner: "Asha".to_string(),
            phone: "555-0100".to_string(),
            address: "Farm Rd".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["name"], "Mahindra 575");
        assert!(value["rating"].is_null());

        let back: MachineryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
