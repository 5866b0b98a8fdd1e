//! Schema registry: one structured-output schema per [`ContentKind`].
//!
//! The same schema value drives both sides of a generation attempt. The
//! generation client renders it as the service's response-schema descriptor
//! (see [`Schema::to_response_schema`]) and the validator walks it to decide
//! whether the returned object conforms. Field order is significant: the
//! validator reports the first offending field in declaration order.
//!
//! Schemas are built once on first use and never mutated afterwards.

use std::sync::LazyLock;

use serde_json::{json, Map, Value};

use crate::{ContentFormat, ContentKind, Demand, Difficulty, MachineryType, TrainingType};

// ---------------------------------------------------------------------------
// Schema model
// ---------------------------------------------------------------------------

/// The value shape a field must have.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    /// A JSON string. `non_empty` rejects `""` and whitespace-only strings.
    Text { non_empty: bool },
    /// A finite JSON number, optionally bounded below (inclusive).
    Number { minimum: Option<f64> },
    /// A JSON string restricted to an exact set of values.
    Enum(&'static [&'static str]),
    /// A JSON array whose every element has the given shape.
    Array(Box<FieldShape>),
    /// A JSON object with its own field list.
    Object(Vec<FieldSpec>),
}

/// When a field must be present.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    /// Always present.
    Required,
    /// May be absent; checked for shape when present.
    Optional,
    /// Present and non-empty whenever the sibling field `field` holds the
    /// string `equals`; otherwise optional.
    NonEmptyWhen {
        field: &'static str,
        equals: &'static str,
    },
}

/// One named field in an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
    pub requirement: Requirement,
    /// Guidance forwarded to the model; never used for validation.
    pub description: Option<&'static str>,
}

impl FieldSpec {
    fn required(name: &'static str, shape: FieldShape) -> Self {
        Self {
            name,
            shape,
            requirement: Requirement::Required,
            description: None,
        }
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }
}

/// The structured-output contract for one content kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: ContentKind,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// The kind this schema describes.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Top-level fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Renders the schema as the generative service's response-schema
    /// descriptor (`OBJECT` / `STRING` / `NUMBER` / `ARRAY`).
    pub fn to_response_schema(&self) -> Value {
        object_descriptor(&self.fields)
    }
}

fn object_descriptor(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut descriptor = shape_descriptor(&field.shape);
        if let (Some(description), Some(obj)) = (field.description, descriptor.as_object_mut()) {
            obj.insert("description".to_string(), Value::from(description));
        }
        properties.insert(field.name.to_string(), descriptor);
    }
    let required: Vec<&str> = fields
        .iter()
        .filter(|f| f.requirement == Requirement::Required)
        .map(|f| f.name)
        .collect();
    let ordering: Vec<&str> = fields.iter().map(|f| f.name).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
        "propertyOrdering": ordering,
    })
}

fn shape_descriptor(shape: &FieldShape) -> Value {
    match shape {
        FieldShape::Text { .. } => json!({ "type": "STRING" }),
        FieldShape::Number { .. } => json!({ "type": "NUMBER" }),
        FieldShape::Enum(values) => json!({ "type": "STRING", "enum": values }),
        FieldShape::Array(items) => json!({ "type": "ARRAY", "items": shape_descriptor(items) }),
        FieldShape::Object(fields) => object_descriptor(fields),
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

const TEXT: FieldShape = FieldShape::Text { non_empty: false };
const NAME: FieldShape = FieldShape::Text { non_empty: true };
const AMOUNT: FieldShape = FieldShape::Number { minimum: Some(0.0) };

fn text_list() -> FieldShape {
    FieldShape::Array(Box::new(TEXT))
}

static MACHINERY_SCHEMA: LazyLock<Schema> = LazyLock::new(|| Schema {
    kind: ContentKind::Machinery,
    fields: vec![
        FieldSpec::required("name", NAME),
        FieldSpec::required("type", FieldShape::Enum(MachineryType::VALUES)),
        FieldSpec::required("power", TEXT).describe("e.g., '75 HP'"),
        FieldSpec::required("price", AMOUNT).describe("Price per day"),
        FieldSpec::required("image", NAME).describe(
            "A single emoji representing the machinery. e.g., '🚜' for Tractor, '🌾' for Harvester.",
        ),
        FieldSpec::required("location", TEXT),
        FieldSpec::required("suitable", text_list()),
        FieldSpec::required("demand", FieldShape::Enum(Demand::VALUES)),
        FieldSpec::required("soilSuitability", text_list()),
    ],
});

static TRAINING_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let link = FieldShape::Object(vec![
        FieldSpec::required("title", NAME),
        FieldSpec::required("url", NAME),
    ]);
    let content = FieldShape::Object(vec![
        FieldSpec::required("type", FieldShape::Enum(ContentFormat::VALUES)),
        FieldSpec::required("items", text_list()),
        FieldSpec::required("links", FieldShape::Array(Box::new(link)))
            .requirement(Requirement::NonEmptyWhen {
                field: "type",
                equals: ContentFormat::Video.as_str(),
            })
            .describe("Only include if content type is 'video'."),
    ]);

    Schema {
        kind: ContentKind::Training,
        fields: vec![
            FieldSpec::required("title", NAME),
            FieldSpec::required("type", FieldShape::Enum(TrainingType::VALUES)),
            FieldSpec::required("machineryType", text_list()),
            FieldSpec::required("difficulty", FieldShape::Enum(Difficulty::VALUES)),
            FieldSpec::required("duration", AMOUNT).describe("Duration in minutes"),
            FieldSpec::required("icon", NAME).describe(
                "A single emoji representing the training type. e.g., '📖' for Manual, '📹' for Video.",
            ),
            FieldSpec::required("description", TEXT),
            FieldSpec::required("content", content),
        ],
    }
});

/// Returns the schema for `kind`.
pub fn schema_for(kind: ContentKind) -> &'static Schema {
    match kind {
        ContentKind::Machinery => LazyLock::force(&MACHINERY_SCHEMA),
        ContentKind::Training => LazyLock::force(&TRAINING_SCHEMA),
    }
}

/// Returns the system instruction sent alongside prompts of `kind`.
///
/// Pins the output to JSON per the kind's schema and the glyph field to a
/// single emoji.
pub fn instruction_for(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Machinery => {
            "You are an agricultural machinery database assistant. Based on the user prompt, \
             generate the data for a new piece of machinery in JSON format according to the \
             provided schema. Write all text in English. The `image` property must be a single emoji."
        }
        ContentKind::Training => {
            "You are a training content creator for an agricultural platform. Based on the user \
             prompt, generate the data for a new training module in JSON format according to the \
             provided schema. Write all text in English. The `icon` property must be a single emoji."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_total_and_kind_tagged() {
        for kind in ContentKind::ALL {
            assert_eq!(schema_for(kind).kind(), kind);
            assert!(!instruction_for(kind).is_empty());
        }
    }

    #[test]
    fn machinery_fields_are_all_required() {
        let schema = schema_for(ContentKind::Machinery);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            [
                "name",
                "type",
                "power",
                "price",
                "image",
                "location",
                "suitable",
                "demand",
                "soilSuitability"
            ]
        );
        assert!(schema
            .fields()
            .iter()
            .all(|f| f.requirement == Requirement::Required));
    }

    #[test]
    fn response_schema_marks_links_as_not_required() {
        let descriptor = schema_for(ContentKind::Training).to_response_schema();
        let content = &descriptor["properties"]["content"];
        assert_eq!(content["type"], "OBJECT");
        assert_eq!(content["required"], json!(["type", "items"]));
        assert_eq!(content["properties"]["links"]["type"], "ARRAY");
        assert_eq!(
            content["properties"]["links"]["items"]["required"],
            json!(["title", "url"])
        );
    }

    #[test]
    fn response_schema_lists_enum_values() {
        let descriptor = schema_for(ContentKind::Machinery).to_response_schema();
        assert_eq!(
            descriptor["properties"]["demand"],
            json!({ "type": "STRING", "enum": ["high", "medium", "low"] })
        );
        assert_eq!(descriptor["properties"]["price"]["description"], "Price per day");
        assert_eq!(descriptor["propertyOrdering"][0], "name");
    }
}
