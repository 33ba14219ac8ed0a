use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type ServiceId = i64;

/// Free-form record fields as supplied by clients (`title`, `originalPrice`, ...).
pub type Attributes = Map<String, Value>;

/// Keys owned by the store; never taken from client input.
pub const RESERVED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// One service listing.
///
/// Only the store-owned fields are typed. Everything else is kept exactly as
/// the client sent it and flattened back onto the same JSON object, so a
/// listing with an unexpected field type round-trips unchanged.
/// Hand-seeded records without timestamps read as the Unix epoch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: ServiceId,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Drop store-owned keys from client input.
pub fn strip_reserved(attrs: &mut Attributes) {
    for key in RESERVED_KEYS {
        attrs.remove(key);
    }
}

impl ServiceRecord {
    pub fn new(id: ServiceId, mut attributes: Attributes, now: DateTime<Utc>) -> Self {
        strip_reserved(&mut attributes);
        Self { id, attributes, created_at: now, updated_at: now }
    }

    /// Shallow merge: every supplied key replaces the stored value wholesale.
    /// `updated_at` never moves backwards even if the wall clock does.
    pub fn merge(&mut self, mut partial: Attributes, now: DateTime<Utc>) {
        strip_reserved(&mut partial);
        self.attributes.extend(partial);
        self.updated_at = now.max(self.updated_at);
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn str_attr(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_attr("title")
    }

    pub fn category(&self) -> Option<&str> {
        self.str_attr("category")
    }

    pub fn display_category(&self) -> Option<&str> {
        self.str_attr("displayCategory")
    }

    pub fn original_price(&self) -> Option<f64> {
        self.attribute("originalPrice").and_then(Value::as_f64)
    }

    pub fn discounted_price(&self) -> Option<f64> {
        self.attribute("discountedPrice").and_then(Value::as_f64)
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.attribute("mediaType")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
