//! Participant census record.
//!
//! The wire shape is deliberately lenient: every section and field is optional,
//! leaf values are kept as raw JSON, and unknown keys are carried along, so an
//! update body is stored exactly as sent and an insert body is reported on by
//! the validator instead of being rejected by the decoder.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Email of the record every fresh store starts with.
pub const SEED_EMAIL: &str = "example@example.com";

/// A single participant, keyed by email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<Work>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Home>,

    /// Keys outside the known sections.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Name and date of birth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub firstname: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub lastname: Option<Value>,

    /// Date of birth, `YYYY/MM/DD`.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dob: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Employment section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Work {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub companyname: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub salary: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub currency: Option<Value>,

    /// Soft-delete marker. Never set by the API, honoured on reads.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Residence section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Home {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub city: Option<Value>,

    /// Soft-delete marker. Never set by the API, honoured on reads.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A key that is present decodes to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Loose truthiness: absent, `null`, `false`, `0` and `""` are all falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

impl Participant {
    /// Create a fully populated participant.
    pub fn new(
        email: impl Into<String>,
        personal_info: PersonalInfo,
        work: Work,
        home: Home,
    ) -> Self {
        Self {
            email: Some(Value::String(email.into())),
            personal_info: Some(personal_info),
            work: Some(work),
            home: Some(home),
            extra: Map::new(),
        }
    }

    /// The record every store is seeded with.
    pub fn seed() -> Self {
        Self::new(
            SEED_EMAIL,
            PersonalInfo::new("John Updates", "Doe", "1990/06/15"),
            Work::new("New Acme Inc", 55000, "USD"),
            Home::new("USA", "Chicago"),
        )
    }

    /// Email, if present as a string.
    pub fn email(&self) -> Option<&str> {
        self.email.as_ref().and_then(Value::as_str)
    }

    /// Work section unless absent or flagged deleted.
    pub fn active_work(&self) -> Option<&Work> {
        self.work.as_ref().filter(|w| !w.is_deleted())
    }

    /// Home section unless absent or flagged deleted.
    pub fn active_home(&self) -> Option<&Home> {
        self.home.as_ref().filter(|h| !h.is_deleted())
    }
}

impl PersonalInfo {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        dob: impl Into<String>,
    ) -> Self {
        Self {
            firstname: Some(Value::String(firstname.into())),
            lastname: Some(Value::String(lastname.into())),
            dob: Some(Value::String(dob.into())),
            extra: Map::new(),
        }
    }
}

impl Work {
    pub fn new(
        companyname: impl Into<String>,
        salary: impl Into<Value>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            companyname: Some(Value::String(companyname.into())),
            salary: Some(salary.into()),
            currency: Some(Value::String(currency.into())),
            deleted: None,
            extra: Map::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        is_truthy(self.deleted.as_ref())
    }
}

impl Home {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: Some(Value::String(country.into())),
            city: Some(Value::String(city.into())),
            deleted: None,
            extra: Map::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        is_truthy(self.deleted.as_ref())
    }
}
