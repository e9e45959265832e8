//! Read projections over a [`Participant`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::participant::{Home, Participant, Work};

/// Entry of the `/details` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonalSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<Value>,
}

/// Full detail view of one participant.
///
/// Salary and currency are lifted out of `work` alongside the nested sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParticipantDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<Work>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<Home>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Value>,
}

/// Active employment view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companyname: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Value>,
}

/// Active residence view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HomeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<Value>,
}

impl From<&Participant> for PersonalSummary {
    fn from(participant: &Participant) -> Self {
        let info = participant.personal_info.as_ref();
        Self {
            firstname: info.and_then(|i| i.firstname.clone()),
            lastname: info.and_then(|i| i.lastname.clone()),
            dob: info.and_then(|i| i.dob.clone()),
        }
    }
}

impl From<&Participant> for ParticipantDetails {
    fn from(participant: &Participant) -> Self {
        let summary = PersonalSummary::from(participant);
        let work = participant.work.as_ref();
        Self {
            firstname: summary.firstname,
            lastname: summary.lastname,
            dob: summary.dob,
            work: participant.work.clone(),
            home: participant.home.clone(),
            email: participant.email.clone(),
            salary: work.and_then(|w| w.salary.clone()),
            currency: work.and_then(|w| w.currency.clone()),
        }
    }
}

impl From<&Work> for WorkDetails {
    fn from(work: &Work) -> Self {
        Self {
            companyname: work.companyname.clone(),
            salary: work.salary.clone(),
            currency: work.currency.clone(),
        }
    }
}

impl From<&Home> for HomeDetails {
    fn from(home: &Home) -> Self {
        Self {
            country: home.country.clone(),
            city: home.city.clone(),
        }
    }
}
