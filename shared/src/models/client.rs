//! Client (gym member) Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::form::FormValue;
use crate::membership::MembershipStatus;

/// Training goal (fixed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Gain Weight")]
    GainWeight,
    #[serde(rename = "Lose Weight")]
    LoseWeight,
    #[serde(rename = "Maintain Weight")]
    MaintainWeight,
    #[serde(rename = "Powerlifting")]
    Powerlifting,
    #[serde(rename = "Bodybuilding")]
    Bodybuilding,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::GainWeight,
        Goal::LoseWeight,
        Goal::MaintainWeight,
        Goal::Powerlifting,
        Goal::Bodybuilding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::GainWeight => "Gain Weight",
            Goal::LoseWeight => "Lose Weight",
            Goal::MaintainWeight => "Maintain Weight",
            Goal::Powerlifting => "Powerlifting",
            Goal::Bodybuilding => "Bodybuilding",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown goal: {s}"))
    }
}

/// Personal-training tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PtTier {
    #[default]
    None,
    Standard,
    Advanced,
}

impl PtTier {
    pub const ALL: [PtTier; 3] = [PtTier::None, PtTier::Standard, PtTier::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            PtTier::None => "None",
            PtTier::Standard => "Standard",
            PtTier::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for PtTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PtTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PtTier::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown PT tier: {s}"))
    }
}

/// Height in feet and inches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Height {
    pub feet: u8,
    pub inches: u8,
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}\"", self.feet, self.inches)
    }
}

/// Medical condition flag; `details` is empty unless `has_condition`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCondition {
    pub has_condition: bool,
    #[serde(default)]
    pub details: String,
}

impl MedicalCondition {
    /// Build a condition, clearing details when the flag is off
    pub fn new(has_condition: bool, details: impl Into<String>) -> Self {
        Self {
            has_condition,
            details: if has_condition { details.into() } else { String::new() },
        }
    }
}

/// Fee state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fees {
    pub submitted: f64,
    #[serde(default)]
    pub due: f64,
}

/// Current membership period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub months: u32,
    pub fee_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A validated client, ready to be stored (no id, no timestamps)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub contact: String,
    pub aadhaar: String,
    pub height: Height,
    pub weight: f64,
    pub goal: Goal,
    pub medical_condition: MedicalCondition,
    pub fees: Fees,
    pub pt: PtTier,
    pub membership: Membership,
}

/// Stored client record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub aadhaar: String,
    pub height: Height,
    pub weight: f64,
    pub goal: Goal,
    pub medical_condition: MedicalCondition,
    pub fees: Fees,
    pub pt: PtTier,
    pub membership: Membership,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

impl ClientRecord {
    pub fn from_draft(id: i64, draft: ClientDraft, created_at: i64, updated_at: i64) -> Self {
        Self {
            id,
            name: draft.name,
            contact: draft.contact,
            aadhaar: draft.aadhaar,
            height: draft.height,
            weight: draft.weight,
            goal: draft.goal,
            medical_condition: draft.medical_condition,
            fees: draft.fees,
            pt: draft.pt,
            membership: draft.membership,
            created_at,
            updated_at,
        }
    }

    /// Derived membership state as of `today`
    pub fn status(&self, today: NaiveDate) -> MembershipStatus {
        MembershipStatus::compute(self.membership.end_date, self.fees.due, today)
    }
}

/// Record plus derived status (GET/POST/PUT responses)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientView {
    #[serde(flatten)]
    pub record: ClientRecord,
    pub status: MembershipStatus,
}

impl ClientView {
    pub fn new(record: ClientRecord, today: NaiveDate) -> Self {
        let status = record.status(today);
        Self { record, status }
    }
}

/// Flat form fields as submitted by the roster page
///
/// Nothing here is trusted; the server validates it into a [`ClientDraft`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub name: Option<String>,
    pub contact: Option<FormValue>,
    pub aadhaar: Option<FormValue>,
    pub height_ft: Option<FormValue>,
    pub height_in: Option<FormValue>,
    pub weight: Option<FormValue>,
    pub goal: Option<String>,
    pub has_medical_condition: Option<FormValue>,
    pub condition_details: Option<String>,
    pub fees_submitted: Option<FormValue>,
    pub fees_due: Option<FormValue>,
    pub pt: Option<String>,
    pub months: Option<FormValue>,
    pub fee_date: Option<String>,
}

impl From<&ClientRecord> for ClientInput {
    /// Form prefilled from a stored record (edit view)
    fn from(record: &ClientRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            contact: Some(FormValue::from(record.contact.as_str())),
            aadhaar: Some(FormValue::from(record.aadhaar.as_str())),
            height_ft: Some(FormValue::from(f64::from(record.height.feet))),
            height_in: Some(FormValue::from(f64::from(record.height.inches))),
            weight: Some(FormValue::from(record.weight)),
            goal: Some(record.goal.to_string()),
            has_medical_condition: Some(FormValue::Bool(record.medical_condition.has_condition)),
            condition_details: Some(record.medical_condition.details.clone()),
            fees_submitted: Some(FormValue::from(record.fees.submitted)),
            fees_due: Some(FormValue::from(record.fees.due)),
            pt: Some(record.pt.to_string()),
            months: Some(FormValue::from(f64::from(record.membership.months))),
            fee_date: Some(record.membership.fee_date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// PUT /clients body: `{id, ...fields}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceClientRequest {
    pub id: Option<FormValue>,
    #[serde(flatten)]
    pub input: ClientInput,
}

/// DELETE /clients body: `{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteClientRequest {
    pub id: Option<FormValue>,
}

/// Identity of a removed client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedClient {
    pub id: i64,
    pub name: String,
}

/// DELETE /clients response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteClientResponse {
    pub message: String,
    pub deleted_client: DeletedClient,
}
