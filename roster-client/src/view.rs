//! Roster presentation model
//!
//! Ordering, badges, search and reminder links for the roster page. All
//! derived values come from [`MembershipStatus`] computed for a given day.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use reqwest::Url;
use shared::membership::MembershipStatus;
use shared::models::{ClientRecord, ClientView};

/// Membership badge shown next to each client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// Days past the end date
    Overdue(i64),
    /// Days until the end date (0 = ends today)
    DaysLeft(i64),
}

impl Badge {
    pub fn from_status(status: &MembershipStatus) -> Self {
        if status.is_overdue {
            Badge::Overdue(-status.days_remaining)
        } else {
            Badge::DaysLeft(status.days_remaining)
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Overdue(1) => f.write_str("Overdue by 1 day"),
            Badge::Overdue(n) => write!(f, "Overdue by {n} days"),
            Badge::DaysLeft(0) => f.write_str("Ends today"),
            Badge::DaysLeft(1) => f.write_str("1 day left"),
            Badge::DaysLeft(n) => write!(f, "{n} days left"),
        }
    }
}

/// A client paired with its status for one day
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub record: ClientRecord,
    pub status: MembershipStatus,
}

impl RosterEntry {
    pub fn new(record: ClientRecord, today: NaiveDate) -> Self {
        let status = record.status(today);
        Self { record, status }
    }

    pub fn badge(&self) -> Badge {
        Badge::from_status(&self.status)
    }

    /// "Fee due: 500" when anything is owed
    pub fn fee_due_badge(&self) -> Option<String> {
        self.status
            .has_fee_due
            .then(|| format!("Fee due: {}", self.record.fees.due))
    }

    /// Case-insensitive name substring, or contact prefix
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        self.record
            .name
            .to_lowercase()
            .contains(&query.to_lowercase())
            || self.record.contact.starts_with(query)
    }
}

impl From<ClientView> for RosterEntry {
    /// Keep the status the server computed
    fn from(view: ClientView) -> Self {
        Self {
            record: view.record,
            status: view.status,
        }
    }
}

/// Most urgent first: ascending days remaining, then by name
pub fn sort_by_urgency(entries: &mut [RosterEntry]) {
    entries.sort_by(|a, b| {
        match a.status.days_remaining.cmp(&b.status.days_remaining) {
            Ordering::Equal => a.record.name.to_lowercase().cmp(&b.record.name.to_lowercase()),
            other => other,
        }
    });
}

/// Entries matching `query`, order preserved
pub fn search<'a>(entries: &'a [RosterEntry], query: &str) -> Vec<&'a RosterEntry> {
    entries.iter().filter(|e| e.matches(query)).collect()
}

/// `https://wa.me/<cc><contact>?text=...` reminder link
///
/// `country_code` may carry a leading `+`; non-digits are dropped.
pub fn whatsapp_link(record: &ClientRecord, country_code: &str) -> Option<Url> {
    let cc: String = country_code.chars().filter(char::is_ascii_digit).collect();
    let text = format!(
        "Hi {}, your gym membership ends on {}. Please renew to keep training with us.",
        record.name,
        record.membership.end_date.format("%d %b %Y"),
    );
    Url::parse_with_params(
        &format!("https://wa.me/{cc}{}", record.contact),
        &[("text", text)],
    )
    .ok()
}
