//! Client Repository

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{
    ClientDraft, ClientRecord, DeletedClient, Fees, Goal, Height, MedicalCondition, Membership,
    PtTier,
};
use sqlx::SqlitePool;

use super::{ClientStore, RepoError, RepoResult};
use crate::db::DbService;

const CLIENT_SELECT: &str = "SELECT id, name, contact, aadhaar, height_ft, height_in, weight, goal, has_medical_condition, condition_details, fees_submitted, fees_due, pt, membership_months, fee_date, end_date, created_at, updated_at FROM client";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i64,
    name: String,
    contact: String,
    aadhaar: String,
    height_ft: i64,
    height_in: i64,
    weight: f64,
    goal: String,
    has_medical_condition: bool,
    condition_details: String,
    fees_submitted: f64,
    fees_due: f64,
    pt: String,
    membership_months: i64,
    fee_date: String,
    end_date: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ClientRow> for ClientRecord {
    type Error = RepoError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |what: &str| RepoError::Database(format!("Client {id}: invalid {what}"));

        Ok(ClientRecord {
            id: row.id,
            height: Height {
                feet: u8::try_from(row.height_ft).map_err(|_| corrupt("height_ft"))?,
                inches: u8::try_from(row.height_in).map_err(|_| corrupt("height_in"))?,
            },
            weight: row.weight,
            goal: row.goal.parse::<Goal>().map_err(|_| corrupt("goal"))?,
            medical_condition: MedicalCondition::new(
                row.has_medical_condition,
                row.condition_details.clone(),
            ),
            fees: Fees {
                submitted: row.fees_submitted,
                due: row.fees_due,
            },
            pt: row.pt.parse::<PtTier>().map_err(|_| corrupt("pt"))?,
            membership: Membership {
                months: u32::try_from(row.membership_months)
                    .map_err(|_| corrupt("membership_months"))?,
                fee_date: NaiveDate::parse_from_str(&row.fee_date, DATE_FORMAT)
                    .map_err(|_| corrupt("fee_date"))?,
                end_date: NaiveDate::parse_from_str(&row.end_date, DATE_FORMAT)
                    .map_err(|_| corrupt("end_date"))?,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            name: row.name,
            contact: row.contact,
            aadhaar: row.aadhaar,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ClientRecord>> {
    let sql = format!("{CLIENT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, ClientRow>(&sql)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(ClientRecord::try_from).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ClientRecord>> {
    let sql = format!("{CLIENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, ClientRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(ClientRecord::try_from).transpose()
}

/// Attempts at drawing a fresh snowflake id before giving up
const MAX_ID_ATTEMPTS: usize = 3;

pub async fn insert(pool: &SqlitePool, draft: ClientDraft) -> RepoResult<ClientRecord> {
    let mut attempt = 1;
    loop {
        match insert_with_id(pool, shared::util::snowflake_id(), &draft).await {
            Ok((id, now)) => return Ok(ClientRecord::from_draft(id, draft, now, now)),
            Err(RepoError::Duplicate { field }) if field == "id" && attempt < MAX_ID_ATTEMPTS => {
                tracing::debug!(attempt, "Snowflake id collision, drawing a new id");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn insert_with_id(pool: &SqlitePool, id: i64, draft: &ClientDraft) -> RepoResult<(i64, i64)> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO client (id, name, contact, aadhaar, height_ft, height_in, weight, goal, has_medical_condition, condition_details, fees_submitted, fees_due, pt, membership_months, fee_date, end_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)",
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.contact)
    .bind(&draft.aadhaar)
    .bind(i64::from(draft.height.feet))
    .bind(i64::from(draft.height.inches))
    .bind(draft.weight)
    .bind(draft.goal.as_str())
    .bind(draft.medical_condition.has_condition)
    .bind(&draft.medical_condition.details)
    .bind(draft.fees.submitted)
    .bind(draft.fees.due)
    .bind(draft.pt.as_str())
    .bind(i64::from(draft.membership.months))
    .bind(format_date(draft.membership.fee_date))
    .bind(format_date(draft.membership.end_date))
    .bind(now)
    .execute(pool)
    .await?;
    Ok((id, now))
}

/// Overwrite every field of an existing client; `created_at` is kept
pub async fn replace_by_id(
    pool: &SqlitePool,
    id: i64,
    draft: ClientDraft,
) -> RepoResult<ClientRecord> {
    let now = shared::util::now_millis();
    let created_at: Option<i64> = sqlx::query_scalar(
        "UPDATE client SET name = ?1, contact = ?2, aadhaar = ?3, height_ft = ?4, height_in = ?5, weight = ?6, goal = ?7, has_medical_condition = ?8, condition_details = ?9, fees_submitted = ?10, fees_due = ?11, pt = ?12, membership_months = ?13, fee_date = ?14, end_date = ?15, updated_at = ?16 WHERE id = ?17 RETURNING created_at",
    )
    .bind(&draft.name)
    .bind(&draft.contact)
    .bind(&draft.aadhaar)
    .bind(i64::from(draft.height.feet))
    .bind(i64::from(draft.height.inches))
    .bind(draft.weight)
    .bind(draft.goal.as_str())
    .bind(draft.medical_condition.has_condition)
    .bind(&draft.medical_condition.details)
    .bind(draft.fees.submitted)
    .bind(draft.fees.due)
    .bind(draft.pt.as_str())
    .bind(i64::from(draft.membership.months))
    .bind(format_date(draft.membership.fee_date))
    .bind(format_date(draft.membership.end_date))
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let created_at = created_at.ok_or_else(|| RepoError::NotFound(format!("Client {id}")))?;
    Ok(ClientRecord::from_draft(id, draft, created_at, now))
}

pub async fn delete_by_id(pool: &SqlitePool, id: i64) -> RepoResult<DeletedClient> {
    let name: Option<String> = sqlx::query_scalar("DELETE FROM client WHERE id = ? RETURNING name")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    name.map(|name| DeletedClient { id, name })
        .ok_or_else(|| RepoError::NotFound(format!("Client {id}")))
}

/// [`ClientStore`] backed by the SQLite pool
#[derive(Clone, Debug)]
pub struct SqliteClientStore {
    db: DbService,
}

impl SqliteClientStore {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientStore for SqliteClientStore {
    async fn find_all(&self) -> RepoResult<Vec<ClientRecord>> {
        find_all(self.db.pool().await?).await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<ClientRecord>> {
        find_by_id(self.db.pool().await?, id).await
    }

    async fn insert(&self, draft: ClientDraft) -> RepoResult<ClientRecord> {
        insert(self.db.pool().await?, draft).await
    }

    async fn replace_by_id(&self, id: i64, draft: ClientDraft) -> RepoResult<ClientRecord> {
        replace_by_id(self.db.pool().await?, id, draft).await
    }

    async fn delete_by_id(&self, id: i64) -> RepoResult<DeletedClient> {
        delete_by_id(self.db.pool().await?, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DatabaseConfig;

    fn draft(contact: &str, aadhaar: &str) -> ClientDraft {
        let fee_date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        ClientDraft {
            name: "Meera Iyer".into(),
            contact: contact.into(),
            aadhaar: aadhaar.into(),
            height: Height { feet: 5, inches: 4 },
            weight: 58.0,
            goal: Goal::Powerlifting,
            medical_condition: MedicalCondition::new(true, "knee surgery 2022"),
            fees: Fees { submitted: 2000.0, due: 500.0 },
            pt: PtTier::Advanced,
            membership: Membership {
                months: 1,
                fee_date,
                end_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            },
        }
    }

    async fn test_store() -> SqliteClientStore {
        let db = DbService::new(&DatabaseConfig::in_memory()).unwrap();
        SqliteClientStore::new(db)
    }

    #[tokio::test]
    async fn insert_then_find_roundtrips_every_field() {
        let store = test_store().await;
        let created = store.insert(draft("9000000001", "100000000001")).await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.medical_condition.details, "knee surgery 2022");
        assert_eq!(found.membership.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(found.created_at, found.updated_at);
    }

    #[tokio::test]
    async fn duplicate_contact_names_contact() {
        let store = test_store().await;
        store.insert(draft("9000000001", "100000000001")).await.unwrap();

        let err = store
            .insert(draft("9000000001", "100000000002"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { ref field } if field == "contact"));
    }

    #[tokio::test]
    async fn duplicate_aadhaar_names_aadhaar() {
        let store = test_store().await;
        store.insert(draft("9000000001", "100000000001")).await.unwrap();

        let err = store
            .insert(draft("9000000002", "100000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { ref field } if field == "aadhaar"));
    }

    #[tokio::test]
    async fn replace_overwrites_and_keeps_created_at() {
        let store = test_store().await;
        let created = store.insert(draft("9000000001", "100000000001")).await.unwrap();

        let mut next = draft("9000000009", "100000000001");
        next.name = "Meera R. Iyer".into();
        next.medical_condition = MedicalCondition::new(false, "");
        next.pt = PtTier::None;

        let replaced = store.replace_by_id(created.id, next).await.unwrap();
        assert_eq!(replaced.created_at, created.created_at);
        assert_eq!(replaced.contact, "9000000009");

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Meera R. Iyer");
        assert!(!found.medical_condition.has_condition);
        assert!(found.medical_condition.details.is_empty());
        assert_eq!(found.pt, PtTier::None);
    }

    #[tokio::test]
    async fn replace_missing_is_not_found() {
        let store = test_store().await;
        let err = store
            .replace_by_id(12345, draft("9000000001", "100000000001"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn replace_into_taken_contact_is_duplicate() {
        let store = test_store().await;
        store.insert(draft("9000000001", "100000000001")).await.unwrap();
        let second = store.insert(draft("9000000002", "100000000002")).await.unwrap();

        let err = store
            .replace_by_id(second.id, draft("9000000001", "100000000002"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { ref field } if field == "contact"));
    }

    #[tokio::test]
    async fn delete_twice_is_ok_then_not_found() {
        let store = test_store().await;
        let created = store.insert(draft("9000000001", "100000000001")).await.unwrap();

        let deleted = store.delete_by_id(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);
        assert_eq!(deleted.name, "Meera Iyer");

        let err = store.delete_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_returns_every_record() {
        let store = test_store().await;
        assert!(store.find_all().await.unwrap().is_empty());

        store.insert(draft("9000000001", "100000000001")).await.unwrap();
        store.insert(draft("9000000002", "100000000002")).await.unwrap();

        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }
}
