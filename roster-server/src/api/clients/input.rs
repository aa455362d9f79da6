//! Client form validation
//!
//! Turns the untrusted flat [`ClientInput`] into a [`ClientDraft`] with the
//! membership end date computed. Runs before any store access.

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::ErrorCode;
use shared::membership::{self, MAX_MONTHS};
use shared::models::{
    ClientDraft, ClientInput, Fees, FormValue, Goal, Height, MedicalCondition, Membership, PtTier,
};

use crate::utils::time::{parse_date, validate_not_future};
use crate::utils::validation::{
    AADHAAR_DIGITS, CONTACT_DIGITS, MAX_NAME_LEN, MAX_NOTE_LEN, parse_flag, parse_integer_in,
    parse_number_in, validate_digits, validate_required_text, validate_text_len,
};
use crate::utils::{AppError, AppResult};

const MAX_FEE: f64 = 10_000_000.0;
const MAX_WEIGHT_KG: f64 = 500.0;

/// Validate a submitted form against `today` in the business timezone `tz`
pub fn validate_client(input: ClientInput, today: NaiveDate, tz: Tz) -> AppResult<ClientDraft> {
    check_required(&input)?;

    // Presence was checked above; the `unwrap_or` fallbacks are unreachable.
    let name = input.name.unwrap_or_default().trim().to_string();
    validate_required_text(&name, "name", MAX_NAME_LEN)?;

    let contact = text_of(input.contact.as_ref());
    validate_digits(&contact, "contact", CONTACT_DIGITS)?;

    let aadhaar = text_of(input.aadhaar.as_ref());
    validate_digits(&aadhaar, "aadhaar", AADHAAR_DIGITS)?;

    let height = Height {
        feet: parse_integer_in(required(&input.height_ft, "heightFt")?, "heightFt", 0, 9)? as u8,
        inches: match optional(&input.height_in) {
            Some(v) => parse_integer_in(v, "heightIn", 0, 11)? as u8,
            None => 0,
        },
    };

    let weight = parse_number_in(required(&input.weight, "weight")?, "weight", 0.0, MAX_WEIGHT_KG)?;
    if weight <= 0.0 {
        return Err(AppError::out_of_range("weight", "weight must be greater than 0"));
    }

    let goal = input
        .goal
        .as_deref()
        .unwrap_or_default()
        .parse::<Goal>()
        .map_err(|_| {
            AppError::invalid_format("goal", "goal must be one of the listed goals")
                .with_detail("allowed", Goal::ALL.map(|g| g.as_str()).to_vec())
        })?;

    let pt = match input.pt.as_deref().map(str::trim) {
        None | Some("") => PtTier::None,
        Some(raw) => raw.parse::<PtTier>().map_err(|_| {
            AppError::invalid_format("pt", "pt must be None, Standard or Advanced")
                .with_detail("allowed", PtTier::ALL.map(|t| t.as_str()).to_vec())
        })?,
    };

    let has_condition = match optional(&input.has_medical_condition) {
        Some(v) => parse_flag(v, "hasMedicalCondition")?,
        None => false,
    };
    let details = input.condition_details.unwrap_or_default().trim().to_string();
    if has_condition {
        validate_text_len(&details, "conditionDetails", MAX_NOTE_LEN)?;
    }
    let medical_condition = MedicalCondition::new(has_condition, details);

    let fees = Fees {
        submitted: optional_fee(&input.fees_submitted, "feesSubmitted")?,
        due: optional_fee(&input.fees_due, "feesDue")?,
    };

    let months = parse_integer_in(
        required(&input.months, "months")?,
        "months",
        1,
        i64::from(MAX_MONTHS),
    )? as u32;

    let fee_date = parse_date("feeDate", input.fee_date.as_deref().unwrap_or_default(), tz)?;
    validate_not_future("feeDate", fee_date, today)?;

    let end_date = membership::end_date(fee_date, months)
        .ok_or_else(|| AppError::out_of_range("months", "membership end date is out of range"))?;

    Ok(ClientDraft {
        name,
        contact,
        aadhaar,
        height,
        weight,
        goal,
        medical_condition,
        fees,
        pt,
        membership: Membership {
            months,
            fee_date,
            end_date,
        },
    })
}

/// Report every missing required field at once
fn check_required(input: &ClientInput) -> AppResult<()> {
    let text_present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    let value_present = |v: &Option<FormValue>| optional(v).is_some();

    let checks = [
        ("name", text_present(&input.name)),
        ("contact", value_present(&input.contact)),
        ("aadhaar", value_present(&input.aadhaar)),
        ("heightFt", value_present(&input.height_ft)),
        ("weight", value_present(&input.weight)),
        ("goal", text_present(&input.goal)),
        ("months", value_present(&input.months)),
        ("feeDate", text_present(&input.fee_date)),
    ];

    let missing: Vec<&str> = checks
        .iter()
        .filter(|(_, present)| !present)
        .map(|(field, _)| *field)
        .collect();

    match missing.first() {
        None => Ok(()),
        Some(first) => Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("Missing required fields: {}", missing.join(", ")),
        )
        .with_field(*first)
        .with_detail("fields", missing.clone())),
    }
}

fn optional(value: &Option<FormValue>) -> Option<&FormValue> {
    value.as_ref().filter(|v| !v.is_blank())
}

fn required<'a>(value: &'a Option<FormValue>, field: &str) -> AppResult<&'a FormValue> {
    optional(value).ok_or_else(|| AppError::required_field(field))
}

fn text_of(value: Option<&FormValue>) -> String {
    value.map(FormValue::as_text).unwrap_or_default()
}

fn optional_fee(value: &Option<FormValue>, field: &str) -> AppResult<f64> {
    match optional(value) {
        Some(v) => parse_number_in(v, field, 0.0, MAX_FEE),
        None => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn tz() -> Tz {
        chrono_tz::Asia::Kolkata
    }

    fn valid_input() -> ClientInput {
        ClientInput {
            name: Some("  Arjun Mehta ".into()),
            contact: Some("9876543210".into()),
            aadhaar: Some("123456789012".into()),
            height_ft: Some("5".into()),
            height_in: Some("10".into()),
            weight: Some("81.4".into()),
            goal: Some("Gain Weight".into()),
            has_medical_condition: Some(FormValue::Bool(false)),
            condition_details: Some("".into()),
            fees_submitted: Some("1500".into()),
            fees_due: Some("0".into()),
            pt: Some("None".into()),
            months: Some("3".into()),
            fee_date: Some("2024-06-01".into()),
        }
    }

    #[test]
    fn valid_form_becomes_draft() {
        let draft = validate_client(valid_input(), today(), tz()).unwrap();
        assert_eq!(draft.name, "Arjun Mehta");
        assert_eq!(draft.height, Height { feet: 5, inches: 10 });
        assert_eq!(draft.weight, 81.4);
        assert_eq!(draft.goal, Goal::GainWeight);
        assert_eq!(draft.fees, Fees { submitted: 1500.0, due: 0.0 });
        assert_eq!(draft.membership.months, 3);
        assert_eq!(
            draft.membership.end_date,
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
        );
    }

    #[test]
    fn json_numbers_are_accepted() {
        let mut input = valid_input();
        input.contact = Some(FormValue::Number(9876543210.0));
        input.aadhaar = Some(FormValue::Number(123456789012.0));
        input.weight = Some(FormValue::Number(70.0));
        input.months = Some(FormValue::Number(1.0));

        let draft = validate_client(input, today(), tz()).unwrap();
        assert_eq!(draft.contact, "9876543210");
        assert_eq!(draft.aadhaar, "123456789012");
    }

    #[test]
    fn missing_fields_are_listed_together() {
        let mut input = valid_input();
        input.name = Some("   ".into());
        input.aadhaar = None;

        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.field.as_deref(), Some("name"));
        assert_eq!(
            err.details.unwrap()["fields"],
            serde_json::json!(["name", "aadhaar"])
        );
    }

    #[test]
    fn contact_and_aadhaar_formats() {
        let mut input = valid_input();
        input.contact = Some("98765".into());
        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("contact"));

        let mut input = valid_input();
        input.aadhaar = Some("1234 5678 9012".into());
        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("aadhaar"));
    }

    #[test]
    fn fee_date_today_ok_tomorrow_rejected() {
        let mut input = valid_input();
        input.fee_date = Some("2024-06-10".into());
        assert!(validate_client(input, today(), tz()).is_ok());

        let mut input = valid_input();
        input.fee_date = Some("2024-06-11".into());
        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeeDateInFuture);
        assert_eq!(err.field.as_deref(), Some("feeDate"));
    }

    #[test]
    fn utc_timestamp_fee_date_uses_business_day() {
        // 01:30 IST on 10 June
        let mut input = valid_input();
        input.fee_date = Some("2024-06-09T20:00:00.000Z".into());
        let draft = validate_client(input, today(), tz()).unwrap();
        assert_eq!(draft.membership.fee_date, today());
        assert_eq!(
            draft.membership.end_date,
            NaiveDate::from_ymd_opt(2024, 9, 10).unwrap()
        );

        // 00:30 IST on 11 June is already tomorrow
        let mut input = valid_input();
        input.fee_date = Some("2024-06-10T19:00:00.000Z".into());
        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeeDateInFuture);
    }

    #[test]
    fn condition_details_cleared_without_flag() {
        let mut input = valid_input();
        input.has_medical_condition = Some(FormValue::Bool(false));
        input.condition_details = Some("Asthma".into());

        let draft = validate_client(input, today(), tz()).unwrap();
        assert!(!draft.medical_condition.has_condition);
        assert_eq!(draft.medical_condition.details, "");
    }

    #[test]
    fn condition_details_kept_with_flag() {
        let mut input = valid_input();
        input.has_medical_condition = Some(FormValue::Text("on".into()));
        input.condition_details = Some(" Asthma ".into());

        let draft = validate_client(input, today(), tz()).unwrap();
        assert!(draft.medical_condition.has_condition);
        assert_eq!(draft.medical_condition.details, "Asthma");
    }

    #[test]
    fn enumerations_are_closed() {
        let mut input = valid_input();
        input.goal = Some("Cardio".into());
        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("goal"));

        let mut input = valid_input();
        input.pt = Some("Premium".into());
        let err = validate_client(input, today(), tz()).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("pt"));

        let mut input = valid_input();
        input.pt = None;
        assert_eq!(validate_client(input, today(), tz()).unwrap().pt, PtTier::None);
    }

    #[test]
    fn malformed_numbers_fail_instead_of_zero() {
        let cases: [(&str, fn(&mut ClientInput)); 6] = [
            ("feesSubmitted", |i| i.fees_submitted = Some("abc".into())),
            ("feesDue", |i| i.fees_due = Some("-5".into())),
            ("heightFt", |i| i.height_ft = Some("five".into())),
            ("heightIn", |i| i.height_in = Some("12".into())),
            ("weight", |i| i.weight = Some("0".into())),
            ("months", |i| i.months = Some("1.5".into())),
        ];
        for (field, mutate) in cases {
            let mut input = valid_input();
            mutate(&mut input);
            let err = validate_client(input, today(), tz()).unwrap_err();
            assert_eq!(err.field.as_deref(), Some(field));
        }
    }

    #[test]
    fn blank_optional_numbers_default() {
        let mut input = valid_input();
        input.fees_due = Some("".into());
        input.fees_submitted = None;
        input.height_in = None;

        let draft = validate_client(input, today(), tz()).unwrap();
        assert_eq!(draft.fees, Fees { submitted: 0.0, due: 0.0 });
        assert_eq!(draft.height.inches, 0);
    }

    #[test]
    fn month_end_clamps() {
        let mut input = valid_input();
        input.fee_date = Some("2024-01-31".into());
        input.months = Some("1".into());

        let draft = validate_client(input, today(), tz()).unwrap();
        assert_eq!(
            draft.membership.end_date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
