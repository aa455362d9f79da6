//! 日期工具函数
//!
//! 所有日期解析统一在 handler 层完成，repository 层只接收 `NaiveDate`。

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, AppResult, ErrorCode};

/// 解析日期字符串 (YYYY-MM-DD)
///
/// 也接受完整 RFC 3339 时间戳 (浏览器 `toISOString()`)，先换算到业务时区 `tz` 再取日期。
pub fn parse_date(field: &str, date: &str, tz: Tz) -> AppResult<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| {
            chrono::DateTime::parse_from_rfc3339(date).map(|dt| dt.with_timezone(&tz).date_naive())
        })
        .map_err(|_| {
            AppError::invalid_format(field, format!("Invalid date format: {date} (expected YYYY-MM-DD)"))
        })
}

/// 验证日期不在未来
pub fn validate_not_future(field: &str, date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date > today {
        return Err(AppError::with_message(
            ErrorCode::FeeDateInFuture,
            format!("Date {date} is in the future (today is {today})"),
        )
        .with_field(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_date("feeDate", "2024-01-31", Kolkata).unwrap(), expected);
        assert_eq!(parse_date("feeDate", " 2024-01-31 ", Kolkata).unwrap(), expected);
        assert_eq!(
            parse_date("feeDate", "2024-01-31T10:15:00.000Z", Kolkata).unwrap(),
            expected
        );
    }

    #[test]
    fn timestamps_take_the_business_day() {
        // 01:00 IST on 10 March, sent by the browser as UTC
        let date = parse_date("feeDate", "2024-03-09T19:30:00.000Z", Kolkata).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        // same instant, business day in UTC
        let date = parse_date("feeDate", "2024-03-09T19:30:00.000Z", chrono_tz::UTC).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        // an explicit offset is converted too
        let date = parse_date("feeDate", "2024-03-10T23:45:00-05:00", Kolkata).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        let err = parse_date("feeDate", "31/01/2024", Kolkata).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.field.as_deref(), Some("feeDate"));
        assert!(parse_date("feeDate", "2024-02-30", Kolkata).is_err());
    }

    #[test]
    fn future_check_is_strict() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(validate_not_future("feeDate", today, today).is_ok());
        assert!(validate_not_future("feeDate", today.pred_opt().unwrap(), today).is_ok());

        let err = validate_not_future("feeDate", today.succ_opt().unwrap(), today).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeeDateInFuture);
    }
}
