//! Input validation
//!
//! Runs before a change is handed to the pipeline; failures never reach the repository.

use shared::util::parse_iso_date;
use shared::{Bill, FacilityUsageRecord, PackageRecord, Periodic, TopUpRecord, User};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    #[error("Invalid month: {0}")]
    InvalidMonth(i32),

    #[error("{0} must be a non-negative number")]
    Negative(&'static str),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("已經存在 {year}年 {month}月的資料")]
    DuplicatePeriod { year: i32, month: i32 },

    #[error("請填寫所有必填欄位: {0}")]
    MissingField(&'static str),

    #[error("此帳號已存在: {0}")]
    DuplicateUsername(String),

    #[error("Username cannot be changed")]
    UsernameChanged,
}

pub type ValidationResult = Result<(), ValidationError>;

fn check_period(year: i32, month: i32) -> ValidationResult {
    if year <= 0 {
        return Err(ValidationError::InvalidYear(year));
    }
    if !(1..=12).contains(&month) {
        return Err(ValidationError::InvalidMonth(month));
    }
    Ok(())
}

fn check_amount(field: &'static str, value: f64) -> ValidationResult {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative(field))
    }
}

fn check_count(field: &'static str, value: i64) -> ValidationResult {
    if value >= 0 {
        Ok(())
    } else {
        Err(ValidationError::Negative(field))
    }
}

fn check_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub fn validate_bill(bill: &Bill) -> ValidationResult {
    check_period(bill.roc_year, bill.month)?;
    check_amount("usage", bill.usage)?;
    check_amount("amount", bill.amount)
}

pub fn validate_top_up(record: &TopUpRecord) -> ValidationResult {
    if parse_iso_date(&record.date).is_none() {
        return Err(ValidationError::InvalidDate(record.date.clone()));
    }
    check_count("points", record.points)?;
    check_amount("amount", record.amount)
}

pub fn validate_facility_usage(record: &FacilityUsageRecord) -> ValidationResult {
    check_period(record.year, record.month)?;
    check_count("gymCount", record.gym_count)?;
    check_count("gameRoomCount", record.game_room_count)?;
    check_count("kitchenCount", record.kitchen_count)?;
    check_count("avRoomCount", record.av_room_count)?;
    check_count("k1SpaceCount", record.k1_space_count)
}

pub fn validate_package(record: &PackageRecord) -> ValidationResult {
    check_period(record.year, record.month)?;
    check_count("count", record.count)
}

pub fn validate_user(user: &User) -> ValidationResult {
    check_required("username", &user.username)?;
    check_required("password", &user.password)?;
    check_required("name", &user.name)
}

/// No other record may share `candidate`'s (year, month); a record with the
/// same id is the one being edited and is ignored.
pub fn ensure_unique_period<T: Periodic>(existing: &[T], candidate: &T) -> ValidationResult {
    let period = candidate.period();
    if existing
        .iter()
        .any(|r| r.id() != candidate.id() && r.period() == period)
    {
        let (year, month) = period;
        return Err(ValidationError::DuplicatePeriod { year, month });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserRole;

    #[test]
    fn test_bill_rules() {
        assert!(validate_bill(&Bill::new("b", 114, 11, 0.0, 0.0)).is_ok());
        assert_eq!(
            validate_bill(&Bill::new("b", 0, 11, 1.0, 1.0)),
            Err(ValidationError::InvalidYear(0))
        );
        assert_eq!(
            validate_bill(&Bill::new("b", 114, 13, 1.0, 1.0)),
            Err(ValidationError::InvalidMonth(13))
        );
        assert_eq!(
            validate_bill(&Bill::new("b", 114, 1, -1.0, 1.0)),
            Err(ValidationError::Negative("usage"))
        );
        assert_eq!(
            validate_bill(&Bill::new("b", 114, 1, 1.0, f64::NAN)),
            Err(ValidationError::Negative("amount"))
        );
    }

    #[test]
    fn test_top_up_rules() {
        assert!(validate_top_up(&TopUpRecord::new("t", "2025-11-01", 10, 10.0)).is_ok());
        assert!(matches!(
            validate_top_up(&TopUpRecord::new("t", "11/01/2025", 10, 10.0)),
            Err(ValidationError::InvalidDate(_))
        ));
        assert_eq!(
            validate_top_up(&TopUpRecord::new("t", "2025-11-01", -1, 10.0)),
            Err(ValidationError::Negative("points"))
        );
    }

    #[test]
    fn test_user_required_fields() {
        assert!(validate_user(&User::new("a", "b", UserRole::Manager, "c")).is_ok());
        assert_eq!(
            validate_user(&User::new("a", "", UserRole::Manager, "c")),
            Err(ValidationError::MissingField("password"))
        );
        assert_eq!(
            validate_user(&User::new(" ", "b", UserRole::Manager, "c")),
            Err(ValidationError::MissingField("username"))
        );
    }

    #[test]
    fn test_unique_period_ignores_self() {
        let existing = vec![
            PackageRecord::new("1", 2025, 10, 680),
            PackageRecord::new("2", 2025, 11, 815),
        ];
        assert!(ensure_unique_period(&existing, &PackageRecord::new("2", 2025, 11, 900)).is_ok());
        assert!(ensure_unique_period(&existing, &PackageRecord::new("3", 2025, 12, 1)).is_ok());
        assert_eq!(
            ensure_unique_period(&existing, &PackageRecord::new("3", 2025, 11, 1)),
            Err(ValidationError::DuplicatePeriod { year: 2025, month: 11 })
        );
    }
}
