use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted job application. `id` and `created_at` are assigned by the
/// repository at insert time and never taken from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub job_role: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<i64>,
    pub date: Option<NaiveDate>,
    /// Storage name of the uploaded resume, or `""` when none was sent.
    pub resume: String,
    pub created_at: DateTime<Utc>,
}

/// Text fields of a submission exactly as they arrived in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub job_role: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub date: Option<String>,
}

impl ApplicationForm {
    pub const FIELDS: [&'static str; 8] = [
        "first_name",
        "last_name",
        "email",
        "job_role",
        "address",
        "city",
        "pincode",
        "date",
    ];

    /// Stores `value` under `name`. Returns `false` for a field that is not
    /// part of the form; a repeated field overwrites the earlier value.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "job_role" => &mut self.job_role,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "pincode" => &mut self.pincode,
            "date" => &mut self.date,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Applies the store's type coercion: text passes through, `pincode` and
    /// `date` become `None` when they cannot be read as a number / date.
    pub fn coerce(self) -> NewApplication {
        NewApplication {
            pincode: self.pincode.as_deref().and_then(coerce_pincode),
            date: self.date.as_deref().and_then(coerce_date),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            job_role: self.job_role,
            address: self.address,
            city: self.city,
        }
    }
}

/// Insert payload: a coerced form minus the server-assigned fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewApplication {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub job_role: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<i64>,
    pub date: Option<NaiveDate>,
}

fn coerce_pincode(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::debug!("pincode '{raw}' is not numeric; storing null");
            None
        }
    }
}

fn coerce_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .or_else(|| {
            tracing::debug!("date '{raw}' is not a calendar date; storing null");
            None
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pincode: &str, date: &str) -> ApplicationForm {
        ApplicationForm {
            pincode: Some(pincode.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_pincode_and_iso_date() {
        let app = form("411001", "2024-01-01").coerce();
        assert_eq!(app.pincode, Some(411001));
        assert_eq!(app.date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_non_numeric_pincode_becomes_none() {
        assert_eq!(form("PUNE-01", "2024-01-01").coerce().pincode, None);
        assert_eq!(form("  ", "2024-01-01").coerce().pincode, None);
        assert_eq!(form("4110.5", "2024-01-01").coerce().pincode, None);
    }

    #[test]
    fn test_pincode_is_trimmed() {
        assert_eq!(form(" 411001 ", "").coerce().pincode, Some(411001));
    }

    #[test]
    fn test_rfc3339_date_is_reduced_to_utc_day() {
        let app = form("1", "2024-03-05T23:30:00-02:00").coerce();
        assert_eq!(app.date, NaiveDate::from_ymd_opt(2024, 3, 6));
    }

    #[test]
    fn test_garbage_date_becomes_none() {
        assert_eq!(form("1", "next tuesday").coerce().date, None);
        assert_eq!(form("1", "2024-13-40").coerce().date, None);
    }

    #[test]
    fn test_set_known_and_unknown_fields() {
        let mut f = ApplicationForm::default();
        assert!(f.set("city", "Pune".into()));
        assert!(f.set("city", "Mumbai".into()));
        assert!(!f.set("salary", "lots".into()));
        assert_eq!(f.city.as_deref(), Some("Mumbai"));
    }

    #[test]
    fn test_every_listed_field_is_settable() {
        let mut f = ApplicationForm::default();
        for name in ApplicationForm::FIELDS {
            assert!(f.set(name, "x".into()), "{name} rejected");
        }
    }

    #[test]
    fn test_record_serializes_date_and_timestamp() {
        let record = ApplicationRecord {
            id: Uuid::nil(),
            first_name: Some("Asha".into()),
            last_name: None,
            email: None,
            job_role: None,
            address: None,
            city: None,
            pincode: Some(411001),
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            resume: String::new(),
            created_at: DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["created_at"], "2024-01-02T03:04:05Z");
        assert_eq!(json["resume"], "");
        assert!(json["last_name"].is_null());
    }
}
