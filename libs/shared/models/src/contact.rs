// Contact and personal-data value objects shared by patients and providers.
use std::fmt;
use std::sync::OnceLock;

use chrono::{Months, NaiveDate, Utc};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Trims and lowercases before checking the `local@domain.tld` shape.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::new("email", "Email is required"));
        }

        if !email_pattern().is_match(&normalized) {
            return Err(ValidationError::new("email", "Invalid email format"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Email {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(ValidationError::new("phone", "Phone number is required"));
        }

        if !(10..=15).contains(&digits.len()) {
            return Err(ValidationError::new(
                "phone",
                "Phone number must be between 10 and 15 digits",
            ));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn formatted(&self) -> String {
        let v = &self.0;
        match v.len() {
            11 => format!("({}) {}-{}", &v[..2], &v[2..7], &v[7..]),
            10 => format!("({}) {}-{}", &v[..2], &v[2..6], &v[6..]),
            _ => v.clone(),
        }
    }
}

impl Serialize for Phone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    const MAX_AGE_YEARS: u32 = 150;

    pub fn new(date: NaiveDate) -> Result<Self, ValidationError> {
        let today = Utc::now().date_naive();

        if date >= today {
            return Err(ValidationError::new(
                "date_of_birth",
                "Date of birth must be in the past",
            ));
        }

        let oldest = today
            .checked_sub_months(Months::new(Self::MAX_AGE_YEARS * 12))
            .unwrap_or(NaiveDate::MIN);
        if date < oldest {
            return Err(ValidationError::new("date_of_birth", "Invalid date of birth"));
        }

        Ok(Self(date))
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::new("date_of_birth", "Invalid date format"))?;
        Self::new(date)
    }

    pub fn value(&self) -> NaiveDate {
        self.0
    }

    pub fn age(&self) -> u32 {
        Utc::now().date_naive().years_since(self.0).unwrap_or(0)
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
