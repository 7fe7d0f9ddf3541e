use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::api::{FieldErrorEntry, SubmitMessageRequest};

/// Belarusian mobile number: `+375` or `80`, then exactly nine digits.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+375|80)[0-9]{9}$").expect("phone pattern is valid"));

const MIN_TEXT_LEN: usize = 2;

/// Strip surrounding whitespace, including the byte order mark that
/// `str::trim` leaves in place.
pub fn trim_text(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Phone, Field::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Message => "message",
        }
    }

    /// Message shown next to the field when its rule fails.
    pub fn rule_message(self) -> &'static str {
        match self {
            Field::Name => "Name must be at least 2 characters long",
            Field::Phone => "Phone must be in Belarusian format (+375XXXXXXXXX or 80XXXXXXXXX)",
            Field::Message => "Message must be at least 2 characters long",
        }
    }

    /// Whether `value` satisfies this field's rule.
    pub fn accepts(self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Field::Name | Field::Message => trim_text(value).chars().count() >= MIN_TEXT_LEN,
            Field::Phone => PHONE_RE.is_match(value),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "phone" => Ok(Field::Phone),
            "message" => Ok(Field::Message),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Failing fields mapped to their messages. Ordered by field so reports are
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, msg: impl Into<String>) {
        self.0.insert(field, msg.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Wire form used in 400 responses.
    pub fn to_entries(&self) -> Vec<FieldErrorEntry> {
        self.iter().map(|(f, m)| FieldErrorEntry::new(f, m)).collect()
    }

    /// Rebuild from a 400 response body, dropping identifiers this client
    /// does not know about.
    pub fn from_entries(entries: &[FieldErrorEntry]) -> Self {
        let mut errors = Self::new();
        for entry in entries {
            if let Ok(field) = entry.param.parse::<Field>() {
                errors.insert(field, entry.msg.clone());
            }
        }
        errors
    }
}

/// A submission that passed every rule. Text fields are trimmed; no escaping
/// has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    pub name: String,
    pub phone: String,
    pub message: String,
}

/// Check every field independently and report all failures at once.
pub fn validate(req: &SubmitMessageRequest) -> Result<ValidMessage, FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in Field::ALL {
        if !field.accepts(req.get(field)) {
            errors.insert(field, field.rule_message());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // All three are present once every rule has passed.
    Ok(ValidMessage {
        name: trim_text(req.name.as_deref().unwrap_or_default()).to_string(),
        phone: req.phone.clone().unwrap_or_default(),
        message: trim_text(req.message.as_deref().unwrap_or_default()).to_string(),
    })
}
