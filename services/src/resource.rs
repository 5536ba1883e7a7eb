//! Turns submitted resource form values into [`ResourceFields`].

use db::models::resource::ResourceFields;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceFormError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Phone number must contain at least 10 digits")]
    InvalidPhone,
    #[error("{field} must be a JSON object: {reason}")]
    InvalidJson { field: &'static str, reason: String },
}

/// Raw text values of a resource create/edit form.
#[derive(Debug, Default, Clone)]
pub struct ResourceForm {
    pub title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub services: Option<String>,
    pub dynamic_data: Option<String>,
}

impl ResourceForm {
    /// Stores a named form value. Returns `false` for names the form does not know.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "address" => &mut self.address,
            "phone" => &mut self.phone,
            "website" => &mut self.website,
            "city" => &mut self.city,
            "services" => &mut self.services,
            "dynamicData" => &mut self.dynamic_data,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Validates and normalises the form.
    ///
    /// `title`, `address`, `phone` and `city` are required. `website` defaults to empty,
    /// `services` and `dynamicData` default to `{}`.
    pub fn into_fields(self) -> Result<ResourceFields, ResourceFormError> {
        let title = title_case(&required(self.title, "title")?);
        if title.is_empty() {
            return Err(ResourceFormError::EmptyTitle);
        }

        Ok(ResourceFields {
            title,
            address: required(self.address, "address")?.trim().to_owned(),
            phone: format_phone(&required(self.phone, "phone")?)?,
            website: self.website.unwrap_or_default().trim().to_owned(),
            city: required(self.city, "city")?.trim().to_owned(),
            services: json_object("services", self.services)?,
            dynamic_data: json_object("dynamicData", self.dynamic_data)?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ResourceFormError> {
    value.ok_or(ResourceFormError::MissingField(field))
}

/// Upper-cases the first letter of each whitespace separated word.
///
/// Words are re-joined with single spaces; the rest of each word is left as typed.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats the first ten digits of `raw` as `(ddd) ddd-dddd`.
pub fn format_phone(raw: &str) -> Result<String, ResourceFormError> {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 10 {
        return Err(ResourceFormError::InvalidPhone);
    }

    let area: String = digits[0..3].iter().collect();
    let prefix: String = digits[3..6].iter().collect();
    let line: String = digits[6..10].iter().collect();
    Ok(format!("({area}) {prefix}-{line}"))
}

fn json_object(field: &'static str, raw: Option<String>) -> Result<Value, ResourceFormError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Value::Object(Map::new())),
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ResourceFormError::InvalidJson {
            field,
            reason: "expected an object".into(),
        }),
        Err(e) => Err(ResourceFormError::InvalidJson {
            field,
            reason: e.to_string(),
        }),
    }
}
