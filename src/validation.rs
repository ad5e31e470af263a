use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::models::{Destination, NewDestination, NewTourist, NewVisit, Tourist, Visit};

/// Field name to client-facing message.
pub type FieldErrors = HashMap<String, String>;

pub const VISIT_DATE_FORMAT: &str = "%Y-%m-%d";

// HTML forms send every value as text while the browser script sends numbers
// (or null when parseInt fails), so numeric fields accept either.
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

fn lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let text = match v {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Int(i) => i.to_string(),
            TextOrNumber::Float(f) => f.to_string(),
        };
        present(&text)
    }))
}

fn present(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TouristInput {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub age: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DestinationInput {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VisitInput {
    #[serde(default, deserialize_with = "lenient")]
    pub tourist_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub visit_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<String>,
}

impl From<&Tourist> for TouristInput {
    fn from(tourist: &Tourist) -> Self {
        Self {
            name: present(&tourist.name),
            nationality: present(&tourist.nationality),
            age: tourist.age.map(|age| age.to_string()),
        }
    }
}

impl From<&Destination> for DestinationInput {
    fn from(destination: &Destination) -> Self {
        Self {
            name: present(&destination.name),
            city: present(&destination.city),
            country: present(&destination.country),
            price: Some(destination.price.to_string()),
        }
    }
}

/// The visit date is left out: a stored visit carries a full timestamp, not
/// the form's `YYYY-MM-DD` text.
impl From<&Visit> for VisitInput {
    fn from(visit: &Visit) -> Self {
        Self {
            tourist_id: Some(visit.tourist_id.to_string()),
            destination_id: Some(visit.destination_id.to_string()),
            visit_date: None,
            rating: visit.rating.map(|rating| rating.to_string()),
        }
    }
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    let Some(value) = value else {
        errors.insert(field.to_string(), format!("{label} is required"));
        return None;
    };
    if value.chars().count() > max_len {
        errors.insert(
            field.to_string(),
            format!("{label} must be under {max_len} characters"),
        );
        return None;
    }
    Some(value)
}

fn optional_int(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<String>,
) -> Option<i64> {
    let value = value?;
    match value.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.insert(field.to_string(), format!("{label} must be a whole number"));
            None
        }
    }
}

fn required_id(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: Option<String>,
) -> Option<i64> {
    if value.is_none() {
        errors.insert(field.to_string(), format!("{label} is required"));
        return None;
    }
    optional_int(errors, field, label, value)
}

impl TouristInput {
    pub fn validate(self) -> Result<NewTourist, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", "Name", self.name, 100);
        let nationality =
            required_text(&mut errors, "nationality", "Nationality", self.nationality, 50);
        let age = optional_int(&mut errors, "age", "Age", self.age);

        if matches!(age, Some(a) if a < 0) {
            errors.insert("age".to_string(), "Age cannot be negative".to_string());
        }

        match (name, nationality) {
            (Some(name), Some(nationality)) if errors.is_empty() => Ok(NewTourist {
                name,
                nationality,
                age,
            }),
            _ => Err(errors),
        }
    }
}

impl DestinationInput {
    pub fn validate(self) -> Result<NewDestination, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "name", "Name", self.name, 100);
        let city = required_text(&mut errors, "city", "City", self.city, 50);
        let country = required_text(&mut errors, "country", "Country", self.country, 50);

        let price = match self.price {
            None => {
                errors.insert("price".to_string(), "Price is required".to_string());
                None
            }
            Some(raw) => match raw.parse::<f64>() {
                Ok(p) if !p.is_finite() => {
                    errors.insert("price".to_string(), "Price must be a number".to_string());
                    None
                }
                Ok(p) if p < 0.0 => {
                    errors.insert("price".to_string(), "Price cannot be negative".to_string());
                    None
                }
                Ok(p) => Some(p),
                Err(_) => {
                    errors.insert("price".to_string(), "Price must be a number".to_string());
                    None
                }
            },
        };

        match (name, city, country, price) {
            (Some(name), Some(city), Some(country), Some(price)) if errors.is_empty() => {
                Ok(NewDestination {
                    name,
                    city,
                    country,
                    price,
                })
            }
            _ => Err(errors),
        }
    }
}

impl VisitInput {
    pub fn validate(self) -> Result<NewVisit, FieldErrors> {
        let mut errors = FieldErrors::new();

        let tourist_id = required_id(&mut errors, "tourist_id", "Tourist", self.tourist_id);
        let destination_id =
            required_id(&mut errors, "destination_id", "Destination", self.destination_id);

        let visit_date = match self.visit_date {
            None => None,
            Some(raw) => match NaiveDate::parse_from_str(&raw, VISIT_DATE_FORMAT) {
                Ok(date) => Some(date.and_time(NaiveTime::MIN)),
                Err(_) => {
                    errors.insert(
                        "visit_date".to_string(),
                        "Visit date must be in YYYY-MM-DD format".to_string(),
                    );
                    None
                }
            },
        };

        let rating = optional_int(&mut errors, "rating", "Rating", self.rating);
        if matches!(rating, Some(r) if !(1..=5).contains(&r)) {
            errors.insert(
                "rating".to_string(),
                "Rating must be between 1 and 5".to_string(),
            );
        }

        match (tourist_id, destination_id) {
            (Some(tourist_id), Some(destination_id)) if errors.is_empty() => Ok(NewVisit {
                tourist_id,
                destination_id,
                visit_date,
                rating,
            }),
            _ => Err(errors),
        }
    }
}

/// Join field errors into one sentence, ordered by field name.
pub fn summarize(errors: &FieldErrors) -> String {
    let mut fields: Vec<_> = errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
        .into_iter()
        .map(|(_, message)| message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}
