use std::fmt;

use serde::{
  de::{self, Unexpected, Visitor},
  Deserialize, Deserializer, Serialize,
};
use validator::Validate;

/// A trip-planning request submitted through the website form.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Inquiry {
  pub name: String,
  #[serde(deserialize_with = "deserialize_email")]
  #[validate(email)]
  pub email: String,
  pub phone: String,
  pub date: String,
  pub destination: String,
  pub departure: String,
  #[serde(deserialize_with = "deserialize_count")]
  pub rooms: i64,
  #[serde(deserialize_with = "deserialize_count")]
  pub days: i64,
  #[serde(deserialize_with = "deserialize_count")]
  pub people: i64,
  pub message: String,
  pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SendEmailResponse {
  pub message: String,
}

impl SendEmailResponse {
  pub fn sent() -> Self {
    SendEmailResponse {
      message: "Email has been sent".to_string(),
    }
  }
}

/// Trims the input, unwraps `Name <addr>` and lowercases the domain.
pub fn normalize_email(raw: &str) -> String {
  let trimmed = raw.trim();
  let address = match trimmed.rfind('<') {
    Some(start) if trimmed.ends_with('>') => trimmed[start + 1..trimmed.len() - 1].trim(),
    _ => trimmed,
  };

  match address.rsplit_once('@') {
    Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
    None => address.to_string(),
  }
}

fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  Ok(normalize_email(&raw))
}

/// Form front-ends post counts as numbers or numeric strings. Whole floats
/// such as `2.0` are accepted too; fractions, words and `null` are not.
fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
  D: Deserializer<'de>,
{
  struct CountVisitor;

  impl Visitor<'_> for CountVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
      f.write_str("a valid integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
      Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
      i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
      if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Ok(v as i64)
      } else {
        Err(E::invalid_value(Unexpected::Float(v), &self))
      }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
      v.trim()
        .parse()
        .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
  }

  deserializer.deserialize_any(CountVisitor)
}
