//! The contact form payload and its validated and persisted forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

// ─── Payload ─────────────────────────────────────────────────────────────────

/// A contact form exactly as the browser sent it. Every field is optional
/// here; [`ContactForm::validate`] decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactForm {
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub phone:   Option<String>,
  pub message: Option<String>,
}

impl ContactForm {
  /// Parse a JSON request body.
  ///
  /// An empty body, malformed JSON, anything but a non-empty object, or a
  /// non-string field all count as "no data".
  pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
    // Go through `Value` so arrays never reach the struct's sequence form.
    match serde_json::from_slice(body) {
      Ok(Value::Object(map)) if !map.is_empty() => {
        serde_json::from_value(Value::Object(map)).map_err(|_| ValidationError::NoData)
      }
      _ => Err(ValidationError::NoData),
    }
  }

  /// Trim every field and check the required ones, in order: name, email,
  /// message. `phone` is never rejected.
  pub fn validate(self) -> Result<NewSubmission, ValidationError> {
    let name = trimmed(self.name);
    let email = trimmed(self.email);
    let phone = trimmed(self.phone);
    let message = trimmed(self.message);

    if name.is_empty() {
      return Err(ValidationError::NameRequired);
    }
    if !is_plausible_email(&email) {
      return Err(ValidationError::EmailInvalid);
    }
    if message.is_empty() {
      return Err(ValidationError::MessageRequired);
    }

    Ok(NewSubmission { name, email, phone, message })
  }
}

fn trimmed(field: Option<String>) -> String {
  field.as_deref().map(str::trim).unwrap_or_default().to_owned()
}

/// Presence check only: non-empty and containing both `@` and `.`.
fn is_plausible_email(email: &str) -> bool {
  !email.is_empty() && email.contains('@') && email.contains('.')
}

// ─── Validated and persisted forms ───────────────────────────────────────────

/// A validated submission, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
  pub name:    String,
  pub email:   String,
  /// May be empty.
  pub phone:   String,
  pub message: String,
}

impl NewSubmission {
  /// Attach the store-generated id.
  pub fn persisted(self, id: i64, created_at: DateTime<Utc>) -> Submission {
    Submission {
      id,
      name: self.name,
      email: self.email,
      phone: self.phone,
      message: self.message,
      created_at,
    }
  }
}

/// One row of the `contacts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub message:    String,
  pub created_at: DateTime<Utc>,
}
