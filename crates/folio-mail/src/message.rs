//! Rendering a submission into an email.

use folio_core::Submission;
use lettre::{
  Message,
  message::{Mailbox, header::ContentType},
};

use crate::Result;

pub fn subject(submission: &Submission) -> String {
  format!("New contact form submission from {}", submission.name)
}

pub fn body(submission: &Submission) -> String {
  let phone = if submission.phone.is_empty() {
    "(not provided)"
  } else {
    submission.phone.as_str()
  };
  format!(
    "New contact form submission #{id}\n\
     \n\
     Name:     {name}\n\
     Email:    {email}\n\
     Phone:    {phone}\n\
     Received: {at}\n\
     \n\
     Message:\n\
     {message}\n",
    id = submission.id,
    name = submission.name,
    email = submission.email,
    at = submission.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    message = submission.message,
  )
}

/// Build the notification. Replies go to the visitor when their address
/// parses as a mailbox; otherwise the header is left out.
pub fn build(from: &Mailbox, to: &Mailbox, submission: &Submission) -> Result<Message> {
  let mut builder = Message::builder()
    .from(from.clone())
    .to(to.clone())
    .subject(subject(submission))
    .header(ContentType::TEXT_PLAIN);
  if let Ok(visitor) = submission.email.parse::<Mailbox>() {
    builder = builder.reply_to(visitor);
  }
  Ok(builder.body(body(submission))?)
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn submission(email: &str, phone: &str) -> Submission {
    Submission {
      id:         42,
      name:       "Alice".into(),
      email:      email.into(),
      phone:      phone.into(),
      message:    "Hello there".into(),
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 13, 45, 9).unwrap(),
    }
  }

  #[test]
  fn body_lists_every_field() {
    let text = body(&submission("a@b.com", "555-0100"));
    assert!(text.contains("#42"));
    assert!(text.contains("Name:     Alice"));
    assert!(text.contains("Email:    a@b.com"));
    assert!(text.contains("Phone:    555-0100"));
    assert!(text.contains("Received: 2024-05-01 13:45:09 UTC"));
    assert!(text.ends_with("Hello there\n"));
  }

  #[test]
  fn empty_phone_is_spelled_out() {
    assert!(body(&submission("a@b.com", "")).contains("Phone:    (not provided)"));
  }

  #[test]
  fn reply_to_is_the_visitor() {
    let from: Mailbox = "site@example.com".parse().unwrap();
    let to: Mailbox = "owner@example.com".parse().unwrap();
    let msg = build(&from, &to, &submission("a@b.com", "")).unwrap();
    let raw = String::from_utf8(msg.formatted()).unwrap();
    assert!(raw.contains("Reply-To: a@b.com"), "{raw}");
    assert!(raw.contains("Subject: New contact form submission from Alice"), "{raw}");
  }
}
