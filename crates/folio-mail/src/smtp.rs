//! [`SmtpNotifier`]: relays submissions through an authenticated SMTP
//! server.

use std::{fmt, time::Duration};

use folio_core::{Notifier, Submission};
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Tokio1Executor, message::Mailbox,
  transport::smtp::authentication::Credentials,
};
use tracing::debug;

use crate::{Error, Result, message};

/// Implicit-TLS submission port; every other port negotiates STARTTLS.
const SMTPS_PORT: u16 = 465;

// ─── Settings ────────────────────────────────────────────────────────────────

/// Mail relay settings. Credentials have no defaults.
#[derive(Clone, PartialEq, Eq)]
pub struct MailSettings {
  pub host:     String,
  pub port:     u16,
  pub username: Option<String>,
  pub password: Option<String>,
  /// Sender address; the username when unset.
  pub from:     Option<String>,
  /// Recipient address; the username when unset.
  pub to:       Option<String>,
  pub timeout:  Duration,
}

impl MailSettings {
  /// Both a username and a password are present and non-empty.
  pub fn is_configured(&self) -> bool { self.credentials().is_some() }

  fn credentials(&self) -> Option<(&str, &str)> {
    let user = self.username.as_deref().filter(|s| !s.is_empty())?;
    let pass = self.password.as_deref().filter(|s| !s.is_empty())?;
    Some((user, pass))
  }
}

impl fmt::Debug for MailSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MailSettings")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("from", &self.from)
      .field("to", &self.to)
      .field("timeout", &self.timeout)
      .finish()
  }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SmtpNotifier {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      Mailbox,
  to:        Mailbox,
}

impl SmtpNotifier {
  /// Build the transport. No network traffic happens until the first send.
  pub fn new(settings: &MailSettings) -> Result<Self> {
    let (username, password) = settings.credentials().ok_or(Error::NotConfigured)?;

    let builder = if settings.port == SMTPS_PORT {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
    };
    let transport = builder
      .port(settings.port)
      .credentials(Credentials::new(username.to_owned(), password.to_owned()))
      .timeout(Some(settings.timeout))
      .build();

    let from: Mailbox = settings.from.as_deref().unwrap_or(username).parse()?;
    let to: Mailbox = settings.to.as_deref().unwrap_or(username).parse()?;

    Ok(Self { transport, from, to })
  }

  pub fn recipient(&self) -> &Mailbox { &self.to }
}

impl Notifier for SmtpNotifier {
  type Error = Error;

  async fn notify<'a>(&'a self, submission: &'a Submission) -> Result<()> {
    let email = message::build(&self.from, &self.to, submission)?;
    let response = self.transport.send(email).await?;
    debug!(id = submission.id, code = %response.code(), "smtp accepted message");
    Ok(())
  }
}
