//! Outgoing email over Gmail SMTP.
//!
//! Messages are sent with `lettre` as multipart (plain text + HTML). Sender credentials
//! and link targets come from `util::config`:
//! - `GMAIL_USERNAME` / `GMAIL_APP_PASSWORD`: SMTP login and sender address
//! - `EMAIL_FROM_NAME`: sender display name
//! - `FRONTEND_URL`: base of the password reset link
//!
//! Without credentials the transport is disabled and every send returns an error,
//! which callers log and otherwise ignore.

use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{
    Address, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header},
    transport::smtp::{AsyncSmtpTransport, authentication::Credentials},
};
use once_cell::sync::Lazy;
use util::config;

pub type EmailError = Box<dyn std::error::Error + Send + Sync>;

const SMTP_HOST: &str = "smtp.gmail.com";

/// SMTP client, built on first use. `None` when credentials are not configured.
static SMTP_CLIENT: Lazy<Option<AsyncSmtpTransport<Tokio1Executor>>> = Lazy::new(|| {
    let username = config::gmail_username();
    let password = config::gmail_app_password();
    if username.is_empty() || password.is_empty() {
        tracing::warn!("GMAIL_USERNAME or GMAIL_APP_PASSWORD not set; outgoing email is disabled");
        return None;
    }

    let tls_parameters = match TlsParameters::new(SMTP_HOST.to_string()) {
        Ok(params) => params,
        Err(e) => {
            tracing::error!(error = %e, "failed to create SMTP TLS parameters");
            return None;
        }
    };

    match AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_HOST) {
        Ok(builder) => Some(
            builder
                .port(587)
                .tls(Tls::Required(tls_parameters))
                .credentials(Credentials::new(username, password))
                .build(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to create SMTP transport");
            None
        }
    }
});

/// Link the user follows to choose a new password.
pub fn reset_link(token: &str) -> String {
    format!("{}/reset/{}", config::frontend_url().trim_end_matches('/'), token)
}

fn build_message(
    to_email: &str,
    subject: &str,
    text: String,
    html: String,
) -> Result<Message, EmailError> {
    let from_name = Some(config::email_from_name()).filter(|name| !name.is_empty());
    let from = Mailbox::new(from_name, config::gmail_username().parse::<Address>()?);

    let message = Message::builder()
        .from(from)
        .to(to_email.parse()?)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_PLAIN)
                        .body(text),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(header::ContentType::TEXT_HTML)
                        .body(html),
                ),
        )?;

    Ok(message)
}

async fn deliver(message: Message) -> Result<(), EmailError> {
    let Some(client) = SMTP_CLIENT.as_ref() else {
        return Err("email transport is not configured".into());
    };

    client.send(message).await?;
    Ok(())
}

pub struct EmailService;

impl EmailService {
    /// Welcome message sent after registration.
    pub async fn send_welcome_email(to_email: &str, username: &str) -> Result<(), EmailError> {
        let message = Self::welcome_message(to_email, username)?;
        deliver(message).await
    }

    /// Sends the reset link for `reset_token`.
    pub async fn send_password_reset_email(
        to_email: &str,
        reset_token: &str,
    ) -> Result<(), EmailError> {
        let message = Self::password_reset_message(to_email, reset_token)?;
        deliver(message).await
    }

    /// Confirms that the account password was changed.
    pub async fn send_password_changed_email(to_email: &str) -> Result<(), EmailError> {
        let message = Self::password_changed_message(to_email)?;
        deliver(message).await
    }

    fn welcome_message(to_email: &str, username: &str) -> Result<Message, EmailError> {
        let text = format!(
            "We appreciate you signing up to use this site! Please visit us soon to add \
             resources and browse current supportive services in the area.\n\n\
             Your username for login is {username}, or you can simply log in with your email.\n\n\
             Thanks again!"
        );
        let html = format!(
            "<p>We appreciate you signing up to use this site! Please visit us soon to add \
             resources and browse current supportive services in the area.</p>\
             <p>Your username for login is <strong>{}</strong>, or you can simply \
             log in with your email.</p>\
             <p>Thanks again!</p>",
            tera::escape_html(username)
        );

        build_message(to_email, "Thanks for signing up!", text, html)
    }

    fn password_reset_message(to_email: &str, reset_token: &str) -> Result<Message, EmailError> {
        let link = reset_link(reset_token);
        let minutes = config::reset_token_expiry_minutes();
        let from_name = config::email_from_name();

        let text = format!(
            "You have requested a password reset.\n\n\
             Follow this link to choose a new password:\n\n{link}\n\n\
             The link expires in {minutes} minutes. If you did not request a reset, \
             please ignore this email.\n\n{from_name}"
        );
        let html = format!(
            "<p>You have requested a password reset.</p>\
             <p>Click this <a href=\"{link}\">link</a> to reset your password.</p>\
             <p>The link expires in {minutes} minutes. If you did not request a reset, \
             please ignore this email.</p>\
             <p>{from_name}</p>"
        );

        build_message(to_email, "Password Reset", text, html)
    }

    fn password_changed_message(to_email: &str) -> Result<Message, EmailError> {
        let from_name = config::email_from_name();
        let text = format!(
            "Your password has been successfully changed.\n\n\
             If you did not make this change, please contact us immediately.\n\n{from_name}"
        );
        let html = format!(
            "<p>Your password has been successfully changed.</p>\
             <p>If you did not make this change, please contact us immediately.</p>\
             <p>{from_name}</p>"
        );

        build_message(to_email, "Your Password Has Been Changed", text, html)
    }
}
