//! Outgoing mail. Delivery is behind `Mailer`; the only transport writes the
//! message to the log, which is enough for local development.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// The link the recipient is expected to follow, if any.
    pub action_url: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<()>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        info!(
            to = %mail.to,
            subject = %mail.subject,
            action_url = mail.action_url.as_deref().unwrap_or("-"),
            "Mail queued for delivery"
        );
        debug!(html = %mail.html, "Mail body");
        Ok(())
    }
}

pub fn reset_password_mail(to: &str, frontend_url: &str, user_id: i64, token: &str) -> OutgoingMail {
    let link = format!(
        "{}/resetPassword?id={user_id}&token={token}",
        frontend_url.trim_end_matches('/')
    );
    OutgoingMail {
        to: to.to_string(),
        subject: "Forgot Password Link".to_string(),
        html: mail_template(
            "We have received a request to reset your password. Please reset your password using the link below.",
            &link,
            "Reset Password",
        ),
        action_url: Some(link),
    }
}

fn mail_template(content: &str, button_url: &str, button_text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="text-align: center; font-family: Verdana, serif; color: #000;">
  <div style="max-width: 600px; margin: 10px; background-color: #fafafa; padding: 25px; border-radius: 20px;">
    <p style="text-align: left;">{content}</p>
    <a href="{button_url}" target="_blank">
      <button style="background-color: #444394; border: 0; width: 200px; height: 30px; border-radius: 6px; color: #fff;">{button_text}</button>
    </a>
    <p style="text-align: left;">If you are unable to click the above button, copy paste the below URL into your address bar</p>
    <a href="{button_url}" target="_blank">
      <p style="margin: 0px; text-align: left; font-size: 10px; text-decoration: none;">{button_url}</p>
    </a>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_mail_link() {
        let mail = reset_password_mail("a@b.io", "http://localhost:3000/", 9, "abc123");
        let link = "http://localhost:3000/resetPassword?id=9&token=abc123";
        assert_eq!(mail.action_url.as_deref(), Some(link));
        assert_eq!(mail.subject, "Forgot Password Link");
        assert_eq!(mail.html.matches(link).count(), 3);
    }
}
