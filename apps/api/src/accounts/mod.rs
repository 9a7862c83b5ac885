pub mod handlers;
pub mod mailer;
pub mod password;
pub mod tokens;
