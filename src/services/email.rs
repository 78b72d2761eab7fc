use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::env;

use crate::{error::AppError, models::comments::Comment};

#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin_email: Option<String>,
    site_url: String,
}

impl EmailService {
    pub fn from_env() -> Result<Self, String> {
        let host = get_env("SMTP_HOST")?;
        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(587);
        let username = get_env("SMTP_USERNAME")?;
        let password = get_env("SMTP_PASSWORD")?;
        let from_email = get_env("SMTP_FROM")?;
        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "NovaScribe".to_string());
        let admin_email = env::var("ADMIN_NOTIFY_EMAIL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let site_url = env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let from_address = from_email
            .parse()
            .map_err(|_| "SMTP_FROM must be a valid email address".to_string())?;
        let from = Mailbox::new(Some(from_name), from_address);
        let creds = Credentials::new(username, password);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
            .map_err(|e| format!("SMTP relay error: {}", e))?
            .port(port)
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from,
            admin_email,
            site_url,
        })
    }

    /// Tells the site owner a reader left a comment. No-op without
    /// `ADMIN_NOTIFY_EMAIL`.
    pub async fn send_new_comment_notification(
        &self,
        comment: &Comment,
        post_title: &str,
        post_slug: &str,
    ) -> Result<(), AppError> {
        let Some(admin_email) = self.admin_email.as_deref() else {
            return Ok(());
        };

        let link = comment_link(&self.site_url, post_slug, comment.id);
        let body = format!(
            "{} left a comment on \"{}\" (status: {}):\n\n{}\n\nView it here:\n{}",
            comment.author_name,
            post_title,
            comment.status.as_str(),
            comment.content,
            link
        );

        self.send(admin_email, &format!("New comment on {}", post_title), body)
            .await
    }

    /// Tells a comment's author someone answered them.
    pub async fn send_reply_notification(
        &self,
        parent: &Comment,
        reply: &Comment,
        post_title: &str,
        post_slug: &str,
    ) -> Result<(), AppError> {
        let link = comment_link(&self.site_url, post_slug, reply.id);
        let body = format!(
            "Hi {},\n\n{} replied to your comment on \"{}\":\n\n{}\n\nRead the conversation:\n{}",
            parent.author_name, reply.author_name, post_title, reply.content, link
        );

        self.send(
            &parent.author_email,
            &format!("New reply on {}", post_title),
            body,
        )
        .await
    }

    async fn send(&self, recipient: &str, subject: &str, body: String) -> Result<(), AppError> {
        let to_address = recipient
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid recipient email".to_string()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to_address))
            .subject(subject)
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(body),
            )
            .map_err(|e| AppError::ExternalService(format!("Email build failed: {}", e)))?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| AppError::ExternalService(format!("Email send failed: {}", e)))?;
        Ok(())
    }
}

pub fn comment_link(site_url: &str, post_slug: &str, comment_id: uuid::Uuid) -> String {
    format!(
        "{}/posts/{}#comment-{}",
        site_url.trim_end_matches('/'),
        urlencoding::encode(post_slug),
        comment_id
    )
}

fn get_env(key: &str) -> Result<String, String> {
    env::var(key).map_err(|_| format!("Missing {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn comment_link_points_at_anchor() {
        let id = Uuid::nil();
        assert_eq!(
            comment_link("https://blog.example.com/", "hello-world", id),
            format!("https://blog.example.com/posts/hello-world#comment-{id}")
        );
    }

    #[test]
    fn comment_link_encodes_slug() {
        let link = comment_link("https://blog.example.com", "a b/c", Uuid::nil());
        assert!(link.contains("/posts/a%20b%2Fc#comment-"));
    }
}
