use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::MailConfig,
    models::{dto::SendMailRequest, ExternalError},
    resolver::Mailer,
};

/// Sends contact form messages through a Mailgun-style HTTP relay
pub struct HttpMailer {
    client: Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(client: Client, config: MailConfig) -> Self {
        HttpMailer { client, config }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_mail(&self, mail: &SendMailRequest) -> Result<(), ExternalError> {
        let url = self
            .config
            .api_url
            .as_deref()
            .ok_or_else(|| ExternalError::ApiError("mail relay is not configured".to_string()))?;

        let subject = format!("Message from {}", mail.name.trim());
        let form = [
            ("from", self.config.from.as_str()),
            ("to", self.config.to.as_str()),
            ("h:Reply-To", mail.email.trim()),
            ("subject", subject.as_str()),
            ("text", mail.message.as_str()),
        ];

        let mut request = self.client.post(url).form(&form);
        if let Some(key) = &self.config.api_key {
            request = request.basic_auth("api", Some(key));
        }

        debug!("Relaying contact message to {}", url);
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ExternalError::ApiError(format!(
                "mail relay returned {}",
                response.status()
            )))
        }
    }
}
