use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::{Email, EmailProvider};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Upper bound on a single send, connect included.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ResendEmailProvider {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl ResendEmailProvider {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_endpoint(api_key, RESEND_API_URL.to_string(), SEND_TIMEOUT)
    }

    pub fn with_endpoint(api_key: String, endpoint: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            api_key,
            endpoint,
            client,
        })
    }
}

#[async_trait]
impl EmailProvider for ResendEmailProvider {
    async fn send_email(&self, email: &Email) -> anyhow::Result<()> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .context("failed to reach Resend")?
            .error_for_status()
            .context("Resend API returned error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email {
            from: "info@salon-booking.jp".to_string(),
            to: "yuki@example.jp".to_string(),
            subject: "test".to_string(),
            html: "<p>hi</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold connections without ever answering.
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let provider = ResendEmailProvider::with_endpoint(
            "key".to_string(),
            format!("http://{addr}/emails"),
            Duration::from_millis(200),
        )
        .unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), provider.send_email(&email()))
            .await
            .expect("send should be bounded by the client timeout");
        assert!(result.is_err());
    }
}
