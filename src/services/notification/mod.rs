pub mod resend;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Booking;

pub const CONFIRMATION_SUBJECT: &str = "【予約完了】salon-booking で予約しました";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_email(&self, email: &Email) -> anyhow::Result<()>;
}

/// Used when no email API key is configured.
pub struct DisabledEmailProvider;

#[async_trait]
impl EmailProvider for DisabledEmailProvider {
    async fn send_email(&self, email: &Email) -> anyhow::Result<()> {
        tracing::info!(subject = %email.subject, "email delivery disabled, skipping");
        Ok(())
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn confirmation_email(from: &str, booking: &Booking) -> Email {
    let name = escape_html(&booking.customer_name);
    let phone = escape_html(&booking.phone_number);
    let when = booking.start_time.format("%Y-%m-%d %H:%M");

    let html = format!(
        "<h2>ご予約ありがとうございます</h2>\n\
         <p>{name} 様</p>\n\
         <h3>予約内容</h3>\n\
         <ul>\n\
         <li>日時: {when}</li>\n\
         <li>名前: {name}</li>\n\
         <li>電話: {phone}</li>\n\
         </ul>\n\
         <p>ご不明な点はお気軽にお問い合わせください。</p>\n"
    );

    Email {
        from: from.to_string(),
        to: booking.email.clone(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        html,
    }
}

pub async fn try_send_confirmation(
    provider: &dyn EmailProvider,
    from: &str,
    booking: &Booking,
) -> Result<(), AppError> {
    let email = confirmation_email(from, booking);
    provider
        .send_email(&email)
        .await
        .map_err(|e| AppError::Notification(format!("{e:#}")))
}

/// Best effort: a failed send is logged and otherwise ignored.
pub async fn send_booking_confirmation(provider: &dyn EmailProvider, from: &str, booking: &Booking) {
    match try_send_confirmation(provider, from, booking).await {
        Ok(()) => tracing::info!(booking_id = %booking.id, "confirmation email sent"),
        Err(e) => {
            tracing::error!(error = %e, booking_id = %booking.id, "failed to send confirmation email")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::models::{BookingStatus, UNASSIGNED_STYLIST, WEB_BOOKING_TITLE};

    fn booking(name: &str) -> Booking {
        let start = NaiveDateTime::parse_from_str("2025-04-01 10:30", "%Y-%m-%d %H:%M").unwrap();
        Booking {
            id: "b1".to_string(),
            salon_id: "salon-a".to_string(),
            stylist_id: UNASSIGNED_STYLIST.to_string(),
            customer_id: "yuki@example.jp".to_string(),
            customer_name: name.to_string(),
            phone_number: "090-1234-5678".to_string(),
            email: "yuki@example.jp".to_string(),
            title: WEB_BOOKING_TITLE.to_string(),
            notes: String::new(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(60),
            status: BookingStatus::Confirmed,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_confirmation_contains_name_and_time() {
        let email = confirmation_email("info@salon-booking.jp", &booking("Tanaka Yuki"));
        assert_eq!(email.to, "yuki@example.jp");
        assert_eq!(email.from, "info@salon-booking.jp");
        assert_eq!(email.subject, CONFIRMATION_SUBJECT);
        assert!(email.html.contains("Tanaka Yuki 様"));
        assert!(email.html.contains("日時: 2025-04-01 10:30"));
        assert!(email.html.contains("090-1234-5678"));
    }

    struct Unreachable;

    #[async_trait]
    impl EmailProvider for Unreachable {
        async fn send_email(&self, _email: &Email) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn test_failed_send_is_notification_error() {
        let err = try_send_confirmation(&Unreachable, "info@salon-booking.jp", &booking("Yuki"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Notification(ref msg) if msg.contains("connection refused")));

        // The best-effort wrapper swallows it.
        send_booking_confirmation(&Unreachable, "info@salon-booking.jp", &booking("Yuki")).await;
    }

    #[test]
    fn test_confirmation_escapes_customer_text() {
        let email = confirmation_email("info@salon-booking.jp", &booking("<b>Yuki</b>"));
        assert!(email.html.contains("&lt;b&gt;Yuki&lt;/b&gt;"));
        assert!(!email.html.contains("<b>Yuki</b>"));
    }
}
