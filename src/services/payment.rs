use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppResult, models::PaymentDetails};

/// Outcome of a charge
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentReceipt {
    pub amount: u32,
    /// Last four digits of the card
    pub card_last4: String,
    pub processed_at: DateTime<Utc>,
}

/// Takes payment for a booking
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn charge(&self, amount: u32, payment: &PaymentDetails) -> AppResult<PaymentReceipt>;
}

/// Stand-in for a payment gateway: waits, then always succeeds.
/// No card data leaves the process.
#[derive(Debug, Clone)]
pub struct SimulatedPayment {
    delay: Duration,
}

impl SimulatedPayment {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for SimulatedPayment {
    async fn charge(&self, amount: u32, payment: &PaymentDetails) -> AppResult<PaymentReceipt> {
        let digits: String = payment
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let card_last4 = digits[digits.len().saturating_sub(4)..].to_string();

        tracing::info!(
            amount,
            card_last4 = %card_last4,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating payment"
        );

        tokio::time::sleep(self.delay).await;

        Ok(PaymentReceipt {
            amount,
            card_last4,
            processed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn card() -> PaymentDetails {
        PaymentDetails {
            card_number: "4242 4242 4242 1234".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
            cardholder: "Ada Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_simulated_payment_succeeds() {
        let processor = SimulatedPayment::new(Duration::ZERO);
        let receipt = processor.charge(155, &card()).await.unwrap();

        assert_eq!(receipt.amount, 155);
        assert_eq!(receipt.card_last4, "1234");
    }

    #[tokio::test]
    async fn test_simulated_payment_waits() {
        let processor = SimulatedPayment::new(Duration::from_millis(50));
        let started = Instant::now();

        tokio_test::assert_ok!(processor.charge(50, &card()).await);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
