//! Traits for email delivery integration

use async_trait::async_trait;

/// Delivery of verification codes by email
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send `code` to `email`; returns the provider's message id
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<String, String>;
}
