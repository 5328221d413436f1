//! Mock implementations for testing the signup flow

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::services::signup::EmailServiceTrait;

// Mock email service recording the last code per address
pub struct MockEmailService {
    pub sent_messages: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
}

impl MockEmailService {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(HashMap::new())),
            should_fail,
        }
    }

    pub fn get_sent_code(&self, email: &str) -> Option<String> {
        self.sent_messages.lock().unwrap().get(email).cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.sent_messages.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailServiceTrait for MockEmailService {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("SMTP connection refused".to_string());
        }
        self.sent_messages
            .lock()
            .unwrap()
            .insert(email.to_string(), code.to_string());
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }
}
