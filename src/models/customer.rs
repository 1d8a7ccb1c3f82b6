use chrono::Utc;
use uuid::Uuid;

use super::party::ContactInfo;

/// Placeholder customer record provisioned for a groom or bride so the
/// shop's customer list knows about them before their first visit.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub created_at: String,
}

impl Customer {
    pub fn placeholder(contact: &ContactInfo) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: contact.name.trim().to_string(),
            email: contact.email.as_ref().map(|e| e.trim().to_lowercase()),
            phone: contact.phone.clone(),
            source: "wedding".to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
