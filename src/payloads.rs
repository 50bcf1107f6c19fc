//! Request bodies sent by the probes.
//!
//! The lead-creation and registration bodies embed a timestamp so repeated
//! runs do not collide on unique fields. The same builders render the
//! report appendix with a `[timestamp]` placeholder.

use serde_json::{Value, json};

use crate::harness::types::Credentials;

/// Password given to the user created by the register probe
pub const REGISTERED_USER_PASSWORD: &str = "TestPassword123!";

/// Placeholder used when payloads are shown in the report
pub const TIMESTAMP_PLACEHOLDER: &str = "[timestamp]";

pub fn login(credentials: &Credentials) -> Value {
    json!({
        "username": credentials.username,
        "password": credentials.password,
    })
}

pub fn register(stamp: &str) -> Value {
    json!({
        "username": format!("testuser_{stamp}"),
        "password": REGISTERED_USER_PASSWORD,
        "role": "SALES_PERSON",
        "firstName": "Test",
        "lastName": "User",
        "email": format!("testuser_{stamp}@test.com"),
        "phone": "555-0000",
    })
}

pub fn lead_create(stamp: &str) -> Value {
    json!({
        "leadName": format!("Test Lead {stamp}"),
        "company": "Test Company Inc",
        "email": format!("testlead_{stamp}@test.com"),
        "phone": "555-9999",
        "potentialValue": 500000.00,
        "leadSource": "Website Signup",
        "description": "Test lead created by automated test script",
        "industry": "Technology",
        "companySize": "Medium",
        "location": "San Francisco, CA",
    })
}

pub fn lead_update() -> Value {
    json!({
        "leadName": "Updated Test Lead",
        "company": "Updated Company Inc",
        "email": "updated@test.com",
        "phone": "555-8888",
        "potentialValue": 750000.00,
        "leadSource": "Webinar",
        "description": "Updated description",
        "industry": "Finance",
        "companySize": "Large",
        "location": "New York, NY",
    })
}

pub fn comment() -> Value {
    json!({
        "commentText": "Test comment from automated test script",
        "action": "Test Action",
    })
}

/// Unix-seconds stamp for unique usernames and emails
pub fn timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}
