//! User and charity directory types

use crate::services::coercion::first_present;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The subset of a backend user the dashboard reports on
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_gender: Option<String>,
    #[serde(default)]
    pub user_default_donation_method: Option<String>,
}

impl UserProfile {
    /// Lenient conversion: fields with unexpected types are treated as missing
    pub fn from_value(value: &Value) -> Self {
        let text = |name: &str| -> Option<String> {
            match value.get(name)? {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        Self {
            user_id: text("user_id")
                .or_else(|| text("_id"))
                .or_else(|| text("id")),
            user_gender: text("user_gender"),
            user_default_donation_method: text("user_default_donation_method"),
        }
    }

    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values.iter().map(Self::from_value).collect()
    }
}

/// Entry of the external charity directory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Charity {
    pub id: Option<String>,
    pub name: String,
    pub organization: String,
    pub category: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
}

impl Charity {
    pub fn from_value(value: &Value) -> Self {
        let map = match value {
            Value::Object(map) => map.clone(),
            _ => Default::default(),
        };
        let text = |fields: &[&str]| -> Option<String> {
            match first_present(&map, fields)? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        Self {
            id: text(&["id", "charity_id", "org_id"]),
            name: text(&["name", "charity_name", "org_name"]).unwrap_or_default(),
            organization: text(&["organization", "org_name"]).unwrap_or_default(),
            category: text(&["category", "category_name"]).unwrap_or_default(),
            email: text(&["org_email", "email"]),
            website: text(&["org_dns_url", "website"]),
            image_url: text(&["org_img_url", "image_url"]),
        }
    }

    pub fn from_values(values: &[Value]) -> Vec<Self> {
        values.iter().map(Self::from_value).collect()
    }
}
