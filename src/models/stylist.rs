use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stylist {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    pub specialties: Vec<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}
