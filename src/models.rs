use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Role tag discriminating the user variants.
///
/// Clients book sessions, coaches get booked and rated, admins read
/// aggregate data. The booking and mapping components only ever depend on
/// the `Coach` variant's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Coach,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Coach => "coach",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "coach" => Ok(Role::Coach),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coach profile as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CoachProfile {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Elena Petrova")]
    pub name: String,
    /// Mean of all feedback ratings, absent until the first feedback lands.
    #[schema(example = 4.5, minimum = 1.0, maximum = 5.0)]
    pub rating: Option<f64>,
}
