//! Profile drawer data for the signed-in user

use serde::{Deserialize, Serialize};

use crate::services::AuthSession;

pub const MENU_ITEMS: [&str; 6] = [
    "Personal Info",
    "Addresses",
    "Payment Methods",
    "Order History",
    "Favorites",
    "Settings",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub menu: Vec<String>,
}

impl From<&AuthSession> for UserProfile {
    fn from(session: &AuthSession) -> Self {
        Self {
            uid: session.uid.clone(),
            email: session.email.clone(),
            display_name: session.display_name.clone(),
            menu: MENU_ITEMS.iter().map(|item| item.to_string()).collect(),
        }
    }
}
