use serde::{Deserialize, Serialize};

use super::response::{PostResponse, ProductResponse, UserResponse};

#[derive(Debug, Deserialize, Serialize)]
pub struct MessageWrapper {
    pub message: String,
}

impl MessageWrapper {
    pub fn new(message: &str) -> Self {
        MessageWrapper {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HealthWrapper {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedWrapper {
    pub order_id: String,
    pub total_amount: f64,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSentWrapper {
    pub message_id: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UnreadCountWrapper {
    pub count: i64,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SearchResultsWrapper {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductResponse>>,
}
