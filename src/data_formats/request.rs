use serde::{Deserialize, Serialize};

// ----------------- Auth / User Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

// ----------------- Post Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Vec<String>,
    pub categories: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostQueryParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default = "get_default_page")]
    pub page: u32,
    #[serde(default = "get_default_limit")]
    pub limit: u32,
}

impl PostQueryParams {
    pub const MAX_LIMIT: u32 = 50;

    /// Returns `(limit, offset)` with page >= 1 and limit in 1..=MAX_LIMIT.
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, Self::MAX_LIMIT) as i64;
        let page = self.page.max(1) as i64;
        (limit, (page - 1) * limit)
    }
}

impl Default for PostQueryParams {
    fn default() -> Self {
        Self {
            category: None,
            author: None,
            page: get_default_page(),
            limit: get_default_limit(),
        }
    }
}

fn get_default_page() -> u32 {
    1
}

fn get_default_limit() -> u32 {
    10
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub parent_id: Option<String>,
    pub reply_to_name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

// ----------------- Shop Request -----------------
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default = "get_default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub spec: Option<String>,
}

fn get_default_quantity() -> i64 {
    1
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct OrderReviewRequest {
    pub rating: Option<i64>,
    pub content: Option<String>,
    pub tags: Vec<String>,
}

// ----------------- Message Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: Option<String>,
    pub text: Option<String>,
}

// ----------------- Search Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct SearchQueryParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Returns the trimmed value when it is present and non-blank.
pub fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
