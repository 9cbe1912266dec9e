use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub password: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: NaiveDateTime,
}

/// A user row joined with its follow/like counters.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: NaiveDateTime,
    pub following: i64,
    pub followers: i64,
    pub likes: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub title: String,
    pub content: String,
    pub images: String,
    pub categories: String,
    pub is_pinned: bool,
    pub is_muted: bool,
    pub created_at: NaiveDateTime,
    pub likes: i64,
    pub comments: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub post_author_id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub content: String,
    pub parent_id: Option<String>,
    pub reply_to_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub likes: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub image: Option<String>,
    pub badge: Option<String>,
    pub specs: String,
    pub features: String,
    pub detail_images: String,
    pub created_at: NaiveDateTime,
}

/// A cart line priced from the current product row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    pub product_id: String,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub spec: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub total_amount: f64,
    pub status: String,
    pub tracking_number: Option<String>,
    pub refund_reason: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub spec: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderReview {
    pub id: i64,
    pub order_id: String,
    pub rating: i64,
    pub content: String,
    pub tags: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatSession {
    pub id: String,
    pub created_at: NaiveDateTime,
    pub participant_id: String,
    pub participant_name: String,
    pub participant_avatar: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<NaiveDateTime>,
    pub unread_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub sender_id: String,
    pub text: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub sender_id: Option<String>,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    pub content: String,
    pub related_id: Option<String>,
    pub comment_id: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
}

impl LikeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeTarget::Post => "post",
            LikeTarget::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Message,
    System,
    Mention,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Follow => "follow",
            NotificationKind::Message => "message",
            NotificationKind::System => "system",
            NotificationKind::Mention => "mention",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            _ => Err(()),
        }
    }
}
