use serde::{Deserialize, Serialize};

use crate::models::{
    CartItem, ChatSession, Comment, Message, Notification, Order, OrderItem, OrderReview, Post,
    Product, User, UserProfile, UserSummary,
};

use super::parse_json_list;

// ----------------- User Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: String,
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub bio: String,
    pub created_at: String,
    pub following: i64,
    pub followers: i64,
    pub likes: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserSummaryResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub bio: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct AuthorResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl AuthResponse {
    pub fn new(
        User {
            id,
            name,
            email,
            avatar,
            bio,
            ..
        }: User,
        token: String,
    ) -> Self {
        AuthResponse {
            user_id: id,
            name,
            email,
            avatar,
            bio,
            token,
        }
    }
}

impl UserResponse {
    /// `with_email` is only set when the caller is looking at their own account.
    pub fn new(profile: UserProfile, with_email: bool) -> Self {
        UserResponse {
            id: profile.id,
            name: profile.name,
            email: profile.email.filter(|_| with_email),
            avatar: profile.avatar,
            bio: profile.bio,
            created_at: profile.created_at.to_string(),
            following: profile.following,
            followers: profile.followers,
            likes: profile.likes,
        }
    }
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(UserSummary { id, name, avatar, bio }: UserSummary) -> Self {
        UserSummaryResponse {
            id,
            name,
            avatar,
            bio,
        }
    }
}

// ----------------- Post Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub author: AuthorResponse,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub timestamp: String,
    pub likes: i64,
    pub comments: i64,
    pub is_liked: bool,
    pub is_pinned: bool,
    pub is_muted: bool,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        PostResponse {
            id: post.id,
            author: AuthorResponse {
                id: post.author_id,
                name: post.author_name,
                avatar: post.author_avatar,
            },
            title: post.title,
            content: post.content,
            images: parse_json_list(&post.images),
            categories: parse_json_list(&post.categories),
            timestamp: post.created_at.to_string(),
            likes: post.likes,
            comments: post.comments,
            is_liked: post.is_liked,
            is_pinned: post.is_pinned,
            is_muted: post.is_muted,
        }
    }
}

// ----------------- Comment Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author: AuthorResponse,
    pub content: String,
    pub timestamp: String,
    pub likes: i64,
    pub is_liked: bool,
    pub is_author: bool,
    pub reply_to_name: Option<String>,
    pub replies: Vec<CommentResponse>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        CommentResponse {
            is_author: comment.author_id == comment.post_author_id,
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author: AuthorResponse {
                id: comment.author_id,
                name: comment.author_name,
                avatar: comment.author_avatar,
            },
            content: comment.content,
            timestamp: comment.created_at.to_string(),
            likes: comment.likes,
            is_liked: comment.is_liked,
            reply_to_name: comment.reply_to_name,
            replies: Vec::new(),
        }
    }
}

impl CommentResponse {
    /// Nests replies under their top-level comment.
    ///
    /// `comments` must be ordered oldest first. Top-level comments come back
    /// newest first, replies stay oldest first. Replies whose parent is missing
    /// are promoted to the top level.
    pub fn thread(comments: Vec<Comment>) -> Vec<CommentResponse> {
        let mut top_level: Vec<CommentResponse> = Vec::new();
        let mut replies: Vec<CommentResponse> = Vec::new();
        for comment in comments {
            let response = CommentResponse::from(comment);
            if response.parent_id.is_some() {
                replies.push(response);
            } else {
                top_level.push(response);
            }
        }
        for reply in replies {
            let parent_index = reply
                .parent_id
                .as_deref()
                .and_then(|parent_id| top_level.iter().position(|c| c.id == parent_id));
            match parent_index {
                Some(index) => top_level[index].replies.push(reply),
                None => top_level.push(reply),
            }
        }
        top_level.reverse();
        top_level
    }
}

// ----------------- Product Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub image: Option<String>,
    pub badge: Option<String>,
    pub specs: Vec<String>,
    pub features: Vec<String>,
    pub detail_images: Vec<String>,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            original_price: product.original_price,
            image: product.image,
            badge: product.badge,
            specs: parse_json_list(&product.specs),
            features: parse_json_list(&product.features),
            detail_images: parse_json_list(&product.detail_images),
            created_at: product.created_at.to_string(),
        }
    }
}

// ----------------- Cart / Order Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: i64,
    pub product_id: String,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub spec: Option<String>,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            product_image: item.product_image,
            price: item.price,
            quantity: item.quantity,
            spec: Some(item.spec).filter(|spec| !spec.is_empty()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub product_name: String,
    pub product_image: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub spec: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        OrderItemResponse {
            product_id: item.product_id,
            product_name: item.product_name,
            product_image: item.product_image,
            price: item.price,
            quantity: item.quantity,
            spec: item.spec,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OrderReviewResponse {
    pub rating: i64,
    pub content: String,
    pub tags: Vec<String>,
    pub timestamp: String,
}

impl From<OrderReview> for OrderReviewResponse {
    fn from(review: OrderReview) -> Self {
        OrderReviewResponse {
            rating: review.rating,
            content: review.content,
            tags: parse_json_list(&review.tags),
            timestamp: review.created_at.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub items: Vec<OrderItemResponse>,
    pub total_amount: f64,
    pub status: String,
    pub timestamp: String,
    pub tracking_number: Option<String>,
    pub refund_reason: Option<String>,
    pub review: Option<OrderReviewResponse>,
}

impl OrderResponse {
    pub fn new(order: Order, items: Vec<OrderItem>, review: Option<OrderReview>) -> Self {
        OrderResponse {
            id: order.id,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
            total_amount: order.total_amount,
            status: order.status,
            timestamp: order.created_at.to_string(),
            tracking_number: order.tracking_number,
            refund_reason: order.refund_reason,
            review: review.map(OrderReviewResponse::from),
        }
    }
}

// ----------------- Message Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionResponse {
    pub id: String,
    pub participant: AuthorResponse,
    pub last_message: String,
    pub timestamp: String,
    pub unread_count: i64,
}

impl From<ChatSession> for ChatSessionResponse {
    fn from(session: ChatSession) -> Self {
        ChatSessionResponse {
            id: session.id,
            participant: AuthorResponse {
                id: session.participant_id,
                name: session.participant_name,
                avatar: session.participant_avatar,
            },
            last_message: session.last_message.unwrap_or_default(),
            timestamp: session
                .last_message_at
                .unwrap_or(session.created_at)
                .to_string(),
            unread_count: session.unread_count,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: String,
    pub is_me: bool,
}

impl ChatMessageResponse {
    pub fn new(message: Message, viewer_id: &str) -> Self {
        ChatMessageResponse {
            is_me: message.sender_id == viewer_id,
            id: message.id,
            sender_id: message.sender_id,
            text: message.text,
            timestamp: message.created_at.to_string(),
        }
    }
}

// ----------------- Notification Response -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sender: Option<AuthorResponse>,
    pub content: String,
    pub related_id: Option<String>,
    pub comment_id: Option<String>,
    pub timestamp: String,
    pub is_read: bool,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        let sender = match (notification.sender_id, notification.sender_name) {
            (Some(id), Some(name)) => Some(AuthorResponse {
                id,
                name,
                avatar: notification.sender_avatar,
            }),
            _ => None,
        };
        NotificationResponse {
            id: notification.id,
            kind: notification.kind,
            sender,
            content: notification.content,
            related_id: notification.related_id,
            comment_id: notification.comment_id,
            timestamp: notification.created_at.to_string(),
            is_read: notification.is_read,
        }
    }
}
