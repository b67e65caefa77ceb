use chrono::{DateTime, Utc};
use ourarea_geo::AreaId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scope::FeedQuery;

/// Post categories offered when creating a post.
pub const CATEGORIES: [&str; 7] = [
    "General",
    "Food",
    "Lost & Found",
    "Health",
    "Marketplace",
    "Events",
    "Services",
];

/// Category preselected in the post composer
pub const DEFAULT_CATEGORY: &str = "General";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum post length in characters
pub const MAX_POST_LENGTH: usize = 1000;

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

/// Author info embedded in each post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    /// Home area name shown on the profile page
    pub area: String,
}

/// A post as seen by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: UserSummary,
    pub text: String,
    pub images: Vec<String>,
    pub category: String,
    pub area_id: AreaId,
    pub area_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    pub comments: u32,
    pub is_liked: bool,
    pub is_bookmarked: bool,
}

/// One page of a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub query: FeedQuery,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
}

impl FeedRequest {
    pub fn first_page(query: FeedQuery, page_size: u32) -> Self {
        Self {
            query,
            page: 1,
            page_size,
        }
    }

    /// The request for the page after this one.
    pub fn next_page(&self) -> Self {
        Self {
            query: self.query.clone(),
            page: self.page + 1,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub has_more: bool,
}

/// Input for creating a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub area_id: AreaId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub is_liked: bool,
    pub likes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkState {
    pub is_bookmarked: bool,
}

/// Time window for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    Any,
    Today,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub category: Option<String>,
    #[serde(default)]
    pub time: TimeFilter,
}

/// Content listing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Unknown area: {0}")]
    UnknownArea(AreaId),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Feed unavailable: {0}")]
    Unavailable(String),
}

impl FeedError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::PostNotFound(_) => "This post is no longer available.",
            FeedError::UnknownArea(_) => "That area is not supported yet.",
            FeedError::UnknownCategory(_) => "Please pick a category from the list.",
            FeedError::Validation(_) => "Please enter some text for your post.",
            FeedError::Unavailable(_) => "Couldn't load the feed. Please try again.",
        }
    }
}

/// Validate post text and category before storing.
///
/// # Errors
/// Returns `FeedError::Validation` for empty or overlong text and
/// `FeedError::UnknownCategory` for categories outside [`CATEGORIES`].
pub fn validate_new_post(post: &NewPost) -> Result<(), FeedError> {
    if post.text.trim().is_empty() {
        return Err(FeedError::validation("Post text cannot be empty"));
    }

    if post.text.chars().count() > MAX_POST_LENGTH {
        return Err(FeedError::validation(format!(
            "Post exceeds maximum length of {} characters",
            MAX_POST_LENGTH
        )));
    }

    if !is_known_category(&post.category) {
        return Err(FeedError::UnknownCategory(post.category.clone()));
    }

    Ok(())
}
