//! In-memory content listing, seeded with demo posts.
//!
//! Posts are filtered by area first, then by category, and always returned
//! newest first. Pages are 1-based.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use ourarea_geo::{AreaCatalog, AreaId};
use parking_lot::Mutex;

use crate::listing::FeedListing;
use crate::types::{
    validate_new_post, BookmarkState, CATEGORIES, FeedError, FeedPage, FeedRequest, LikeState, NewPost, Post,
    PostId, SearchQuery, TimeFilter, UserId, UserSummary,
};

#[derive(Debug, Clone)]
struct StoredPost {
    id: PostId,
    author: UserId,
    text: String,
    images: Vec<String>,
    category: String,
    area_id: AreaId,
    created_at: DateTime<Utc>,
    likes: u32,
    comments: u32,
    liked_by: HashSet<UserId>,
    bookmarked_by: HashSet<UserId>,
}

#[derive(Debug)]
struct StoreState {
    posts: Vec<StoredPost>,
    next_id: u64,
}

/// Mutex-guarded post store acting as the content listing service.
#[derive(Debug)]
pub struct InMemoryFeedStore {
    catalog: Arc<AreaCatalog>,
    users: Vec<UserSummary>,
    current_user: UserId,
    state: Mutex<StoreState>,
}

impl InMemoryFeedStore {
    /// Empty store acting on behalf of `current_user`.
    pub fn new(catalog: Arc<AreaCatalog>, users: Vec<UserSummary>, current_user: UserId) -> Self {
        Self {
            catalog,
            users,
            current_user,
            state: Mutex::new(StoreState {
                posts: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Store with the demo users and posts, signed in as the first user.
    pub fn seeded(catalog: Arc<AreaCatalog>) -> Self {
        let now = Utc::now();
        let posts = seed_posts(now);
        let next_id = posts.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;

        Self {
            catalog,
            users: seed_users(),
            current_user: UserId(1),
            state: Mutex::new(StoreState { posts, next_id }),
        }
    }

    pub fn current_user(&self) -> Option<&UserSummary> {
        self.user(self.current_user)
    }

    pub fn user(&self, id: UserId) -> Option<&UserSummary> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Categories a post can be filed under.
    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    pub fn len(&self) -> usize {
        self.state.lock().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn view(&self, post: &StoredPost) -> Post {
        let author = self.user(post.author).cloned().unwrap_or_else(|| UserSummary {
            id: post.author,
            name: "Unknown".to_string(),
            avatar: String::new(),
            area: String::new(),
        });

        Post {
            id: post.id,
            author,
            text: post.text.clone(),
            images: post.images.clone(),
            category: post.category.clone(),
            area_id: post.area_id,
            area_name: self.catalog.get(post.area_id).map(|a| a.name.clone()),
            created_at: post.created_at,
            likes: post.likes,
            comments: post.comments,
            is_liked: post.liked_by.contains(&self.current_user),
            is_bookmarked: post.bookmarked_by.contains(&self.current_user),
        }
    }

    /// Views of the posts matching `keep`, newest first.
    fn collect<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&StoredPost) -> bool,
    {
        let state = self.state.lock();
        let mut matching: Vec<&StoredPost> = state.posts.iter().filter(|p| keep(p)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.into_iter().map(|p| self.view(p)).collect()
    }
}

impl FeedListing for InMemoryFeedStore {
    async fn list(&self, request: FeedRequest) -> Result<FeedPage, FeedError> {
        if request.page == 0 || request.page_size == 0 {
            return Err(FeedError::validation("Page and page size must be at least 1"));
        }

        let query = &request.query;
        let matching = self.collect(|p| {
            query.area_id.map_or(true, |id| p.area_id == id)
                && query.category.as_deref().map_or(true, |c| p.category == c)
        });

        let page = request.page as usize;
        let size = request.page_size as usize;
        let start = (page - 1).saturating_mul(size);
        let has_more = page.saturating_mul(size) < matching.len();
        let posts: Vec<Post> = matching.into_iter().skip(start).take(size).collect();

        tracing::debug!(
            "Listed {} posts for area={:?} category={:?} page={}",
            posts.len(),
            query.area_id,
            query.category,
            request.page
        );

        Ok(FeedPage { posts, has_more })
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, FeedError> {
        validate_new_post(&post)?;
        if self.catalog.get(post.area_id).is_none() {
            return Err(FeedError::UnknownArea(post.area_id));
        }

        let stored = {
            let mut state = self.state.lock();
            let stored = StoredPost {
                id: PostId(state.next_id),
                author: self.current_user,
                text: post.text,
                images: post.images,
                category: post.category,
                area_id: post.area_id,
                created_at: Utc::now(),
                likes: 0,
                comments: 0,
                liked_by: HashSet::new(),
                bookmarked_by: HashSet::new(),
            };
            state.next_id += 1;
            state.posts.insert(0, stored.clone());
            stored
        };

        tracing::info!("Created post {} in area {}", stored.id, stored.area_id);
        Ok(self.view(&stored))
    }

    async fn toggle_like(&self, id: PostId) -> Result<LikeState, FeedError> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(FeedError::PostNotFound(id))?;

        let is_liked = if post.liked_by.remove(&self.current_user) {
            post.likes = post.likes.saturating_sub(1);
            false
        } else {
            post.liked_by.insert(self.current_user);
            post.likes += 1;
            true
        };

        Ok(LikeState {
            is_liked,
            likes: post.likes,
        })
    }

    async fn toggle_bookmark(&self, id: PostId) -> Result<BookmarkState, FeedError> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(FeedError::PostNotFound(id))?;

        let is_bookmarked = if post.bookmarked_by.remove(&self.current_user) {
            false
        } else {
            post.bookmarked_by.insert(self.current_user);
            true
        };

        Ok(BookmarkState { is_bookmarked })
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<Post>, FeedError> {
        let needle = query.text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let today = Utc::now().date_naive();
        Ok(self.collect(|p| {
            p.text.to_lowercase().contains(&needle)
                && query.category.as_deref().map_or(true, |c| p.category == c)
                && match query.time {
                    TimeFilter::Any => true,
                    TimeFilter::Today => p.created_at.date_naive() >= today,
                }
        }))
    }

    async fn user_posts(&self, user: UserId) -> Result<Vec<Post>, FeedError> {
        Ok(self.collect(|p| p.author == user))
    }

    async fn bookmarked_posts(&self) -> Result<Vec<Post>, FeedError> {
        let me = self.current_user;
        Ok(self.collect(|p| p.bookmarked_by.contains(&me)))
    }
}

fn seed_users() -> Vec<UserSummary> {
    let user = |id: u32, name: &str, avatar: &str, area: &str| UserSummary {
        id: UserId(id),
        name: name.to_string(),
        avatar: avatar.to_string(),
        area: area.to_string(),
    };

    vec![
        user(
            1,
            "Priya Sharma",
            "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150",
            "Koramangala",
        ),
        user(
            2,
            "Rajesh Kumar",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150",
            "Indiranagar",
        ),
        user(
            3,
            "Anita Reddy",
            "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150",
            "Whitefield",
        ),
        user(
            4,
            "Vikram Singh",
            "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150",
            "Jayanagar",
        ),
    ]
}

fn seed_posts(now: DateTime<Utc>) -> Vec<StoredPost> {
    let post = |id: u64,
                author: u32,
                text: &str,
                image: Option<&str>,
                category: &str,
                area: u32,
                hours_ago: i64,
                likes: u32,
                comments: u32| StoredPost {
        id: PostId(id),
        author: UserId(author),
        text: text.to_string(),
        images: image.map(|i| vec![i.to_string()]).unwrap_or_default(),
        category: category.to_string(),
        area_id: AreaId(area),
        created_at: now - Duration::hours(hours_ago),
        likes,
        comments,
        liked_by: HashSet::new(),
        bookmarked_by: HashSet::new(),
    };

    vec![
        post(
            1,
            1,
            "Amazing street food festival happening at Forum Mall this weekend! Don't miss the authentic South Indian delicacies 🍛",
            Some("https://images.unsplash.com/photo-1565299624946-b28f40a0ca4b?w=400"),
            "Food",
            1,
            2,
            24,
            8,
        ),
        post(
            2,
            2,
            "Lost my wallet near 100 Feet Road. It's a brown leather wallet with my ID. Please contact if found! 🙏",
            None,
            "Lost & Found",
            2,
            4,
            12,
            3,
        ),
        post(
            3,
            3,
            "Free yoga classes every morning at 6 AM in Whitefield Park. Join our community for a healthy start to the day! 🧘‍♀️",
            Some("https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=400"),
            "Health",
            3,
            6,
            45,
            12,
        ),
        post(
            4,
            4,
            "Selling my barely used bicycle. Perfect for weekend rides around the city. DM for details! 🚴‍♂️",
            Some("https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400"),
            "Marketplace",
            4,
            8,
            18,
            6,
        ),
        post(
            5,
            1,
            "Beautiful sunset view from my terrace today. Bangalore weather is just perfect! 🌅",
            Some("https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400"),
            "General",
            1,
            12,
            67,
            15,
        ),
    ]
}
