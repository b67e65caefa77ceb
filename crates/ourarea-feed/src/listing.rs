//! Content listing service contract.
//!
//! The feed depends only on this trait; [`crate::InMemoryFeedStore`] is the
//! bundled implementation.

use std::future::Future;

use crate::types::{
    BookmarkState, FeedError, FeedPage, FeedRequest, LikeState, NewPost, Post, PostId,
    SearchQuery, UserId,
};

pub trait FeedListing: Send + Sync {
    /// One page of posts matching the request's query, newest first.
    fn list(
        &self,
        request: FeedRequest,
    ) -> impl Future<Output = Result<FeedPage, FeedError>> + Send;

    /// Publish a post as the current user.
    fn create_post(&self, post: NewPost) -> impl Future<Output = Result<Post, FeedError>> + Send;

    /// Flip the current user's like on a post.
    fn toggle_like(&self, id: PostId) -> impl Future<Output = Result<LikeState, FeedError>> + Send;

    /// Flip the current user's bookmark on a post.
    fn toggle_bookmark(
        &self,
        id: PostId,
    ) -> impl Future<Output = Result<BookmarkState, FeedError>> + Send;

    fn search(
        &self,
        query: SearchQuery,
    ) -> impl Future<Output = Result<Vec<Post>, FeedError>> + Send;

    /// Posts written by `user`, newest first.
    fn user_posts(&self, user: UserId)
        -> impl Future<Output = Result<Vec<Post>, FeedError>> + Send;

    /// Posts bookmarked by the current user, newest first.
    fn bookmarked_posts(&self) -> impl Future<Output = Result<Vec<Post>, FeedError>> + Send;
}
