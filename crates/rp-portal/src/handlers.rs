//! # rp-portal Handlers
//!
//! This module coordinates the flow between view actions and the stores.

use chrono::Local;
use rp_core::error::{AppError, Result};
use rp_core::models::{parse_tags, Comment, Identity, Post, SiteConfig, SiteConfigPatch};
use rp_core::traits::Action;
use uuid::Uuid;

use crate::Portal;

/// XP for publishing a gallery post.
pub const POST_REWARD: u32 = 50;
/// XP for commenting on a post.
pub const COMMENT_REWARD: u32 = 10;

/// What the "new post" form submits.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    /// Comma-separated, e.g. "엑셀, ChatGPT"
    pub tags: String,
    pub image_url: Option<String>,
}

/// Time-ordered, so ids created in sequence never collide.
fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Date as the portal displays it, e.g. "2025. 1. 20.".
fn display_date() -> String {
    Local::now().format("%Y. %-m. %-d.").to_string()
}

impl Portal {
    async fn require_identity(&self) -> Result<Identity> {
        self.identity
            .current()
            .await
            .ok_or_else(|| AppError::Unauthorized("no active identity".to_string()))
    }

    /// Builds a post from the session identity, puts it on top of the board
    /// and grants the posting reward.
    pub async fn publish_post(&self, draft: NewPost) -> Result<Post> {
        let author = self.require_identity().await?;

        let post = Post {
            id: new_id(),
            title: draft.title,
            content: draft.content,
            author: author.name,
            author_dept: author.department,
            date: display_date(),
            likes: 0,
            tags: parse_tags(&draft.tags),
            image_url: draft.image_url,
            comments: Vec::new(),
        };

        self.board.add_post(post.clone()).await;
        self.identity.gain_xp(POST_REWARD).await;
        tracing::info!(post_id = %post.id, "post published");
        Ok(post)
    }

    /// Attaches a comment to `post_id` and grants the commenting reward.
    ///
    /// The board silently ignores unknown ids; here that case is reported
    /// as `NotFound` and no XP is granted.
    pub async fn comment_on(&self, post_id: &str, text: &str) -> Result<Comment> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationError("comment is empty".to_string()));
        }
        let author = self.require_identity().await?;

        let comment = Comment {
            id: new_id(),
            author: author.name,
            text: text.to_string(),
            date: display_date(),
        };

        if !self.board.add_comment(post_id, comment.clone()).await {
            return Err(AppError::NotFound("Post".to_string(), post_id.to_string()));
        }
        self.identity.gain_xp(COMMENT_REWARD).await;
        Ok(comment)
    }

    /// Returns the new like count.
    pub async fn like(&self, post_id: &str) -> Result<u64> {
        self.board
            .toggle_like(post_id)
            .await
            .ok_or_else(|| AppError::NotFound("Post".to_string(), post_id.to_string()))
    }

    /// Admin surface: merges `patch` into the landing-page copy.
    pub async fn save_site_config(&self, patch: SiteConfigPatch) -> Result<SiteConfig> {
        let editor = self.require_identity().await?;
        if !self.policy.authorize(&editor, Action::EditSiteContent) {
            return Err(AppError::Unauthorized(format!("{} may not edit site content", editor.id)));
        }
        Ok(self.site.update(patch).await)
    }

    /// "Login" only edits the display profile.
    pub async fn login(&self, name: &str, email: &str, department: &str) {
        self.identity.set_identity(name, email, department).await;
    }

    /// Back to the default administrator identity.
    pub async fn logout(&self) {
        self.identity.reset_identity().await;
    }

    pub async fn approve_user(&self, user_id: &str) -> Result<()> {
        let approver = self.require_identity().await?;
        if !self.policy.authorize(&approver, Action::ApproveUsers) {
            return Err(AppError::Unauthorized(format!("{} may not approve users", approver.id)));
        }
        self.identity.approve_user(user_id).await;
        Ok(())
    }

    pub async fn is_admin(&self) -> bool {
        match self.identity.current().await {
            Some(identity) => self.policy.resolve_role(&identity) == rp_core::Role::Admin,
            None => false,
        }
    }

    /// Explicit teardown: identity back to default, stores re-read from
    /// storage. Any in-progress form state in the views is stale after this.
    pub async fn reset(&self) {
        self.identity.reset_identity().await;
        self.site.reload().await;
        self.board.reload().await;
        tracing::info!("portal state reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_has_korean_locale_shape() {
        let date = display_date();
        let parts: Vec<&str> = date.split(". ").collect();
        assert_eq!(parts.len(), 3, "{date}");
        assert!(date.ends_with('.'));
        assert_eq!(parts[0].len(), 4);
    }

    #[test]
    fn ids_are_unique_in_sequence() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }
}
