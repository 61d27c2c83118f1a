use std::sync::Arc;

use tokio::sync::RwLock;

use super::{load_or_seed, persist};
use crate::defaults::{default_gallery_posts, GALLERY_POSTS_KEY};
use crate::models::{Comment, Post};
use crate::traits::KvStore;

/// The gallery board: posts newest first, each with its comments.
pub struct BoardStore {
    posts: RwLock<Vec<Post>>,
    storage: Arc<dyn KvStore>,
}

impl BoardStore {
    /// Reads the persisted board, seeding the built-in posts if there is
    /// nothing usable in storage.
    pub async fn load(storage: Arc<dyn KvStore>) -> Self {
        let posts = load_or_seed(storage.as_ref(), GALLERY_POSTS_KEY, default_gallery_posts).await;
        tracing::info!(count = posts.len(), "board loaded");
        Self {
            posts: RwLock::new(posts),
            storage,
        }
    }

    /// Discards in-memory state and reads storage again.
    pub async fn reload(&self) {
        let fresh = load_or_seed(self.storage.as_ref(), GALLERY_POSTS_KEY, default_gallery_posts).await;
        *self.posts.write().await = fresh;
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn get(&self, post_id: &str) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == post_id).cloned()
    }

    /// Prepends `post`. The caller supplies a unique id; nothing is checked.
    pub async fn add_post(&self, post: Post) {
        let mut posts = self.posts.write().await;
        tracing::debug!(post_id = %post.id, "adding post");
        posts.insert(0, post);
        persist(self.storage.as_ref(), GALLERY_POSTS_KEY, &*posts).await;
    }

    /// Appends `comment` to the post with `post_id`.
    ///
    /// Returns `false` and leaves the board untouched when no such post
    /// exists.
    pub async fn add_comment(&self, post_id: &str, comment: Comment) -> bool {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            tracing::debug!(post_id, "comment target not found, ignoring");
            return false;
        };
        post.comments.push(comment);
        persist(self.storage.as_ref(), GALLERY_POSTS_KEY, &*posts).await;
        true
    }

    /// Adds one like. There is no per-viewer tracking, so repeated calls
    /// keep counting. Returns the new total, or `None` for an unknown id.
    pub async fn toggle_like(&self, post_id: &str) -> Option<u64> {
        let mut posts = self.posts.write().await;
        let post = posts.iter_mut().find(|p| p.id == post_id)?;
        post.likes = post.likes.saturating_add(1);
        let likes = post.likes;
        persist(self.storage.as_ref(), GALLERY_POSTS_KEY, &*posts).await;
        Some(likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKvStore;
    use crate::traits::MockKvStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("title {id}"),
            content: "content".to_string(),
            author: "tester".to_string(),
            author_dept: "QA".to_string(),
            date: "2025. 2. 1.".to_string(),
            likes: 0,
            tags: vec![],
            image_url: None,
            comments: vec![],
        }
    }

    fn comment(id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            author: "tester".to_string(),
            text: "nice".to_string(),
            date: "2025. 2. 1.".to_string(),
        }
    }

    #[tokio::test]
    async fn seeds_defaults_when_storage_is_empty() {
        let kv = MemoryKvStore::new();
        let board = BoardStore::load(Arc::new(kv.clone())).await;

        assert_eq!(board.posts().await, default_gallery_posts());
        assert!(kv.raw(GALLERY_POSTS_KEY).is_some(), "seed must be persisted");
    }

    #[tokio::test]
    async fn corrupt_entry_falls_back_to_defaults() {
        let kv = MemoryKvStore::new();
        kv.put(GALLERY_POSTS_KEY, "{not json").await.unwrap();

        let board = BoardStore::load(Arc::new(kv.clone())).await;
        assert_eq!(board.posts().await, default_gallery_posts());
    }

    #[tokio::test]
    async fn unreadable_storage_falls_back_to_defaults() {
        let mut kv = MockKvStore::new();
        kv.expect_get().returning(|_| Err(anyhow::anyhow!("disk on fire")));
        // only the add_post below writes; the load itself must not
        kv.expect_put()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("still on fire")));

        let board = BoardStore::load(Arc::new(kv)).await;
        assert_eq!(board.posts().await.len(), default_gallery_posts().len());

        // write failures are swallowed
        board.add_post(post("p1")).await;
        assert_eq!(board.posts().await[0].id, "p1");
    }

    /// Fails the first read, then behaves like `inner`.
    struct FlakyOnce {
        inner: MemoryKvStore,
        failed: AtomicBool,
    }

    #[async_trait]
    impl KvStore for FlakyOnce {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                anyhow::bail!("EIO");
            }
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.inner.put(key, value).await
        }
    }

    #[tokio::test]
    async fn transient_read_error_keeps_saved_board() {
        let kv = MemoryKvStore::new();
        let saved = BoardStore::load(Arc::new(kv.clone())).await;
        saved.add_post(post("user-post")).await;
        drop(saved);

        let flaky = BoardStore::load(Arc::new(FlakyOnce {
            inner: kv.clone(),
            failed: AtomicBool::new(false),
        }))
        .await;
        assert_eq!(flaky.posts().await, default_gallery_posts());

        let reopened = BoardStore::load(Arc::new(kv)).await;
        assert_eq!(reopened.posts().await[0].id, "user-post");
    }

    #[tokio::test]
    async fn add_post_prepends() {
        let board = BoardStore::load(Arc::new(MemoryKvStore::new())).await;
        let previous_first = board.posts().await[0].id.clone();

        board.add_post(post("new")).await;

        let posts = board.posts().await;
        assert_eq!(posts[0].id, "new");
        assert_eq!(posts[1].id, previous_first);
    }

    #[tokio::test]
    async fn add_comment_touches_only_the_target() {
        let board = BoardStore::load(Arc::new(MemoryKvStore::new())).await;
        board.add_post(post("a")).await;
        board.add_post(post("b")).await;
        let before = board.posts().await;

        assert!(board.add_comment("a", comment("c1")).await);

        let after = board.posts().await;
        for (old, new) in before.iter().zip(after.iter()) {
            if new.id == "a" {
                assert_eq!(new.comments.len(), old.comments.len() + 1);
                assert_eq!(new.comments.last().unwrap().id, "c1");
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[tokio::test]
    async fn add_comment_to_unknown_post_is_a_no_op() {
        let board = BoardStore::load(Arc::new(MemoryKvStore::new())).await;
        let before = board.posts().await;

        assert!(!board.add_comment("missing", comment("c1")).await);
        assert_eq!(board.posts().await, before);
    }

    #[tokio::test]
    async fn toggle_like_counts_every_call() {
        let board = BoardStore::load(Arc::new(MemoryKvStore::new())).await;
        board.add_post(post("liked")).await;

        for _ in 0..7 {
            board.toggle_like("liked").await;
        }

        assert_eq!(board.get("liked").await.unwrap().likes, 7);
        assert_eq!(board.toggle_like("missing").await, None);
    }

    #[tokio::test]
    async fn mutations_survive_reload() {
        let kv = MemoryKvStore::new();
        let board = BoardStore::load(Arc::new(kv.clone())).await;
        board.add_post(post("kept")).await;
        board.add_comment("kept", comment("c1")).await;
        board.toggle_like("kept").await;

        let reloaded = BoardStore::load(Arc::new(kv)).await;
        let kept = reloaded.get("kept").await.unwrap();
        assert_eq!(kept.likes, 1);
        assert_eq!(kept.comments.len(), 1);
        assert_eq!(reloaded.posts().await[0].id, "kept");
    }
}
