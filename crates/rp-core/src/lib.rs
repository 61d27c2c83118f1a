//! rnd-portal/crates/rp-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the portal:
//! models, ports, and the identity/site/board stores.

pub mod defaults;
pub mod error;
pub mod memory;
pub mod models;
pub mod stores;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn tags_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_tags("엑셀, ChatGPT, , 시간단축"),
            vec!["엑셀", "ChatGPT", "시간단축"]
        );
        assert!(parse_tags(" , ,").is_empty());
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn post_json_matches_stored_layout() {
        let raw = r#"{
            "id": "1706000000000",
            "title": "t",
            "content": "c",
            "author": "a",
            "authorDept": "d",
            "date": "2024. 1. 23.",
            "likes": 3,
            "tags": ["x"],
            "comments": [{"id": "1", "author": "b", "text": "hi", "date": "2024. 1. 23."}]
        }"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.author_dept, "d");
        assert_eq!(post.comments.len(), 1);
        assert!(post.image_url.is_none());

        let back = serde_json::to_value(&post).unwrap();
        assert!(back.get("imageUrl").is_none());
        assert_eq!(back["authorDept"], "d");
    }

    #[test]
    fn identity_role_serializes_lowercase() {
        let id = crate::defaults::default_identity();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["maxXp"], 6000);
    }
}
