//! # Domain Models
//!
//! These structs represent the core entities of the portal.
//! Field names serialize in camelCase; the durable entries written by
//! earlier builds of the portal use that layout.

use serde::{Deserialize, Serialize};

/// Privilege level of a session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Pending,
    Member,
    Admin,
}

/// How `Identity::gain_xp` handles a grant that crosses more than one
/// level threshold.
///
/// `Cascade` is the default: it is the only rule under which
/// `xp < max_xp` holds after every grant. `Single` keeps the legacy
/// one-level-per-call behaviour and is selected with
/// `progression.level_up = "single"`. The two agree on every in-app reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelUpPolicy {
    /// Apply the threshold rule once per call.
    Single,
    /// Keep levelling up until `xp < max_xp`.
    #[default]
    Cascade,
}

/// The session's display profile plus progression counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
    pub level: u32,
    pub xp: u32,
    pub max_xp: u32,
}

impl Identity {
    /// XP needed to leave `level`.
    pub fn max_xp_for(level: u32) -> u32 {
        level.saturating_mul(100)
    }

    /// Adds `amount` XP and applies the level-up rule.
    ///
    /// Returns the number of levels gained.
    pub fn gain_xp(&mut self, amount: u32, policy: LevelUpPolicy) -> u32 {
        self.xp = self.xp.saturating_add(amount);

        let mut gained = 0;
        while self.xp >= self.max_xp {
            self.xp -= self.max_xp;
            self.level += 1;
            self.max_xp = Self::max_xp_for(self.level);
            gained += 1;

            if policy == LevelUpPolicy::Single {
                break;
            }
        }
        gained
    }
}

/// Administrator-editable landing-page copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub main_title: String,
    pub main_subtitle: String,
    pub main_description: String,
    pub notice_title: String,
    pub notice_content: String,
    pub show_notice: bool,
}

/// A partial update for [`SiteConfig`]. `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigPatch {
    pub main_title: Option<String>,
    pub main_subtitle: Option<String>,
    pub main_description: Option<String>,
    pub notice_title: Option<String>,
    pub notice_content: Option<String>,
    pub show_notice: Option<bool>,
}

impl SiteConfig {
    /// Shallow merge: every field present in `patch` overwrites ours.
    pub fn merge(&mut self, patch: SiteConfigPatch) {
        if let Some(v) = patch.main_title {
            self.main_title = v;
        }
        if let Some(v) = patch.main_subtitle {
            self.main_subtitle = v;
        }
        if let Some(v) = patch.main_description {
            self.main_description = v;
        }
        if let Some(v) = patch.notice_title {
            self.notice_title = v;
        }
        if let Some(v) = patch.notice_content {
            self.notice_content = v;
        }
        if let Some(v) = patch.show_notice {
            self.show_notice = v;
        }
    }
}

/// A gallery board entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_dept: String,
    /// Display date, fixed at creation
    pub date: String,
    pub likes: u64,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A reply owned by exactly one [`Post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub date: String,
}

/// Splits a comma-separated tag field into trimmed, non-empty tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry in an assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Unix epoch milliseconds
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
