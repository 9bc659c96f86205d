//! Blog articles.

use chrono::{DateTime, Utc};
use hearthware_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// Excerpt length used when the author leaves the excerpt blank.
pub const GENERATED_EXCERPT_CHARS: usize = 160;

/// Estimated reading time in whole minutes, never less than one.
#[must_use]
pub fn read_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Splits free-text tag input on commas, trimming and dropping blanks.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn generated_excerpt(content: &str) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= GENERATED_EXCERPT_CHARS {
        return flattened;
    }

    let mut excerpt: String = flattened.chars().take(GENERATED_EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

/// A blog article as stored by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Short teaser.
    #[serde(default)]
    pub excerpt: String,
    /// Byline.
    #[serde(default)]
    pub author: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Tag list.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional cover image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Visible on public pages when true.
    #[serde(default)]
    pub published: bool,
    /// First publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last save time.
    pub updated_at: DateTime<Utc>,
    /// Reading time in minutes, computed at save time.
    #[serde(default)]
    pub read_time: u32,
    /// View counter.
    #[serde(default)]
    pub views: u64,
}

impl BlogPost {
    /// Creates a post from an admin draft.
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: BlogDraft, now: DateTime<Utc>) -> Self {
        let mut post = Self {
            id: id.into(),
            title: String::new(),
            content: String::new(),
            excerpt: String::new(),
            author: String::new(),
            category: String::new(),
            tags: Vec::new(),
            image: None,
            published: false,
            published_at: None,
            created_at: now,
            updated_at: now,
            read_time: 1,
            views: 0,
        };
        post.apply_draft(draft, now);
        post
    }

    /// Applies a draft, recomputing the derived fields.
    pub fn apply_draft(&mut self, draft: BlogDraft, now: DateTime<Utc>) {
        self.read_time = read_time_minutes(&draft.content);
        self.tags = parse_tags(&draft.tags);
        self.excerpt = if draft.excerpt.trim().is_empty() {
            generated_excerpt(&draft.content)
        } else {
            draft.excerpt
        };
        self.title = draft.title;
        self.content = draft.content;
        self.author = draft.author;
        self.category = draft.category;
        self.image = draft.image.filter(|image| !image.trim().is_empty());
        self.published = draft.published;
        if self.published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Case-insensitive category equality.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Admin form input for a post. Tags arrive as free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    /// Headline.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Short teaser; generated from the body when blank.
    #[serde(default)]
    pub excerpt: String,
    /// Byline.
    #[serde(default)]
    pub author: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Comma separated tags.
    #[serde(default)]
    pub tags: String,
    /// Optional cover image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Publish immediately.
    #[serde(default)]
    pub published: bool,
}

impl BlogDraft {
    /// Checks the editor form rules. Repositories do not call this.
    pub fn validate(&self) -> AppResult<()> {
        NonEmptyString::required(self.title.as_str(), "title")?;
        NonEmptyString::required(self.content.as_str(), "content")?;
        Ok(())
    }
}

/// Entry shape of the local sample blog fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBlogEntry {
    /// Headline.
    pub title: String,
    /// Article body.
    pub content: String,
    /// Short teaser.
    #[serde(default)]
    pub excerpt: String,
    /// Byline.
    #[serde(default)]
    pub author: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Tag list.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Cover image.
    #[serde(default)]
    pub image: Option<String>,
    /// Publication flag; fixture entries were always shown.
    #[serde(default = "legacy_published")]
    pub published: bool,
}

fn legacy_published() -> bool {
    true
}

impl From<LegacyBlogEntry> for BlogDraft {
    fn from(value: LegacyBlogEntry) -> Self {
        Self {
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            author: value.author,
            category: value.category,
            tags: value.tags.join(", "),
            image: value.image,
            published: value.published,
        }
    }
}
