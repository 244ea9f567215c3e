//! Jott domain model
//!
//! A jott is a user-owned unit of structured card content with a publication
//! state, a visibility flag, and a view counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::CardContent;
use super::id::{JottId, UserId};

/// Publication state of a jott
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Publication {
    /// Private working copy
    #[default]
    Draft,
    /// Intended for distribution, subject to visibility
    Published,
}

impl Publication {
    pub fn is_published(&self) -> bool {
        matches!(self, Publication::Published)
    }

    /// Returns a display label for the publication state
    pub fn label(&self) -> &'static str {
        match self {
            Publication::Draft => "draft",
            Publication::Published => "published",
        }
    }
}

/// Visibility of a jott on public surfaces
///
/// Private jotts are excluded from any public listing or view-count surface,
/// even when published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// A jott document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jott {
    /// Unique identifier, generated at creation
    pub id: JottId,

    /// The creating user; never changes after creation
    pub owner: UserId,

    /// Human-readable title, non-empty
    pub title: String,

    /// Optional short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque card payload, shape-validated on the way in
    pub content: CardContent,

    /// Draft or published
    #[serde(default)]
    pub publication: Publication,

    /// Public or private
    #[serde(default)]
    pub visibility: Visibility,

    /// Number of recorded views; only ever increases
    #[serde(default)]
    pub view_count: u64,

    /// When the jott was created
    pub created_at: DateTime<Utc>,

    /// When the jott was last modified
    pub updated_at: DateTime<Utc>,
}

impl Jott {
    /// Creates a new draft jott owned by `owner`
    pub fn new(
        id: JottId,
        owner: UserId,
        title: impl Into<String>,
        description: Option<String>,
        content: CardContent,
    ) -> Self {
        Self::new_at(id, owner, title, description, content, Utc::now())
    }

    /// Like [`Jott::new`] with the creation instant injected
    pub fn new_at(
        id: JottId,
        owner: UserId,
        title: impl Into<String>,
        description: Option<String>,
        content: CardContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            title: title.into(),
            description,
            content,
            publication: Publication::Draft,
            visibility: Visibility::Public,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if `user` owns this jott
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Returns true if this jott may appear on public surfaces
    pub fn is_public(&self) -> bool {
        self.visibility.is_public()
    }

    pub fn is_published(&self) -> bool {
        self.publication.is_published()
    }

    /// Sets the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.touch();
    }

    /// Replaces the card content
    pub fn set_content(&mut self, content: CardContent) {
        self.content = content;
        self.touch();
    }

    /// Sets the publication state
    pub fn set_publication(&mut self, publication: Publication) {
        self.publication = publication;
        self.touch();
    }

    /// Sets the visibility
    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Permitted field changes for an update
///
/// `content` carries raw JSON; the lifecycle service validates it before any
/// field is written. `view_count` deliberately has no patch field: the counter
/// moves only through view accounting.
#[derive(Debug, Clone, Default)]
pub struct JottPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub publication: Option<Publication>,
    pub visibility: Option<Visibility>,
}

impl JottPatch {
    /// Returns true if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.publication.is_none()
            && self.visibility.is_none()
    }
}
