//! Page classification facts for one render request.
//!
//! A [`PageContext`] is the host's answer to "what kind of page is this?".
//! The host fills it once per request; the resolver only reads it.
//!
//! Several facts may hold at the same time. A static front page is also a
//! page, and a category listing is also an archive. Rule matching decides
//! which combinations matter, not this type.

use serde::{Deserialize, Serialize};

/// The generic post type. Category rules only apply to posts of this type.
pub const POST_TYPE_POST: &str = "post";

/// Page template the current page is rendered with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTemplate {
    /// Stable template file identifier (e.g., "templates/full-width.php").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Display name as registered by the theme (may be translated).
    pub name: String,
}

/// Facts about a singular page view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFacts {
    /// Page id.
    pub id: u64,
    /// Template the page is rendered with, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PageTemplate>,
}

/// Facts about a singular post view (any post type except pages).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleFacts {
    /// Post id.
    pub id: u64,
    /// Post type name (e.g., "post", "product").
    pub post_type: String,
    /// Category ids assigned to the post.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    /// Assigned post format (e.g., "gallery"), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Facts about a taxonomy term listing (categories and tags included).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFacts {
    /// Taxonomy name (e.g., "category", "post_tag", "genre").
    pub taxonomy: String,
    /// Queried term id.
    pub term_id: u64,
}

/// The request's current content entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity id.
    pub id: u64,
    /// Entity post type.
    pub post_type: String,
}

/// Classification of the in-flight request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContext {
    /// Site front page / posts index.
    pub front_page: bool,
    /// Search results.
    pub search: bool,
    /// Nothing was found for the request.
    pub not_found: bool,
    /// Date-based archive.
    pub date_archive: bool,
    /// Author archive, with the queried author's id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_archive: Option<u64>,
    /// Singular page view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageFacts>,
    /// Singular post view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<SingleFacts>,
    /// Taxonomy term listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_term: Option<TermFacts>,
    /// Post type archive, with the queried post type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_type_archive: Option<String>,
    /// Current content entity. Singular views imply one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_entity: Option<EntityRef>,
}

impl PageContext {
    /// Create an empty context (no classification holds).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the request as the front page.
    #[must_use]
    pub fn with_front_page(mut self) -> Self {
        self.front_page = true;
        self
    }

    /// Mark the request as search results.
    #[must_use]
    pub fn with_search(mut self) -> Self {
        self.search = true;
        self
    }

    /// Mark the request as not found.
    #[must_use]
    pub fn with_not_found(mut self) -> Self {
        self.not_found = true;
        self
    }

    /// Mark the request as a date archive.
    #[must_use]
    pub fn with_date_archive(mut self) -> Self {
        self.date_archive = true;
        self
    }

    /// Mark the request as an author archive for `author_id`.
    #[must_use]
    pub fn with_author_archive(mut self, author_id: u64) -> Self {
        self.author_archive = Some(author_id);
        self
    }

    /// Mark the request as a singular page view.
    #[must_use]
    pub fn with_page(mut self, id: u64) -> Self {
        self.page = Some(PageFacts { id, template: None });
        self
    }

    /// Attach a page template to the singular page view.
    ///
    /// Has no effect unless [`with_page`](Self::with_page) was called first.
    #[must_use]
    pub fn with_page_template(mut self, file: Option<&str>, name: impl Into<String>) -> Self {
        if let Some(page) = self.page.as_mut() {
            page.template = Some(PageTemplate {
                file: file.map(str::to_owned),
                name: name.into(),
            });
        }
        self
    }

    /// Mark the request as a singular post view.
    #[must_use]
    pub fn with_single(mut self, id: u64, post_type: impl Into<String>) -> Self {
        self.single = Some(SingleFacts {
            id,
            post_type: post_type.into(),
            categories: Vec::new(),
            format: None,
        });
        self
    }

    /// Assign categories to the singular post view.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = u64>) -> Self {
        if let Some(single) = self.single.as_mut() {
            single.categories = categories.into_iter().collect();
        }
        self
    }

    /// Assign a post format to the singular post view.
    #[must_use]
    pub fn with_post_format(mut self, format: impl Into<String>) -> Self {
        if let Some(single) = self.single.as_mut() {
            single.format = Some(format.into());
        }
        self
    }

    /// Mark the request as a taxonomy term listing.
    #[must_use]
    pub fn with_taxonomy_term(mut self, taxonomy: impl Into<String>, term_id: u64) -> Self {
        self.taxonomy_term = Some(TermFacts {
            taxonomy: taxonomy.into(),
            term_id,
        });
        self
    }

    /// Mark the request as a post type archive.
    #[must_use]
    pub fn with_post_type_archive(mut self, post_type: impl Into<String>) -> Self {
        self.post_type_archive = Some(post_type.into());
        self
    }

    /// Set the current content entity explicitly.
    #[must_use]
    pub fn with_current_entity(mut self, id: u64, post_type: impl Into<String>) -> Self {
        self.current_entity = Some(EntityRef {
            id,
            post_type: post_type.into(),
        });
        self
    }

    /// The current content entity, falling back to the singular view.
    #[must_use]
    pub fn current_entity(&self) -> Option<EntityRef> {
        if let Some(entity) = &self.current_entity {
            return Some(entity.clone());
        }
        if let Some(single) = &self.single {
            return Some(EntityRef {
                id: single.id,
                post_type: single.post_type.clone(),
            });
        }
        self.page.as_ref().map(|page| EntityRef {
            id: page.id,
            post_type: "page".to_owned(),
        })
    }

    /// Whether the request has a current content entity at all.
    #[must_use]
    pub fn has_current_entity(&self) -> bool {
        self.current_entity.is_some() || self.single.is_some() || self.page.is_some()
    }

    /// Whether the request lists taxonomy terms (custom taxonomy, category or tag).
    #[must_use]
    pub fn is_taxonomy_archive(&self) -> bool {
        self.taxonomy_term.is_some()
    }

    /// Whether the request is any kind of archive.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        self.author_archive.is_some()
            || self.date_archive
            || self.taxonomy_term.is_some()
            || self.post_type_archive.is_some()
    }

    /// Post type an archive lists.
    ///
    /// The queried post type for post type archives, otherwise the type of
    /// the current entity (the first item of the listing).
    #[must_use]
    pub fn archive_post_type(&self) -> Option<String> {
        self.post_type_archive
            .clone()
            .or_else(|| self.current_entity().map(|entity| entity.post_type))
    }
}
