//! Stored rule records and their conversion into typed attachments.
//!
//! The host stores every attachment as a loosely-typed record modelled on
//! navigation menu items: an item type, an object, an optional object id and
//! a display title. All values arrive as strings. This module maps them onto
//! [`Attachment`] and reports records that do not carry what their kind needs.
//!
//! | `item_type`          | `object`                  | Attachment            |
//! |----------------------|---------------------------|-----------------------|
//! | any                  | `404`                     | `NotFound`            |
//! | any                  | `index_page`              | `FrontPage`           |
//! | any                  | `search_results`          | `SearchResults`       |
//! | any                  | `date_archive`            | `DateArchive`         |
//! | any                  | `author_archive_all`      | `AllAuthorArchives`   |
//! | `author_archive`     | author id                 | `AuthorArchive`       |
//! | `template_hierarchy` | `page-template`           | `PageTemplate`        |
//! | `post_type`          | `page`                    | `ExactPage`           |
//! | `post_type`          | post type                 | `SinglePost`          |
//! | `post_type_all`      | `page`                    | `AllPages`            |
//! | `post_type_all`      | post type                 | `AllPostsOfType`      |
//! | `category_posts`     | any                       | `CategoryOfPosts`     |
//! | `taxonomy`           | `post_format`             | `PostFormat`          |
//! | `taxonomy`           | taxonomy                  | `TaxonomyTerm`        |
//! | `taxonomy_all`       | taxonomy                  | `AllTermsOfTaxonomy`  |
//! | `post_type_archive`  | post type                 | `PostTypeArchive`     |

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;

/// Attachment as stored by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentRecord {
    /// Item type (e.g., "post_type", "taxonomy", "template_hierarchy").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    /// Object the item refers to (post type, taxonomy or special marker).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Id of the referenced object, as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stable template file for page template items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl AttachmentRecord {
    /// Create a record from item type and object.
    #[must_use]
    pub fn new(item_type: &str, object: &str) -> Self {
        Self {
            item_type: Some(item_type.to_owned()),
            object: Some(object.to_owned()),
            ..Self::default()
        }
    }

    /// Set the object id.
    #[must_use]
    pub fn with_object_id(mut self, object_id: impl ToString) -> Self {
        self.object_id = Some(object_id.to_string());
        self
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the stable template file.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Reasons a stored attachment cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A field the record's kind needs is absent or empty.
    #[error("attachment is missing `{field}`")]
    MissingField {
        /// Field name.
        field: &'static str,
    },
    /// A numeric field holds something else.
    #[error("attachment field `{field}` is not a valid id: {value:?}")]
    InvalidId {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: String,
    },
    /// The item type is not one this system knows.
    #[error("unknown attachment type {item_type:?} for object {object:?}")]
    UnknownKind {
        /// Raw item type.
        item_type: String,
        /// Raw object.
        object: String,
    },
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn require<'a>(value: Option<&'a String>, field: &'static str) -> Result<&'a str, RecordError> {
    non_empty(value).ok_or(RecordError::MissingField { field })
}

fn parse_id(value: &str, field: &'static str) -> Result<u64, RecordError> {
    value.parse().map_err(|_| RecordError::InvalidId {
        field,
        value: value.to_owned(),
    })
}

impl TryFrom<&AttachmentRecord> for Attachment {
    type Error = RecordError;

    fn try_from(record: &AttachmentRecord) -> Result<Self, Self::Error> {
        let object = require(record.object.as_ref(), "object")?;

        // Markers carried in `object` regardless of the item type
        match object {
            "404" => return Ok(Self::NotFound),
            "index_page" => return Ok(Self::FrontPage),
            "search_results" => return Ok(Self::SearchResults),
            "date_archive" => return Ok(Self::DateArchive),
            "author_archive_all" => return Ok(Self::AllAuthorArchives),
            _ => {}
        }

        let item_type = require(record.item_type.as_ref(), "item_type")?;
        let object_id = || {
            require(record.object_id.as_ref(), "object_id").and_then(|id| parse_id(id, "object_id"))
        };

        match (item_type, object) {
            ("author_archive", author) => Ok(Self::AuthorArchive {
                author_id: parse_id(author, "object")?,
            }),
            ("template_hierarchy", "page-template") => Ok(Self::PageTemplate {
                label: require(record.title.as_ref(), "title")?.to_owned(),
                file: non_empty(record.template.as_ref()).map(str::to_owned),
            }),
            ("post_type", "page") => Ok(Self::ExactPage {
                page_id: object_id()?,
            }),
            ("post_type", post_type) => Ok(Self::SinglePost {
                post_id: object_id()?,
                post_type: post_type.to_owned(),
            }),
            ("post_type_all", "page") => Ok(Self::AllPages),
            ("post_type_all", post_type) => Ok(Self::AllPostsOfType {
                post_type: post_type.to_owned(),
            }),
            ("category_posts", _) => Ok(Self::CategoryOfPosts {
                category_id: object_id()?,
            }),
            ("taxonomy", "post_format") => Ok(Self::PostFormat {
                label: require(record.title.as_ref(), "title")?.to_owned(),
            }),
            ("taxonomy", taxonomy) => Ok(Self::TaxonomyTerm {
                taxonomy: taxonomy.to_owned(),
                term_id: object_id()?,
            }),
            ("taxonomy_all", taxonomy) => Ok(Self::AllTermsOfTaxonomy {
                taxonomy: taxonomy.to_owned(),
            }),
            ("post_type_archive", post_type) => Ok(Self::PostTypeArchive {
                post_type: post_type.to_owned(),
            }),
            (item_type, object) => Err(RecordError::UnknownKind {
                item_type: item_type.to_owned(),
                object: object.to_owned(),
            }),
        }
    }
}
