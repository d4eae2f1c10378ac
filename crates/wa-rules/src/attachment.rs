//! Attachment conditions and their specificity ranks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Specificity rank of a condition. Lower is more specific.
pub type Rank = u16;

/// Rank for exact single-entity matches.
pub const RANK_EXACT: Rank = 10;
/// Rank for category membership.
pub const RANK_CATEGORY: Rank = 15;
/// Rank for templates, formats, whole taxonomies and all author archives.
pub const RANK_GROUP: Rank = 20;
/// Rank for every page or every post of a type.
pub const RANK_ALL_OF_TYPE: Rank = 30;
/// Rank for post type archives.
pub const RANK_ARCHIVE: Rank = 40;

/// Condition kind, without the concrete values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    ExactPage,
    PageTemplate,
    AllPages,
    SinglePost,
    CategoryOfPosts,
    PostFormat,
    AllPostsOfType,
    TaxonomyTerm,
    AllTermsOfTaxonomy,
    PostTypeArchive,
    FrontPage,
    SearchResults,
    AuthorArchive,
    AllAuthorArchives,
    DateArchive,
    NotFound,
}

impl AttachmentKind {
    /// Every kind, in declaration order.
    pub const ALL: [AttachmentKind; 16] = [
        Self::ExactPage,
        Self::PageTemplate,
        Self::AllPages,
        Self::SinglePost,
        Self::CategoryOfPosts,
        Self::PostFormat,
        Self::AllPostsOfType,
        Self::TaxonomyTerm,
        Self::AllTermsOfTaxonomy,
        Self::PostTypeArchive,
        Self::FrontPage,
        Self::SearchResults,
        Self::AuthorArchive,
        Self::AllAuthorArchives,
        Self::DateArchive,
        Self::NotFound,
    ];

    /// Fixed specificity rank of this kind.
    #[must_use]
    pub const fn rank(self) -> Rank {
        match self {
            Self::ExactPage
            | Self::SinglePost
            | Self::TaxonomyTerm
            | Self::FrontPage
            | Self::SearchResults
            | Self::AuthorArchive
            | Self::DateArchive
            | Self::NotFound => RANK_EXACT,
            Self::CategoryOfPosts => RANK_CATEGORY,
            Self::PageTemplate
            | Self::PostFormat
            | Self::AllTermsOfTaxonomy
            | Self::AllAuthorArchives => RANK_GROUP,
            Self::AllPages | Self::AllPostsOfType => RANK_ALL_OF_TYPE,
            Self::PostTypeArchive => RANK_ARCHIVE,
        }
    }

    /// Stable snake-case name, as used in serialized output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactPage => "exact_page",
            Self::PageTemplate => "page_template",
            Self::AllPages => "all_pages",
            Self::SinglePost => "single_post",
            Self::CategoryOfPosts => "category_of_posts",
            Self::PostFormat => "post_format",
            Self::AllPostsOfType => "all_posts_of_type",
            Self::TaxonomyTerm => "taxonomy_term",
            Self::AllTermsOfTaxonomy => "all_terms_of_taxonomy",
            Self::PostTypeArchive => "post_type_archive",
            Self::FrontPage => "front_page",
            Self::SearchResults => "search_results",
            Self::AuthorArchive => "author_archive",
            Self::AllAuthorArchives => "all_author_archives",
            Self::DateArchive => "date_archive",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One condition under which a replacement rule applies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    /// A specific page.
    ExactPage { page_id: u64 },
    /// Pages rendered with a template.
    ///
    /// `label` is the (possibly translated) display label stored with the
    /// rule; `file` is the stable template identifier when the host stored one.
    PageTemplate {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<String>,
    },
    /// Every page.
    AllPages,
    /// A specific post of a post type.
    SinglePost { post_id: u64, post_type: String },
    /// Posts in a category.
    CategoryOfPosts { category_id: u64 },
    /// Posts with a post format.
    PostFormat { label: String },
    /// Every post of a post type.
    AllPostsOfType { post_type: String },
    /// A specific taxonomy term listing.
    TaxonomyTerm { taxonomy: String, term_id: u64 },
    /// Every term listing of a taxonomy.
    AllTermsOfTaxonomy { taxonomy: String },
    /// The archive of a post type.
    PostTypeArchive { post_type: String },
    /// The front page.
    FrontPage,
    /// Search results.
    SearchResults,
    /// A specific author's archive.
    AuthorArchive { author_id: u64 },
    /// Every author archive.
    AllAuthorArchives,
    /// Date archives.
    DateArchive,
    /// Not-found pages.
    NotFound,
}

impl Attachment {
    /// Kind of this attachment.
    #[must_use]
    pub const fn kind(&self) -> AttachmentKind {
        match self {
            Self::ExactPage { .. } => AttachmentKind::ExactPage,
            Self::PageTemplate { .. } => AttachmentKind::PageTemplate,
            Self::AllPages => AttachmentKind::AllPages,
            Self::SinglePost { .. } => AttachmentKind::SinglePost,
            Self::CategoryOfPosts { .. } => AttachmentKind::CategoryOfPosts,
            Self::PostFormat { .. } => AttachmentKind::PostFormat,
            Self::AllPostsOfType { .. } => AttachmentKind::AllPostsOfType,
            Self::TaxonomyTerm { .. } => AttachmentKind::TaxonomyTerm,
            Self::AllTermsOfTaxonomy { .. } => AttachmentKind::AllTermsOfTaxonomy,
            Self::PostTypeArchive { .. } => AttachmentKind::PostTypeArchive,
            Self::FrontPage => AttachmentKind::FrontPage,
            Self::SearchResults => AttachmentKind::SearchResults,
            Self::AuthorArchive { .. } => AttachmentKind::AuthorArchive,
            Self::AllAuthorArchives => AttachmentKind::AllAuthorArchives,
            Self::DateArchive => AttachmentKind::DateArchive,
            Self::NotFound => AttachmentKind::NotFound,
        }
    }

    /// Specificity rank of this attachment.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.kind().rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ladder() {
        assert_eq!(AttachmentKind::ExactPage.rank(), 10);
        assert_eq!(AttachmentKind::FrontPage.rank(), 10);
        assert_eq!(AttachmentKind::DateArchive.rank(), 10);
        assert_eq!(AttachmentKind::CategoryOfPosts.rank(), 15);
        assert_eq!(AttachmentKind::PageTemplate.rank(), 20);
        assert_eq!(AttachmentKind::AllAuthorArchives.rank(), 20);
        assert_eq!(AttachmentKind::AllPages.rank(), 30);
        assert_eq!(AttachmentKind::AllPostsOfType.rank(), 30);
        assert_eq!(AttachmentKind::PostTypeArchive.rank(), 40);
    }

    #[test]
    fn test_all_kinds_listed_once() {
        let mut kinds = AttachmentKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), 16);
    }

    #[test]
    fn test_attachment_kind_and_rank() {
        let attachment = Attachment::CategoryOfPosts { category_id: 3 };
        assert_eq!(attachment.kind(), AttachmentKind::CategoryOfPosts);
        assert_eq!(attachment.rank(), RANK_CATEGORY);
    }

    #[test]
    fn test_kind_display_matches_serde_name() {
        for kind in AttachmentKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_attachment_serde_tagged() {
        let attachment: Attachment =
            serde_json::from_str(r#"{"kind": "exact_page", "page_id": 7}"#).unwrap();
        assert_eq!(attachment, Attachment::ExactPage { page_id: 7 });
    }
}
