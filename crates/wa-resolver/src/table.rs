//! Declarative match table.
//!
//! One entry per [`AttachmentKind`], in [`AttachmentKind::ALL`] order. Each
//! entry answers two questions about an attachment of its kind:
//!
//! - `applies`: can this kind match at all on the current page?
//! - `matches`: do the attachment's concrete values match the page?
//!
//! The resolver walks attachments uniformly through this table, so the
//! specificity ladder lives here and nowhere else.

use wa_rules::{Attachment, AttachmentKind, POST_TYPE_POST, PageContext, Rank};

use crate::TemplateMatch;

/// Applicability, value match and rank for one attachment kind.
pub(crate) struct MatchEntry {
    pub(crate) kind: AttachmentKind,
    pub(crate) rank: Rank,
    pub(crate) applies: fn(&PageContext) -> bool,
    pub(crate) matches: fn(&Attachment, &PageContext, TemplateMatch) -> bool,
}

impl MatchEntry {
    const fn new(
        kind: AttachmentKind,
        applies: fn(&PageContext) -> bool,
        matches: fn(&Attachment, &PageContext, TemplateMatch) -> bool,
    ) -> Self {
        Self {
            kind,
            rank: kind.rank(),
            applies,
            matches,
        }
    }
}

pub(crate) static MATCH_TABLE: [MatchEntry; 16] = [
    MatchEntry::new(AttachmentKind::ExactPage, on_page, exact_page),
    MatchEntry::new(AttachmentKind::PageTemplate, on_templated_page, page_template),
    MatchEntry::new(AttachmentKind::AllPages, on_page, always),
    MatchEntry::new(AttachmentKind::SinglePost, on_single, single_post),
    MatchEntry::new(AttachmentKind::CategoryOfPosts, on_single, category_of_posts),
    MatchEntry::new(AttachmentKind::PostFormat, on_formatted_single, post_format),
    MatchEntry::new(AttachmentKind::AllPostsOfType, on_single, all_posts_of_type),
    MatchEntry::new(AttachmentKind::TaxonomyTerm, on_term, taxonomy_term),
    MatchEntry::new(AttachmentKind::AllTermsOfTaxonomy, on_term, all_terms_of_taxonomy),
    MatchEntry::new(AttachmentKind::PostTypeArchive, on_post_archive, post_type_archive),
    MatchEntry::new(AttachmentKind::FrontPage, on_front_page, always),
    MatchEntry::new(AttachmentKind::SearchResults, on_search, always),
    MatchEntry::new(AttachmentKind::AuthorArchive, on_author, author_archive),
    MatchEntry::new(AttachmentKind::AllAuthorArchives, on_author, always),
    MatchEntry::new(AttachmentKind::DateArchive, on_date, always),
    MatchEntry::new(AttachmentKind::NotFound, on_not_found, always),
];

/// Table entry for `kind`.
pub(crate) fn entry(kind: AttachmentKind) -> &'static MatchEntry {
    &MATCH_TABLE[kind as usize]
}

/// Rank of `attachment` if it applies to and matches `ctx`.
pub(crate) fn evaluate(
    attachment: &Attachment,
    ctx: &PageContext,
    template_match: TemplateMatch,
) -> Option<Rank> {
    let entry = entry(attachment.kind());
    debug_assert_eq!(entry.kind, attachment.kind());
    ((entry.applies)(ctx) && (entry.matches)(attachment, ctx, template_match)).then_some(entry.rank)
}

// Applicability

// The front page is routed separately even when it is also a page.
fn on_page(ctx: &PageContext) -> bool {
    ctx.page.is_some() && !ctx.front_page
}

fn on_templated_page(ctx: &PageContext) -> bool {
    on_page(ctx)
        && ctx
            .page
            .as_ref()
            .and_then(|page| page.template.as_ref())
            .is_some_and(|template| !template.name.is_empty())
}

fn on_single(ctx: &PageContext) -> bool {
    ctx.single.is_some()
}

fn on_formatted_single(ctx: &PageContext) -> bool {
    ctx.single
        .as_ref()
        .is_some_and(|single| single.format.as_deref().is_some_and(|f| !f.is_empty()))
}

fn on_term(ctx: &PageContext) -> bool {
    ctx.is_taxonomy_archive()
}

// Taxonomy listings are archives too, but never post type archives.
fn on_post_archive(ctx: &PageContext) -> bool {
    ctx.is_archive() && !ctx.is_taxonomy_archive()
}

fn on_front_page(ctx: &PageContext) -> bool {
    ctx.front_page
}

fn on_search(ctx: &PageContext) -> bool {
    ctx.search
}

fn on_author(ctx: &PageContext) -> bool {
    ctx.author_archive.is_some()
}

fn on_date(ctx: &PageContext) -> bool {
    ctx.date_archive
}

fn on_not_found(ctx: &PageContext) -> bool {
    ctx.not_found
}

// Value matching

fn always(_: &Attachment, _: &PageContext, _: TemplateMatch) -> bool {
    true
}

fn exact_page(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::ExactPage { page_id } = attachment else {
        return false;
    };
    ctx.page.as_ref().is_some_and(|page| page.id == *page_id)
}

fn page_template(attachment: &Attachment, ctx: &PageContext, mode: TemplateMatch) -> bool {
    let Attachment::PageTemplate { label, file } = attachment else {
        return false;
    };
    let Some(template) = ctx.page.as_ref().and_then(|page| page.template.as_ref()) else {
        return false;
    };

    if mode == TemplateMatch::TemplateFile
        && let (Some(wanted), Some(current)) = (file, &template.file)
    {
        return wanted == current;
    }

    // Stored labels may be translated or prefixed, so the template's display
    // name only has to occur somewhere in the label.
    label.contains(template.name.as_str())
}

fn single_post(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::SinglePost { post_id, post_type } = attachment else {
        return false;
    };
    ctx.single
        .as_ref()
        .is_some_and(|single| single.id == *post_id && single.post_type == *post_type)
}

fn category_of_posts(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::CategoryOfPosts { category_id } = attachment else {
        return false;
    };
    ctx.single.as_ref().is_some_and(|single| {
        single.post_type == POST_TYPE_POST && single.categories.contains(category_id)
    })
}

fn post_format(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::PostFormat { label } = attachment else {
        return false;
    };
    ctx.single
        .as_ref()
        .and_then(|single| single.format.as_deref())
        .is_some_and(|format| format.to_lowercase() == label.to_lowercase())
}

fn all_posts_of_type(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::AllPostsOfType { post_type } = attachment else {
        return false;
    };
    ctx.single
        .as_ref()
        .is_some_and(|single| single.post_type == *post_type)
}

fn taxonomy_term(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::TaxonomyTerm { taxonomy, term_id } = attachment else {
        return false;
    };
    ctx.taxonomy_term
        .as_ref()
        .is_some_and(|term| term.taxonomy == *taxonomy && term.term_id == *term_id)
}

fn all_terms_of_taxonomy(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::AllTermsOfTaxonomy { taxonomy } = attachment else {
        return false;
    };
    ctx.taxonomy_term
        .as_ref()
        .is_some_and(|term| term.taxonomy == *taxonomy)
}

fn post_type_archive(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::PostTypeArchive { post_type } = attachment else {
        return false;
    };
    ctx.archive_post_type()
        .is_some_and(|current| current == *post_type)
}

fn author_archive(attachment: &Attachment, ctx: &PageContext, _: TemplateMatch) -> bool {
    let Attachment::AuthorArchive { author_id } = attachment else {
        return false;
    };
    ctx.author_archive == Some(*author_id)
}
