//! Replacement resolution for widget areas.
//!
//! Given the current page's classification and the replacement rules
//! offered for a target area, [`Resolver`] picks exactly one winning
//! candidate area (or none).
//!
//! Every attachment kind has a fixed specificity rank. The lowest rank among
//! all matching attachments wins. Ties go to the rule met first while walking
//! candidates in descending name order. Not-found pages use a separate path
//! that only looks at not-found attachments.
//!
//! # Example
//!
//! ```
//! use wa_resolver::Resolver;
//! use wa_rules::{Attachment, PageContext, ReplacementRule};
//!
//! let rules = vec![
//!     ReplacementRule::new("blog", "Blog-Sidebar", "sidebar-main")
//!         .with_attachment(Attachment::AllPostsOfType { post_type: "post".to_owned() }),
//!     ReplacementRule::new("page-7", "Page-7-Sidebar", "sidebar-main")
//!         .with_attachment(Attachment::ExactPage { page_id: 7 }),
//! ];
//!
//! let resolver = Resolver::default();
//! let ctx = PageContext::new().with_page(7);
//! assert_eq!(resolver.resolve("sidebar-main", &ctx, &rules).as_deref(), Some("page-7"));
//! ```

mod resolver;
mod table;

pub use resolver::{Decision, Resolver, ResolverOptions, TemplateMatch, Winner};
