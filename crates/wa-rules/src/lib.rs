//! Data model for widget area replacement rules.
//!
//! This crate provides:
//! - [`PageContext`]: Classification facts for the in-flight request
//! - [`Attachment`] / [`AttachmentKind`]: Conditions and their specificity ranks
//! - [`ReplacementRule`]: A candidate area and the conditions it applies under
//! - [`RuleRecord`] / [`AttachmentRecord`]: Stored records and their conversion
//!
//! # Example
//!
//! ```
//! use wa_rules::{Attachment, AttachmentRecord, ReplacementRule, RuleRecord};
//!
//! let record = RuleRecord {
//!     area_id: "es-sidebar-1".to_owned(),
//!     area_name: "Blog Sidebar".to_owned(),
//!     target_area_id: "sidebar-main".to_owned(),
//!     attachments: vec![AttachmentRecord::new("post_type_all", "post")],
//! };
//!
//! let (rule, skipped) = ReplacementRule::from_record(&record);
//! assert!(skipped.is_empty());
//! assert_eq!(rule.attachments[0].rank(), 30);
//! ```

mod attachment;
mod context;
mod record;
mod rule;

pub use attachment::{
    Attachment, AttachmentKind, RANK_ALL_OF_TYPE, RANK_ARCHIVE, RANK_CATEGORY, RANK_EXACT,
    RANK_GROUP, Rank,
};
pub use context::{
    EntityRef, POST_TYPE_POST, PageContext, PageFacts, PageTemplate, SingleFacts, TermFacts,
};
pub use record::{AttachmentRecord, RecordError};
pub use rule::{CandidateArea, ReplacementRule, RuleRecord, SkippedAttachment, rules_from_records};
