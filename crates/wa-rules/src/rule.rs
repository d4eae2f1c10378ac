//! Replacement rules.

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::record::{AttachmentRecord, RecordError};

/// A replacement area offered by a rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateArea {
    /// Area id used in content lists (e.g., "es-sidebar-3").
    pub id: String,
    /// Human-readable name. Resolution order is derived from it.
    pub name: String,
}

/// A candidate area together with the conditions under which it replaces
/// its target area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    /// Area offered as the replacement.
    pub candidate: CandidateArea,
    /// Default area this rule may replace.
    pub target_area_id: String,
    /// Conditions. Any single match makes the rule a candidate.
    pub attachments: Vec<Attachment>,
}

impl ReplacementRule {
    /// Create a rule without attachments.
    #[must_use]
    pub fn new(
        candidate_id: impl Into<String>,
        candidate_name: impl Into<String>,
        target_area_id: impl Into<String>,
    ) -> Self {
        Self {
            candidate: CandidateArea {
                id: candidate_id.into(),
                name: candidate_name.into(),
            },
            target_area_id: target_area_id.into(),
            attachments: Vec::new(),
        }
    }

    /// Add an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Build a rule from a stored record.
    ///
    /// Malformed attachments are skipped individually and returned next to
    /// the rule, so one bad entry never hides the rest of the rule.
    #[must_use]
    pub fn from_record(record: &RuleRecord) -> (Self, Vec<SkippedAttachment>) {
        let mut attachments = Vec::with_capacity(record.attachments.len());
        let mut skipped = Vec::new();

        for (index, raw) in record.attachments.iter().enumerate() {
            match Attachment::try_from(raw) {
                Ok(attachment) => attachments.push(attachment),
                Err(error) => {
                    tracing::warn!(
                        area = %record.area_id,
                        index,
                        %error,
                        "Skipping malformed attachment"
                    );
                    skipped.push(SkippedAttachment {
                        area_id: record.area_id.clone(),
                        index,
                        error,
                    });
                }
            }
        }

        let rule = Self {
            candidate: CandidateArea {
                id: record.area_id.clone(),
                name: record.area_name.clone(),
            },
            target_area_id: record.target_area_id.clone(),
            attachments,
        };
        (rule, skipped)
    }
}

/// Rule as stored by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Id of the replacement area this record describes.
    pub area_id: String,
    /// Display name (the record's title).
    pub area_name: String,
    /// Default area being replaced.
    pub target_area_id: String,
    /// Stored attachments, in authoring order.
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
}

/// An attachment dropped while loading a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedAttachment {
    /// Area the attachment belonged to.
    pub area_id: String,
    /// Position in the stored attachment list.
    pub index: usize,
    /// Why it was dropped.
    pub error: RecordError,
}

/// Convert stored records into rules, dropping malformed attachments.
#[must_use]
pub fn rules_from_records(records: &[RuleRecord]) -> (Vec<ReplacementRule>, Vec<SkippedAttachment>) {
    let mut rules = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();
    for record in records {
        let (rule, mut dropped) = ReplacementRule::from_record(record);
        rules.push(rule);
        skipped.append(&mut dropped);
    }
    (rules, skipped)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record() -> RuleRecord {
        RuleRecord {
            area_id: "es-sidebar-1".to_owned(),
            area_name: "Blog Sidebar".to_owned(),
            target_area_id: "sidebar-main".to_owned(),
            attachments: vec![
                AttachmentRecord::new("post_type_all", "post"),
                AttachmentRecord::new("post_type", "page"),
                AttachmentRecord::new("custom", "404"),
            ],
        }
    }

    #[test]
    fn test_from_record_keeps_valid_attachments() {
        let (rule, skipped) = ReplacementRule::from_record(&record());

        assert_eq!(rule.candidate.id, "es-sidebar-1");
        assert_eq!(rule.candidate.name, "Blog Sidebar");
        assert_eq!(rule.target_area_id, "sidebar-main");
        assert_eq!(
            rule.attachments,
            vec![
                Attachment::AllPostsOfType {
                    post_type: "post".to_owned()
                },
                Attachment::NotFound,
            ]
        );
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].index, 1);
        assert_eq!(
            skipped[0].error,
            RecordError::MissingField { field: "object_id" }
        );
    }

    #[test]
    fn test_rules_from_records_collects_all_skips() {
        let mut second = record();
        second.area_id = "es-sidebar-2".to_owned();
        second.attachments.push(AttachmentRecord::default());

        let (rules, skipped) = rules_from_records(&[record(), second]);

        assert_eq!(rules.len(), 2);
        assert_eq!(skipped.len(), 3);
        assert_eq!(skipped[2].area_id, "es-sidebar-2");
        assert_eq!(skipped[2].index, 3);
    }

    #[test]
    fn test_builder() {
        let rule = ReplacementRule::new("a", "Alpha", "sidebar-main")
            .with_attachment(Attachment::FrontPage);
        assert_eq!(rule.attachments, vec![Attachment::FrontPage]);
    }

    #[test]
    fn test_deserialize_record_without_attachments() {
        let yaml = "area_id: es-sidebar-9\narea_name: Empty\ntarget_area_id: footer\n";
        let record: RuleRecord = serde_yaml::from_str(yaml).unwrap();
        let (rule, skipped) = ReplacementRule::from_record(&record);
        assert!(rule.attachments.is_empty());
        assert!(skipped.is_empty());
    }
}
