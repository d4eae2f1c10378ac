//! Specificity-ranked replacement resolution.

use serde::{Deserialize, Serialize};
use wa_rules::{Attachment, AttachmentKind, PageContext, RANK_EXACT, Rank, ReplacementRule};

use crate::table;

/// Starting rank; every real rank is lower.
const NO_RANK: Rank = 9999;

/// How page template attachments are compared with the current template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateMatch {
    /// The template's display name must occur in the stored label.
    #[default]
    Label,
    /// Compare stable template files when both sides have one, otherwise
    /// fall back to [`TemplateMatch::Label`].
    TemplateFile,
}

/// Resolver options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Page template comparison mode.
    pub template_match: TemplateMatch,
}

/// The rule that won resolution for a target area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Winner {
    /// Winning candidate area id.
    pub area_id: String,
    /// Winning candidate area name.
    pub area_name: String,
    /// Kind of the attachment that decided the win.
    pub kind: AttachmentKind,
    /// Rank of that attachment.
    pub rank: Rank,
}

/// Resolution outcome for one target area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Target area that was resolved.
    pub target_area_id: String,
    /// Winner, or `None` when no rule matched.
    pub winner: Option<Winner>,
}

impl Decision {
    fn none(target: &str) -> Self {
        Self {
            target_area_id: target.to_owned(),
            winner: None,
        }
    }

    /// Winning area id, if any.
    #[must_use]
    pub fn winner_area_id(&self) -> Option<&str> {
        self.winner.as_ref().map(|w| w.area_id.as_str())
    }
}

/// Picks the replacement for a target area.
///
/// Pure function of its inputs: no I/O, no state between calls.
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    options: ResolverOptions,
}

impl Resolver {
    /// Create a resolver.
    #[must_use]
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Options this resolver was built with.
    #[must_use]
    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Winning candidate area id for `target`, or `None`.
    #[must_use]
    pub fn resolve(
        &self,
        target: &str,
        ctx: &PageContext,
        rules: &[ReplacementRule],
    ) -> Option<String> {
        self.decide(target, ctx, rules)
            .winner
            .map(|winner| winner.area_id)
    }

    /// Full decision for `target`.
    ///
    /// Rules for other targets are ignored. On not-found pages only
    /// not-found attachments count and the first rule in ascending name
    /// order wins. Elsewhere the lowest rank wins; among equal ranks the
    /// rule met first in descending name order is kept.
    #[must_use]
    pub fn decide(&self, target: &str, ctx: &PageContext, rules: &[ReplacementRule]) -> Decision {
        let mut candidates: Vec<&ReplacementRule> = rules
            .iter()
            .filter(|rule| rule.target_area_id == target)
            .collect();

        if candidates.is_empty() {
            return Decision::none(target);
        }

        // Case-insensitive title order, then raw name and id for determinism.
        candidates.sort_by_cached_key(|rule| {
            (
                rule.candidate.name.to_lowercase(),
                rule.candidate.name.clone(),
                rule.candidate.id.clone(),
            )
        });

        let decision = if ctx.not_found {
            Self::decide_not_found(target, &candidates)
        } else if ctx.has_current_entity() {
            candidates.reverse();
            self.decide_ranked(target, ctx, &candidates)
        } else {
            Decision::none(target)
        };

        match &decision.winner {
            Some(winner) => tracing::debug!(
                target_area = %target,
                winner = %winner.area_id,
                kind = %winner.kind,
                rank = winner.rank,
                "Replacement resolved"
            ),
            None => tracing::debug!(target_area = %target, "No replacement"),
        }

        decision
    }

    fn decide_not_found(target: &str, ascending: &[&ReplacementRule]) -> Decision {
        let winner = ascending
            .iter()
            .find(|rule| rule.attachments.contains(&Attachment::NotFound))
            .map(|rule| Winner {
                area_id: rule.candidate.id.clone(),
                area_name: rule.candidate.name.clone(),
                kind: AttachmentKind::NotFound,
                rank: AttachmentKind::NotFound.rank(),
            });

        Decision {
            target_area_id: target.to_owned(),
            winner,
        }
    }

    fn decide_ranked(
        &self,
        target: &str,
        ctx: &PageContext,
        descending: &[&ReplacementRule],
    ) -> Decision {
        let mut best_rank = NO_RANK;
        let mut winner = None;

        'rules: for rule in descending {
            for attachment in &rule.attachments {
                let Some(rank) = table::evaluate(attachment, ctx, self.options.template_match)
                else {
                    continue;
                };

                tracing::trace!(
                    target_area = %target,
                    candidate = %rule.candidate.id,
                    kind = %attachment.kind(),
                    rank,
                    "Attachment matched"
                );

                if rank < best_rank {
                    best_rank = rank;
                    winner = Some(Winner {
                        area_id: rule.candidate.id.clone(),
                        area_name: rule.candidate.name.clone(),
                        kind: attachment.kind(),
                        rank,
                    });

                    // Nothing ranks below an exact match.
                    if best_rank == RANK_EXACT {
                        break 'rules;
                    }
                }
            }
        }

        Decision {
            target_area_id: target.to_owned(),
            winner,
        }
    }
}
