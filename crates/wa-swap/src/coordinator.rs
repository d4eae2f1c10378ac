//! Per-request swap coordination.
//!
//! A [`SwapCoordinator`] lives for exactly one render request. It resolves
//! replacements for all default areas the first time one is needed, keeps
//! the decisions for the rest of the request, and rewrites content lists.
//! In preview mode it also masks replaced areas from presence queries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use wa_resolver::{Decision, Resolver};
use wa_rules::PageContext;

use crate::host::{AreaRegistry, ContentLists, RegistryEntry, RequestHost, SwapMap};

/// Surface the request renders for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSurface {
    /// Public page render.
    #[default]
    Frontend,
    /// Administration screen outside the editing surface.
    Admin,
    /// Live editing surface (public page rendered inside an editor).
    Editor,
}

/// Coordinator options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapOptions {
    /// Surface of the current request.
    pub surface: RenderSurface,
    /// Whether replaced areas are masked while the editor is active.
    pub preview_enabled: bool,
}

impl Default for SwapOptions {
    fn default() -> Self {
        Self {
            surface: RenderSurface::Frontend,
            preview_enabled: true,
        }
    }
}

/// Presence query the host asks about an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresenceQuery {
    /// "Does this area have content?"
    HasWidgets,
    /// "Is this area active?"
    IsActive,
}

/// Presence-masking state of an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaState {
    /// Registered and answering presence queries normally.
    Visible,
    /// Removed from the registry with a captured snapshot.
    Hidden,
}

/// Snapshot taken when an area is hidden.
#[derive(Debug, Default)]
struct Capture {
    /// Registry entry as it was before the first hide.
    entry: Option<RegistryEntry>,
    /// Host's answer to each query before masking.
    answers: HashMap<PresenceQuery, bool>,
    hidden: bool,
}

/// Request-scoped replacement state.
pub struct SwapCoordinator<'h, H> {
    host: &'h H,
    resolver: &'h Resolver,
    options: SwapOptions,
    context: Option<PageContext>,
    decisions: BTreeMap<String, Decision>,
    swap_map: SwapMap,
    all_resolved: bool,
    captures: BTreeMap<String, Capture>,
    discovery_rendered: bool,
}

impl<'h, H> SwapCoordinator<'h, H>
where
    H: RequestHost + AreaRegistry,
{
    /// Create the coordinator for one request.
    #[must_use]
    pub fn new(host: &'h H, resolver: &'h Resolver, options: SwapOptions) -> Self {
        Self {
            host,
            resolver,
            options,
            context: None,
            decisions: BTreeMap::new(),
            swap_map: SwapMap::new(),
            all_resolved: false,
            captures: BTreeMap::new(),
            discovery_rendered: false,
        }
    }

    /// Options this coordinator was created with.
    #[must_use]
    pub fn options(&self) -> SwapOptions {
        self.options
    }

    /// Target → winner mappings resolved so far.
    #[must_use]
    pub fn swap_map(&self) -> &SwapMap {
        &self.swap_map
    }

    /// Decisions resolved so far, keyed by target area id.
    #[must_use]
    pub fn decisions(&self) -> &BTreeMap<String, Decision> {
        &self.decisions
    }

    /// Page classification, once the request has been classified.
    #[must_use]
    pub fn context(&self) -> Option<&PageContext> {
        self.context.as_ref()
    }

    /// Make sure `target_area_id` has a decision.
    ///
    /// The first call resolves every default area in one pass; later calls
    /// are no-ops. Areas outside the default set are recorded as unmatched.
    pub fn ensure_resolved(&mut self, target_area_id: &str) {
        self.ensure_all_resolved();

        if !self.decisions.contains_key(target_area_id) {
            tracing::debug!(target_area = %target_area_id, "Not a default area, never replaced");
            self.decisions.insert(
                target_area_id.to_owned(),
                Decision {
                    target_area_id: target_area_id.to_owned(),
                    winner: None,
                },
            );
        }
    }

    fn ensure_all_resolved(&mut self) {
        if self.all_resolved {
            return;
        }
        self.all_resolved = true;

        let ctx = self
            .context
            .get_or_insert_with(|| self.host.classify_current_request());

        let targets = self.host.default_target_areas();
        tracing::debug!(targets = targets.len(), "Resolving replacements");

        for target in targets {
            if self.decisions.contains_key(&target.id) {
                continue;
            }
            let rules = self.host.candidate_rules(&target.id);
            let decision = self.resolver.decide(&target.id, ctx, &rules);
            if let Some(winner) = decision.winner_area_id() {
                self.swap_map.insert(target.id.clone(), winner.to_owned());
            }
            self.decisions.insert(target.id, decision);
        }
    }

    /// Copy each winner's content list into its target's slot.
    ///
    /// A winner without a list empties the target. Winner slots are read,
    /// never written, so applying twice gives the same lists as once.
    pub fn apply_swaps(&self, lists: &mut ContentLists) {
        for (target, winner) in &self.swap_map {
            if self.swap_map.contains_key(winner) {
                tracing::warn!(
                    target_area = %target,
                    winner = %winner,
                    "Replacement area is itself replaced, skipping"
                );
                continue;
            }
            let content = lists.get(winner).cloned().unwrap_or_default();
            lists.insert(target.clone(), content);
        }
    }

    /// Main entry point for the host's content list pipeline.
    ///
    /// Admin screens outside the editing surface pass through untouched.
    #[must_use]
    pub fn swap_widgets(&mut self, mut lists: ContentLists) -> ContentLists {
        if self.options.surface == RenderSurface::Admin {
            return lists;
        }
        self.ensure_all_resolved();
        self.apply_swaps(&mut lists);
        lists
    }

    fn masking_active(&self) -> bool {
        self.options.surface == RenderSurface::Editor && self.options.preview_enabled
    }

    /// Masking state of `area_id`.
    #[must_use]
    pub fn area_state(&self, area_id: &str) -> AreaState {
        match self.captures.get(area_id) {
            Some(capture) if capture.hidden => AreaState::Hidden,
            _ => AreaState::Visible,
        }
    }

    fn hide(&mut self, area_id: &str) {
        let capture = self.captures.entry(area_id.to_owned()).or_default();
        let removed = self.host.remove_entry(area_id);
        // Keep the first snapshot: later hides see the already-removed entry.
        if capture.entry.is_none() {
            capture.entry = removed;
        }
        capture.hidden = true;
    }

    fn restore(&mut self, area_id: &str) -> Option<&Capture> {
        let capture = self.captures.get_mut(area_id)?;
        if let Some(entry) = &capture.entry {
            self.host.set_entry(area_id, entry.clone());
        }
        capture.hidden = false;
        Some(capture)
    }

    /// Early presence hook: hide a replaced area from the editing surface.
    ///
    /// Returns `false` for masked areas and `current` otherwise. The first
    /// answer seen per query kind is kept for the rest of the request.
    pub fn hide_on_presence(&mut self, query: PresenceQuery, area_id: &str, current: bool) -> bool {
        if !self.masking_active() {
            return current;
        }
        self.ensure_all_resolved();
        if !self.swap_map.contains_key(area_id) {
            return current;
        }

        self.hide(area_id);
        if let Some(capture) = self.captures.get_mut(area_id) {
            capture.answers.entry(query).or_insert(current);
        }
        tracing::debug!(area = %area_id, ?query, "Area hidden for editor");
        false
    }

    /// Late presence hook: reinstate a hidden area.
    ///
    /// Returns the answer captured when the area was hidden. Areas that were
    /// never captured keep `current`.
    pub fn restore_on_presence(
        &mut self,
        query: PresenceQuery,
        area_id: &str,
        current: bool,
    ) -> bool {
        if !self.masking_active() {
            return current;
        }
        match self.restore(area_id) {
            Some(capture) => capture.answers.get(&query).copied().unwrap_or(current),
            None => current,
        }
    }

    /// Hide every replaced default area and pre-render the replacements.
    pub fn enter_preview_mode(&mut self) {
        if !self.masking_active() {
            return;
        }
        self.ensure_all_resolved();

        let targets: Vec<String> = self.swap_map.keys().cloned().collect();
        for target in &targets {
            self.hide(target);
        }
        tracing::debug!(hidden = targets.len(), "Entered preview mode");

        self.prepare_for_editor();
    }

    /// Reinstate every captured area.
    pub fn exit_preview_mode(&mut self) {
        let captured: Vec<String> = self.captures.keys().cloned().collect();
        for area_id in &captured {
            self.restore(area_id);
        }
        tracing::debug!(restored = captured.len(), "Exited preview mode");
    }

    /// Render each replacement area once so the editor can discover it.
    ///
    /// Runs at most once per request.
    pub fn prepare_for_editor(&mut self) {
        if !self.masking_active() || self.discovery_rendered {
            return;
        }
        self.ensure_all_resolved();
        self.discovery_rendered = true;

        let winners: BTreeSet<&String> = self.swap_map.values().collect();
        for winner in winners {
            tracing::trace!(area = %winner, "Rendering for discovery");
            self.host.render_for_discovery(winner);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wa_rules::{Attachment, ReplacementRule};

    use super::*;
    use crate::MemoryHost;

    fn content(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn blog_host(ctx: PageContext) -> MemoryHost {
        MemoryHost::new()
            .with_context(ctx)
            .with_target("sidebar-main", "Main Sidebar")
            .with_target("footer", "Footer")
            .with_rule(
                ReplacementRule::new("blog-sidebar", "Blog-Sidebar", "sidebar-main").with_attachment(
                    Attachment::AllPostsOfType {
                        post_type: "post".to_owned(),
                    },
                ),
            )
            .with_rule(
                ReplacementRule::new("page-7-sidebar", "Page-7-Sidebar", "sidebar-main")
                    .with_attachment(Attachment::ExactPage { page_id: 7 }),
            )
            .with_rule(
                ReplacementRule::new("empty-footer", "Empty Footer", "footer")
                    .with_attachment(Attachment::AllPages),
            )
    }

    fn lists() -> ContentLists {
        let mut lists = ContentLists::new();
        lists.insert("sidebar-main".to_owned(), content(&["search-2", "recent-posts-2"]));
        lists.insert("footer".to_owned(), content(&["text-1"]));
        lists.insert("blog-sidebar".to_owned(), content(&["categories-3"]));
        lists.insert("page-7-sidebar".to_owned(), content(&["text-7", "nav-menu-1"]));
        lists
    }

    fn editor() -> SwapOptions {
        SwapOptions {
            surface: RenderSurface::Editor,
            preview_enabled: true,
        }
    }

    #[test]
    fn test_swap_widgets_on_page() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        let swapped = coordinator.swap_widgets(lists());

        assert_eq!(swapped["sidebar-main"], content(&["text-7", "nav-menu-1"]));
        // Replacement without a content list empties the target
        assert!(swapped["footer"].is_empty());
        // Winner slots are untouched
        assert_eq!(swapped["page-7-sidebar"], content(&["text-7", "nav-menu-1"]));
        assert!(!swapped.contains_key("empty-footer"));
    }

    #[test]
    fn test_swap_widgets_on_post() {
        let host = blog_host(PageContext::new().with_single(99, "post"));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        let swapped = coordinator.swap_widgets(lists());

        assert_eq!(swapped["sidebar-main"], content(&["categories-3"]));
        assert_eq!(swapped["footer"], content(&["text-1"]));
        assert_eq!(
            coordinator.swap_map().get("sidebar-main").map(String::as_str),
            Some("blog-sidebar")
        );
        assert!(!coordinator.swap_map().contains_key("footer"));
    }

    #[test]
    fn test_resolution_runs_once_per_request() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        let _ = coordinator.swap_widgets(lists());
        let _ = coordinator.swap_widgets(lists());
        coordinator.ensure_resolved("sidebar-main");
        coordinator.ensure_resolved("footer");

        assert_eq!(host.classify_calls(), 1);
        assert_eq!(
            host.rule_queries(),
            vec!["sidebar-main".to_owned(), "footer".to_owned()]
        );
    }

    #[test]
    fn test_ensure_resolved_batches_all_targets() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        coordinator.ensure_resolved("footer");

        assert_eq!(coordinator.decisions().len(), 2);
        assert_eq!(
            coordinator.decisions()["sidebar-main"].winner_area_id(),
            Some("page-7-sidebar")
        );
        assert!(coordinator.context().is_some());
    }

    #[test]
    fn test_unknown_area_recorded_as_unmatched() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        coordinator.ensure_resolved("not-registered");

        assert!(coordinator.decisions()["not-registered"].winner.is_none());
        assert!(!coordinator.swap_map().contains_key("not-registered"));
    }

    #[test]
    fn test_apply_swaps_is_idempotent() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());
        coordinator.ensure_resolved("sidebar-main");

        let mut once = lists();
        coordinator.apply_swaps(&mut once);
        let mut twice = once.clone();
        coordinator.apply_swaps(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_admin_passes_through() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let options = SwapOptions {
            surface: RenderSurface::Admin,
            preview_enabled: true,
        };
        let mut coordinator = SwapCoordinator::new(&host, &resolver, options);

        assert_eq!(coordinator.swap_widgets(lists()), lists());
        assert_eq!(host.classify_calls(), 0);
    }

    #[test]
    fn test_no_entity_means_no_swaps() {
        let host = blog_host(PageContext::new().with_search());
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        assert_eq!(coordinator.swap_widgets(lists()), lists());
        assert!(coordinator.swap_map().is_empty());
    }

    #[test]
    fn test_replaced_winner_is_skipped() {
        let host = MemoryHost::new()
            .with_context(PageContext::new().with_page(1))
            .with_target("a", "A")
            .with_target("b", "B")
            .with_rule(ReplacementRule::new("b", "B", "a").with_attachment(Attachment::AllPages))
            .with_rule(ReplacementRule::new("c", "C", "b").with_attachment(Attachment::AllPages));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        let mut input = ContentLists::new();
        input.insert("a".to_owned(), content(&["x"]));
        input.insert("b".to_owned(), content(&["y"]));
        input.insert("c".to_owned(), content(&["z"]));

        let once = coordinator.swap_widgets(input);
        assert_eq!(once["a"], content(&["x"]));
        assert_eq!(once["b"], content(&["z"]));
        assert_eq!(coordinator.swap_widgets(once.clone()), once);
    }

    #[test]
    fn test_preview_round_trip_restores_registry() {
        let host = blog_host(PageContext::new().with_page(7)).with_entry(RegistryEntry {
            id: "sidebar-main".to_owned(),
            name: "Main Sidebar".to_owned(),
            description: "Appears on posts and pages".to_owned(),
            class: "main".to_owned(),
            before_widget: "<section id=\"%1$s\">".to_owned(),
            after_widget: "</section>".to_owned(),
            before_title: "<h2>".to_owned(),
            after_title: "</h2>".to_owned(),
        });
        let before = host.registry();
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, editor());

        coordinator.enter_preview_mode();
        assert!(!host.registry().contains_key("sidebar-main"));
        assert!(!host.registry().contains_key("footer"));
        assert_eq!(coordinator.area_state("sidebar-main"), AreaState::Hidden);

        coordinator.exit_preview_mode();
        assert_eq!(host.registry(), before);
        assert_eq!(coordinator.area_state("sidebar-main"), AreaState::Visible);
    }

    #[test]
    fn test_preview_renders_replacements_once() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, editor());

        coordinator.enter_preview_mode();
        coordinator.prepare_for_editor();
        coordinator.enter_preview_mode();

        assert_eq!(
            host.discovery_renders(),
            vec!["empty-footer".to_owned(), "page-7-sidebar".to_owned()]
        );
    }

    #[test]
    fn test_presence_hooks_mask_and_restore() {
        let host = blog_host(PageContext::new().with_page(7));
        let before = host.registry();
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, editor());

        assert!(!coordinator.hide_on_presence(PresenceQuery::HasWidgets, "sidebar-main", true));
        assert!(!coordinator.hide_on_presence(PresenceQuery::IsActive, "sidebar-main", true));
        // Hiding twice keeps the original snapshot
        assert!(!coordinator.hide_on_presence(PresenceQuery::HasWidgets, "sidebar-main", false));
        assert_eq!(coordinator.area_state("sidebar-main"), AreaState::Hidden);

        assert!(coordinator.restore_on_presence(PresenceQuery::HasWidgets, "sidebar-main", false));
        assert!(coordinator.restore_on_presence(PresenceQuery::IsActive, "sidebar-main", false));
        assert_eq!(host.registry(), before);
        assert_eq!(coordinator.area_state("sidebar-main"), AreaState::Visible);
    }

    #[test]
    fn test_first_presence_answer_survives_later_cycles() {
        let host = blog_host(PageContext::new().with_page(7));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, editor());

        assert!(!coordinator.hide_on_presence(PresenceQuery::HasWidgets, "sidebar-main", true));
        assert!(coordinator.restore_on_presence(PresenceQuery::HasWidgets, "sidebar-main", false));

        // A second hide/restore cycle reports the answer from the first one
        assert!(!coordinator.hide_on_presence(PresenceQuery::HasWidgets, "sidebar-main", false));
        assert!(coordinator.restore_on_presence(PresenceQuery::HasWidgets, "sidebar-main", false));
        assert!(host.registry().contains_key("sidebar-main"));
    }

    #[test]
    fn test_presence_hooks_ignore_unreplaced_areas() {
        let host = blog_host(PageContext::new().with_single(99, "post"));
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, editor());

        assert!(coordinator.hide_on_presence(PresenceQuery::IsActive, "footer", true));
        assert_eq!(coordinator.area_state("footer"), AreaState::Visible);
        // Nothing captured: restore is a no-op
        assert!(!coordinator.restore_on_presence(PresenceQuery::IsActive, "footer", false));
        assert!(host.registry().contains_key("footer"));
    }

    #[test]
    fn test_masking_needs_editor_surface() {
        let host = blog_host(PageContext::new().with_page(7));
        let before = host.registry();
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, SwapOptions::default());

        assert!(coordinator.hide_on_presence(PresenceQuery::HasWidgets, "sidebar-main", true));
        coordinator.enter_preview_mode();
        coordinator.prepare_for_editor();

        assert_eq!(host.registry(), before);
        assert!(host.discovery_renders().is_empty());
    }

    #[test]
    fn test_preview_disabled_in_options() {
        let host = blog_host(PageContext::new().with_page(7));
        let before = host.registry();
        let resolver = Resolver::default();
        let options = SwapOptions {
            surface: RenderSurface::Editor,
            preview_enabled: false,
        };
        let mut coordinator = SwapCoordinator::new(&host, &resolver, options);

        coordinator.enter_preview_mode();
        assert_eq!(host.registry(), before);
        // Swapping still applies inside the editor
        let swapped = coordinator.swap_widgets(lists());
        assert_eq!(swapped["sidebar-main"], content(&["text-7", "nav-menu-1"]));
    }

    #[test]
    fn test_restore_without_registry_entry() {
        // Target is a default area but was never registered
        let host = MemoryHost::new()
            .with_context(PageContext::new().with_page(1))
            .with_target("ghost", "Ghost")
            .with_rule(
                ReplacementRule::new("alt", "Alt", "ghost").with_attachment(Attachment::AllPages),
            );
        let _ = host.remove_entry("ghost");
        let resolver = Resolver::default();
        let mut coordinator = SwapCoordinator::new(&host, &resolver, editor());

        coordinator.enter_preview_mode();
        coordinator.exit_preview_mode();

        assert!(host.entry("ghost").is_none());
    }
}
