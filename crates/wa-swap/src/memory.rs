//! In-memory host for tests and offline runs.
//!
//! Provides [`MemoryHost`], which implements [`RequestHost`] and
//! [`AreaRegistry`] over plain collections and records what the
//! coordinator asked of it.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use wa_rules::{PageContext, ReplacementRule};

use crate::host::{AreaRegistry, RegistryEntry, RequestHost, TargetArea};

/// In-memory host.
///
/// # Example
///
/// ```ignore
/// use wa_rules::{Attachment, PageContext, ReplacementRule};
/// use wa_swap::MemoryHost;
///
/// let host = MemoryHost::new()
///     .with_context(PageContext::new().with_page(7))
///     .with_target("sidebar-main", "Main Sidebar")
///     .with_rule(
///         ReplacementRule::new("page-7", "Page 7", "sidebar-main")
///             .with_attachment(Attachment::ExactPage { page_id: 7 }),
///     );
/// assert!(host.registry().contains_key("sidebar-main"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryHost {
    context: RwLock<PageContext>,
    targets: RwLock<Vec<TargetArea>>,
    rules: RwLock<Vec<ReplacementRule>>,
    registry: RwLock<BTreeMap<String, RegistryEntry>>,
    discovery_renders: RwLock<Vec<String>>,
    rule_queries: RwLock<Vec<String>>,
    classify_calls: AtomicUsize,
}

impl MemoryHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page classification returned for the request.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_context(self, context: PageContext) -> Self {
        *self.context.write().unwrap() = context;
        self
    }

    /// Add a default target area and register it.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_target(self, id: impl Into<String>, name: impl Into<String>) -> Self {
        let target = TargetArea {
            id: id.into(),
            name: name.into(),
        };
        self.registry.write().unwrap().insert(
            target.id.clone(),
            RegistryEntry::new(target.id.clone(), target.name.clone()),
        );
        self.targets.write().unwrap().push(target);
        self
    }

    /// Add a stored rule.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_rule(self, rule: ReplacementRule) -> Self {
        self.rules.write().unwrap().push(rule);
        self
    }

    /// Add or overwrite a registry entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_entry(self, entry: RegistryEntry) -> Self {
        self.registry
            .write()
            .unwrap()
            .insert(entry.id.clone(), entry);
        self
    }

    /// Copy of the current registry.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn registry(&self) -> BTreeMap<String, RegistryEntry> {
        self.registry.read().unwrap().clone()
    }

    /// Areas rendered for discovery, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn discovery_renders(&self) -> Vec<String> {
        self.discovery_renders.read().unwrap().clone()
    }

    /// Targets whose rules were requested, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn rule_queries(&self) -> Vec<String> {
        self.rule_queries.read().unwrap().clone()
    }

    /// How many times the request was classified.
    #[must_use]
    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::Relaxed)
    }
}

impl RequestHost for MemoryHost {
    fn classify_current_request(&self) -> PageContext {
        self.classify_calls.fetch_add(1, Ordering::Relaxed);
        self.context.read().unwrap().clone()
    }

    fn default_target_areas(&self) -> Vec<TargetArea> {
        self.targets.read().unwrap().clone()
    }

    fn candidate_rules(&self, target_area_id: &str) -> Vec<ReplacementRule> {
        self.rule_queries
            .write()
            .unwrap()
            .push(target_area_id.to_owned());

        let mut rules: Vec<ReplacementRule> = self
            .rules
            .read()
            .unwrap()
            .iter()
            .filter(|rule| rule.target_area_id == target_area_id)
            .cloned()
            .collect();
        rules.sort_by(|a, b| a.candidate.name.cmp(&b.candidate.name));
        rules
    }
}

impl AreaRegistry for MemoryHost {
    fn entry(&self, area_id: &str) -> Option<RegistryEntry> {
        self.registry.read().unwrap().get(area_id).cloned()
    }

    fn set_entry(&self, area_id: &str, entry: RegistryEntry) {
        self.registry
            .write()
            .unwrap()
            .insert(area_id.to_owned(), entry);
    }

    fn remove_entry(&self, area_id: &str) -> Option<RegistryEntry> {
        self.registry.write().unwrap().remove(area_id)
    }

    fn render_for_discovery(&self, area_id: &str) {
        self.discovery_renders
            .write()
            .unwrap()
            .push(area_id.to_owned());
    }
}
