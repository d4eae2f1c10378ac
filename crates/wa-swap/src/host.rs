//! Collaborator traits implemented by the host.
//!
//! The coordinator never fetches anything itself. Rule records, page
//! classification and the area registry all belong to the host; these
//! traits are the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wa_rules::{PageContext, ReplacementRule};

/// Area id → ordered content item ids, as the render pipeline sees them.
pub type ContentLists = BTreeMap<String, Vec<String>>;

/// Target area id → winning candidate area id.
pub type SwapMap = BTreeMap<String, String>;

/// A default area eligible for replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArea {
    /// Area id (e.g., "sidebar-main").
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Registration arguments of an area, as held by the host's registry.
///
/// Snapshots of this value are restored verbatim after preview masking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryEntry {
    /// Area id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description shown in editing screens.
    pub description: String,
    /// Extra CSS class.
    pub class: String,
    /// Markup before each content item.
    pub before_widget: String,
    /// Markup after each content item.
    pub after_widget: String,
    /// Markup before each item title.
    pub before_title: String,
    /// Markup after each item title.
    pub after_title: String,
}

impl RegistryEntry {
    /// Create an entry with the given id and name and empty markup.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Request-scoped facts and stored rules.
pub trait RequestHost {
    /// Classification of the in-flight request.
    fn classify_current_request(&self) -> PageContext;

    /// Default areas eligible for replacement, in registration order.
    fn default_target_areas(&self) -> Vec<TargetArea>;

    /// Every stored rule that targets `target_area_id`.
    fn candidate_rules(&self, target_area_id: &str) -> Vec<ReplacementRule>;
}

/// The host's process-wide table of registered areas.
///
/// Methods take `&self`: the registry is shared with the rest of the host,
/// which owns its synchronization.
pub trait AreaRegistry {
    /// Current registry entry for `area_id`.
    fn entry(&self, area_id: &str) -> Option<RegistryEntry>;

    /// Insert or overwrite the entry for `area_id`.
    fn set_entry(&self, area_id: &str, entry: RegistryEntry);

    /// Remove the entry for `area_id`, returning it.
    fn remove_entry(&self, area_id: &str) -> Option<RegistryEntry>;

    /// Materialize an area's content so an editing surface can discover it.
    ///
    /// Output is discarded. Must not fail for areas without content.
    fn render_for_discovery(&self, area_id: &str);
}
