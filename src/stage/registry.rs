use gloo_events::EventListener;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::config::ELEMENT_ID_ATTR;
use crate::error::StageResult;
use crate::stage::projection::ElementHandle;
use crate::types::ElementId;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh identifier. Never repeats for the life of the page.
pub fn next_element_id() -> ElementId {
    ElementId::from_sequence(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// CSS selector matching the node registered as `id`.
pub fn selector_for(id: &ElementId) -> String {
    format!("[{ELEMENT_ID_ATTR}=\"{id}\"]")
}

/// Identity and listener bookkeeping for the nodes on one canvas.
///
/// Every registered node owns the listeners granted to it; revoking the node
/// drops them, which detaches them from the DOM.
#[derive(Default)]
pub struct Registry {
    bindings: HashMap<ElementId, Vec<EventListener>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag `node` with a new identifier and make it interactive.
    pub fn register<N: ElementHandle + ?Sized>(&mut self, node: &N) -> StageResult<ElementId> {
        let id = next_element_id();
        node.set_attribute(ELEMENT_ID_ATTR, id.as_str())?;
        node.set_inline_style("cursor", "pointer")?;
        if !matches!(
            node.computed_style("position").as_deref(),
            Some("absolute" | "relative")
        ) {
            node.set_inline_style("position", "absolute")?;
        }
        self.bindings.insert(id.clone(), Vec::new());
        Ok(id)
    }

    /// Hand listeners to a registered node. Listeners for unknown ids are
    /// dropped immediately.
    pub fn grant(&mut self, id: &ElementId, listeners: Vec<EventListener>) {
        if let Some(binding) = self.bindings.get_mut(id) {
            binding.extend(listeners);
        }
    }

    pub fn revoke(&mut self, id: &ElementId) -> bool {
        self.bindings.remove(id).is_some()
    }

    /// Revoke `element` and every registered node beneath it.
    pub fn revoke_subtree(&mut self, element: &Element) -> usize {
        let mut revoked = 0;
        if let Some(id) = element.get_attribute(ELEMENT_ID_ATTR) {
            revoked += usize::from(self.revoke(&ElementId::new(id)));
        }
        if let Ok(nodes) = element.query_selector_all(&format!("[{ELEMENT_ID_ATTR}]")) {
            for index in 0..nodes.length() {
                let id = nodes
                    .item(index)
                    .and_then(|node| node.dyn_into::<Element>().ok())
                    .and_then(|node| node.get_attribute(ELEMENT_ID_ATTR));
                if let Some(id) = id {
                    revoked += usize::from(self.revoke(&ElementId::new(id)));
                }
            }
        }
        revoked
    }

    pub fn revoke_all(&mut self) -> usize {
        let count = self.bindings.len();
        self.bindings.clear();
        count
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.bindings.contains_key(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.bindings.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Find the live node for `id` inside `canvas`.
    ///
    /// Stale identifiers (revoked, or from a replaced canvas) resolve to `None`.
    pub fn resolve(&self, canvas: &Element, id: &ElementId) -> Option<HtmlElement> {
        if !self.contains(id) {
            return None;
        }
        canvas
            .query_selector(&selector_for(id))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::testing::FakeElement;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique_under_rapid_allocation() {
        let ids: HashSet<ElementId> = (0..1_000).map(|_| next_element_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_register_tags_node_and_normalizes_position() {
        let mut registry = Registry::new();
        let node = FakeElement::new("p").with_computed("position", "static");

        let id = registry.register(&node).unwrap();
        assert_eq!(node.attribute(ELEMENT_ID_ATTR), Some(id.to_string()));
        assert_eq!(node.inline("cursor").as_deref(), Some("pointer"));
        assert_eq!(node.inline("position").as_deref(), Some("absolute"));
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_register_keeps_relative_and_absolute_nodes() {
        let mut registry = Registry::new();
        for mode in ["relative", "absolute"] {
            let node = FakeElement::new("div").with_computed("position", mode);
            registry.register(&node).unwrap();
            assert_eq!(node.inline("position"), None);
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_many_nodes_gives_distinct_ids() {
        let mut registry = Registry::new();
        let nodes: Vec<FakeElement> = (0..50).map(|_| FakeElement::new("span")).collect();
        for node in &nodes {
            registry.register(node).unwrap();
        }
        let attrs: HashSet<String> = nodes
            .iter()
            .filter_map(|node| node.attribute(ELEMENT_ID_ATTR))
            .collect();
        assert_eq!(attrs.len(), 50);
        assert_eq!(registry.ids().len(), 50);
    }

    #[test]
    fn test_revoke_forgets_identity() {
        let mut registry = Registry::new();
        let first = registry.register(&FakeElement::new("p")).unwrap();
        let second = registry.register(&FakeElement::new("p")).unwrap();

        assert!(registry.revoke(&first));
        assert!(!registry.revoke(&first));
        assert!(!registry.contains(&first));
        assert!(registry.contains(&second));

        assert_eq!(registry.revoke_all(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_identifiers_not_reused_after_revoke_all() {
        let mut registry = Registry::new();
        let before = registry.register(&FakeElement::new("p")).unwrap();
        registry.revoke_all();
        let after = registry.register(&FakeElement::new("p")).unwrap();
        assert_ne!(before, after);
    }
}
