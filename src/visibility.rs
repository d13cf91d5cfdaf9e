use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Initialized,
}

/// Checkbox state of a category's "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Checked,
    Indeterminate,
    Unchecked,
}

/// The single owner of which metric series are drawn. Every view reads it and
/// routes mutations back through the methods below.
#[derive(Debug, Clone)]
pub struct SeriesVisibilityStore {
    state: StoreState,
    visible: HashSet<String>,
}

impl Default for SeriesVisibilityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesVisibilityStore {
    pub fn new() -> Self {
        Self {
            state: StoreState::Uninitialized,
            visible: HashSet::new(),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn visible(&self) -> &HashSet<String> {
        &self.visible
    }

    /// Seeds the selection with every key the first time a non-empty list
    /// arrives. Returns `true` only on that transition.
    pub fn observe_plottable(&mut self, keys: &[String]) -> bool {
        if self.state == StoreState::Initialized || keys.is_empty() {
            return false;
        }
        self.visible = keys.iter().cloned().collect();
        self.state = StoreState::Initialized;
        tracing::debug!(keys = keys.len(), "visibility store seeded");
        true
    }

    /// A selection is stale when it shares no key with the new plottable set.
    /// An empty selection is a user choice, never stale.
    pub fn is_stale(&self, keys: &[String]) -> bool {
        !keys.is_empty()
            && !self.visible.is_empty()
            && !keys.iter().any(|k| self.visible.contains(k))
    }

    pub fn mark_stale(&mut self) {
        self.visible.clear();
        self.state = StoreState::Uninitialized;
        tracing::debug!("visibility store reset");
    }

    pub fn toggle(&mut self, key: &str) {
        if !self.visible.remove(key) {
            self.visible.insert(key.to_string());
        }
    }

    pub fn set_category(&mut self, keys: &[String], visible: bool) {
        if visible {
            self.visible.extend(keys.iter().cloned());
        } else {
            for key in keys {
                self.visible.remove(key);
            }
        }
    }

    pub fn select_all(&mut self, keys: &[String]) {
        self.set_category(keys, true);
    }

    pub fn unselect_all(&mut self, keys: &[String]) {
        self.set_category(keys, false);
    }

    /// The single "select all" control: clears a fully visible category,
    /// otherwise fills it.
    pub fn toggle_category(&mut self, keys: &[String]) {
        let all_visible = self.category_state(keys) == SelectAllState::Checked;
        self.set_category(keys, !all_visible);
    }

    pub fn category_state(&self, keys: &[String]) -> SelectAllState {
        if keys.is_empty() {
            return SelectAllState::Unchecked;
        }
        let present = keys.iter().filter(|k| self.visible.contains(*k)).count();
        if present == keys.len() {
            SelectAllState::Checked
        } else if present > 0 {
            SelectAllState::Indeterminate
        } else {
            SelectAllState::Unchecked
        }
    }

    /// Ordered projection of `keys` onto the selection.
    pub fn visible_in_order(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|k| self.visible.contains(*k))
            .cloned()
            .collect()
    }
}
