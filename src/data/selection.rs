//! Multi-select state keyed by stable point ids.

use super::dataset::PointId;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// Command/Ctrl: toggle membership instead of replacing.
    pub append: bool,
    /// Shift: reserved for range selection, currently carried but unused.
    pub range: bool,
}

impl ClickModifiers {
    pub const NONE: Self = Self {
        append: false,
        range: false,
    };
    pub const APPEND: Self = Self {
        append: true,
        range: false,
    };

    pub fn from_egui(m: &egui::Modifiers) -> Self {
        Self {
            append: m.command || m.ctrl,
            range: m.shift,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    Single,
    Multiple,
}

/// Ordered set of selected ids; the last entry is the most recent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<PointId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.ids.contains(&id)
    }

    pub fn most_recent(&self) -> Option<PointId> {
        self.ids.last().copied()
    }

    pub fn state(&self) -> SelectionState {
        match self.ids.len() {
            0 => SelectionState::Empty,
            1 => SelectionState::Single,
            _ => SelectionState::Multiple,
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// Apply a click on `hit`. Returns `true` when the selection changed.
    ///
    /// Without append the selection becomes exactly `[hit]` (or empty on a
    /// miss). With append the hit toggles membership; a miss is ignored.
    pub fn click(&mut self, hit: Option<PointId>, mods: ClickModifiers) -> bool {
        if !mods.append {
            let next: Vec<PointId> = hit.into_iter().collect();
            let changed = next != self.ids;
            self.ids = next;
            return changed;
        }
        let Some(id) = hit else {
            return false;
        };
        match self.ids.iter().position(|&s| s == id) {
            Some(pos) => {
                self.ids.remove(pos);
            }
            None => self.ids.push(id),
        }
        true
    }

    /// Drop ids for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(PointId) -> bool) {
        self.ids.retain(|&id| keep(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_toggle_sequence() {
        let mut s = Selection::new();
        assert_eq!(s.state(), SelectionState::Empty);
        s.click(Some(5), ClickModifiers::NONE);
        assert_eq!(s.ids(), &[5]);
        assert_eq!(s.state(), SelectionState::Single);
        s.click(Some(9), ClickModifiers::APPEND);
        assert_eq!(s.ids(), &[5, 9]);
        assert_eq!(s.state(), SelectionState::Multiple);
        s.click(Some(5), ClickModifiers::APPEND);
        assert_eq!(s.ids(), &[9]);
    }

    #[test]
    fn plain_miss_clears_and_append_miss_keeps() {
        let mut s = Selection::new();
        s.click(Some(1), ClickModifiers::NONE);
        s.click(Some(2), ClickModifiers::APPEND);
        assert!(!s.click(None, ClickModifiers::APPEND));
        assert_eq!(s.len(), 2);
        assert!(s.click(None, ClickModifiers::NONE));
        assert!(s.is_empty());
    }

    #[test]
    fn appended_item_is_most_recent() {
        let mut s = Selection::new();
        s.click(Some(1), ClickModifiers::NONE);
        s.click(Some(2), ClickModifiers::APPEND);
        s.click(Some(1), ClickModifiers::APPEND);
        s.click(Some(1), ClickModifiers::APPEND);
        assert_eq!(s.ids(), &[2, 1]);
        assert_eq!(s.most_recent(), Some(1));
    }

    #[test]
    fn range_flag_alone_acts_like_plain_click() {
        let mut s = Selection::new();
        s.click(Some(1), ClickModifiers::NONE);
        let shift = ClickModifiers { append: false, range: true };
        s.click(Some(3), shift);
        assert_eq!(s.ids(), &[3]);
    }

    #[test]
    fn reclicking_same_single_item_reports_no_change() {
        let mut s = Selection::new();
        assert!(s.click(Some(4), ClickModifiers::NONE));
        assert!(!s.click(Some(4), ClickModifiers::NONE));
    }
}
