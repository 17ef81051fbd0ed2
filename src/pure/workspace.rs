//! Workspaces and the panes they are divided into
use crate::core::layout::LayoutKind;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single pane within a [Workspace]: a named group of tiled clients with
/// its own layout and display cap.
///
/// Panes start hidden. A hidden pane keeps its clients but they are not
/// mapped and take no part in tiling until the pane is shown again.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pane {
    pub(crate) showing: bool,
    pub(crate) cap: u32,
    pub(crate) layout: LayoutKind,
}

impl Pane {
    pub(crate) fn new(cap: u32) -> Self {
        Self {
            showing: false,
            cap,
            layout: LayoutKind::default(),
        }
    }

    /// Whether this pane is currently shown.
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// The maximum number of clients given a tiling slot in this pane.
    /// Zero means unlimited.
    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// The layout used to stack the tiled clients of this pane.
    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Step the cap by `delta`, ignoring adjustments that would take it
    /// negative.
    pub(crate) fn adjust_cap(&mut self, delta: i32) -> bool {
        match (self.cap as i64).checked_add(delta as i64) {
            Some(new) if new >= 0 => {
                self.cap = new as u32;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cycle_layout(&mut self, forward: bool) {
        self.layout = if forward {
            self.layout.next()
        } else {
            self.layout.prev()
        };
    }
}

/// The lowest valid split ratio (percent of work area width for the first
/// visible pane).
pub const MIN_RATIO: u32 = 5;
/// The highest valid split ratio.
pub const MAX_RATIO: u32 = 95;

/// A workspace: a fixed array of [Pane]s, the selected pane and the split
/// ratio dividing the work area between visible panes.
///
/// Workspaces do not own their clients: clients carry their workspace and
/// pane indices and the [Monitor][crate::pure::Monitor] orderings are the
/// source of truth for stacking.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub(crate) panes: Vec<Pane>,
    pub(crate) selected: usize,
    pub(crate) ratio: u32,
}

impl Workspace {
    pub(crate) fn new(n_panes: usize, ratio: u32, cap: u32) -> Self {
        Self {
            panes: vec![Pane::new(cap); n_panes],
            selected: 0,
            ratio: ratio.clamp(MIN_RATIO, MAX_RATIO),
        }
    }

    /// The panes of this workspace in index order.
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// The index of the currently selected pane.
    pub fn selected_pane(&self) -> usize {
        self.selected
    }

    /// The current split ratio as a percentage in `[5, 95]`.
    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    /// Whether the pane at `idx` is currently shown. Out of range indices
    /// are never showing.
    pub fn is_showing(&self, idx: usize) -> bool {
        self.panes.get(idx).map(|p| p.showing).unwrap_or(false)
    }

    /// Step the split ratio by `delta`, ignoring adjustments that would land
    /// outside of `[5, 95]`.
    ///
    /// Returns true if the ratio changed.
    pub(crate) fn adjust_ratio(&mut self, delta: i32) -> bool {
        let new = self.ratio as i64 + delta as i64;
        if !(MIN_RATIO as i64..=MAX_RATIO as i64).contains(&new) {
            return false;
        }

        self.ratio = new as u32;
        true
    }

    /// Step the display cap of the selected pane by `delta`.
    ///
    /// Returns true if the cap changed.
    pub(crate) fn adjust_selected_cap(&mut self, delta: i32) -> bool {
        let idx = self.selected;
        match self.panes.get_mut(idx) {
            Some(p) => p.adjust_cap(delta),
            None => false,
        }
    }

    /// Flip the showing state of the pane at `idx`, returning the new state.
    /// `None` for out of range indices.
    pub(crate) fn toggle_pane(&mut self, idx: usize) -> Option<bool> {
        let p = self.panes.get_mut(idx)?;
        p.showing = !p.showing;

        Some(p.showing)
    }

    /// Cycle the layout of the selected pane.
    pub(crate) fn cycle_layout(&mut self, forward: bool) {
        let idx = self.selected;
        if let Some(p) = self.panes.get_mut(idx) {
            p.cycle_layout(forward);
        }
    }

    /// Select the pane `offset` steps from the current selection, wrapping
    /// at both ends. Returns the newly selected index.
    pub(crate) fn step_selection(&self, forward: bool) -> usize {
        step_wrapping(self.selected, forward, self.panes.len())
    }

    /// As [step_selection][Self::step_selection] but skipping hidden panes.
    /// `None` when no other pane is showing.
    pub(crate) fn step_selection_showing(&self, forward: bool) -> Option<usize> {
        let mut i = self.selected;
        loop {
            i = step_wrapping(i, forward, self.panes.len());
            if i == self.selected {
                return None;
            }
            if self.panes[i].showing {
                return Some(i);
            }
        }
    }

    /// Restore every pane and the ratio / selection to the given defaults,
    /// hiding all panes.
    pub(crate) fn reset(&mut self, ratio: u32, cap: u32) {
        self.selected = 0;
        self.ratio = ratio.clamp(MIN_RATIO, MAX_RATIO);
        for p in self.panes.iter_mut() {
            p.showing = false;
            p.cap = cap;
            p.layout = LayoutKind::default();
        }
    }
}

pub(crate) fn step_wrapping(current: usize, forward: bool, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn ws() -> Workspace {
        Workspace::new(12, 70, 0)
    }

    #[test_case(70, 5, true, 75; "in range up")]
    #[test_case(70, -5, true, 65; "in range down")]
    #[test_case(93, 5, false, 93; "overflow rejected")]
    #[test_case(7, -5, false, 7; "underflow rejected")]
    #[test_case(95, 0, true, 95; "upper bound ok")]
    #[test]
    fn adjust_ratio(start: u32, delta: i32, changed: bool, expected: u32) {
        let mut w = ws();
        w.ratio = start;

        assert_eq!(w.adjust_ratio(delta), changed);
        assert_eq!(w.ratio, expected);
    }

    #[test_case(0, 1, true, 1; "increment from zero")]
    #[test_case(3, -1, true, 2; "decrement")]
    #[test_case(0, -1, false, 0; "negative rejected")]
    #[test]
    fn adjust_cap(start: u32, delta: i32, changed: bool, expected: u32) {
        let mut w = ws();
        w.panes[0].cap = start;

        assert_eq!(w.adjust_selected_cap(delta), changed);
        assert_eq!(w.panes[0].cap, expected);
    }

    #[test]
    fn toggle_pane_flips_and_bounds_checks() {
        let mut w = ws();

        assert_eq!(w.toggle_pane(3), Some(true));
        assert!(w.is_showing(3));
        assert_eq!(w.toggle_pane(3), Some(false));
        assert!(!w.is_showing(3));
        assert_eq!(w.toggle_pane(99), None);
    }

    #[test_case(0, true, 1; "forward")]
    #[test_case(0, false, 11; "backward wraps")]
    #[test_case(11, true, 0; "forward wraps")]
    #[test]
    fn step_selection_wraps(start: usize, forward: bool, expected: usize) {
        let mut w = ws();
        w.selected = start;

        assert_eq!(w.step_selection(forward), expected);
    }

    #[test]
    fn step_selection_showing_skips_hidden() {
        let mut w = ws();
        w.panes[0].showing = true;
        w.panes[7].showing = true;

        assert_eq!(w.step_selection_showing(true), Some(7));
        assert_eq!(w.step_selection_showing(false), Some(7));

        w.panes[7].showing = false;
        assert_eq!(w.step_selection_showing(true), None);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut w = ws();
        w.selected = 4;
        w.ratio = 40;
        w.panes[2].showing = true;
        w.panes[2].cap = 3;
        w.panes[2].layout = LayoutKind::default().next();

        w.reset(70, 0);

        assert_eq!(w.selected, 0);
        assert_eq!(w.ratio, 70);
        assert!(w.panes.iter().all(|p| !p.showing && p.cap == 0));
        assert!(w.panes.iter().all(|p| p.layout == LayoutKind::default()));
    }
}
