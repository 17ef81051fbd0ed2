//! Client records for managed windows
use crate::{pure::geometry::Rect, Xid};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};

/// Where a floating client currently is in the maximize cycle.
///
/// Repeatedly invoking the maximize action steps `Off -> WorkArea -> Screen -> Off`,
/// with the original geometry being restored on the final step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maximized {
    /// Not maximized
    #[default]
    Off,
    /// Filling the monitor work area (bar still visible)
    WorkArea,
    /// Filling the full screen rect
    Screen,
}

/// ICCCM WM_NORMAL_HINTS as fetched from the windowing system.
///
/// A value of 0 for a max / increment / aspect field means the client did not
/// set that hint.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct SizeHints {
    /// Base (width, height) subtracted before increment calculations
    pub base: (u32, u32),
    /// Minimum (width, height)
    pub min: (u32, u32),
    /// Maximum (width, height)
    pub max: (u32, u32),
    /// Resize increment granularity
    pub inc: (u32, u32),
    /// Minimum aspect ratio (h / w as given by the client)
    pub min_aspect: f32,
    /// Maximum aspect ratio (w / h as given by the client)
    pub max_aspect: f32,
}

impl SizeHints {
    /// A client is fixed size when its min and max hints pin both dimensions.
    pub fn is_fixed(&self) -> bool {
        self.max.0 > 0 && self.max.1 > 0 && self.max == self.min
    }
}

/// The state tracked for a single managed window.
///
/// Clients are owned by the [ClientSet][crate::pure::ClientSet] arena and
/// addressed everywhere by their [Xid]: the per monitor orderings are plain
/// sequences of ids rather than intrusive lists.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) id: Xid,
    pub(crate) name: String,
    pub(crate) monitor: usize,
    pub(crate) ws: usize,
    pub(crate) pane: usize,
    pub(crate) r: Rect,
    pub(crate) prev_r: Rect,
    pub(crate) bw: u32,
    pub(crate) prev_bw: u32,
    pub(crate) saved_r: Option<Rect>,
    pub(crate) maximized: Maximized,
    pub(crate) hints: Option<SizeHints>,
    pub(crate) floating: bool,
    pub(crate) prev_floating: bool,
    pub(crate) fixed: bool,
    pub(crate) urgent: bool,
    pub(crate) fullscreen: bool,
    pub(crate) never_focus: bool,
    pub(crate) arranged: bool,
}

impl Client {
    pub(crate) fn new(id: Xid, r: Rect, bw: u32) -> Self {
        Self {
            id,
            name: String::new(),
            monitor: 0,
            ws: 0,
            pane: 0,
            r,
            prev_r: r,
            bw,
            prev_bw: bw,
            saved_r: None,
            maximized: Maximized::Off,
            hints: None,
            floating: false,
            prev_floating: false,
            fixed: false,
            urgent: false,
            fullscreen: false,
            never_focus: false,
            arranged: false,
        }
    }

    /// The window ID of this client.
    pub fn id(&self) -> Xid {
        self.id
    }

    /// The display name of this client (window title).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current geometry of this client, excluding its border.
    pub fn geometry(&self) -> Rect {
        self.r
    }

    /// The workspace index this client is assigned to on its monitor.
    pub fn workspace(&self) -> usize {
        self.ws
    }

    /// The pane index this client is assigned to within its workspace.
    pub fn pane(&self) -> usize {
        self.pane
    }

    /// Whether this client is floating rather than tiled.
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    /// Whether this client has the urgency flag set.
    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    /// Whether this client is fullscreen.
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether the tiling engine placed this client on the last arrange pass.
    pub fn is_arranged(&self) -> bool {
        self.arranged
    }

    pub(crate) fn record_geometry(&mut self, r: Rect) {
        self.prev_r = self.r;
        self.r = r;
    }

    /// Clamp and adjust a requested geometry per the client's size hints.
    ///
    /// `interact` marks user driven drags: those only keep the window
    /// reachable within the full `screen` bounds, while programmatic moves are
    /// clamped inside `work` (the owning monitor work area). Hints are only
    /// honored when `honor_hints` is set globally or the client floats.
    ///
    /// The returned flag is true when the adjusted geometry differs from the
    /// client's current geometry: callers use it to skip redundant commits.
    pub(crate) fn apply_size_hints(
        &self,
        mut r: Rect,
        screen: Rect,
        work: Rect,
        honor_hints: bool,
        interact: bool,
    ) -> (Rect, bool) {
        let bw2 = 2 * self.bw;

        // set minimum possible
        r.w = max(1, r.w);
        r.h = max(1, r.h);

        if interact {
            if r.x > screen.x + screen.w {
                r.x = (screen.x + screen.w).saturating_sub(r.w + bw2);
            }
            if r.y > screen.y + screen.h {
                r.y = (screen.y + screen.h).saturating_sub(r.h + bw2);
            }
        } else {
            if r.x >= work.x + work.w {
                r.x = (work.x + work.w).saturating_sub(r.w + bw2);
            }
            if r.y >= work.y + work.h {
                r.y = (work.y + work.h).saturating_sub(r.h + bw2);
            }
            if r.x + r.w + bw2 <= work.x {
                r.x = work.x;
            }
            if r.y + r.h + bw2 <= work.y {
                r.y = work.y;
            }
        }

        if honor_hints || self.floating {
            if let Some(h) = self.hints {
                (r.w, r.h) = adjusted_for_hints(r.w, r.h, &h);
            }
        }

        let changed = r != self.r;
        (r, changed)
    }
}

// The ICCCM 4.1.2.3 dance: base size is removed before the aspect and
// increment adjustments and restored afterwards, except when base == min
// where it is only removed for the increment step.
fn adjusted_for_hints(mut w: u32, mut h: u32, hints: &SizeHints) -> (u32, u32) {
    let base_is_min = hints.base == hints.min;

    if !base_is_min {
        w = w.saturating_sub(hints.base.0);
        h = h.saturating_sub(hints.base.1);
    }

    if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
        if hints.max_aspect < w as f32 / h as f32 {
            w = (h as f32 * hints.max_aspect + 0.5) as u32;
        } else if hints.min_aspect < h as f32 / w as f32 {
            h = (w as f32 * hints.min_aspect + 0.5) as u32;
        }
    }

    if base_is_min {
        w = w.saturating_sub(hints.base.0);
        h = h.saturating_sub(hints.base.1);
    }

    if hints.inc.0 > 0 {
        w -= w % hints.inc.0;
    }
    if hints.inc.1 > 0 {
        h -= h % hints.inc.1;
    }

    w = max(w + hints.base.0, hints.min.0);
    h = max(h + hints.base.1, hints.min.1);
    if hints.max.0 > 0 {
        w = min(w, hints.max.0);
    }
    if hints.max.1 > 0 {
        h = min(h, hints.max.1);
    }

    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    const SCREEN: Rect = Rect::new(0, 0, 2000, 1000);
    const WORK: Rect = Rect::new(0, 20, 2000, 980);

    fn client_with_hints(hints: Option<SizeHints>, floating: bool) -> Client {
        let mut c = Client::new(Xid(1), Rect::new(10, 30, 200, 100), 1);
        c.hints = hints;
        c.floating = floating;

        c
    }

    #[test]
    fn zero_sizes_are_clamped_to_one() {
        let c = client_with_hints(None, false);
        let (r, _) = c.apply_size_hints(Rect::new(5, 25, 0, 0), SCREEN, WORK, false, false);

        assert_eq!((r.w, r.h), (1, 1));
    }

    #[test]
    fn offscreen_position_is_pulled_back_into_work_area() {
        let c = client_with_hints(None, false);
        let (r, _) = c.apply_size_hints(Rect::new(5000, 25, 200, 100), SCREEN, WORK, false, false);

        assert!(r.x < WORK.x + WORK.w);
    }

    #[test]
    fn hints_are_ignored_for_tiled_clients_without_global_policy() {
        let hints = SizeHints {
            inc: (100, 100),
            ..Default::default()
        };
        let c = client_with_hints(Some(hints), false);
        let (r, _) = c.apply_size_hints(Rect::new(10, 30, 250, 130), SCREEN, WORK, false, false);

        assert_eq!((r.w, r.h), (250, 130));
    }

    #[test_case(
        SizeHints { inc: (7, 5), ..Default::default() },
        (100, 100), (98, 100);
        "increment snap"
    )]
    #[test_case(
        SizeHints { min: (150, 120), ..Default::default() },
        (100, 100), (150, 120);
        "min clamp"
    )]
    #[test_case(
        SizeHints { max: (80, 90), ..Default::default() },
        (100, 100), (80, 90);
        "max clamp"
    )]
    #[test_case(
        SizeHints { base: (10, 10), inc: (7, 5), ..Default::default() },
        (100, 100), (94, 100);
        "base removed before increment"
    )]
    #[test_case(
        SizeHints { max_aspect: 2.0, min_aspect: 0.1, ..Default::default() },
        (500, 100), (200, 100);
        "max aspect corrects width"
    )]
    #[test_case(
        SizeHints { max_aspect: 10.0, min_aspect: 2.0, ..Default::default() },
        (100, 300), (100, 200);
        "min aspect corrects height"
    )]
    #[test]
    fn hint_adjustment(hints: SizeHints, requested: (u32, u32), expected: (u32, u32)) {
        assert_eq!(adjusted_for_hints(requested.0, requested.1, &hints), expected);
    }

    #[test]
    fn unchanged_geometry_is_reported() {
        let c = client_with_hints(None, true);
        let (r, changed) = c.apply_size_hints(c.r, SCREEN, WORK, false, false);

        assert_eq!(r, c.r);
        assert!(!changed);

        let (_, changed) = c.apply_size_hints(Rect::new(10, 30, 300, 100), SCREEN, WORK, false, false);
        assert!(changed);
    }

    #[test]
    fn fixed_size_detection() {
        let pinned = SizeHints {
            min: (100, 80),
            max: (100, 80),
            ..Default::default()
        };
        let free = SizeHints {
            min: (100, 80),
            max: (200, 160),
            ..Default::default()
        };

        assert!(pinned.is_fixed());
        assert!(!free.is_fixed());
        assert!(!SizeHints::default().is_fixed());
    }
}
