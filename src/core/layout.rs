//! The tiling engine: dividing the work area between panes and stacking the
//! clients of each pane.
use crate::pure::geometry::Rect;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::min;
use strum::{Display, EnumCount, FromRepr};

/// The stacking direction used for the tiled clients of a pane.
///
/// This is a closed set dispatched by match: layouts are data, not plugged-in
/// behavior, so they can be compared, serialized and cycled freely.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, FromRepr)]
pub enum LayoutKind {
    /// Clients stacked top to bottom
    #[default]
    #[strum(serialize = "v")]
    VerticalStack,
    /// Clients stacked left to right
    #[strum(serialize = "h")]
    HorizontalStack,
}

impl LayoutKind {
    /// The next layout in cycling order, wrapping at the end.
    pub fn next(self) -> Self {
        Self::from_repr((self as usize + 1) % Self::COUNT).unwrap_or_default()
    }

    /// The previous layout in cycling order, wrapping at the start.
    pub fn prev(self) -> Self {
        Self::from_repr((self as usize + Self::COUNT - 1) % Self::COUNT).unwrap_or_default()
    }
}

/// Divide the work area between the given non-empty showing panes.
///
/// With a single pane it spans the whole work area. With more, the first gets
/// `ratio` percent of the width at the work origin and the remaining panes
/// split what is left evenly in pane order, remainder pixels going to the
/// last.
pub(crate) fn pane_regions(work: Rect, ratio: u32, panes: &[usize]) -> Vec<(usize, Rect)> {
    match panes {
        [] => vec![],
        [p] => vec![(*p, work)],
        [first, rest @ ..] => {
            let first_w = work.w * ratio / 100;
            let mut out = vec![(*first, Rect { w: first_w, ..work })];

            let remainder = Rect {
                x: work.x + first_w,
                w: work.w - first_w,
                ..work
            };
            let shares = remainder.split_columns_with_remainder(rest.len() as u32);
            out.extend(rest.iter().copied().zip(shares));

            out
        }
    }
}

/// Per client rects for `n` tiled clients stacked in `r`.
///
/// The number of slots is `min(n, cap)` (`cap == 0` meaning unlimited), with
/// `r` divided into equal integer shares along the stacking axis, remainder
/// pixels appended to the last share. Clients beyond the slot count all share
/// the last slot. Border widths are not accounted for here: callers shrink
/// each rect by the owning client's border before committing it.
pub(crate) fn stack_positions(kind: LayoutKind, n: usize, cap: u32, r: Rect) -> Vec<Rect> {
    if n == 0 {
        return vec![];
    }

    let slots = if cap > 0 { min(n, cap as usize) } else { n };
    let shares = match kind {
        LayoutKind::VerticalStack => r.split_rows_with_remainder(slots as u32),
        LayoutKind::HorizontalStack => r.split_columns_with_remainder(slots as u32),
    };

    (0..n).map(|i| shares[min(i, slots - 1)]).collect()
}
