//! Per monitor state: the workspace matrix and the client orderings
use crate::{
    pure::{geometry::Rect, workspace::Workspace},
    Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumCount, FromRepr};

/// What the status area of a monitor's bar is currently showing.
///
/// Urgency on any client of a monitor flips its view to [WsOverview][Self::WsOverview]
/// so the workspace holding the urgent window can be spotted.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, EnumCount, FromRepr)]
pub enum StatusView {
    /// The title of the focused window
    #[default]
    WindowTitle,
    /// Occupancy / urgency overview of all workspaces
    WsOverview,
    /// The shell supplied status text
    Custom,
}

impl StatusView {
    pub(crate) fn cycle(self, forward: bool) -> Self {
        let n = Self::COUNT;
        let i = self as usize;
        let next = if forward {
            (i + 1) % n
        } else {
            (i + n - 1) % n
        };

        // index is always in range after the modulo
        Self::from_repr(next).unwrap_or_default()
    }
}

/// A physical output and everything scoped to it.
///
/// Each monitor owns a full `[workspace][alt]` matrix of [Workspace]s plus two
/// orderings over the clients assigned to it: `clients` in attachment order
/// (newest first) and `stack` in focus recency order (most recent first).
/// Both are id sequences into the arena held by
/// [ClientSet][crate::pure::ClientSet].
#[derive(Debug, Clone)]
pub struct Monitor {
    pub(crate) index: usize,
    pub(crate) screen: Rect,
    pub(crate) work: Rect,
    pub(crate) workspaces: Vec<Vec<Workspace>>,
    pub(crate) ws: usize,
    pub(crate) alt: usize,
    pub(crate) last_ws: usize,
    pub(crate) last_alt: usize,
    pub(crate) clients: Vec<Xid>,
    pub(crate) stack: Vec<Xid>,
    pub(crate) sel: Option<Xid>,
    pub(crate) show_bar: bool,
    pub(crate) top_bar: bool,
    pub(crate) bar_h: u32,
    pub(crate) status_view: StatusView,
}

impl Monitor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        index: usize,
        screen: Rect,
        n_ws: usize,
        n_alts: usize,
        n_panes: usize,
        ratio: u32,
        cap: u32,
        show_bar: bool,
        top_bar: bool,
        bar_h: u32,
    ) -> Self {
        let workspaces = (0..n_ws)
            .map(|_| (0..n_alts).map(|_| Workspace::new(n_panes, ratio, cap)).collect())
            .collect();

        let mut m = Self {
            index,
            screen,
            work: screen,
            workspaces,
            ws: 0,
            alt: 0,
            last_ws: 0,
            last_alt: 0,
            clients: Vec::new(),
            stack: Vec::new(),
            sel: None,
            show_bar,
            top_bar,
            bar_h,
            status_view: StatusView::default(),
        };
        m.update_bar_pos();

        m
    }

    /// The ordinal of this monitor within the monitor list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The full screen rect of this monitor.
    pub fn screen_rect(&self) -> Rect {
        self.screen
    }

    /// The work rect of this monitor: the screen minus any reserved bar strip.
    pub fn work_rect(&self) -> Rect {
        self.work
    }

    /// The `(workspace, alt)` pair currently shown on this monitor.
    pub fn active_pair(&self) -> (usize, usize) {
        (self.ws, self.alt)
    }

    /// The workspace currently shown on this monitor.
    pub fn active_workspace(&self) -> &Workspace {
        &self.workspaces[self.ws][self.alt]
    }

    pub(crate) fn active_workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspaces[self.ws][self.alt]
    }

    /// The currently focused client on this monitor, if any.
    pub fn focused_client(&self) -> Option<Xid> {
        self.sel
    }

    /// Whether the bar is currently reserved for on this monitor.
    pub fn bar_visible(&self) -> bool {
        self.show_bar
    }

    /// What the status area of this monitor's bar should display.
    pub fn status_view(&self) -> StatusView {
        self.status_view
    }

    /// The clients assigned to this monitor in attachment order, newest first.
    pub fn client_ids(&self) -> &[Xid] {
        &self.clients
    }

    /// The clients assigned to this monitor in focus recency order, most
    /// recently focused first.
    pub fn stack_order(&self) -> &[Xid] {
        &self.stack
    }

    // Recompute the work rect from the screen rect and bar placement.
    pub(crate) fn update_bar_pos(&mut self) {
        self.work = self.screen;
        if self.show_bar {
            self.work.h = self.work.h.saturating_sub(self.bar_h);
            if self.top_bar {
                self.work.y += self.bar_h;
            }
        }
    }

    pub(crate) fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
        self.update_bar_pos();
    }

    pub(crate) fn toggle_bar(&mut self) {
        self.show_bar = !self.show_bar;
        self.update_bar_pos();
    }

    /// Switch to the given `(workspace, alt)` pair, recording the previous
    /// pair for toggle-back. Rejects out of range pairs and switching to the
    /// pair already shown.
    pub(crate) fn switch_to(&mut self, ws: usize, alt: usize) -> bool {
        if ws >= self.workspaces.len()
            || alt >= self.workspaces[ws].len()
            || (ws == self.ws && alt == self.alt)
        {
            return false;
        }

        self.last_ws = self.ws;
        self.last_alt = self.alt;
        self.ws = ws;
        self.alt = alt;

        true
    }

    /// Switch back to the previously shown `(workspace, alt)` pair.
    pub(crate) fn switch_back(&mut self) {
        std::mem::swap(&mut self.ws, &mut self.last_ws);
        std::mem::swap(&mut self.alt, &mut self.last_alt);
    }

    /// Add a client to the head of the attachment order.
    pub(crate) fn attach(&mut self, id: Xid) {
        self.clients.insert(0, id);
    }

    /// Add a client to the head of the focus recency stack.
    pub(crate) fn attach_stack(&mut self, id: Xid) {
        self.stack.insert(0, id);
    }

    pub(crate) fn detach(&mut self, id: Xid) {
        self.clients.retain(|&c| c != id);
    }

    /// The most recently focused client for which `is_visible` holds.
    pub(crate) fn focus_fallback(&self, is_visible: impl Fn(Xid) -> bool) -> Option<Xid> {
        self.stack.iter().copied().find(|&c| is_visible(c))
    }

    /// Move an attached client to the head of the attachment order (zoom).
    pub(crate) fn promote(&mut self, id: Xid) {
        if self.clients.contains(&id) {
            self.detach(id);
            self.attach(id);
        }
    }

    pub(crate) fn cycle_status_view(&mut self, forward: bool) {
        self.status_view = self.status_view.cycle(forward);
    }
}
