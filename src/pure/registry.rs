//! The client arena and monitor list
use crate::{
    pure::{
        geometry::{Point, Rect},
        workspace::step_wrapping,
        Client, Monitor,
    },
    Xid,
};
use std::collections::HashMap;
use tracing::trace;

/// All window manager state in one place: the client arena, the monitor list
/// and the focused monitor index.
///
/// Clients live in the arena and are referenced by id from the per monitor
/// orderings. A client is *visible* when it sits on its monitor's current
/// workspace index and its pane is showing under the active `(ws, alt)` pair,
/// and *tiled* when additionally it is not floating.
#[derive(Debug, Clone)]
pub struct ClientSet {
    pub(crate) clients: HashMap<Xid, Client>,
    pub(crate) monitors: Vec<Monitor>,
    pub(crate) focused: usize,
}

impl ClientSet {
    pub(crate) fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            clients: HashMap::new(),
            monitors,
            focused: 0,
        }
    }

    /// The number of managed clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no clients are currently managed.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether `id` is a managed client.
    pub fn contains(&self, id: Xid) -> bool {
        self.clients.contains_key(&id)
    }

    /// Look up a client by id.
    pub fn client(&self, id: Xid) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub(crate) fn client_mut(&mut self, id: Xid) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    /// The monitors known to the window manager, in ordinal order.
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// The monitor at `idx` if it exists.
    pub fn monitor(&self, idx: usize) -> Option<&Monitor> {
        self.monitors.get(idx)
    }

    /// The index of the monitor holding input focus.
    pub fn focused_monitor_index(&self) -> usize {
        self.focused
    }

    /// The monitor holding input focus.
    pub fn focused_monitor(&self) -> &Monitor {
        &self.monitors[self.focused]
    }

    pub(crate) fn focused_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.focused]
    }

    /// The focused client on the focused monitor, if any.
    pub fn focused_client_id(&self) -> Option<Xid> {
        self.monitors[self.focused].sel
    }

    /// The focused client record, if any.
    pub fn focused_client(&self) -> Option<&Client> {
        self.focused_client_id().and_then(|id| self.client(id))
    }

    /// Whether the client `id` should currently be shown on screen.
    pub fn is_visible(&self, id: Xid) -> bool {
        let Some(c) = self.clients.get(&id) else {
            return false;
        };
        let m = &self.monitors[c.monitor];

        c.ws == m.ws && m.active_workspace().is_showing(c.pane)
    }

    /// Whether the client `id` takes part in the tiled layout of `pane`.
    pub fn is_tiled_in(&self, id: Xid, pane: usize) -> bool {
        let Some(c) = self.clients.get(&id) else {
            return false;
        };
        let m = &self.monitors[c.monitor];

        c.ws == m.ws && c.pane == pane && !c.floating
    }

    /// Whether the client `id` is on the current workspace of its monitor,
    /// regardless of pane visibility.
    pub fn is_on_active_workspace(&self, id: Xid) -> bool {
        match self.clients.get(&id) {
            Some(c) => c.ws == self.monitors[c.monitor].ws,
            None => false,
        }
    }

    // Most recently focused visible client on monitor `mi`, skipping `skip`.
    pub(crate) fn visible_fallback(&self, mi: usize, skip: Option<Xid>) -> Option<Xid> {
        self.monitors[mi].focus_fallback(|c| Some(c) != skip && self.is_visible(c))
    }

    /// Add a new client to the arena and attach it to both orderings of its
    /// assigned monitor.
    pub(crate) fn insert(&mut self, c: Client) {
        let (id, mi) = (c.id, c.monitor);
        trace!(%id, monitor = mi, "inserting client");
        self.clients.insert(id, c);

        let m = &mut self.monitors[mi];
        m.attach(id);
        m.attach_stack(id);
    }

    /// Remove a client from the arena and both orderings, resolving the
    /// monitor selection to the next visible client when it was selected.
    pub(crate) fn remove(&mut self, id: Xid) -> Option<Client> {
        let mi = self.clients.get(&id)?.monitor;
        let fallback = self.visible_fallback(mi, Some(id));
        trace!(%id, monitor = mi, "removing client");

        let m = &mut self.monitors[mi];
        m.detach(id);
        m.stack.retain(|&c| c != id);
        if m.sel == Some(id) {
            m.sel = fallback;
        }

        self.clients.remove(&id)
    }

    /// Move a client to another monitor, keeping its workspace and pane
    /// indices. No-op when the target is its current monitor or unknown.
    pub(crate) fn transfer(&mut self, id: Xid, target: usize) -> bool {
        let Some(c) = self.clients.get(&id) else {
            return false;
        };
        let mi = c.monitor;
        if mi == target || target >= self.monitors.len() {
            return false;
        }

        let fallback = self.visible_fallback(mi, Some(id));
        let m = &mut self.monitors[mi];
        m.detach(id);
        m.stack.retain(|&c| c != id);
        if m.sel == Some(id) {
            m.sel = fallback;
        }

        if let Some(c) = self.clients.get_mut(&id) {
            c.monitor = target;
        }
        let m = &mut self.monitors[target];
        m.attach(id);
        m.attach_stack(id);

        true
    }

    /// The tiled clients of `pane` on the current workspace of monitor `mi`,
    /// in attachment order.
    pub fn tiled_in_pane(&self, mi: usize, pane: usize) -> Vec<Xid> {
        self.monitors[mi]
            .clients
            .iter()
            .copied()
            .filter(|&id| self.is_tiled_in(id, pane))
            .collect()
    }

    // Circular scan of the attachment order from `from`, returning the first
    // client matching `pred` (never `from` itself).
    pub(crate) fn neighbour(
        &self,
        mi: usize,
        from: Xid,
        forward: bool,
        pred: impl Fn(&Client) -> bool,
    ) -> Option<Xid> {
        let order = &self.monitors[mi].clients;
        let pos = order.iter().position(|&c| c == from)?;

        let mut i = pos;
        loop {
            i = step_wrapping(i, forward, order.len());
            if i == pos {
                return None;
            }
            let id = order[i];
            if self.clients.get(&id).map(&pred).unwrap_or(false) {
                return Some(id);
            }
        }
    }

    /// Swap the attachment order positions of two clients on monitor `mi`.
    pub(crate) fn swap_order(&mut self, mi: usize, a: Xid, b: Xid) {
        let order = &mut self.monitors[mi].clients;
        if let (Some(i), Some(j)) = (
            order.iter().position(|&c| c == a),
            order.iter().position(|&c| c == b),
        ) {
            order.swap(i, j);
        }
    }

    /// The monitor whose work area overlaps `r` the most. Ties (including
    /// zero overlap) keep the focused monitor.
    pub fn monitor_for_rect(&self, r: &Rect) -> usize {
        let mut best = self.focused;
        let mut area = 0;

        for (i, m) in self.monitors.iter().enumerate() {
            let a = m.work.overlap_area(r);
            if a > area {
                area = a;
                best = i;
            }
        }

        best
    }

    /// The monitor containing the given point, by overlap of a 1x1 rect.
    pub fn monitor_for_point(&self, p: Point) -> usize {
        self.monitor_for_rect(&Rect::new(p.x, p.y, 1, 1))
    }

    /// Reconcile the monitor list against the rects reported by the backend.
    ///
    /// Duplicate rects are collapsed (first occurrence wins), new monitors
    /// are built with `new_monitor`, geometry changes are applied in place
    /// and monitors beyond the reported count are removed from the tail with
    /// their clients migrating to the head monitor. Returns whether anything
    /// changed; when it did, monitor focus has been reset to the head and the
    /// caller should re-resolve it.
    pub(crate) fn reconcile_monitors(
        &mut self,
        reported: &[Rect],
        new_monitor: impl Fn(usize, Rect) -> Monitor,
    ) -> bool {
        let mut unique: Vec<Rect> = Vec::with_capacity(reported.len());
        for r in reported {
            if !unique.contains(r) {
                unique.push(*r);
            }
        }

        let mut dirty = false;

        for i in self.monitors.len()..unique.len() {
            trace!(index = i, rect = ?unique[i], "adding monitor");
            self.monitors.push(new_monitor(i, unique[i]));
            dirty = true;
        }

        for (i, &r) in unique.iter().enumerate() {
            let m = &mut self.monitors[i];
            m.index = i;
            if m.screen != r {
                trace!(index = i, rect = ?r, "monitor geometry changed");
                m.set_screen(r);
                dirty = true;
            }
        }

        while self.monitors.len() > unique.len() {
            let popped = self.monitors.pop().expect("len checked above");
            trace!(index = popped.index, "removing monitor");
            dirty = true;

            for id in popped.clients {
                if let Some(c) = self.clients.get_mut(&id) {
                    c.monitor = 0;
                }
                self.monitors[0].attach(id);
                self.monitors[0].attach_stack(id);
            }
        }

        if dirty {
            self.focused = 0;
        }

        dirty
    }

    /// Per pane counts of clients on the current workspace of monitor `mi`
    /// (floating included), for bar rendering.
    pub fn pane_counts(&self, mi: usize) -> Vec<u32> {
        let m = &self.monitors[mi];
        let mut counts = vec![0; m.active_workspace().panes.len()];

        for id in &m.clients {
            if let Some(c) = self.clients.get(id) {
                if c.ws == m.ws && c.pane < counts.len() {
                    counts[c.pane] += 1;
                }
            }
        }

        counts
    }

    /// Total clients on monitor `mi` and the number of occupied workspace
    /// indices.
    pub fn client_counts(&self, mi: usize) -> (u32, u32) {
        let occ = self.workspace_occupancy(mi);
        let total = self.monitors[mi].clients.len() as u32;
        let occupied = occ.iter().filter(|(o, _)| *o).count() as u32;

        (total, occupied)
    }

    /// Per workspace `(occupied, urgent)` flags for monitor `mi`.
    pub fn workspace_occupancy(&self, mi: usize) -> Vec<(bool, bool)> {
        let m = &self.monitors[mi];
        let mut occ = vec![(false, false); m.workspaces.len()];

        for id in &m.clients {
            if let Some(c) = self.clients.get(id) {
                if let Some(slot) = occ.get_mut(c.ws) {
                    slot.0 = true;
                    slot.1 |= c.urgent;
                }
            }
        }

        occ
    }
}
