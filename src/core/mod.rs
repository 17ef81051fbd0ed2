//! The window manager state machine driving everything.
//!
//! [WindowManager] owns the [ClientSet] and a connection implementing
//! [XConn]. It is strictly single threaded: the consuming shell feeds it one
//! event or action at a time and every entry point runs to completion before
//! the next, so no internal locking exists anywhere.
pub mod actions;
pub mod layout;

use crate::{
    pure::{
        geometry::{Point, Rect},
        monitor::StatusView,
        rules::{classify, Rule},
        Client, ClientSet, Monitor,
    },
    x::{
        Border, ClientConfig, ConfigureRequest, DragEvent, DragKind, FullscreenAction, Property,
        WindowAttributes, WmState, XConn, XEvent,
    },
    Error, Result, Xid,
};
use layout::{pane_regions, stack_positions};
use std::{
    cmp::max,
    collections::{HashMap, HashSet},
};
use tracing::{debug, info, trace};

// Motion events arriving faster than this are dropped during drags.
const DRAG_INTERVAL_MS: u32 = 1000 / 60;

/// User facing configuration for a [WindowManager].
///
/// The defaults mirror a stock dwm-style setup: a single pixel border, hints
/// honored for tiled windows, focus locked to fullscreen windows and a 16px
/// edge snap for drags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Border width for all managed windows, in pixels
    pub border_px: u32,
    /// Height of the reserved bar strip, in pixels
    pub bar_height: u32,
    /// Whether new monitors reserve space for a bar
    pub show_bar: bool,
    /// Whether the bar strip sits at the top (false = bottom)
    pub top_bar: bool,
    /// Number of workspace indices per monitor
    pub n_workspaces: usize,
    /// Number of alternate layouts per workspace index
    pub n_alts: usize,
    /// Number of panes per workspace
    pub n_panes: usize,
    /// Initial split ratio for every workspace, percent in `[5, 95]`
    pub default_ratio: u32,
    /// Initial display cap for every pane (0 = unlimited)
    pub default_cap: u32,
    /// Whether size hints are honored for tiled windows as well
    pub honor_size_hints: bool,
    /// Whether focus cycling is blocked while the focused window is
    /// fullscreen
    pub lock_fullscreen: bool,
    /// Edge snapping distance for pointer drags, in pixels
    pub snap: u32,
    /// Placement rules applied to new clients
    pub rules: Vec<Rule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border_px: 1,
            bar_height: 20,
            show_bar: true,
            top_bar: true,
            n_workspaces: 43,
            n_alts: 3,
            n_panes: 12,
            default_ratio: 70,
            default_cap: 0,
            honor_size_hints: true,
            lock_fullscreen: true,
            snap: 16,
            rules: Vec::new(),
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        let reason = if !(5..=95).contains(&self.default_ratio) {
            Some(format!(
                "default_ratio must be in [5, 95]: {}",
                self.default_ratio
            ))
        } else if self.n_workspaces == 0 || self.n_alts == 0 || self.n_panes == 0 {
            Some("workspace matrix dimensions must all be non-zero".to_owned())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidConfig { reason }),
            None => Ok(()),
        }
    }
}

fn build_monitor(config: &Config, index: usize, screen: Rect) -> Monitor {
    Monitor::new(
        index,
        screen,
        config.n_workspaces,
        config.n_alts,
        config.n_panes,
        config.default_ratio,
        config.default_cap,
        config.show_bar,
        config.top_bar,
        config.bar_height,
    )
}

/// A pane based tiling window manager.
///
/// All mutation runs through [handle_event][Self::handle_event] and
/// [perform][Self::perform]: the first is fed from the windowing system, the
/// second from whatever binding layer the shell provides. Malformed or out of
/// range arguments to either are absorbed as no-ops; only environment level
/// failures are returned as errors.
#[derive(Debug)]
pub struct WindowManager<X: XConn> {
    pub(crate) x: X,
    pub(crate) config: Config,
    pub(crate) cs: ClientSet,
    // windows we have currently mapped ourselves
    mapped: HashSet<Xid>,
    // unmaps we requested and expect to see events for
    pending_unmap: HashMap<Xid, usize>,
    // last monitor seen under the pointer
    motion_monitor: Option<usize>,
    pub(crate) running: bool,
}

impl<X: XConn> WindowManager<X> {
    /// Construct a new [WindowManager] for the given backend connection.
    ///
    /// Fails when the config is invalid or the backend reports no screens.
    pub fn new(config: Config, x: X) -> Result<Self> {
        config.validate()?;

        let screens = x.screen_details()?;
        if screens.is_empty() {
            return Err(Error::NoScreens);
        }

        let mut cs = ClientSet::new(Vec::new());
        cs.reconcile_monitors(&screens, |i, r| build_monitor(&config, i, r));
        if let Ok(p) = x.cursor_position() {
            cs.focused = cs.monitor_for_point(p);
        }

        info!(monitors = cs.monitors().len(), "initialised monitor state");

        Ok(Self {
            x,
            config,
            cs,
            mapped: HashSet::new(),
            pending_unmap: HashMap::new(),
            motion_monitor: None,
            running: true,
        })
    }

    /// The current window manager state.
    pub fn state(&self) -> &ClientSet {
        &self.cs
    }

    /// The config this window manager was started with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the main loop should keep running.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Adopt existing windows and then block on the event loop until a quit
    /// action is performed.
    pub fn run(&mut self) -> Result<()> {
        info!("starting window manager");
        self.scan()?;
        self.focus(None)?;
        self.arrange(None)?;

        while self.running {
            let event = self.x.next_event()?;
            trace!(?event, "got event from backend");
            self.handle_event(event)?;
            self.x.flush();
        }

        Ok(())
    }

    /// Adopt windows that already exist: viewable or iconic non-transients
    /// first, transients second so their parents are known.
    pub fn scan(&mut self) -> Result<()> {
        let ids = self.x.existing_clients()?;
        debug!(n = ids.len(), "scanning existing windows");

        for pass_transients in [false, true] {
            for &id in &ids {
                if self.cs.contains(id) {
                    continue;
                }
                let Ok(attrs) = self.x.window_attributes(id) else {
                    continue;
                };
                if attrs.override_redirect {
                    continue;
                }
                let transient = matches!(self.x.transient_for(id), Ok(Some(_)));
                if transient != pass_transients {
                    continue;
                }
                let iconic = matches!(self.x.wm_state(id), Ok(Some(WmState::Iconic)));
                if attrs.viewable || iconic {
                    self.manage(id, attrs)?;
                }
            }
        }

        Ok(())
    }

    /// Process a single notification from the windowing system.
    pub fn handle_event(&mut self, event: XEvent) -> Result<()> {
        match event {
            XEvent::MapRequest(id) => self.on_map_request(id),
            XEvent::Destroy(id) => self.on_destroy(id),
            XEvent::Unmap { id, synthetic } => self.on_unmap(id, synthetic),
            XEvent::ConfigureRequest(req) => self.on_configure_request(req),
            XEvent::RootConfigured { .. } | XEvent::ScreenChange => self.on_screen_change(),
            XEvent::Enter(id) => self.on_enter(id),
            XEvent::PointerMotion(p) => self.on_pointer_motion(p),
            XEvent::FocusIn(id) => self.on_focus_in(id),
            XEvent::PropertyChanged { id, prop } => self.on_property_changed(id, prop),
            XEvent::FullscreenRequest { id, action } => self.on_fullscreen_request(id, action),
            XEvent::ActivationRequest(id) => self.on_activation_request(id),
        }
    }

    fn on_map_request(&mut self, id: Xid) -> Result<()> {
        let Ok(attrs) = self.x.window_attributes(id) else {
            return Ok(());
        };
        if attrs.override_redirect || self.cs.contains(id) {
            return Ok(());
        }

        self.manage(id, attrs)
    }

    #[tracing::instrument(level = "debug", skip(self, attrs))]
    fn manage(&mut self, id: Xid, attrs: WindowAttributes) -> Result<()> {
        let mut c = Client::new(id, attrs.geometry, self.config.border_px);
        c.prev_bw = attrs.border_width;
        c.name = self.x.window_title(id).unwrap_or_default();

        let parent = self
            .x
            .transient_for(id)
            .unwrap_or(None)
            .and_then(|t| self.cs.client(t));
        let is_transient = parent.is_some();

        match parent {
            // transients inherit placement and never go through the rules
            Some(p) => {
                c.monitor = p.monitor;
                c.ws = p.ws;
                c.pane = p.pane;
            }
            None => {
                let m = self.cs.focused_monitor();
                c.monitor = self.cs.focused_monitor_index();
                c.ws = m.ws;
                c.pane = m.active_workspace().selected;

                let (class, instance) = self.x.window_class(id).unwrap_or(None).unwrap_or_default();
                let p = classify(
                    &self.config.rules,
                    &class,
                    &instance,
                    &c.name,
                    self.config.n_workspaces,
                    self.cs.monitors().len(),
                );
                c.floating = p.floating;
                if let Some(ws) = p.workspace {
                    c.ws = ws;
                }
                if let Some(mi) = p.monitor {
                    c.monitor = mi;
                }
            }
        }

        // keep the starting geometry reachable on the assigned monitor
        let work = self.cs.monitors[c.monitor].work_rect();
        let (ow, oh) = (c.r.w + 2 * c.bw, c.r.h + 2 * c.bw);
        if c.r.x + ow > work.x + work.w {
            c.r.x = (work.x + work.w).saturating_sub(ow);
        }
        if c.r.y + oh > work.y + work.h {
            c.r.y = (work.y + work.h).saturating_sub(oh);
        }
        c.r.x = max(c.r.x, work.x);
        c.r.y = max(c.r.y, work.y);
        c.prev_r = c.r;

        self.x.set_client_config(id, &[ClientConfig::BorderPx(c.bw)])?;
        self.x.set_border(id, Border::Unfocused)?;
        self.x.send_configure_notify(id, c.r, c.bw)?;

        let hints = self.x.size_hints(id).unwrap_or(None).unwrap_or_default();
        c.fixed = hints.is_fixed();
        c.hints = Some(hints);

        if let Ok(Some(wm_hints)) = self.x.wm_hints(id) {
            c.urgent = wm_hints.urgent;
            c.never_focus = wm_hints.accepts_input == Some(false);
        }

        let wants_fullscreen = self.x.is_fullscreen(id).unwrap_or(false);
        if self.x.is_dialog(id).unwrap_or(false) {
            c.floating = true;
        }
        if !c.floating {
            c.floating = is_transient || c.fixed;
            c.prev_floating = c.floating;
        }
        if c.floating {
            self.x.set_client_config(id, &[ClientConfig::Raise])?;
        }

        let mi = c.monitor;
        self.cs.insert(c);
        self.x.set_wm_state(id, WmState::Normal)?;

        if wants_fullscreen {
            self.set_fullscreen(id, true)?;
        }

        if mi == self.cs.focused {
            if let Some(prev) = self.cs.focused_client_id() {
                self.unfocus(prev, false)?;
            }
        }
        self.cs.monitors[mi].sel = Some(id);

        self.arrange(Some(mi))?;
        self.focus(None)?;

        Ok(())
    }

    fn on_destroy(&mut self, id: Xid) -> Result<()> {
        if self.cs.contains(id) {
            self.unmanage(id, true)?;
        }

        Ok(())
    }

    fn on_unmap(&mut self, id: Xid, synthetic: bool) -> Result<()> {
        if !self.cs.contains(id) {
            return Ok(());
        }

        if synthetic {
            self.x.set_wm_state(id, WmState::Withdrawn)?;
        } else if let Some(n) = self.pending_unmap.get_mut(&id) {
            // an unmap we issued ourselves while hiding the window
            *n -= 1;
            if *n == 0 {
                self.pending_unmap.remove(&id);
            }
        } else {
            self.unmanage(id, false)?;
        }

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn unmanage(&mut self, id: Xid, destroyed: bool) -> Result<()> {
        let Some(c) = self.cs.remove(id) else {
            return Ok(());
        };
        self.mapped.remove(&id);
        self.pending_unmap.remove(&id);

        if !destroyed {
            self.x
                .set_client_config(id, &[ClientConfig::BorderPx(c.prev_bw)])?;
            self.x.set_wm_state(id, WmState::Withdrawn)?;
        }

        self.focus(None)?;
        self.arrange(Some(c.monitor))?;

        Ok(())
    }

    fn on_configure_request(&mut self, req: ConfigureRequest) -> Result<()> {
        let id = req.id;
        let Some(c) = self.cs.client(id) else {
            self.x.forward_configure_request(&req)?;
            self.x.flush();
            return Ok(());
        };

        if let Some(bw) = req.border_width {
            if let Some(c) = self.cs.client_mut(id) {
                c.bw = bw;
            }
        } else if c.floating {
            let screen = self.cs.monitors[c.monitor].screen_rect();
            let bw = c.bw;
            let mut r = c.r;

            if let Some(x) = req.x {
                r.x = max(screen.x as i64 + x as i64, 0) as u32;
            }
            if let Some(y) = req.y {
                r.y = max(screen.y as i64 + y as i64, 0) as u32;
            }
            if let Some(w) = req.w {
                r.w = w;
            }
            if let Some(h) = req.h {
                r.h = h;
            }

            // requests that land off-monitor are centered instead
            if r.x + r.w > screen.x + screen.w {
                r.x = screen.x + (screen.w / 2).saturating_sub((r.w + 2 * bw) / 2);
            }
            if r.y + r.h > screen.y + screen.h {
                r.y = screen.y + (screen.h / 2).saturating_sub((r.h + 2 * bw) / 2);
            }

            let moved_only =
                (req.x.is_some() || req.y.is_some()) && req.w.is_none() && req.h.is_none();
            if moved_only {
                self.x.send_configure_notify(id, r, bw)?;
            }
            if let Some(c) = self.cs.client_mut(id) {
                c.record_geometry(r);
            }
            if self.cs.is_visible(id) {
                self.x.set_client_config(id, &[ClientConfig::Position(r)])?;
            }
        } else {
            self.x.send_configure_notify(id, c.r, c.bw)?;
        }

        self.x.flush();
        Ok(())
    }

    fn on_screen_change(&mut self) -> Result<()> {
        let rects = self.x.screen_details()?;
        if rects.is_empty() {
            return Err(Error::NoScreens);
        }

        let config = self.config.clone();
        let dirty = self
            .cs
            .reconcile_monitors(&rects, |i, r| build_monitor(&config, i, r));
        if !dirty {
            return Ok(());
        }

        debug!(monitors = self.cs.monitors().len(), "monitor topology changed");
        if let Ok(p) = self.x.cursor_position() {
            self.cs.focused = self.cs.monitor_for_point(p);
        }

        // refit fullscreen clients to their (possibly new) monitor
        let fullscreen: Vec<(Xid, usize)> = self
            .cs
            .clients
            .values()
            .filter(|c| c.fullscreen)
            .map(|c| (c.id, c.monitor))
            .collect();
        for (id, mi) in fullscreen {
            let screen = self.cs.monitors[mi].screen_rect();
            self.commit_geometry(id, screen)?;
        }

        self.focus(None)?;
        self.arrange(None)?;

        Ok(())
    }

    fn on_enter(&mut self, id: Xid) -> Result<()> {
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        let mi = c.monitor;

        if mi != self.cs.focused {
            if let Some(sel) = self.cs.focused_client_id() {
                self.unfocus(sel, true)?;
            }
            self.cs.focused = mi;
        } else if self.cs.focused_client_id() == Some(id) {
            return Ok(());
        }

        self.focus(Some(id))
    }

    fn on_pointer_motion(&mut self, p: Point) -> Result<()> {
        let m = self.cs.monitor_for_point(p);

        if let Some(prev) = self.motion_monitor {
            if m != prev {
                if let Some(sel) = self.cs.focused_client_id() {
                    self.unfocus(sel, true)?;
                }
                self.cs.focused = m;
                self.focus(None)?;
            }
        }
        self.motion_monitor = Some(m);

        Ok(())
    }

    // Some clients try to acquire focus for themselves: put it back.
    fn on_focus_in(&mut self, id: Xid) -> Result<()> {
        if let Some(sel) = self.cs.focused_client_id() {
            if sel != id {
                let never_focus = self.cs.client(sel).map(|c| c.never_focus).unwrap_or(true);
                if !never_focus {
                    self.x.take_focus(sel)?;
                }
            }
        }

        Ok(())
    }

    fn on_property_changed(&mut self, id: Xid, prop: Property) -> Result<()> {
        if !self.cs.contains(id) {
            return Ok(());
        }

        match prop {
            Property::Title => {
                let name = self.x.window_title(id).unwrap_or_default();
                if let Some(c) = self.cs.client_mut(id) {
                    c.name = name;
                }
            }
            Property::SizeHints => {
                // re-fetched lazily on the next resize
                if let Some(c) = self.cs.client_mut(id) {
                    c.hints = None;
                }
            }
            Property::Hints => self.update_wm_hints(id)?,
            Property::WindowType => self.update_window_type(id)?,
            Property::TransientFor => {
                let floating = self.cs.client(id).map(|c| c.floating).unwrap_or(true);
                if !floating {
                    let mi = match self.cs.client(id) {
                        Some(c) => c.monitor,
                        None => return Ok(()),
                    };
                    let parent_managed = self
                        .x
                        .transient_for(id)
                        .unwrap_or(None)
                        .map(|t| self.cs.contains(t))
                        .unwrap_or(false);
                    if parent_managed {
                        if let Some(c) = self.cs.client_mut(id) {
                            c.floating = true;
                        }
                        self.arrange(Some(mi))?;
                    }
                }
            }
        }

        Ok(())
    }

    fn update_wm_hints(&mut self, id: Xid) -> Result<()> {
        let Ok(Some(hints)) = self.x.wm_hints(id) else {
            return Ok(());
        };

        if self.cs.focused_client_id() == Some(id) && hints.urgent {
            // the focused window has no business being urgent
            self.x.set_urgency_hint(id, false)?;
        } else if let Some(c) = self.cs.client_mut(id) {
            c.urgent = hints.urgent;
            if hints.urgent {
                let mi = c.monitor;
                self.cs.monitors[mi].status_view = StatusView::WsOverview;
            }
        }

        if let Some(c) = self.cs.client_mut(id) {
            c.never_focus = hints.accepts_input == Some(false);
        }

        Ok(())
    }

    fn update_window_type(&mut self, id: Xid) -> Result<()> {
        if self.x.is_fullscreen(id).unwrap_or(false) {
            self.set_fullscreen(id, true)?;
        }
        if self.x.is_dialog(id).unwrap_or(false) {
            if let Some(c) = self.cs.client_mut(id) {
                c.floating = true;
            }
        }

        Ok(())
    }

    fn on_fullscreen_request(&mut self, id: Xid, action: FullscreenAction) -> Result<()> {
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        let fullscreen = match action {
            FullscreenAction::Set => true,
            FullscreenAction::Unset => false,
            FullscreenAction::Toggle => !c.fullscreen,
        };

        self.set_fullscreen(id, fullscreen)
    }

    fn on_activation_request(&mut self, id: Xid) -> Result<()> {
        match self.cs.client(id) {
            // activation requests raise urgency instead of stealing focus
            Some(c) if self.cs.focused_client_id() != Some(id) && !c.urgent => {
                self.set_urgent(id, true)
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn set_urgent(&mut self, id: Xid, urgent: bool) -> Result<()> {
        let Some(c) = self.cs.client_mut(id) else {
            return Ok(());
        };
        c.urgent = urgent;
        let mi = c.monitor;
        if urgent {
            self.cs.monitors[mi].status_view = StatusView::WsOverview;
        }

        self.x.set_urgency_hint(id, urgent)
    }

    /// Give focus to `target`, or to the best candidate on the focused
    /// monitor when `target` is `None` or not visible.
    pub(crate) fn focus(&mut self, target: Option<Xid>) -> Result<()> {
        let mut target = target.filter(|&id| self.cs.is_visible(id));
        if target.is_none() {
            target = self.cs.visible_fallback(self.cs.focused, None);
        }

        if let Some(prev) = self.cs.focused_client_id() {
            if Some(prev) != target {
                self.unfocus(prev, false)?;
            }
        }

        match target {
            Some(id) => {
                let (mi, pane, urgent, never_focus) = match self.cs.client(id) {
                    Some(c) => (c.monitor, c.pane, c.urgent, c.never_focus),
                    None => return self.x.clear_focus(),
                };
                if mi != self.cs.focused {
                    self.cs.focused = mi;
                }
                if urgent {
                    self.set_urgent(id, false)?;
                }

                let m = &mut self.cs.monitors[mi];
                m.stack.retain(|&c| c != id);
                m.attach_stack(id);

                self.x.set_border(id, Border::FocusedInPane(pane))?;
                if !never_focus {
                    self.x.take_focus(id)?;
                }
            }
            None => self.x.clear_focus()?,
        }

        self.cs.focused_monitor_mut().sel = target;
        Ok(())
    }

    pub(crate) fn unfocus(&mut self, id: Xid, refocus_root: bool) -> Result<()> {
        self.x.set_border(id, Border::Unfocused)?;
        if refocus_root {
            self.x.clear_focus()?;
        }

        Ok(())
    }

    /// Re-apply visibility, tiling and stacking for one monitor, or
    /// visibility and tiling for all of them.
    pub(crate) fn arrange(&mut self, monitor: Option<usize>) -> Result<()> {
        match monitor {
            Some(mi) => {
                self.show_hide(mi)?;
                self.arrange_monitor(mi)?;
                self.restack(mi)?;
            }
            None => {
                for mi in 0..self.cs.monitors.len() {
                    self.show_hide(mi)?;
                    self.arrange_monitor(mi)?;
                }
            }
        }

        Ok(())
    }

    // Reveal visible clients top down and hide the rest bottom up, walking
    // the focus recency stack.
    fn show_hide(&mut self, mi: usize) -> Result<()> {
        let ids = self.cs.monitors[mi].stack.clone();

        for &id in &ids {
            if self.cs.is_visible(id) {
                self.reveal(id)?;
            }
        }
        for &id in ids.iter().rev() {
            if !self.cs.is_visible(id) {
                self.hide(id)?;
            }
        }

        Ok(())
    }

    fn reveal(&mut self, id: Xid) -> Result<()> {
        if self.mapped.insert(id) {
            self.x.map(id)?;
            self.x.set_wm_state(id, WmState::Normal)?;
        }

        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        if c.floating && !c.fullscreen {
            // re-clamp in case the work area changed while hidden
            self.resize(id, c.r, false)?;
        }

        Ok(())
    }

    fn hide(&mut self, id: Xid) -> Result<()> {
        if self.mapped.remove(&id) {
            *self.pending_unmap.entry(id).or_insert(0) += 1;
            self.x.unmap(id)?;
            self.x.set_wm_state(id, WmState::Iconic)?;
        }

        Ok(())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn arrange_monitor(&mut self, mi: usize) -> Result<()> {
        for id in self.cs.monitors[mi].clients.clone() {
            if let Some(c) = self.cs.client_mut(id) {
                c.arranged = false;
            }
        }

        let m = &self.cs.monitors[mi];
        let ws = m.active_workspace();
        let work = m.work_rect();
        let ratio = ws.ratio();

        let occupied: Vec<usize> = (0..ws.panes().len())
            .filter(|&pi| ws.is_showing(pi) && !self.cs.tiled_in_pane(mi, pi).is_empty())
            .collect();

        for (pi, region) in pane_regions(work, ratio, &occupied) {
            let ids = self.cs.tiled_in_pane(mi, pi);
            let pane = self.cs.monitors[mi].active_workspace().panes()[pi];
            let rects = stack_positions(pane.layout(), ids.len(), pane.cap(), region);

            for (id, slot) in ids.into_iter().zip(rects) {
                let bw = match self.cs.client_mut(id) {
                    Some(c) => {
                        c.arranged = true;
                        c.bw
                    }
                    None => continue,
                };
                let r = Rect {
                    x: slot.x,
                    y: slot.y,
                    w: slot.w.saturating_sub(2 * bw),
                    h: slot.h.saturating_sub(2 * bw),
                };
                self.resize(id, r, false)?;
            }
        }

        Ok(())
    }

    // Tiled visible windows are chained below one another in focus recency
    // order, with a floating selection raised above everything at the end.
    fn restack(&mut self, mi: usize) -> Result<()> {
        let m = &self.cs.monitors[mi];
        let Some(sel) = m.sel else {
            return Ok(());
        };

        let tiled: Vec<Xid> = m
            .stack
            .iter()
            .copied()
            .filter(|&id| {
                self.cs.is_visible(id)
                    && !self.cs.client(id).map(|c| c.floating).unwrap_or(true)
            })
            .collect();

        if let Some((&first, rest)) = tiled.split_first() {
            self.x.set_client_config(first, &[ClientConfig::Raise])?;
            let mut prev = first;
            for &id in rest {
                self.x
                    .set_client_config(id, &[ClientConfig::StackBelow(prev)])?;
                prev = id;
            }
        }

        let sel_floating = self.cs.client(sel).map(|c| c.floating).unwrap_or(false);
        if sel_floating {
            self.x.set_client_config(sel, &[ClientConfig::Raise])?;
        }
        self.x.flush();

        Ok(())
    }

    /// Request a new geometry for a client, running it through size hint
    /// adjustment and skipping the commit when nothing would change.
    pub(crate) fn resize(&mut self, id: Xid, r: Rect, interact: bool) -> Result<()> {
        self.refresh_size_hints(id);
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };

        let work = self.cs.monitors[c.monitor].work_rect();
        let screen = self.display_bounds();
        let (new, changed) =
            c.apply_size_hints(r, screen, work, self.config.honor_size_hints, interact);

        if changed {
            self.commit_geometry(id, new)?;
        }

        Ok(())
    }

    fn refresh_size_hints(&mut self, id: Xid) {
        if !matches!(self.cs.client(id), Some(c) if c.hints.is_none()) {
            return;
        }
        let hints = self.x.size_hints(id).unwrap_or(None).unwrap_or_default();
        if let Some(c) = self.cs.client_mut(id) {
            c.fixed = hints.is_fixed();
            c.hints = Some(hints);
        }
    }

    fn commit_geometry(&mut self, id: Xid, r: Rect) -> Result<()> {
        let Some(c) = self.cs.client_mut(id) else {
            return Ok(());
        };
        c.record_geometry(r);
        let bw = c.bw;

        self.x
            .set_client_config(id, &[ClientConfig::Position(r), ClientConfig::BorderPx(bw)])?;
        self.x.send_configure_notify(id, r, bw)?;
        self.x.flush();

        Ok(())
    }

    // Bounding box over all monitor screens, used for interactive clamping.
    fn display_bounds(&self) -> Rect {
        let mut x2 = 0;
        let mut y2 = 0;
        let mut origin = Point::new(u32::MAX, u32::MAX);

        for m in &self.cs.monitors {
            let s = m.screen_rect();
            origin.x = origin.x.min(s.x);
            origin.y = origin.y.min(s.y);
            x2 = max(x2, s.x + s.w);
            y2 = max(y2, s.y + s.h);
        }

        Rect::new(origin.x, origin.y, x2 - origin.x, y2 - origin.y)
    }

    pub(crate) fn set_fullscreen(&mut self, id: Xid, fullscreen: bool) -> Result<()> {
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };

        if fullscreen && !c.fullscreen {
            let mi = c.monitor;
            let screen = self.cs.monitors[mi].screen_rect();
            self.x.set_fullscreen_prop(id, true)?;
            if let Some(c) = self.cs.client_mut(id) {
                c.fullscreen = true;
                c.prev_floating = c.floating;
                c.prev_bw = c.bw;
                c.bw = 0;
                c.floating = true;
            }
            self.commit_geometry(id, screen)?;
            self.x.set_client_config(id, &[ClientConfig::Raise])?;
        } else if !fullscreen && c.fullscreen {
            let mi = c.monitor;
            self.x.set_fullscreen_prop(id, false)?;
            let restored = match self.cs.client_mut(id) {
                Some(c) => {
                    c.fullscreen = false;
                    c.floating = c.prev_floating;
                    c.bw = c.prev_bw;
                    c.prev_r
                }
                None => return Ok(()),
            };
            self.commit_geometry(id, restored)?;
            self.arrange(Some(mi))?;
        }

        Ok(())
    }

    /// Move a client to another monitor, keeping its workspace and pane
    /// indices, and re-resolve focus on both ends.
    pub(crate) fn send_to_monitor(&mut self, id: Xid, target: usize) -> Result<()> {
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        if c.monitor == target || target >= self.cs.monitors.len() {
            return Ok(());
        }

        self.unfocus(id, true)?;
        self.cs.transfer(id, target);
        self.focus(None)?;
        self.arrange(None)?;

        Ok(())
    }

    /// Drag the focused window with the pointer until the button is
    /// released, pulling tiled windows out into floating once they move past
    /// the snap threshold.
    pub(crate) fn drag_move(&mut self) -> Result<()> {
        let Some(id) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        if c.fullscreen {
            return Ok(());
        }
        let orig = c.r;

        self.restack(self.cs.focused)?;
        if !self.x.grab_pointer(DragKind::Move)? {
            return Ok(());
        }
        let Ok(start) = self.x.cursor_position() else {
            return self.x.ungrab_pointer();
        };

        let snap = self.config.snap as i64;
        let mut last = 0u32;
        loop {
            match self.x.next_drag_event()? {
                DragEvent::Release => break,
                DragEvent::Forward(ev) => self.handle_event(*ev)?,
                DragEvent::Motion { p, time_ms } => {
                    if time_ms.wrapping_sub(last) <= DRAG_INTERVAL_MS {
                        continue;
                    }
                    last = time_ms;

                    let Some(c) = self.cs.client(id) else {
                        break;
                    };
                    let work = self.cs.monitors[self.cs.focused].work_rect();
                    let (ow, oh) = ((c.r.w + 2 * c.bw) as i64, (c.r.h + 2 * c.bw) as i64);
                    let (wx, wy) = (work.x as i64, work.y as i64);
                    let (ww, wh) = (work.w as i64, work.h as i64);

                    let mut nx = orig.x as i64 + p.x as i64 - start.x as i64;
                    let mut ny = orig.y as i64 + p.y as i64 - start.y as i64;
                    if (wx - nx).abs() < snap {
                        nx = wx;
                    } else if ((wx + ww) - (nx + ow)).abs() < snap {
                        nx = wx + ww - ow;
                    }
                    if (wy - ny).abs() < snap {
                        ny = wy;
                    } else if ((wy + wh) - (ny + oh)).abs() < snap {
                        ny = wy + wh - oh;
                    }
                    let (nx, ny) = (max(nx, 0) as u32, max(ny, 0) as u32);

                    let moved = (nx as i64 - c.r.x as i64).abs() > snap
                        || (ny as i64 - c.r.y as i64).abs() > snap;
                    if !c.floating && moved {
                        self.toggle_floating()?;
                    }
                    if let Some(c) = self.cs.client(id) {
                        if c.floating {
                            let (w, h) = (c.r.w, c.r.h);
                            self.resize(id, Rect::new(nx, ny, w, h), true)?;
                        }
                    }
                }
            }
        }
        self.x.ungrab_pointer()?;

        self.finish_drag(id)
    }

    /// Resize the focused window with the pointer until the button is
    /// released.
    pub(crate) fn drag_resize(&mut self) -> Result<()> {
        let Some(id) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        if c.fullscreen {
            return Ok(());
        }
        let orig = c.r;
        let bw = c.bw;

        self.restack(self.cs.focused)?;
        if !self.x.grab_pointer(DragKind::Resize)? {
            return Ok(());
        }
        self.x
            .warp_pointer(id, (orig.w + bw - 1) as i16, (orig.h + bw - 1) as i16)?;

        let snap = self.config.snap as i64;
        let mut last = 0u32;
        loop {
            match self.x.next_drag_event()? {
                DragEvent::Release => break,
                DragEvent::Forward(ev) => self.handle_event(*ev)?,
                DragEvent::Motion { p, time_ms } => {
                    if time_ms.wrapping_sub(last) <= DRAG_INTERVAL_MS {
                        continue;
                    }
                    last = time_ms;

                    let Some(c) = self.cs.client(id) else {
                        break;
                    };
                    let nw = max(p.x as i64 - orig.x as i64 - 2 * bw as i64 + 1, 1) as u32;
                    let nh = max(p.y as i64 - orig.y as i64 - 2 * bw as i64 + 1, 1) as u32;

                    // pull-out is allowed while the new size still fits the
                    // work area, regardless of where the window sits
                    let work = self.cs.monitors[self.cs.focused].work_rect();
                    let in_bounds = nw <= work.w && nh <= work.h;
                    if in_bounds {
                        let grown = (nw as i64 - c.r.w as i64).abs() > snap
                            || (nh as i64 - c.r.h as i64).abs() > snap;
                        if !c.floating && grown {
                            self.toggle_floating()?;
                        }
                    }
                    if let Some(c) = self.cs.client(id) {
                        if c.floating {
                            let (x, y) = (c.r.x, c.r.y);
                            self.resize(id, Rect::new(x, y, nw, nh), true)?;
                        }
                    }
                }
            }
        }

        if let Some(c) = self.cs.client(id) {
            self.x
                .warp_pointer(id, (c.r.w + c.bw - 1) as i16, (c.r.h + c.bw - 1) as i16)?;
        }
        self.x.ungrab_pointer()?;

        self.finish_drag(id)
    }

    // A window dragged onto another monitor is handed over at the end of the
    // drag.
    fn finish_drag(&mut self, id: Xid) -> Result<()> {
        let Some(c) = self.cs.client(id) else {
            return Ok(());
        };
        let target = self.cs.monitor_for_rect(&c.r);
        if target != self.cs.focused {
            self.send_to_monitor(id, target)?;
            self.cs.focused = target;
            self.focus(None)?;
        }

        Ok(())
    }

    pub(crate) fn toggle_floating(&mut self) -> Result<()> {
        let Some(id) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let Some(c) = self.cs.client_mut(id) else {
            return Ok(());
        };
        if c.fullscreen {
            return Ok(());
        }

        c.floating = !c.floating || c.fixed;
        let mi = c.monitor;

        self.arrange(Some(mi))
    }
}
