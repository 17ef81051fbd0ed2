//! The catalog of user driven actions.
//!
//! Actions are data rather than callbacks so a binding layer can store,
//! compare and serialize them freely. Out of range indices and actions that
//! need a focused client when there is none are absorbed as no-ops.
use crate::{
    core::WindowManager,
    pure::{client::Maximized, geometry::Rect, monitor::StatusView, workspace::step_wrapping},
    x::{Border, XConn},
    Result, Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::min;
use tracing::trace;

/// Something a user keybinding (or other shell surface) can ask the window
/// manager to do.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Show the given `(workspace, alt)` pair on the focused monitor
    SwitchWorkspace {
        /// Workspace index
        ws: usize,
        /// Alternate index within the workspace
        alt: usize,
    },
    /// Flip back to the previously shown `(workspace, alt)` pair
    ToggleWorkspace,
    /// Move the focused client to the given workspace index
    MoveToWorkspace(usize),
    /// Move the focused client to the neighbouring pane, selecting it
    MoveToPane {
        /// Step towards higher pane indices
        forward: bool,
    },
    /// Move the focused client to the given pane without changing the
    /// selected pane
    MoveToPaneIndex(usize),
    /// Cycle the layout of the selected pane
    CycleLayout {
        /// Cycle towards the next layout rather than the previous
        forward: bool,
    },
    /// Step the split ratio of the active workspace by the given delta
    AdjustRatio(i32),
    /// Step the display cap of the selected pane by the given delta
    AdjustCap(i32),
    /// Show or hide a pane: the given index, or the selected pane for `None`
    TogglePane(Option<usize>),
    /// Hide all panes and restore the active workspace to its defaults
    ClearPanes,
    /// Select the neighbouring pane
    FocusPane {
        /// Step towards higher pane indices
        forward: bool,
    },
    /// Select the nearest showing pane, skipping hidden ones
    FocusPaneShowing {
        /// Step towards higher pane indices
        forward: bool,
    },
    /// Move focus through the clients of the selected pane
    CycleFocus {
        /// Step towards older clients rather than newer
        forward: bool,
    },
    /// Swap the focused client with its tiled neighbour in stacking order
    SwapStack {
        /// Step towards older clients rather than newer
        forward: bool,
    },
    /// Promote the focused client to the head of its pane's stack
    Zoom,
    /// Toggle the focused client between floating and tiled
    ToggleFloating,
    /// Toggle fullscreen for the focused client
    ToggleFullscreen,
    /// Step the focused client through the maximize cycle
    Maximize,
    /// Center the focused floating client in the work area
    CenterWindow,
    /// Toggle the bar strip on the focused monitor
    ToggleBar,
    /// Cycle what the focused monitor's status area shows
    CycleStatusView {
        /// Cycle towards the next view rather than the previous
        forward: bool,
    },
    /// Set the focused monitor's status area directly
    SetStatusView(StatusView),
    /// Close the focused client, politely if it cooperates
    CloseFocused,
    /// Move the focused client with the pointer
    DragMove,
    /// Resize the focused client with the pointer
    DragResize,
    /// Stop the event loop
    Quit,
}

impl<X: XConn> WindowManager<X> {
    /// Carry out a single [Action].
    pub fn perform(&mut self, action: Action) -> Result<()> {
        trace!(?action, "performing action");

        match action {
            Action::SwitchWorkspace { ws, alt } => self.switch_workspace(ws, alt),
            Action::ToggleWorkspace => self.toggle_workspace(),
            Action::MoveToWorkspace(ws) => self.move_to_workspace(ws),
            Action::MoveToPane { forward } => self.move_to_pane_relative(forward),
            Action::MoveToPaneIndex(pi) => self.move_to_pane(pi, false),
            Action::CycleLayout { forward } => self.cycle_layout(forward),
            Action::AdjustRatio(delta) => self.adjust_ratio(delta),
            Action::AdjustCap(delta) => self.adjust_cap(delta),
            Action::TogglePane(target) => self.toggle_pane(target),
            Action::ClearPanes => self.clear_panes(),
            Action::FocusPane { forward } => self.focus_pane(forward),
            Action::FocusPaneShowing { forward } => self.focus_pane_showing(forward),
            Action::CycleFocus { forward } => self.cycle_focus(forward),
            Action::SwapStack { forward } => self.swap_stack(forward),
            Action::Zoom => self.zoom(),
            Action::ToggleFloating => self.toggle_floating(),
            Action::ToggleFullscreen => self.toggle_fullscreen(),
            Action::Maximize => self.maximize(),
            Action::CenterWindow => self.center_window(),
            Action::ToggleBar => self.toggle_bar(),
            Action::CycleStatusView { forward } => {
                self.cs.focused_monitor_mut().cycle_status_view(forward);
                Ok(())
            }
            Action::SetStatusView(view) => {
                self.cs.focused_monitor_mut().status_view = view;
                Ok(())
            }
            Action::CloseFocused => self.close_focused(),
            Action::DragMove => self.drag_move(),
            Action::DragResize => self.drag_resize(),
            Action::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    fn switch_workspace(&mut self, ws: usize, alt: usize) -> Result<()> {
        let mi = self.cs.focused;
        if !self.cs.monitors[mi].switch_to(ws, alt) {
            return Ok(());
        }

        self.focus(None)?;
        self.arrange(Some(mi))
    }

    fn toggle_workspace(&mut self) -> Result<()> {
        let mi = self.cs.focused;
        self.cs.monitors[mi].switch_back();

        self.focus(None)?;
        self.arrange(Some(mi))
    }

    fn move_to_workspace(&mut self, ws: usize) -> Result<()> {
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        if ws >= self.config.n_workspaces {
            return Ok(());
        }

        let mi = self.cs.focused;
        if let Some(c) = self.cs.client_mut(sel) {
            c.ws = ws;
        }

        self.focus(None)?;
        self.arrange(Some(mi))
    }

    fn move_to_pane_relative(&mut self, forward: bool) -> Result<()> {
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let Some(c) = self.cs.client(sel) else {
            return Ok(());
        };
        let target = step_wrapping(c.pane, forward, self.config.n_panes);

        self.move_to_pane(target, true)
    }

    // Reassign the focused client to `target`. When the destination pane is
    // showing the focus stays put and only the border color changes; when it
    // is hidden the client vanishes with it and focus moves on.
    fn move_to_pane(&mut self, target: usize, select: bool) -> Result<()> {
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        if target >= self.config.n_panes {
            return Ok(());
        }
        match self.cs.client_mut(sel) {
            Some(c) if c.pane != target => c.pane = target,
            _ => return Ok(()),
        }

        let mi = self.cs.focused;
        if select {
            self.cs.monitors[mi].active_workspace_mut().selected = target;
        }

        if self.cs.monitors[mi].active_workspace().is_showing(target) {
            self.x.set_border(sel, Border::FocusedInPane(target))?;
        } else {
            self.unfocus(sel, false)?;
            self.focus(None)?;
        }

        self.arrange(Some(mi))
    }

    fn cycle_layout(&mut self, forward: bool) -> Result<()> {
        let mi = self.cs.focused;
        self.cs.monitors[mi].active_workspace_mut().cycle_layout(forward);

        self.arrange(Some(mi))
    }

    fn adjust_ratio(&mut self, delta: i32) -> Result<()> {
        let mi = self.cs.focused;
        if self.cs.monitors[mi].active_workspace_mut().adjust_ratio(delta) {
            self.arrange(Some(mi))?;
        }

        Ok(())
    }

    fn adjust_cap(&mut self, delta: i32) -> Result<()> {
        let mi = self.cs.focused;
        if self.cs.monitors[mi]
            .active_workspace_mut()
            .adjust_selected_cap(delta)
        {
            self.arrange(Some(mi))?;
        }

        Ok(())
    }

    fn toggle_pane(&mut self, target: Option<usize>) -> Result<()> {
        let mi = self.cs.focused;
        let pi = target.unwrap_or(self.cs.monitors[mi].active_workspace().selected);
        let Some(showing) = self.cs.monitors[mi].active_workspace_mut().toggle_pane(pi) else {
            return Ok(());
        };

        self.arrange(Some(mi))?;

        if showing {
            if let Some(id) = self.top_of_pane(mi, pi) {
                self.focus(Some(id))?;
            }
        } else {
            let sel_hidden = self
                .cs
                .focused_client()
                .map(|c| c.pane == pi)
                .unwrap_or(false);
            if sel_hidden {
                self.focus(None)?;
            }
        }

        Ok(())
    }

    fn clear_panes(&mut self) -> Result<()> {
        let mi = self.cs.focused;
        let (ratio, cap) = (self.config.default_ratio, self.config.default_cap);
        self.cs.monitors[mi].active_workspace_mut().reset(ratio, cap);

        if let Some(sel) = self.cs.focused_client_id() {
            self.unfocus(sel, true)?;
        }
        self.cs.monitors[mi].sel = None;

        self.arrange(Some(mi))
    }

    fn focus_pane(&mut self, forward: bool) -> Result<()> {
        let mi = self.cs.focused;
        let pi = self.cs.monitors[mi].active_workspace().step_selection(forward);

        self.focus_pane_to(mi, pi)
    }

    fn focus_pane_showing(&mut self, forward: bool) -> Result<()> {
        let mi = self.cs.focused;
        match self.cs.monitors[mi]
            .active_workspace()
            .step_selection_showing(forward)
        {
            Some(pi) => self.focus_pane_to(mi, pi),
            None => Ok(()),
        }
    }

    fn focus_pane_to(&mut self, mi: usize, pi: usize) -> Result<()> {
        self.cs.monitors[mi].active_workspace_mut().selected = pi;
        if !self.cs.monitors[mi].active_workspace().is_showing(pi) {
            return Ok(());
        }

        if let Some(id) = self.top_of_pane(mi, pi) {
            if self.cs.focused_client_id() != Some(id) {
                self.focus(Some(id))?;
                self.restack(mi)?;
            }
        }

        Ok(())
    }

    // Most recently focused client of `pane` on the current workspace.
    fn top_of_pane(&self, mi: usize, pane: usize) -> Option<Xid> {
        self.cs.monitors[mi].stack.iter().copied().find(|&id| {
            self.cs.is_on_active_workspace(id)
                && self.cs.client(id).map(|c| c.pane == pane).unwrap_or(false)
        })
    }

    fn cycle_focus(&mut self, forward: bool) -> Result<()> {
        let mi = self.cs.focused;
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let (fullscreen, pi) = match self.cs.client(sel) {
            Some(c) => (c.fullscreen, c.pane),
            None => return Ok(()),
        };
        if self.config.lock_fullscreen && fullscreen {
            return Ok(());
        }

        // the cycle stays within the focused client's pane, which need not be
        // the selected one
        let m = &self.cs.monitors[mi];
        let ws = m.ws;
        if !m.active_workspace().is_showing(pi) {
            return Ok(());
        }

        // floating clients of the pane take part in the cycle too
        if let Some(id) = self.cs.neighbour(mi, sel, forward, |c| c.ws == ws && c.pane == pi) {
            self.focus(Some(id))?;
            self.restack(mi)?;
        }

        Ok(())
    }

    fn swap_stack(&mut self, forward: bool) -> Result<()> {
        let mi = self.cs.focused;
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let (floating, pi) = match self.cs.client(sel) {
            Some(c) => (c.floating, c.pane),
            None => return Ok(()),
        };
        if floating {
            return Ok(());
        }

        let ws = self.cs.monitors[mi].ws;
        let neighbour = self
            .cs
            .neighbour(mi, sel, forward, |c| {
                !c.floating && c.ws == ws && c.pane == pi
            });
        if let Some(other) = neighbour {
            self.cs.swap_order(mi, sel, other);
            self.arrange(Some(mi))?;
        }

        Ok(())
    }

    fn zoom(&mut self) -> Result<()> {
        let mi = self.cs.focused;
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let (floating, pi) = match self.cs.client(sel) {
            Some(c) => (c.floating, c.pane),
            None => return Ok(()),
        };
        if floating {
            return Ok(());
        }

        // zooming the current head promotes the next client instead
        let tiled = self.cs.tiled_in_pane(mi, pi);
        let target = if tiled.first() == Some(&sel) {
            match tiled.get(1) {
                Some(&next) => next,
                None => return Ok(()),
            }
        } else {
            sel
        };

        self.cs.monitors[mi].promote(target);
        self.focus(Some(target))?;
        self.arrange(Some(mi))
    }

    fn toggle_fullscreen(&mut self) -> Result<()> {
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let fullscreen = self.cs.client(sel).map(|c| c.fullscreen).unwrap_or(false);

        self.set_fullscreen(sel, !fullscreen)
    }

    fn maximize(&mut self) -> Result<()> {
        let mi = self.cs.focused;
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let Some(c) = self.cs.client(sel) else {
            return Ok(());
        };
        if !c.floating || c.fullscreen {
            return Ok(());
        }

        let work = self.cs.monitors[mi].work_rect();
        let screen = self.cs.monitors[mi].screen_rect();
        let bw2 = 2 * c.bw;

        match c.maximized {
            Maximized::Off => {
                let orig = c.r;
                if let Some(c) = self.cs.client_mut(sel) {
                    c.saved_r = Some(orig);
                    c.maximized = Maximized::WorkArea;
                }
                let r = Rect {
                    w: work.w.saturating_sub(bw2),
                    h: work.h.saturating_sub(bw2),
                    ..work
                };
                self.resize(sel, r, false)
            }
            Maximized::WorkArea => {
                if let Some(c) = self.cs.client_mut(sel) {
                    c.maximized = Maximized::Screen;
                }
                let r = Rect {
                    w: screen.w.saturating_sub(bw2),
                    h: screen.h.saturating_sub(bw2),
                    ..work
                };
                self.resize(sel, r, false)
            }
            Maximized::Screen => {
                let saved = c.saved_r;
                if let Some(c) = self.cs.client_mut(sel) {
                    c.maximized = Maximized::Off;
                    c.saved_r = None;
                }
                match saved {
                    Some(r) => self.resize(sel, r, false),
                    None => Ok(()),
                }
            }
        }
    }

    fn center_window(&mut self) -> Result<()> {
        let mi = self.cs.focused;
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };
        let Some(c) = self.cs.client(sel) else {
            return Ok(());
        };
        if !c.floating || c.fullscreen {
            return Ok(());
        }

        // oversized windows are shrunk to fit rather than left in place
        let work = self.cs.monitors[mi].work_rect();
        let bw2 = 2 * c.bw;
        let fitted = Rect {
            w: min(c.r.w, work.w.saturating_sub(bw2)),
            h: min(c.r.h, work.h.saturating_sub(bw2)),
            ..c.r
        };
        let Some(r) = fitted.centered_in(&work) else {
            return Ok(());
        };

        self.resize(sel, r, false)?;
        self.x
            .warp_pointer(sel, (r.w / 2) as i16, (r.h / 2) as i16)?;

        Ok(())
    }

    fn toggle_bar(&mut self) -> Result<()> {
        let mi = self.cs.focused;
        self.cs.monitors[mi].toggle_bar();

        self.arrange(Some(mi))
    }

    fn close_focused(&mut self) -> Result<()> {
        let Some(sel) = self.cs.focused_client_id() else {
            return Ok(());
        };

        if !self.x.close(sel)? {
            self.x.kill(sel)?;
        }

        Ok(())
    }
}
