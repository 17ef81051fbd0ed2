//! panewm: the layout and state core of a pane based tiling window manager.
//!
//! Every workspace on a monitor is a grid cell addressed by a `(workspace, alt)`
//! pair and holds a fixed set of [panes][pure::Pane]: named layout groups that
//! can be shown or hidden independently, each with its own stacking layout and
//! display cap. When more than one pane is visible at the same time the work
//! area is divided between them using the workspace split ratio.
//!
//! The crate is split into three layers:
//!   * [pure] holds the side effect free model: geometry, client records, the
//!     workspace matrix and the per-monitor registries.
//!   * [core] holds the state machine driving everything: the
//!     [WindowManager][core::WindowManager], the tiling engine and the action
//!     catalog exposed to key binding shells.
//!   * [x] is the boundary to the underlying windowing system: an [XConn][x::XConn]
//!     trait that a thin shell implements, plus the event types it feeds back.
//!
//! There is no rendering, process spawning or IPC in here: the crate is the
//! single authority for *where windows go* and nothing else.
#![warn(missing_debug_implementations, rust_2018_idioms)]

pub mod core;
pub mod pure;
pub mod x;

use std::ops::Deref;

#[doc(inline)]
pub use crate::core::{actions::Action, layout::LayoutKind, Config, WindowManager};
#[doc(inline)]
pub use pure::{geometry::Rect, Client, ClientSet, Monitor, Pane, Rule, Workspace};

/// An ID for a window known to the windowing system.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Error variants from the core window manager logic.
///
/// Invalid action arguments never show up here: they are absorbed as no-ops
/// where they occur. Only environment level failures are surfaced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection to the windowing system was lost.
    #[error("the connection to the display server is closed")]
    ConnectionClosed,

    /// The provided [Config] fails validation.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// Why the config was rejected
        reason: String,
    },

    /// The windowing system reported no usable screens.
    #[error("no screens were reported by the display server")]
    NoScreens,

    /// Another window manager holds the redirect selection already.
    #[error("another window manager is already running")]
    WmAlreadyRunning,

    /// An error produced by the backend implementing [XConn][crate::x::XConn].
    #[error("backend error: {0}")]
    Backend(String),
}

/// A Result where the error type is a panewm [Error]
pub type Result<T> = std::result::Result<T, Error>;
