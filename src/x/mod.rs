//! The boundary to the underlying windowing system.
//!
//! Everything the window manager needs from the display server is expressed
//! through the [XConn] trait so the core can be driven in tests by
//! [MockXConn][mock::MockXConn] and in production by whatever backend the
//! consuming shell wires up. Getters are typed rather than raw atom plumbing:
//! the trait implementation owns all property encoding and decoding.
use crate::{
    pure::{
        client::SizeHints,
        geometry::{Point, Rect},
    },
    Result, Xid,
};

pub mod mock;

pub use mock::MockXConn;

/// The attributes of a window needed when deciding whether to manage it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    /// Current geometry as known by the server
    pub geometry: Rect,
    /// Current border width in pixels
    pub border_width: u32,
    /// Override-redirect windows are never managed
    pub override_redirect: bool,
    /// Whether the window is currently mapped and viewable
    pub viewable: bool,
}

/// ICCCM WM_HINTS fields the window manager cares about.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmHints {
    /// The urgency flag
    pub urgent: bool,
    /// The input hint: `Some(false)` marks windows that never want input
    /// focus
    pub accepts_input: Option<bool>,
}

/// ICCCM WM_STATE values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmState {
    /// The window is mapped and participating normally
    Normal,
    /// The window is hidden but still managed
    Iconic,
    /// The window is not managed
    Withdrawn,
}

/// Which border color a window should be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// The window does not hold focus
    Unfocused,
    /// The window holds focus while assigned to the given pane
    FocusedInPane(usize),
}

/// Configuration data for an [XConn::set_client_config] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientConfig {
    /// The border width in pixels
    BorderPx(u32),
    /// Absolute position and size
    Position(Rect),
    /// Absolute position only, size untouched
    Move(Point),
    /// Stack the window directly below the given sibling
    StackBelow(Xid),
    /// Stack the window above all others
    Raise,
}

/// A client initiated configure request, forwarded as-is by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    /// The window asking to be configured
    pub id: Xid,
    /// Requested x coordinate relative to the root
    pub x: Option<i32>,
    /// Requested y coordinate relative to the root
    pub y: Option<i32>,
    /// Requested width
    pub w: Option<u32>,
    /// Requested height
    pub h: Option<u32>,
    /// Requested border width
    pub border_width: Option<u32>,
}

/// Which client property a `PropertyChanged` event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// The window title (WM_NAME / _NET_WM_NAME)
    Title,
    /// WM_NORMAL_HINTS
    SizeHints,
    /// WM_HINTS (urgency, input)
    Hints,
    /// _NET_WM_WINDOW_TYPE
    WindowType,
    /// WM_TRANSIENT_FOR
    TransientFor,
}

/// The fullscreen request carried by a _NET_WM_STATE client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    /// _NET_WM_STATE_REMOVE
    Unset,
    /// _NET_WM_STATE_ADD
    Set,
    /// _NET_WM_STATE_TOGGLE
    Toggle,
}

/// Notifications from the windowing system, translated to the subset the
/// window manager acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A window is asking to be mapped and managed
    MapRequest(Xid),

    /// A window has been destroyed
    Destroy(Xid),

    /// A window has been unmapped. Synthetic unmaps are a client's way of
    /// withdrawing itself without being destroyed.
    Unmap {
        /// The window that was unmapped
        id: Xid,
        /// Whether the event was synthetic (sent by the client)
        synthetic: bool,
    },

    /// A client is asking for a new position / size / border
    ConfigureRequest(ConfigureRequest),

    /// The root window geometry changed
    RootConfigured {
        /// The new root dimensions
        rect: Rect,
    },

    /// The pointer entered a client window
    Enter(Xid),

    /// The pointer moved over the root window
    PointerMotion(Point),

    /// Input focus moved to the given window
    FocusIn(Xid),

    /// A property of a client window changed
    PropertyChanged {
        /// The window the property belongs to
        id: Xid,
        /// Which property changed
        prop: Property,
    },

    /// A _NET_WM_STATE fullscreen client message
    FullscreenRequest {
        /// The window the request is for
        id: Xid,
        /// Set / unset / toggle
        action: FullscreenAction,
    },

    /// A _NET_ACTIVE_WINDOW client message
    ActivationRequest(Xid),

    /// Outputs were added, removed or resized
    ScreenChange,
}

/// Why the pointer is being grabbed for a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Moving a window with the pointer
    Move,
    /// Resizing a window with the pointer
    Resize,
}

/// Events delivered while a pointer drag is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// The pointer moved
    Motion {
        /// Absolute pointer position
        p: Point,
        /// Server timestamp in milliseconds, used for throttling
        time_ms: u32,
    },
    /// The drag button was released
    Release,
    /// An unrelated event arrived mid drag and should be handled normally
    Forward(Box<XEvent>),
}

/// A connection to the windowing system.
///
/// Mutating methods are fire and forget: request errors for windows that
/// vanished mid-flight are the backend's problem to swallow, only connection
/// level failures should surface as `Err`.
pub trait XConn {
    /// The id of the root window.
    fn root(&self) -> Xid;

    /// The rects of all currently connected screens.
    fn screen_details(&self) -> Result<Vec<Rect>>;

    /// The current position of the pointer relative to the root window.
    fn cursor_position(&self) -> Result<Point>;

    /// Block until the next event from the windowing system is available.
    fn next_event(&self) -> Result<XEvent>;

    /// Flush any pending requests to the server.
    fn flush(&self);

    /// The ids of all windows that already exist, for adoption at startup.
    fn existing_clients(&self) -> Result<Vec<Xid>>;

    /// Attributes of the given window.
    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes>;

    /// The display title of the given window.
    fn window_title(&self, id: Xid) -> Result<String>;

    /// The WM_CLASS `(class, instance)` pair of the given window, `None`
    /// when unset.
    fn window_class(&self, id: Xid) -> Result<Option<(String, String)>>;

    /// WM_NORMAL_HINTS for the given window, `None` when unset.
    fn size_hints(&self, id: Xid) -> Result<Option<SizeHints>>;

    /// WM_HINTS for the given window, `None` when unset.
    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>>;

    /// The window this one is transient for, if any.
    fn transient_for(&self, id: Xid) -> Result<Option<Xid>>;

    /// Whether the window currently carries the fullscreen net wm state.
    fn is_fullscreen(&self, id: Xid) -> Result<bool>;

    /// Whether the window declares itself a dialog.
    fn is_dialog(&self, id: Xid) -> Result<bool>;

    /// The ICCCM WM_STATE of the given window, `None` when unset.
    fn wm_state(&self, id: Xid) -> Result<Option<WmState>>;

    /// Set the ICCCM WM_STATE of the given window.
    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()>;

    /// Map the given window to the screen.
    fn map(&self, id: Xid) -> Result<()>;

    /// Unmap the given window from the screen.
    fn unmap(&self, id: Xid) -> Result<()>;

    /// Apply the given configuration to a window.
    fn set_client_config(&self, id: Xid, data: &[ClientConfig]) -> Result<()>;

    /// Color the border of a window for the given focus role.
    fn set_border(&self, id: Xid, border: Border) -> Result<()>;

    /// Give the window input focus, mark it as the active window and send
    /// WM_TAKE_FOCUS if supported.
    fn take_focus(&self, id: Xid) -> Result<()>;

    /// Focus the root window and clear the active window property.
    fn clear_focus(&self) -> Result<()>;

    /// Set or clear the fullscreen net wm state property.
    fn set_fullscreen_prop(&self, id: Xid, fullscreen: bool) -> Result<()>;

    /// Set or clear the urgency flag in the window's WM_HINTS.
    fn set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()>;

    /// Send a synthetic configure notify reflecting the given geometry.
    fn send_configure_notify(&self, id: Xid, r: Rect, border: u32) -> Result<()>;

    /// Apply a configure request from an unmanaged window as-is.
    fn forward_configure_request(&self, req: &ConfigureRequest) -> Result<()>;

    /// Ask the window to close via WM_DELETE_WINDOW.
    ///
    /// Returns false when the window does not support the protocol, in which
    /// case the caller should escalate to [kill][XConn::kill].
    fn close(&self, id: Xid) -> Result<bool>;

    /// Forcefully kill the window's connection.
    fn kill(&self, id: Xid) -> Result<()>;

    /// Warp the pointer to the given coordinates within a window.
    fn warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()>;

    /// Grab the pointer for a drag. Returns false when the grab failed.
    fn grab_pointer(&self, kind: DragKind) -> Result<bool>;

    /// Release a previously grabbed pointer.
    fn ungrab_pointer(&self) -> Result<()>;

    /// Block until the next event during a pointer drag.
    fn next_drag_event(&self) -> Result<DragEvent>;
}
