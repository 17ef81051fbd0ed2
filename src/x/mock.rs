//! A mock implementation of XConn that is easier to implement for use in
//! tests.
use crate::{
    pure::{
        client::SizeHints,
        geometry::{Point, Rect},
    },
    x::{
        Border, ClientConfig, ConfigureRequest, DragEvent, DragKind, WindowAttributes, WmHints,
        WmState, XConn, XEvent,
    },
    Result, Xid,
};

/// All methods on this trait are unimplemented by default unless an
/// implementation is provided, with the exception of a handful of harmless
/// defaults: `mock_root` returns id 0, `mock_flush` is a no-op and the
/// fire-and-forget commands succeed silently.
///
/// Any implementation of `MockXConn` will automatically implement `XConn` by
/// forwarding calls to `$method` on to `mock_$method`.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        unimplemented!("mock_screen_details")
    }

    fn mock_cursor_position(&self) -> Result<Point> {
        Ok(Point::new(0, 0))
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        unimplemented!("mock_next_event")
    }

    fn mock_flush(&self) {}

    fn mock_existing_clients(&self) -> Result<Vec<Xid>> {
        Ok(vec![])
    }

    fn mock_window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        unimplemented!("mock_window_attributes")
    }

    fn mock_window_title(&self, id: Xid) -> Result<String> {
        Ok(String::new())
    }

    fn mock_window_class(&self, id: Xid) -> Result<Option<(String, String)>> {
        Ok(None)
    }

    fn mock_size_hints(&self, id: Xid) -> Result<Option<SizeHints>> {
        Ok(None)
    }

    fn mock_wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        Ok(None)
    }

    fn mock_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        Ok(None)
    }

    fn mock_is_fullscreen(&self, id: Xid) -> Result<bool> {
        Ok(false)
    }

    fn mock_is_dialog(&self, id: Xid) -> Result<bool> {
        Ok(false)
    }

    fn mock_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        Ok(None)
    }

    fn mock_set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        Ok(())
    }

    fn mock_map(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_unmap(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_set_client_config(&self, id: Xid, data: &[ClientConfig]) -> Result<()> {
        Ok(())
    }

    fn mock_set_border(&self, id: Xid, border: Border) -> Result<()> {
        Ok(())
    }

    fn mock_take_focus(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_clear_focus(&self) -> Result<()> {
        Ok(())
    }

    fn mock_set_fullscreen_prop(&self, id: Xid, fullscreen: bool) -> Result<()> {
        Ok(())
    }

    fn mock_set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()> {
        Ok(())
    }

    fn mock_send_configure_notify(&self, id: Xid, r: Rect, border: u32) -> Result<()> {
        Ok(())
    }

    fn mock_forward_configure_request(&self, req: &ConfigureRequest) -> Result<()> {
        Ok(())
    }

    fn mock_close(&self, id: Xid) -> Result<bool> {
        Ok(true)
    }

    fn mock_kill(&self, id: Xid) -> Result<()> {
        Ok(())
    }

    fn mock_warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()> {
        Ok(())
    }

    fn mock_grab_pointer(&self, kind: DragKind) -> Result<bool> {
        Ok(true)
    }

    fn mock_ungrab_pointer(&self) -> Result<()> {
        Ok(())
    }

    fn mock_next_drag_event(&self) -> Result<DragEvent> {
        unimplemented!("mock_next_drag_event")
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        self.mock_screen_details()
    }

    fn cursor_position(&self) -> Result<Point> {
        self.mock_cursor_position()
    }

    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        self.mock_existing_clients()
    }

    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        self.mock_window_attributes(id)
    }

    fn window_title(&self, id: Xid) -> Result<String> {
        self.mock_window_title(id)
    }

    fn window_class(&self, id: Xid) -> Result<Option<(String, String)>> {
        self.mock_window_class(id)
    }

    fn size_hints(&self, id: Xid) -> Result<Option<SizeHints>> {
        self.mock_size_hints(id)
    }

    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        self.mock_wm_hints(id)
    }

    fn transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        self.mock_transient_for(id)
    }

    fn is_fullscreen(&self, id: Xid) -> Result<bool> {
        self.mock_is_fullscreen(id)
    }

    fn is_dialog(&self, id: Xid) -> Result<bool> {
        self.mock_is_dialog(id)
    }

    fn wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        self.mock_wm_state(id)
    }

    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        self.mock_set_wm_state(id, state)
    }

    fn map(&self, id: Xid) -> Result<()> {
        self.mock_map(id)
    }

    fn unmap(&self, id: Xid) -> Result<()> {
        self.mock_unmap(id)
    }

    fn set_client_config(&self, id: Xid, data: &[ClientConfig]) -> Result<()> {
        self.mock_set_client_config(id, data)
    }

    fn set_border(&self, id: Xid, border: Border) -> Result<()> {
        self.mock_set_border(id, border)
    }

    fn take_focus(&self, id: Xid) -> Result<()> {
        self.mock_take_focus(id)
    }

    fn clear_focus(&self) -> Result<()> {
        self.mock_clear_focus()
    }

    fn set_fullscreen_prop(&self, id: Xid, fullscreen: bool) -> Result<()> {
        self.mock_set_fullscreen_prop(id, fullscreen)
    }

    fn set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()> {
        self.mock_set_urgency_hint(id, urgent)
    }

    fn send_configure_notify(&self, id: Xid, r: Rect, border: u32) -> Result<()> {
        self.mock_send_configure_notify(id, r, border)
    }

    fn forward_configure_request(&self, req: &ConfigureRequest) -> Result<()> {
        self.mock_forward_configure_request(req)
    }

    fn close(&self, id: Xid) -> Result<bool> {
        self.mock_close(id)
    }

    fn kill(&self, id: Xid) -> Result<()> {
        self.mock_kill(id)
    }

    fn warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()> {
        self.mock_warp_pointer(id, x, y)
    }

    fn grab_pointer(&self, kind: DragKind) -> Result<bool> {
        self.mock_grab_pointer(kind)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.mock_ungrab_pointer()
    }

    fn next_drag_event(&self) -> Result<DragEvent> {
        self.mock_next_drag_event()
    }
}
