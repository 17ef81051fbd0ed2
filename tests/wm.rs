//! Driving a WindowManager through a mock connection and checking the
//! resulting state.
use panewm::{
    pure::{
        geometry::{Point, Rect},
        monitor::StatusView,
    },
    x::{DragEvent, MockXConn, WindowAttributes, XEvent},
    Action, Config, Error, Result, Rule, WindowManager, Xid,
};
use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
};

const SCREEN_W: u32 = 2000;
const SCREEN_H: u32 = 1000;

#[derive(Debug)]
struct TestXConn {
    screens: Rc<RefCell<Vec<Rect>>>,
    class: Option<(String, String)>,
    drag_events: Rc<RefCell<VecDeque<DragEvent>>>,
}

fn conn(screens: Rc<RefCell<Vec<Rect>>>) -> TestXConn {
    TestXConn {
        screens,
        class: None,
        drag_events: Rc::new(RefCell::new(VecDeque::new())),
    }
}

impl MockXConn for TestXConn {
    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        Ok(self.screens.borrow().clone())
    }

    fn mock_window_attributes(&self, _id: Xid) -> Result<WindowAttributes> {
        Ok(WindowAttributes {
            geometry: Rect::new(30, 40, 200, 150),
            border_width: 0,
            override_redirect: false,
            viewable: true,
        })
    }

    fn mock_window_class(&self, _id: Xid) -> Result<Option<(String, String)>> {
        Ok(self.class.clone())
    }

    fn mock_next_drag_event(&self) -> Result<DragEvent> {
        Ok(self
            .drag_events
            .borrow_mut()
            .pop_front()
            .unwrap_or(DragEvent::Release))
    }
}

fn screens(n: usize) -> Vec<Rect> {
    (0..n)
        .map(|i| Rect::new(i as u32 * SCREEN_W, 0, SCREEN_W, SCREEN_H))
        .collect()
}

fn config() -> Config {
    Config {
        n_workspaces: 4,
        n_alts: 2,
        n_panes: 3,
        ..Config::default()
    }
}

type Handles = (Rc<RefCell<Vec<Rect>>>, Rc<RefCell<VecDeque<DragEvent>>>);

fn wm_with(config: Config, n_screens: usize) -> (WindowManager<TestXConn>, Handles) {
    let screens = Rc::new(RefCell::new(screens(n_screens)));
    let conn = conn(Rc::clone(&screens));
    let drags = Rc::clone(&conn.drag_events);
    let wm = WindowManager::new(config, conn).expect("valid config and screens");

    (wm, (screens, drags))
}

fn wm() -> WindowManager<TestXConn> {
    wm_with(config(), 1).0
}

fn manage(wm: &mut WindowManager<TestXConn>, id: u32) {
    wm.handle_event(XEvent::MapRequest(id.into())).unwrap();
}

fn show_first_pane(wm: &mut WindowManager<TestXConn>) {
    wm.perform(Action::TogglePane(Some(0))).unwrap();
}

#[test]
fn startup_without_screens_is_an_error() {
    let conn = conn(Rc::new(RefCell::new(vec![])));

    let res = WindowManager::new(config(), conn);

    assert!(matches!(res, Err(Error::NoScreens)));
}

#[test]
fn invalid_ratio_is_rejected_at_startup() {
    let cfg = Config {
        default_ratio: 99,
        ..config()
    };
    let conn = conn(Rc::new(RefCell::new(screens(1))));

    assert!(matches!(
        WindowManager::new(cfg, conn),
        Err(Error::InvalidConfig { .. })
    ));
}

#[test]
fn a_new_client_in_a_hidden_pane_is_managed_but_not_visible() {
    let mut wm = wm();

    manage(&mut wm, 1);

    assert_eq!(wm.state().len(), 1);
    assert!(!wm.state().is_visible(1.into()));
    assert_eq!(wm.state().focused_client_id(), None);
}

#[test]
fn showing_a_pane_reveals_and_focuses_its_top_client() {
    let mut wm = wm();
    manage(&mut wm, 1);

    show_first_pane(&mut wm);

    assert!(wm.state().is_visible(1.into()));
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn hiding_the_selected_clients_pane_clears_focus() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);

    wm.perform(Action::TogglePane(Some(0))).unwrap();

    assert!(!wm.state().is_visible(1.into()));
    assert_eq!(wm.state().focused_client_id(), None);
}

#[test]
fn a_single_tiled_client_fills_the_work_area() {
    let mut wm = wm();
    show_first_pane(&mut wm);

    manage(&mut wm, 1);

    // work area is the screen minus the 20px top bar, less the 1px border
    let c = wm.state().client(1.into()).unwrap();
    assert_eq!(c.geometry(), Rect::new(0, 20, SCREEN_W - 2, SCREEN_H - 22));
}

#[test]
fn two_showing_panes_split_the_work_area_at_the_ratio() {
    let mut wm = wm();
    wm.perform(Action::TogglePane(Some(0))).unwrap();
    wm.perform(Action::TogglePane(Some(1))).unwrap();
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    wm.perform(Action::MoveToPaneIndex(1)).unwrap();

    let c1 = wm.state().client(1.into()).unwrap();
    let c2 = wm.state().client(2.into()).unwrap();
    assert_eq!(c1.geometry(), Rect::new(0, 20, 1398, 978));
    assert_eq!(c2.geometry(), Rect::new(1400, 20, 598, 978));
}

#[test]
fn moving_to_a_hidden_pane_hides_the_client_and_refocuses() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    // pane 1 is hidden: 2 disappears with it and focus falls back to 1
    wm.perform(Action::MoveToPaneIndex(1)).unwrap();

    assert_eq!(wm.state().client(2.into()).unwrap().pane(), 1);
    assert!(!wm.state().is_visible(2.into()));
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn relative_pane_move_selects_the_target_pane() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);

    wm.perform(Action::MoveToPane { forward: false }).unwrap();

    // wraps from pane 0 to the last pane and selects it
    assert_eq!(wm.state().client(1.into()).unwrap().pane(), 2);
    assert_eq!(wm.state().monitors()[0].active_workspace().selected_pane(), 2);
}

#[test]
fn switching_workspaces_hides_clients_and_toggling_back_restores_them() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);

    wm.perform(Action::SwitchWorkspace { ws: 1, alt: 0 }).unwrap();
    assert!(!wm.state().is_visible(1.into()));
    assert_eq!(wm.state().focused_client_id(), None);

    wm.perform(Action::ToggleWorkspace).unwrap();
    assert!(wm.state().is_visible(1.into()));
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn each_alt_of_a_workspace_has_its_own_pane_setup() {
    let mut wm = wm();
    show_first_pane(&mut wm);

    wm.perform(Action::SwitchWorkspace { ws: 0, alt: 1 }).unwrap();

    // the alt starts from pristine pane state
    assert!(!wm.state().monitors()[0].active_workspace().is_showing(0));

    wm.perform(Action::ToggleWorkspace).unwrap();
    assert!(wm.state().monitors()[0].active_workspace().is_showing(0));
}

#[test]
fn moving_a_client_to_another_workspace_refocuses() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    wm.perform(Action::MoveToWorkspace(2)).unwrap();

    assert_eq!(wm.state().client(2.into()).unwrap().workspace(), 2);
    assert!(!wm.state().is_visible(2.into()));
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn out_of_range_action_arguments_are_no_ops() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);

    wm.perform(Action::MoveToWorkspace(99)).unwrap();
    wm.perform(Action::MoveToPaneIndex(99)).unwrap();
    wm.perform(Action::SwitchWorkspace { ws: 99, alt: 0 }).unwrap();
    wm.perform(Action::TogglePane(Some(99))).unwrap();

    let c = wm.state().client(1.into()).unwrap();
    assert_eq!((c.workspace(), c.pane()), (0, 0));
    assert_eq!(wm.state().monitors()[0].active_pair(), (0, 0));
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn cycle_focus_walks_the_clients_of_a_pane() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    for id in [1, 2, 3] {
        manage(&mut wm, id);
    }

    // attachment order is newest first: 3 -> 2 -> 1 -> wraps to 3
    assert_eq!(wm.state().focused_client_id(), Some(3.into()));

    wm.perform(Action::CycleFocus { forward: true }).unwrap();
    assert_eq!(wm.state().focused_client_id(), Some(2.into()));

    wm.perform(Action::CycleFocus { forward: true }).unwrap();
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));

    wm.perform(Action::CycleFocus { forward: true }).unwrap();
    assert_eq!(wm.state().focused_client_id(), Some(3.into()));
}

#[test]
fn cycle_focus_follows_the_focused_clients_pane_not_the_selection() {
    let mut wm = wm();
    wm.perform(Action::TogglePane(Some(0))).unwrap();
    wm.perform(Action::TogglePane(Some(1))).unwrap();
    for id in [1, 2, 3] {
        manage(&mut wm, id);
    }

    // 3 becomes the sole occupant of pane 1; the selection stays on pane 0
    wm.perform(Action::MoveToPaneIndex(1)).unwrap();
    assert_eq!(wm.state().monitors()[0].active_workspace().selected_pane(), 0);

    wm.perform(Action::CycleFocus { forward: true }).unwrap();
    assert_eq!(wm.state().focused_client_id(), Some(3.into()));

    // from a pane 0 client the cycle walks pane 0 as before
    wm.handle_event(XEvent::Enter(2.into())).unwrap();
    wm.perform(Action::CycleFocus { forward: true }).unwrap();
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn zooming_the_stack_head_promotes_the_next_client() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    for id in [1, 2, 3] {
        manage(&mut wm, id);
    }

    // 3 is already at the head so its successor is promoted instead
    wm.perform(Action::Zoom).unwrap();

    let ids: Vec<Xid> = wm.state().monitors()[0].client_ids().to_vec();
    assert_eq!(ids, vec![2.into(), 3.into(), 1.into()]);
    assert_eq!(wm.state().focused_client_id(), Some(2.into()));
}

#[test]
fn swap_stack_exchanges_positions_with_the_tiled_neighbour() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    for id in [1, 2, 3] {
        manage(&mut wm, id);
    }

    wm.perform(Action::SwapStack { forward: true }).unwrap();

    let ids: Vec<Xid> = wm.state().monitors()[0].client_ids().to_vec();
    assert_eq!(ids, vec![2.into(), 3.into(), 1.into()]);
    // focus stays with the moved client
    assert_eq!(wm.state().focused_client_id(), Some(3.into()));
}

#[test]
fn ratio_adjustments_outside_the_valid_range_are_ignored() {
    let mut wm = wm();

    wm.perform(Action::AdjustRatio(20)).unwrap();
    assert_eq!(wm.state().monitors()[0].active_workspace().ratio(), 90);

    wm.perform(Action::AdjustRatio(10)).unwrap();
    assert_eq!(wm.state().monitors()[0].active_workspace().ratio(), 90);

    wm.perform(Action::AdjustRatio(-85)).unwrap();
    assert_eq!(wm.state().monitors()[0].active_workspace().ratio(), 5);
}

#[test]
fn the_display_cap_limits_distinct_tiling_slots() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    for id in [1, 2, 3] {
        manage(&mut wm, id);
    }

    wm.perform(Action::AdjustCap(2)).unwrap();

    // two slots: the two overflow clients share the bottom one
    let r2 = wm.state().client(2.into()).unwrap().geometry();
    let r1 = wm.state().client(1.into()).unwrap().geometry();
    assert_eq!(r2, r1);
    assert_ne!(wm.state().client(3.into()).unwrap().geometry(), r1);
}

#[test]
fn clear_panes_resets_the_workspace_and_drops_focus() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    wm.perform(Action::AdjustRatio(-10)).unwrap();

    wm.perform(Action::ClearPanes).unwrap();

    let ws = wm.state().monitors()[0].active_workspace();
    assert!(!ws.is_showing(0));
    assert_eq!(ws.ratio(), 70);
    assert_eq!(wm.state().focused_client_id(), None);
    assert!(!wm.state().is_visible(1.into()));
}

#[test]
fn focus_pane_showing_skips_hidden_panes() {
    let mut wm = wm();
    wm.perform(Action::TogglePane(Some(0))).unwrap();
    wm.perform(Action::TogglePane(Some(2))).unwrap();

    wm.perform(Action::FocusPaneShowing { forward: true }).unwrap();

    // pane 1 is hidden so the selection lands on 2
    assert_eq!(wm.state().monitors()[0].active_workspace().selected_pane(), 2);
}

#[test]
fn fullscreen_covers_the_screen_and_restores_on_toggle() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    let tiled = wm.state().client(1.into()).unwrap().geometry();

    wm.perform(Action::ToggleFullscreen).unwrap();
    let c = wm.state().client(1.into()).unwrap();
    assert!(c.is_fullscreen());
    assert!(c.is_floating());
    assert_eq!(c.geometry(), Rect::new(0, 0, SCREEN_W, SCREEN_H));

    wm.perform(Action::ToggleFullscreen).unwrap();
    let c = wm.state().client(1.into()).unwrap();
    assert!(!c.is_fullscreen());
    assert!(!c.is_floating());
    assert_eq!(c.geometry(), tiled);
}

#[test]
fn focus_cycling_is_blocked_while_fullscreen_is_locked() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    wm.perform(Action::ToggleFullscreen).unwrap();
    wm.perform(Action::CycleFocus { forward: true }).unwrap();

    assert_eq!(wm.state().focused_client_id(), Some(2.into()));
}

#[test]
fn the_maximize_cycle_restores_the_original_geometry() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    wm.perform(Action::ToggleFloating).unwrap();
    let orig = wm.state().client(1.into()).unwrap().geometry();

    wm.perform(Action::Maximize).unwrap();
    let work_sized = wm.state().client(1.into()).unwrap().geometry();
    assert_eq!(work_sized.h, SCREEN_H - 22);

    wm.perform(Action::Maximize).unwrap();
    assert_eq!(wm.state().client(1.into()).unwrap().geometry().h, SCREEN_H - 2);

    wm.perform(Action::Maximize).unwrap();
    assert_eq!(wm.state().client(1.into()).unwrap().geometry(), orig);
}

#[test]
fn maximize_leaves_tiled_clients_alone() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);
    let slot = wm.state().client(2.into()).unwrap().geometry();

    wm.perform(Action::Maximize).unwrap();

    let c = wm.state().client(2.into()).unwrap();
    assert!(!c.is_floating());
    assert_eq!(c.geometry(), slot);
}

#[test]
fn center_window_places_a_floating_client_mid_work_area() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    wm.perform(Action::ToggleFloating).unwrap();

    // shrink it first so there is room to center within
    let small = Rect::new(0, 20, 400, 300);
    wm.handle_event(XEvent::ConfigureRequest(panewm::x::ConfigureRequest {
        id: 1.into(),
        x: Some(0),
        y: Some(20),
        w: Some(400),
        h: Some(300),
        border_width: None,
    }))
    .unwrap();
    assert_eq!(wm.state().client(1.into()).unwrap().geometry(), small);

    wm.perform(Action::CenterWindow).unwrap();

    let r = wm.state().client(1.into()).unwrap().geometry();
    assert_eq!(r, Rect::new(800, 360, 400, 300));
}

#[test]
fn center_window_shrinks_oversized_windows_to_the_work_area() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    wm.perform(Action::ToggleFloating).unwrap();
    wm.handle_event(XEvent::ConfigureRequest(panewm::x::ConfigureRequest {
        id: 1.into(),
        x: Some(0),
        y: Some(20),
        w: Some(2500),
        h: Some(1500),
        border_width: None,
    }))
    .unwrap();

    wm.perform(Action::CenterWindow).unwrap();

    // clamped to the work area minus borders and centered within it
    let r = wm.state().client(1.into()).unwrap().geometry();
    assert_eq!(r, Rect::new(1, 21, 1998, 978));
}

#[test]
fn toggling_the_bar_reclaims_its_strip_for_tiling() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);

    wm.perform(Action::ToggleBar).unwrap();

    let c = wm.state().client(1.into()).unwrap();
    assert_eq!(c.geometry(), Rect::new(0, 0, SCREEN_W - 2, SCREEN_H - 2));
    assert!(!wm.state().monitors()[0].bar_visible());
}

#[test]
fn activation_requests_mark_unfocused_clients_urgent() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    wm.handle_event(XEvent::ActivationRequest(1.into())).unwrap();

    assert!(wm.state().client(1.into()).unwrap().is_urgent());
    assert_eq!(wm.state().monitors()[0].status_view(), StatusView::WsOverview);
    // the focused client never becomes urgent this way
    wm.handle_event(XEvent::ActivationRequest(2.into())).unwrap();
    assert!(!wm.state().client(2.into()).unwrap().is_urgent());
}

#[test]
fn entering_a_window_moves_focus_to_it() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    wm.handle_event(XEvent::Enter(1.into())).unwrap();

    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn destroy_notifications_unmanage_and_refocus() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);

    wm.handle_event(XEvent::Destroy(2.into())).unwrap();

    assert_eq!(wm.state().len(), 1);
    assert_eq!(wm.state().focused_client_id(), Some(1.into()));
}

#[test]
fn self_induced_unmaps_do_not_withdraw_the_client() {
    let mut wm = wm();
    show_first_pane(&mut wm);
    manage(&mut wm, 1);

    // hiding on workspace switch unmaps the window ourselves
    wm.perform(Action::SwitchWorkspace { ws: 1, alt: 0 }).unwrap();
    wm.handle_event(XEvent::Unmap {
        id: 1.into(),
        synthetic: false,
    })
    .unwrap();
    assert_eq!(wm.state().len(), 1);

    // a second unmap really is the client going away
    wm.handle_event(XEvent::Unmap {
        id: 1.into(),
        synthetic: false,
    })
    .unwrap();
    assert_eq!(wm.state().len(), 0);
}

#[test]
fn rules_are_applied_with_the_last_match_winning() {
    let cfg = Config {
        rules: vec![
            Rule {
                class: Some("term".into()),
                floating: true,
                workspace: Some(1),
                ..Default::default()
            },
            Rule {
                class: Some("term".into()),
                workspace: Some(2),
                ..Default::default()
            },
        ],
        ..config()
    };
    let conn = TestXConn {
        class: Some(("xterm".into(), "xterm".into())),
        ..conn(Rc::new(RefCell::new(screens(1))))
    };
    let mut wm = WindowManager::new(cfg, conn).unwrap();

    manage(&mut wm, 1);

    let c = wm.state().client(1.into()).unwrap();
    assert_eq!(c.workspace(), 2);
    assert!(!c.is_floating());
}

#[test]
fn removed_monitors_hand_their_clients_to_the_head_monitor() {
    let cfg = Config {
        rules: vec![Rule {
            monitor: Some(1),
            ..Default::default()
        }],
        ..config()
    };
    let (mut wm, (screens, _)) = wm_with(cfg, 2);
    manage(&mut wm, 1);
    assert!(wm.state().monitors()[1].client_ids().contains(&1.into()));

    screens.borrow_mut().truncate(1);
    wm.handle_event(XEvent::ScreenChange).unwrap();

    assert_eq!(wm.state().monitors().len(), 1);
    assert!(wm.state().monitors()[0].client_ids().contains(&1.into()));
    assert_eq!(wm.state().len(), 1);
}

#[test]
fn dragging_a_tiled_window_past_the_snap_threshold_pulls_it_out() {
    let (mut wm, (_, drags)) = wm_with(config(), 1);
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    let tiled = wm.state().client(1.into()).unwrap().geometry();

    drags.borrow_mut().extend([
        DragEvent::Motion {
            p: Point::new(300, 320),
            time_ms: 100,
        },
        DragEvent::Release,
    ]);
    wm.perform(Action::DragMove).unwrap();

    let c = wm.state().client(1.into()).unwrap();
    assert!(c.is_floating());
    assert_eq!(
        c.geometry(),
        Rect::new(tiled.x + 300, tiled.y + 320, tiled.w, tiled.h)
    );
}

#[test]
fn resizing_pulls_out_tiled_windows_away_from_the_work_origin() {
    let (mut wm, (_, drags)) = wm_with(config(), 1);
    show_first_pane(&mut wm);
    manage(&mut wm, 1);
    manage(&mut wm, 2);
    wm.handle_event(XEvent::Enter(1.into())).unwrap();
    // 1 sits in the lower slot, away from the work area origin
    assert_eq!(wm.state().client(1.into()).unwrap().geometry().y, 510);

    drags.borrow_mut().extend([
        DragEvent::Motion {
            p: Point::new(600, 1111),
            time_ms: 100,
        },
        DragEvent::Release,
    ]);
    wm.perform(Action::DragResize).unwrap();

    let c = wm.state().client(1.into()).unwrap();
    assert!(c.is_floating());
    assert_eq!(c.geometry(), Rect::new(0, 510, 599, 600));
}

#[test]
fn quit_stops_the_event_loop() {
    let mut wm = wm();
    assert!(wm.running());

    wm.perform(Action::Quit).unwrap();

    assert!(!wm.running());
}
