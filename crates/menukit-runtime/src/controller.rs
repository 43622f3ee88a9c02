#![forbid(unsafe_code)]

//! The menu controller and its stack.
//!
//! [`MenuController`] owns every menu by [`MenuId`] and keeps a stack of
//! the menus the user has walked into. The bottom of the stack is the root
//! and is never popped. Input is routed to the menu on top.
//!
//! # Event routing
//!
//! [`MenuController::update`] handles events in delivery order:
//!
//! 1. `Resize` re-places every menu on the new surface.
//! 2. Pointer events are hit-tested against the active menu (wheel
//!    scrolling, hover and click focus, scrollbar drags, clicks outside).
//! 3. Keys the focused widget captures go straight to it. Other keys and
//!    joystick input go through [`Controls`]; unbound keys fall through to
//!    the focused widget.
//!
//! Menu actions requested along the way (key bindings, button actions,
//! callback results) are queued and applied once every event has been
//! handled, so a stack change never redirects the rest of the batch.
//!
//! # Hooks
//!
//! Opening a menu runs its `on_before_open` hook, closing one runs its
//! `on_close`, and popping back to a menu runs its `on_reset`. Actions
//! returned by hooks and by widget `on_select` callbacks join the same
//! queue. Outside `update` the queue is drained before the stack call
//! returns.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use menukit_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use menukit_core::geometry::{Point, Size};
use menukit_layout::Orientation;
use menukit_widgets::{
    MenuAction, MenuId, Renderer, Widget, WidgetId, WidgetResponse, WidgetValue,
};

use crate::MenuError;
use crate::config::ClickOutside;
use crate::controls::{ControlAction, Controls};
use crate::menu::{FocusChange, HookKind, Menu, ScrollTarget};
use crate::navigation::Direction;

/// Notification produced by the controller, drained with
/// [`MenuController::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Focus { menu: MenuId, widget: WidgetId },
    Blur { menu: MenuId, widget: WidgetId },
    ValueChanged {
        menu: MenuId,
        widget: WidgetId,
        value: WidgetValue,
    },
    Opened(MenuId),
    Popped(MenuId),
    /// `close()` at the root: the controller is now disabled.
    Closed,
    ExitRequested,
}

/// An in-progress scrollbar thumb drag.
#[derive(Debug, Clone)]
struct ThumbDrag {
    target: ScrollTarget,
    axis: Orientation,
    track_len: i32,
    grab: Point,
    start: Point,
}

/// Owns the menus and the menu stack.
#[derive(Debug)]
pub struct MenuController {
    menus: BTreeMap<MenuId, Menu>,
    stack: Vec<MenuId>,
    next_id: u32,
    controls: Controls,
    enabled: bool,
    exit_requested: bool,
    events: Vec<MenuEvent>,
    pending: VecDeque<MenuAction>,
    /// Set while a batch or the queue is being handled.
    dispatching: bool,
    surface: Option<Size>,
    pressed: Option<WidgetId>,
    drag: Option<ThumbDrag>,
}

impl MenuController {
    pub const ROOT: MenuId = MenuId(0);

    /// Create a controller with `root` at the bottom of the stack.
    pub fn new(root: Menu) -> Self {
        let mut controller = Self {
            menus: BTreeMap::from([(Self::ROOT, root)]),
            stack: vec![Self::ROOT],
            next_id: 1,
            controls: Controls::default(),
            enabled: true,
            exit_requested: false,
            events: Vec::new(),
            pending: VecDeque::new(),
            dispatching: false,
            surface: None,
            pressed: None,
            drag: None,
        };
        controller.collect_focus(Self::ROOT);
        controller.settle();
        controller
    }

    #[must_use]
    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    /// Register a menu so it can be opened. It is placed on the current
    /// surface, if one is known.
    pub fn add_menu(&mut self, mut menu: Menu) -> MenuId {
        let id = MenuId(self.next_id);
        self.next_id += 1;
        if let Some(surface) = self.surface {
            menu.set_surface(surface);
        }
        self.menus.insert(id, menu);
        self.collect_focus(id);
        self.settle();
        id
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(&id)
    }

    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.menus.get_mut(&id)
    }

    // --- Stack ---

    /// Id of the active menu.
    pub fn current(&self) -> MenuId {
        self.stack.last().copied().unwrap_or(Self::ROOT)
    }

    pub fn current_menu(&self) -> Option<&Menu> {
        self.menus.get(&self.current())
    }

    pub fn current_menu_mut(&mut self) -> Option<&mut Menu> {
        let current = self.current();
        self.menus.get_mut(&current)
    }

    /// Stack depth; 1 at the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stack(&self) -> &[MenuId] {
        &self.stack
    }

    /// Push `id` and make it active. The parent keeps its focus.
    pub fn open(&mut self, id: MenuId) -> bool {
        if self.stack.contains(&id) {
            menukit_core::warn!(menu = %id, "open: menu is already on the stack");
            return false;
        }
        let parent = self.current();
        let Some(menu) = self.menus.get_mut(&id) else {
            menukit_core::warn!(menu = %id, "open: unknown menu");
            return false;
        };
        menu.parent = Some(parent);
        if !menu.config.remember_selection && menu.config.focus_first_on_open {
            menu.focus_first();
        }
        let hooked = menu.fire_hook(HookKind::BeforeOpen, parent);
        menukit_core::info!(
            menu = %id,
            title = menu.title(),
            depth = self.stack.len() + 1,
            "menu opened"
        );
        self.stack.push(id);
        self.pressed = None;
        self.drag = None;
        self.collect_focus(id);
        self.events.push(MenuEvent::Opened(id));
        self.pending.extend(hooked);
        self.settle();
        true
    }

    /// Pop one level. At the root this does nothing.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            menukit_core::debug!("back: already at the root menu");
            return false;
        }
        self.reset(1)
    }

    /// Pop one level, or close the controller at the root. Either way the
    /// closing menu's `on_close` runs.
    pub fn close(&mut self) -> bool {
        let closing = self.current();
        if self.stack.len() > 1 {
            let hooked = self.fire_hook(closing, HookKind::Close);
            self.pop_one();
            self.pending.extend(hooked);
            self.settle();
            return true;
        }
        if !self.enabled {
            return false;
        }
        let hooked = self.fire_hook(closing, HookKind::Close);
        self.enabled = false;
        self.pressed = None;
        self.drag = None;
        menukit_core::info!("menu controller closed");
        self.events.push(MenuEvent::Closed);
        self.pending.extend(hooked);
        self.settle();
        true
    }

    /// Pop up to `levels` menus, never the root. If anything was popped
    /// the new active menu's `on_reset` runs.
    pub fn reset(&mut self, levels: usize) -> bool {
        let mut popped = false;
        for _ in 0..levels {
            if self.stack.len() <= 1 {
                break;
            }
            popped |= self.pop_one();
        }
        if popped {
            let current = self.current();
            let hooked = self.fire_hook(current, HookKind::Reset);
            self.pending.extend(hooked);
            self.settle();
        }
        popped
    }

    /// Pop back to the root.
    pub fn full_reset(&mut self) -> bool {
        self.reset(usize::MAX)
    }

    fn pop_one(&mut self) -> bool {
        let Some(id) = self.stack.pop() else {
            return false;
        };
        self.pressed = None;
        self.drag = None;
        menukit_core::info!(menu = %id, depth = self.stack.len(), "menu popped");
        self.events.push(MenuEvent::Popped(id));
        true
    }

    fn fire_hook(&mut self, menu: MenuId, kind: HookKind) -> Option<MenuAction> {
        self.menus.get_mut(&menu)?.fire_hook(kind, menu)
    }

    /// Apply queued actions. Inside a batch this waits for the batch to
    /// finish.
    fn settle(&mut self) -> bool {
        if self.dispatching {
            return false;
        }
        self.dispatching = true;
        let mut changed = false;
        while let Some(action) = self.pending.pop_front() {
            changed |= self.apply(action);
        }
        self.dispatching = false;
        changed
    }

    /// Apply a menu action now.
    pub fn apply(&mut self, action: MenuAction) -> bool {
        menukit_core::debug!(?action, "apply menu action");
        match action {
            MenuAction::Open(id) => self.open(id),
            MenuAction::Back => self.back(),
            MenuAction::Close => self.close(),
            MenuAction::Reset(levels) => self.reset(levels),
            MenuAction::FullReset => self.full_reset(),
            MenuAction::Exit => {
                if self.exit_requested {
                    return false;
                }
                self.exit_requested = true;
                menukit_core::info!("exit requested");
                self.events.push(MenuEvent::ExitRequested);
                true
            }
        }
    }

    // --- State ---

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Re-enable a controller closed at the root.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn get_focused_widget(&self) -> Option<&Widget> {
        self.current_menu()?.focused_widget()
    }

    pub fn focused_widget_id(&self) -> Option<&WidgetId> {
        self.current_menu()?.focused()
    }

    /// Values of the active menu's value-bearing widgets.
    pub fn get_input_data(&self) -> BTreeMap<WidgetId, WidgetValue> {
        self.current_menu().map(Menu::values).unwrap_or_default()
    }

    /// Values of the active menu and of every menu reachable from it
    /// through `Open` button actions.
    ///
    /// Fails if two of those menus use the same value-bearing widget id.
    pub fn get_input_data_recursive(&self) -> Result<BTreeMap<WidgetId, WidgetValue>, MenuError> {
        let mut data = BTreeMap::new();
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::from([self.current()]);
        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(menu) = self.menus.get(&id) else {
                menukit_core::debug!(menu = %id, "get_input_data: unknown submenu");
                continue;
            };
            for (widget, value) in menu.values() {
                if data.contains_key(&widget) {
                    return Err(MenuError::DuplicateInputId { widget, menu: id });
                }
                data.insert(widget, value);
            }
            queue.extend(menu.submenus());
        }
        Ok(data)
    }

    /// Restore the active menu's default values.
    pub fn reset_values(&mut self) -> bool {
        self.current_menu_mut().is_some_and(Menu::reset_values)
    }

    /// Take the notifications produced since the last call.
    pub fn drain_events(&mut self) -> Vec<MenuEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place every menu on a surface of `width` x `height`.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        let size = Size::new(width, height);
        if self.surface == Some(size) {
            return false;
        }
        self.surface = Some(size);
        for menu in self.menus.values_mut() {
            menu.set_surface(size);
        }
        menukit_core::debug!(width, height, "surface resized");
        true
    }

    /// Draw the active menu.
    pub fn draw(&mut self, out: &mut dyn Renderer) {
        if !self.enabled {
            return;
        }
        if let Some(menu) = self.current_menu_mut() {
            menu.draw(out);
        }
    }

    // --- Input ---

    /// Process one frame of input. Returns `true` if anything changed.
    pub fn update(&mut self, events: &[Event]) -> bool {
        if !self.enabled {
            return false;
        }
        let _span = menukit_core::debug_span!("menu_update", events = events.len()).entered();
        let mut changed = false;
        self.dispatching = true;
        for event in events {
            changed |= self.handle(event);
            self.collect_focus(self.current());
        }
        self.dispatching = false;
        changed | self.settle()
    }

    fn handle(&mut self, event: &Event) -> bool {
        match event {
            Event::Resize { width, height } => self.resize(*width, *height),
            Event::Quit => {
                self.pending.push_back(MenuAction::Exit);
                true
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(key) => self.handle_key(key, event),
            Event::Joystick(joystick) => match self.controls.map_joystick(joystick) {
                Some(action) => self.control(action),
                None => false,
            },
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, event: &Event) -> bool {
        if !key.is_press() {
            return false;
        }
        let captured = self
            .current_menu()
            .is_some_and(|menu| menu.focused_captures(key));
        if captured {
            return self.forward(event);
        }
        match self.controls.map_key(key) {
            Some(action) => self.control(action),
            None => self.forward(event),
        }
    }

    fn control(&mut self, action: ControlAction) -> bool {
        let direction = match action {
            ControlAction::MoveUp => Direction::Up,
            ControlAction::MoveDown => Direction::Down,
            ControlAction::MoveLeft => Direction::Left,
            ControlAction::MoveRight => Direction::Right,
            ControlAction::Next => Direction::Next,
            ControlAction::Prev => Direction::Prev,
            ControlAction::Apply => return self.forward(&Event::key(KeyCode::Enter)),
            ControlAction::Back => {
                self.pending.push_back(MenuAction::Back);
                return true;
            }
            ControlAction::Close => {
                self.pending.push_back(MenuAction::Close);
                return true;
            }
        };
        self.current_menu_mut()
            .is_some_and(|menu| menu.navigate(direction))
    }

    /// Hand `event` to the focused widget of the active menu.
    ///
    /// Activating a widget only counts as a change if it requested an
    /// action.
    fn forward(&mut self, event: &Event) -> bool {
        let menu_id = self.current();
        let Some(menu) = self.menus.get_mut(&menu_id) else {
            return false;
        };
        let Some((widget, response, actions)) = menu.update_focused(event) else {
            return false;
        };
        if response == WidgetResponse::Changed
            && let Some(value) = menu.widget(widget.as_str()).map(Widget::value)
        {
            self.events.push(MenuEvent::ValueChanged {
                menu: menu_id,
                widget,
                value,
            });
        }
        let changed = response != WidgetResponse::Returned || !actions.is_empty();
        self.pending.extend(actions);
        changed
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let menu_id = self.current();
        let Some(menu) = self.menus.get_mut(&menu_id) else {
            return false;
        };
        let point = Point::new(mouse.x, mouse.y);

        if let Some((dx, dy)) = mouse.wheel_steps() {
            let step = menu.config.wheel_step;
            return match menu.scroll_target_at(point) {
                Some(target) => menu.scroll_by(&target, dx * step, dy * step),
                None => false,
            };
        }

        match mouse.kind {
            MouseEventKind::Moved => {
                if !menu.config.mouse_motion_selection {
                    return false;
                }
                match menu.widget_at(point) {
                    Some(id) if menu.focused() != Some(&id) => menu.focus(id.as_str()),
                    _ => false,
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if !menu.menu_rect().contains(point) {
                    return match menu.config.click_outside {
                        ClickOutside::Ignore => false,
                        ClickOutside::Close => {
                            self.pending.push_back(MenuAction::Close);
                            true
                        }
                    };
                }
                if let Some((target, axis, track_len)) = menu.thumb_at(point) {
                    let start = menu.scroll_offset(&target).unwrap_or_default();
                    self.drag = Some(ThumbDrag {
                        target,
                        axis,
                        track_len,
                        grab: point,
                        start,
                    });
                    return true;
                }
                let Some(id) = menu.widget_at(point) else {
                    return false;
                };
                let changed = menu.focus(id.as_str());
                self.pressed = Some(id);
                changed
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = &self.drag else {
                    return false;
                };
                let delta = match drag.axis {
                    Orientation::Horizontal => point.x - drag.grab.x,
                    Orientation::Vertical => point.y - drag.grab.y,
                };
                menu.drag_scrollbar(&drag.target, drag.axis, drag.track_len, drag.start, delta)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let was_dragging = self.drag.take().is_some();
                let Some(pressed) = self.pressed.take() else {
                    return was_dragging;
                };
                let released_on = menu.widget_at(point);
                if released_on.as_ref() == Some(&pressed) && menu.focused() == Some(&pressed) {
                    self.forward(&Event::key(KeyCode::Enter))
                } else {
                    was_dragging
                }
            }
            _ => false,
        }
    }

    /// Turn the menu's recorded focus transitions into events and queue
    /// what its `on_select` callbacks asked for.
    fn collect_focus(&mut self, menu_id: MenuId) {
        let Some(menu) = self.menus.get_mut(&menu_id) else {
            return;
        };
        let changes = menu.take_focus_changes();
        self.pending.extend(menu.take_requested_actions());
        for change in changes {
            self.events.push(match change {
                FocusChange::Blur(widget) => MenuEvent::Blur {
                    menu: menu_id,
                    widget,
                },
                FocusChange::Focus(widget) => MenuEvent::Focus {
                    menu: menu_id,
                    widget,
                },
            });
        }
    }
}
