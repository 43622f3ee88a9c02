#![forbid(unsafe_code)]

//! A menu: the widget arena, its layout and its focus.
//!
//! Widgets live in a `BTreeMap` keyed by [`WidgetId`]. Frames hold their
//! children as ids and every node knows its parent frame, so there are no
//! reference cycles. `order` is the focus order of every widget in the
//! menu; a frame is always followed by its descendants.
//!
//! # Geometry
//!
//! A layout pass has two halves:
//!
//! 1. **measure** (bottom-up): every visible widget reports its outer size
//!    (natural size plus selection margin). Frames pack their children and
//!    size their scroll areas. The visible top-level widgets are then
//!    placed by the grid.
//! 2. **position** (top-down): rectangles are resolved to surface space by
//!    adding container origins and subtracting scroll offsets.
//!
//! Structural changes rerun both halves. Scrolling and resizing only rerun
//! the second.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use menukit_core::event::{Event, KeyEvent};
use menukit_core::geometry::{Point, Rect, Sides, Size};
use menukit_layout::grid::{GridCell, GridLayout, GridSpec};
use menukit_layout::{Alignment, Orientation, PackChild, ScrollArea};
use menukit_widgets::{
    DrawCommand, MenuAction, MenuId, Renderer, Theme, Widget, WidgetId, WidgetKind,
    WidgetResponse, WidgetValue,
};

use crate::MenuError;
use crate::config::{MenuConfig, MenuPosition};

/// Focus transition recorded by a menu, drained by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusChange {
    Blur(WidgetId),
    Focus(WidgetId),
}

/// Stack hook. Receives a menu id; a returned action is queued on the
/// controller.
pub type MenuHook = Box<dyn FnMut(MenuId) -> Option<MenuAction>>;

/// Which stack hook to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookKind {
    BeforeOpen,
    Close,
    Reset,
}

#[derive(Default)]
pub(crate) struct MenuHooks {
    before_open: Option<MenuHook>,
    close: Option<MenuHook>,
    reset: Option<MenuHook>,
}

impl MenuHooks {
    fn slot(&mut self, kind: HookKind) -> &mut Option<MenuHook> {
        match kind {
            HookKind::BeforeOpen => &mut self.before_open,
            HookKind::Close => &mut self.close,
            HookKind::Reset => &mut self.reset,
        }
    }
}

impl fmt::Debug for MenuHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuHooks")
            .field("before_open", &self.before_open.is_some())
            .field("close", &self.close.is_some())
            .field("reset", &self.reset.is_some())
            .finish()
    }
}

/// A scrollable region of a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    /// The menu viewport itself.
    Menu,
    /// A frame whose content exceeds its maximum size.
    Frame(WidgetId),
}

/// Arena entry.
#[derive(Debug)]
pub(crate) struct WidgetNode {
    pub(crate) widget: Widget,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) pack_margin: Sides,
    pub(crate) pack_align: Alignment,
    /// Frames only: packed content against the clamped frame size.
    pub(crate) scroll: ScrollArea,
    /// Measured size, selection margin included.
    pub(crate) outer: Size,
    /// Outer rectangle relative to the container's content origin.
    pub(crate) relative: Rect,
    /// Surface rectangle, selection margin excluded.
    pub(crate) rect: Rect,
    /// Clip inherited from the container.
    pub(crate) clip: Rect,
    /// Frames only: surface rectangle of the scrolled viewport.
    pub(crate) viewport: Rect,
    /// Top-level widgets only: grid cell.
    pub(crate) cell: Option<(usize, usize)>,
}

impl WidgetNode {
    fn new(widget: Widget) -> Self {
        Self {
            widget,
            parent: None,
            children: Vec::new(),
            pack_margin: Sides::ZERO,
            pack_align: Alignment::Start,
            scroll: ScrollArea::default(),
            outer: Size::ZERO,
            relative: Rect::default(),
            rect: Rect::default(),
            clip: Rect::default(),
            viewport: Rect::default(),
            cell: None,
        }
    }

    fn clear_geometry(&mut self) {
        self.relative = Rect::default();
        self.rect = Rect::default();
        self.clip = Rect::default();
        self.viewport = Rect::default();
        self.cell = None;
    }
}

/// A navigation unit: widgets, their layout and the focused widget.
#[derive(Debug)]
pub struct Menu {
    title: String,
    pub(crate) config: MenuConfig,
    pub(crate) nodes: BTreeMap<WidgetId, WidgetNode>,
    pub(crate) order: Vec<WidgetId>,
    pub(crate) focused: Option<WidgetId>,
    pub(crate) parent: Option<MenuId>,
    pub(crate) grid: GridLayout,
    surface: Option<Size>,
    rect: Rect,
    scroll: ScrollArea,
    layout_dirty: bool,
    next_auto_id: u32,
    /// Row remembered across consecutive horizontal moves.
    pub(crate) row_hint: Option<usize>,
    notes: Vec<FocusChange>,
    /// Actions returned by focus callbacks, drained by the controller.
    requested: Vec<MenuAction>,
    hooks: MenuHooks,
}

impl Menu {
    /// Create an empty menu. Fails if `config` is invalid.
    pub fn new(title: impl Into<String>, config: MenuConfig) -> Result<Self, MenuError> {
        config.validate()?;
        let mut menu = Self {
            title: title.into(),
            config,
            nodes: BTreeMap::new(),
            order: Vec::new(),
            focused: None,
            parent: None,
            grid: GridLayout::default(),
            surface: None,
            rect: Rect::default(),
            scroll: ScrollArea::default(),
            layout_dirty: false,
            next_auto_id: 0,
            row_hint: None,
            notes: Vec::new(),
            requested: Vec::new(),
            hooks: MenuHooks::default(),
        };
        menu.relayout();
        Ok(menu)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Menu this one was opened from, if it is on a stack.
    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    // --- Stack hooks ---

    /// Run `hook` when this menu is opened. It receives the menu it was
    /// opened from.
    pub fn set_on_before_open(
        &mut self,
        hook: impl FnMut(MenuId) -> Option<MenuAction> + 'static,
    ) {
        self.hooks.before_open = Some(Box::new(hook));
    }

    /// Run `hook` when this menu is closed. It receives this menu's id.
    pub fn set_on_close(&mut self, hook: impl FnMut(MenuId) -> Option<MenuAction> + 'static) {
        self.hooks.close = Some(Box::new(hook));
    }

    /// Run `hook` when a reset or back pops the stack down to this menu.
    /// It receives this menu's id.
    pub fn set_on_reset(&mut self, hook: impl FnMut(MenuId) -> Option<MenuAction> + 'static) {
        self.hooks.reset = Some(Box::new(hook));
    }

    pub(crate) fn fire_hook(&mut self, kind: HookKind, menu: MenuId) -> Option<MenuAction> {
        let hook = self.hooks.slot(kind).as_mut()?;
        menukit_core::trace!(?kind, menu = %self.title, "menu hook");
        hook(menu)
    }

    /// Menus opened by this menu's buttons, in focus order.
    pub fn submenus(&self) -> Vec<MenuId> {
        let mut out = Vec::new();
        for id in &self.order {
            if let WidgetKind::Button {
                action: Some(MenuAction::Open(menu)),
            } = self.nodes[id].widget.kind()
                && !out.contains(menu)
            {
                out.push(*menu);
            }
        }
        out
    }

    // --- Structure ---

    /// Add a widget under a generated id (`widget-N`).
    pub fn add(&mut self, widget: Widget) -> Result<WidgetId, MenuError> {
        let id = loop {
            let candidate = WidgetId::new(format!("widget-{}", self.next_auto_id));
            self.next_auto_id += 1;
            if !self.nodes.contains_key(&candidate) {
                break candidate;
            }
        };
        self.add_with_id(id, widget)
    }

    /// Add a top-level widget at the end of the focus order.
    pub fn add_with_id(
        &mut self,
        id: impl Into<WidgetId>,
        widget: Widget,
    ) -> Result<WidgetId, MenuError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(MenuError::DuplicateWidget(id));
        }
        if let Some(spec) = widget.pack_spec() {
            spec.validate()?;
        }
        if widget.is_visible() {
            let index = self.top_level_cells().len();
            self.config.grid.check_capacity(index + 1)?;
            let theme = &self.config.theme;
            let width = widget
                .measure(theme)
                .expand(widget.selection_margin(theme))
                .width;
            self.config.grid.check_cell_width(index, width)?;
        }

        menukit_core::debug!(widget = %id, menu = %self.title, "widget added");
        self.nodes.insert(id.clone(), WidgetNode::new(widget));
        self.order.push(id.clone());
        self.relayout();
        if self.focused.is_none()
            && self.config.focus_first_on_open
            && self.is_focusable(id.as_str())
        {
            self.set_focus(&id, false);
        }
        Ok(id)
    }

    /// Remove a widget and, for a frame, everything packed in it.
    ///
    /// Focus inside the removed subtree moves to the next focusable widget
    /// after its former position.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(node) = self.nodes.get(id) else {
            menukit_core::warn!(widget = id, "remove: unknown widget");
            return false;
        };
        let parent = node.parent.clone();
        let subtree = self.subtree(id);
        let former = self.order_index(id).unwrap_or(0);
        let lost_focus = self
            .focused
            .as_ref()
            .is_some_and(|focused| subtree.contains(focused));

        if lost_focus {
            if let Some(old) = self.focused.take() {
                self.note(FocusChange::Blur(old));
            }
            self.row_hint = None;
        }
        if let Some(parent) = parent
            && let Some(frame) = self.nodes.get_mut(&parent)
        {
            frame.children.retain(|child| child.as_str() != id);
        }
        self.order.retain(|member| !subtree.contains(member));
        for member in &subtree {
            self.nodes.remove(member);
        }
        menukit_core::debug!(widget = id, removed = subtree.len(), "widget removed");
        self.relayout();
        if lost_focus {
            self.focus_from(former);
        }
        true
    }

    /// Remove every widget.
    pub fn clear(&mut self) {
        if let Some(old) = self.focused.take() {
            self.note(FocusChange::Blur(old));
        }
        self.nodes.clear();
        self.order.clear();
        self.row_hint = None;
        self.relayout();
    }

    /// Pack `widget` at the end of `frame`. Returns the frame id for chaining.
    pub fn pack(
        &mut self,
        frame: &str,
        widget: &str,
        align: Alignment,
        margin: impl Into<Sides>,
    ) -> Result<WidgetId, MenuError> {
        let frame_id = self.known(frame)?;
        let widget_id = self.known(widget)?;
        if !self.nodes[&frame_id].widget.is_frame() {
            return Err(MenuError::NotAFrame(frame_id));
        }
        if frame_id == widget_id {
            return Err(MenuError::PackIntoSelf(frame_id));
        }
        if let Some(current) = &self.nodes[&widget_id].parent {
            return Err(MenuError::AlreadyPacked {
                widget: widget_id,
                frame: current.clone(),
            });
        }
        if self.ancestors(frame_id.as_str()).contains(&widget_id) {
            return Err(MenuError::PackAncestor {
                frame: frame_id,
                widget: widget_id,
            });
        }

        let block = self.take_block(widget_id.as_str());
        let insert_at = self
            .subtree(frame_id.as_str())
            .iter()
            .filter_map(|member| self.order_index(member.as_str()))
            .max()
            .map_or(self.order.len(), |last| last + 1);
        self.order.splice(insert_at..insert_at, block);

        if let Some(node) = self.nodes.get_mut(&widget_id) {
            node.parent = Some(frame_id.clone());
            node.pack_align = align;
            node.pack_margin = margin.into();
        }
        if let Some(node) = self.nodes.get_mut(&frame_id) {
            node.children.push(widget_id.clone());
        }
        menukit_core::debug!(widget = %widget_id, frame = %frame_id, "widget packed");
        self.relayout();
        self.repair_focus();
        self.reveal_focused();
        Ok(frame_id)
    }

    /// Take `widget` out of its frame. It becomes top-level again, at the
    /// end of the focus order.
    pub fn unpack(&mut self, widget: &str) -> Result<(), MenuError> {
        let widget_id = self.known(widget)?;
        let Some(frame_id) = self.nodes[&widget_id].parent.clone() else {
            return Err(MenuError::NotPacked(widget_id));
        };
        if self.nodes[&widget_id].widget.is_visible() {
            self.config
                .grid
                .check_capacity(self.top_level_cells().len() + 1)?;
        }

        if let Some(frame) = self.nodes.get_mut(&frame_id) {
            frame.children.retain(|child| *child != widget_id);
        }
        if let Some(node) = self.nodes.get_mut(&widget_id) {
            node.parent = None;
            node.pack_margin = Sides::ZERO;
            node.pack_align = Alignment::Start;
        }
        let block = self.take_block(widget_id.as_str());
        self.order.extend(block);
        menukit_core::debug!(widget = %widget_id, frame = %frame_id, "widget unpacked");
        self.relayout();
        self.repair_focus();
        self.reveal_focused();
        Ok(())
    }

    /// Replace the grid. Fails without changing anything if the current
    /// widgets do not fit.
    pub fn set_grid(&mut self, grid: GridSpec) -> Result<(), MenuError> {
        grid.validate()?;
        let cells = self.top_level_cells();
        grid.check_capacity(cells.len())?;
        for (index, id) in cells.iter().enumerate() {
            grid.check_cell_width(index, self.nodes[id].outer.width)?;
        }
        self.config.grid = grid;
        self.row_hint = None;
        self.relayout();
        self.reveal_focused();
        Ok(())
    }

    /// Move top-level widget `id`, with everything packed in it, before
    /// the `index`-th other top-level widget. An index past the last one
    /// moves it to the end. Fails without changing anything if the new
    /// order does not fit the grid.
    pub fn move_widget(&mut self, id: &str, index: usize) -> Result<(), MenuError> {
        let widget_id = self.known(id)?;
        if let Some(frame) = self.nodes[&widget_id].parent.clone() {
            return Err(MenuError::AlreadyPacked {
                widget: widget_id,
                frame,
            });
        }
        let before = self.order.clone();
        let block = self.take_block(widget_id.as_str());
        let anchor = self
            .order
            .iter()
            .filter(|member| self.nodes[*member].parent.is_none())
            .nth(index)
            .cloned();
        let at = anchor
            .and_then(|anchor| self.order_index(anchor.as_str()))
            .unwrap_or(self.order.len());
        self.order.splice(at..at, block);

        let cells = self.top_level_cells();
        if let Err(err) = self.check_cells(&cells) {
            self.order = before;
            self.relayout();
            return Err(err);
        }
        menukit_core::debug!(widget = %widget_id, index, "widget moved");
        self.row_hint = None;
        self.relayout();
        self.reveal_focused();
        Ok(())
    }

    /// Show or hide a widget. Returns `Ok(true)` if its visibility changed.
    ///
    /// Showing a widget fails, leaving it hidden, if the menu would no
    /// longer fit its grid. Unknown ids are logged and ignored.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> Result<bool, MenuError> {
        let Some(node) = self.nodes.get_mut(id) else {
            menukit_core::warn!(widget = id, "set_visible: unknown widget");
            return Ok(false);
        };
        if node.widget.is_visible() == visible {
            return Ok(false);
        }
        node.widget.set_visible(visible);
        if visible {
            let cells = self.top_level_cells();
            if let Err(err) = self.check_cells(&cells) {
                if let Some(node) = self.nodes.get_mut(id) {
                    node.widget.set_visible(false);
                }
                self.relayout();
                return Err(err);
            }
        }
        self.relayout();
        self.repair_focus();
        Ok(true)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            menukit_core::warn!(widget = id, "set_enabled: unknown widget");
            return false;
        };
        if node.widget.is_enabled() == enabled {
            return false;
        }
        node.widget.set_enabled(enabled);
        self.repair_focus();
        true
    }

    // --- Queries ---

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Widget ids in focus order.
    pub fn widget_ids(&self) -> &[WidgetId] {
        &self.order
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.nodes.get(id).map(|node| &node.widget)
    }

    /// Mutable access to a widget. The next `update` or `draw` re-lays out
    /// the menu; call [`Menu::relayout`] to do it immediately.
    pub fn widget_mut(&mut self, id: &str) -> Option<&mut Widget> {
        let node = self.nodes.get_mut(id)?;
        self.layout_dirty = true;
        Some(&mut node.widget)
    }

    /// Frame that packs `id`.
    pub fn container(&self, id: &str) -> Option<&WidgetId> {
        self.nodes.get(id)?.parent.as_ref()
    }

    /// Children packed in frame `id`.
    pub fn children(&self, id: &str) -> &[WidgetId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Surface rectangle of a widget, selection margin excluded.
    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.rect)
    }

    pub fn clip(&self, id: &str) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.clip)
    }

    /// Outer rectangle relative to the container's content origin.
    pub fn relative_rect(&self, id: &str) -> Option<Rect> {
        self.nodes.get(id).map(|node| node.relative)
    }

    /// Grid cell of a widget's top-level ancestor.
    pub fn position(&self, id: &str) -> Option<(usize, usize)> {
        let top = self.top_level_of(id)?;
        self.nodes.get(&top)?.cell
    }

    /// Scroll area of a frame.
    pub fn frame_scroll(&self, id: &str) -> Option<&ScrollArea> {
        let node = self.nodes.get(id)?;
        node.widget.is_frame().then_some(&node.scroll)
    }

    /// Frame size after clamping to its maximum (its scroll viewport).
    pub fn frame_size(&self, id: &str) -> Option<Size> {
        let node = self.nodes.get(id)?;
        node.widget.is_frame().then_some(node.scroll.viewport())
    }

    pub fn grid_layout(&self) -> &GridLayout {
        &self.grid
    }

    /// Surface rectangle of the menu viewport.
    pub fn menu_rect(&self) -> Rect {
        self.rect
    }

    pub fn menu_scroll(&self) -> &ScrollArea {
        &self.scroll
    }

    pub fn focused(&self) -> Option<&WidgetId> {
        self.focused.as_ref()
    }

    pub fn focused_widget(&self) -> Option<&Widget> {
        self.focused.as_ref().map(|id| &self.nodes[id].widget)
    }

    /// Focus a widget directly. Fails (logged) for unknown or unfocusable
    /// widgets.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            menukit_core::warn!(widget = id, "focus: unknown widget");
            return false;
        }
        if !self.is_focusable(id) {
            menukit_core::debug!(widget = id, "focus: widget not focusable");
            return false;
        }
        self.ensure_layout();
        let id = WidgetId::from(id);
        self.set_focus(&id, false)
    }

    /// Focus the first focusable widget, or clear focus if there is none.
    pub fn focus_first(&mut self) -> bool {
        self.ensure_layout();
        match self.focusable().into_iter().next() {
            Some(first) => self.set_focus(&first, false),
            None => self.clear_focus(),
        }
    }

    pub fn clear_focus(&mut self) -> bool {
        let Some(old) = self.focused.take() else {
            return false;
        };
        self.row_hint = None;
        self.note(FocusChange::Blur(old));
        true
    }

    /// Drain recorded blur/focus transitions.
    pub fn take_focus_changes(&mut self) -> Vec<FocusChange> {
        std::mem::take(&mut self.notes)
    }

    /// Drain actions returned by `on_select` callbacks.
    pub fn take_requested_actions(&mut self) -> Vec<MenuAction> {
        std::mem::take(&mut self.requested)
    }

    // --- Values ---

    /// Values of every value-bearing widget.
    pub fn values(&self) -> BTreeMap<WidgetId, WidgetValue> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.widget.has_value())
            .map(|(id, node)| (id.clone(), node.widget.value()))
            .collect()
    }

    /// Set a widget value without firing callbacks.
    pub fn set_value(&mut self, id: &str, value: WidgetValue) -> Result<bool, MenuError> {
        let widget_id = self.known(id)?;
        let changed = self
            .nodes
            .get_mut(&widget_id)
            .map(|node| node.widget.set_value(value))
            .transpose()
            .map_err(|source| MenuError::Value {
                widget: widget_id.clone(),
                source,
            })?
            .unwrap_or(false);
        if changed {
            self.relayout();
        }
        Ok(changed)
    }

    /// Restore every default value. Returns `true` if anything changed.
    pub fn reset_values(&mut self) -> bool {
        let mut changed = false;
        for node in self.nodes.values_mut() {
            changed |= node.widget.reset_value();
        }
        if changed {
            self.relayout();
        }
        changed
    }

    // --- Input ---

    /// Whether the focused widget wants `key` ahead of the control bindings.
    pub fn focused_captures(&self, key: &KeyEvent) -> bool {
        self.focused_widget()
            .is_some_and(|widget| widget.captures(key))
    }

    /// Forward `event` to the focused widget and run its callbacks.
    pub fn update_focused(
        &mut self,
        event: &Event,
    ) -> Option<(WidgetId, WidgetResponse, Vec<MenuAction>)> {
        self.ensure_layout();
        let id = self.focused.clone()?;
        let node = self.nodes.get_mut(&id)?;
        let response = node.widget.update(event);
        if !response.is_handled() {
            return None;
        }
        let actions = node.widget.fire(&id, response);
        if response == WidgetResponse::Changed {
            self.relayout();
            self.reveal_focused();
        }
        menukit_core::trace!(widget = %id, ?response, "focused widget handled event");
        Some((id, response, actions))
    }

    /// Topmost focusable widget under `point`.
    pub fn widget_at(&self, point: Point) -> Option<WidgetId> {
        self.order
            .iter()
            .rev()
            .find(|id| {
                let node = &self.nodes[*id];
                !node.widget.is_frame()
                    && self.is_focusable(id.as_str())
                    && node.rect.contains(point)
                    && node.clip.contains(point)
            })
            .cloned()
    }

    /// Innermost scrollable region under `point`.
    pub fn scroll_target_at(&self, point: Point) -> Option<ScrollTarget> {
        let frame = self.order.iter().rev().find(|id| {
            let node = &self.nodes[*id];
            node.widget.is_frame()
                && self.is_shown(id.as_str())
                && node.scroll.is_scrollable()
                && node.viewport.intersection(&node.clip).contains(point)
        });
        if let Some(id) = frame {
            return Some(ScrollTarget::Frame(id.clone()));
        }
        (self.scroll.is_scrollable() && self.rect.contains(point)).then_some(ScrollTarget::Menu)
    }

    /// Scrollbar thumb under `point`, with the axis and track length.
    pub fn thumb_at(&self, point: Point) -> Option<(ScrollTarget, Orientation, i32)> {
        let thickness = self.config.scrollbar_thickness;
        for id in self.order.iter().rev() {
            let node = &self.nodes[id];
            if !node.widget.is_frame() || !self.is_shown(id.as_str()) {
                continue;
            }
            let visible = node.viewport.intersection(&node.clip);
            for (axis, track) in scrollbar_tracks(node.viewport, &node.scroll, thickness) {
                if let Some(thumb) = node.scroll.thumb(axis, track)
                    && thumb.contains(point)
                    && visible.contains(point)
                {
                    return Some((ScrollTarget::Frame(id.clone()), axis, axis.main(track.size())));
                }
            }
        }
        for (axis, track) in scrollbar_tracks(self.rect, &self.scroll, thickness) {
            if let Some(thumb) = self.scroll.thumb(axis, track)
                && thumb.contains(point)
            {
                return Some((ScrollTarget::Menu, axis, axis.main(track.size())));
            }
        }
        None
    }

    /// Current offset of a scroll region.
    pub fn scroll_offset(&self, target: &ScrollTarget) -> Option<Point> {
        self.scroll_area(target).map(ScrollArea::offset)
    }

    /// Scroll frame `id` by a delta. Returns `true` if the offset changed.
    pub fn scroll_frame(&mut self, id: &str, dx: i32, dy: i32) -> bool {
        if !self.nodes.contains_key(id) {
            menukit_core::warn!(widget = id, "scroll_frame: unknown widget");
            return false;
        }
        self.scroll_by(&ScrollTarget::Frame(WidgetId::from(id)), dx, dy)
    }

    /// Scroll the menu viewport by a delta.
    pub fn scroll_menu(&mut self, dx: i32, dy: i32) -> bool {
        self.scroll_by(&ScrollTarget::Menu, dx, dy)
    }

    pub fn scroll_by(&mut self, target: &ScrollTarget, dx: i32, dy: i32) -> bool {
        self.ensure_layout();
        let changed = self
            .scroll_area_mut(target)
            .is_some_and(|area| area.scroll(dx, dy));
        if changed {
            self.reposition();
        }
        changed
    }

    /// Drag a scrollbar thumb `delta` track pixels away from where the
    /// region's offset was `start`.
    pub fn drag_scrollbar(
        &mut self,
        target: &ScrollTarget,
        axis: Orientation,
        track_len: i32,
        start: Point,
        delta: i32,
    ) -> bool {
        let Some(area) = self.scroll_area_mut(target) else {
            return false;
        };
        let before = area.offset();
        area.scroll_to(start.x, start.y);
        area.drag_thumb(axis, track_len, delta);
        let changed = area.offset() != before;
        if changed {
            self.reposition();
        }
        changed
    }

    // --- Geometry ---

    /// Place the menu on a surface of `size`.
    pub fn set_surface(&mut self, size: Size) {
        self.surface = Some(size);
        self.reposition();
    }

    /// Rerun a full layout pass if a widget was changed through
    /// [`Menu::widget_mut`].
    pub fn ensure_layout(&mut self) {
        if self.layout_dirty {
            self.relayout();
            self.repair_focus();
        }
    }

    /// Full layout pass: measure, grid, then positions.
    pub fn relayout(&mut self) {
        let _span = menukit_core::debug_span!(
            "menu_layout",
            menu = %self.title,
            widgets = self.nodes.len()
        )
        .entered();

        let top = self.top_level_cells();
        let theme = &self.config.theme;
        let mut cells = Vec::with_capacity(top.len());
        for id in &top {
            let outer = measure_node(&mut self.nodes, theme, id);
            let align = self.nodes[id].widget.alignment();
            cells.push(GridCell::new(outer, align));
        }
        self.grid = self.config.grid.solve(&cells);
        for node in self.nodes.values_mut() {
            node.cell = None;
        }
        for (id, placement) in top.iter().zip(&self.grid.cells) {
            if let Some(node) = self.nodes.get_mut(id) {
                node.cell = Some((placement.column, placement.row));
                node.relative = placement.rect;
            }
        }
        self.layout_dirty = false;
        self.reposition();
        menukit_core::debug!(
            columns = self.grid.used_columns,
            rows = self.grid.row_heights.len(),
            width = self.grid.content.width,
            height = self.grid.content.height,
            "menu laid out"
        );
    }

    /// Resolve surface rectangles from the last measure pass.
    pub(crate) fn reposition(&mut self) {
        let size = match self.surface {
            Some(surface) => self.config.size.clamp_max(surface),
            None => self.config.size,
        };
        let origin = match (self.config.position, self.surface) {
            (MenuPosition::At(point), _) => point,
            (MenuPosition::Centered, Some(surface)) => Point::new(
                Alignment::Center.offset(surface.width, size.width),
                Alignment::Center.offset(surface.height, size.height),
            ),
            (MenuPosition::Centered, None) => Point::default(),
        };
        self.rect = Rect::from_origin_size(origin, size);
        self.scroll
            .set_content_size(self.grid.content.width, self.grid.content.height);
        self.scroll.set_viewport(size.width, size.height);

        let center = self.grid.origin_in(size, self.config.center_content);
        let offset = self.scroll.offset();
        let grid_origin = Point::new(
            self.rect.x + center.x - offset.x,
            self.rect.y + center.y - offset.y,
        );

        for node in self.nodes.values_mut() {
            if !node.widget.is_visible() {
                node.clear_geometry();
            }
        }
        let clip = self.rect;
        let theme = &self.config.theme;
        for id in self.top_level_cells() {
            place_node(&mut self.nodes, theme, &id, grid_origin, clip);
        }
    }

    // --- Drawing ---

    /// Draw the menu: background, widgets in focus order, then scrollbars.
    pub fn draw(&mut self, out: &mut dyn Renderer) {
        self.ensure_layout();
        let theme = &self.config.theme;
        if self.rect.is_empty() {
            return;
        }
        if theme.background.a > 0 {
            out.draw(&DrawCommand::Fill {
                rect: self.rect,
                clip: self.rect,
                color: theme.background,
            });
        }
        for id in &self.order {
            if !self.is_shown(id.as_str()) {
                continue;
            }
            let node = &self.nodes[id];
            let focused = self.focused.as_ref() == Some(id);
            node.widget.draw(node.rect, node.clip, focused, theme, out);
        }

        let thickness = self.config.scrollbar_thickness;
        for id in &self.order {
            let node = &self.nodes[id];
            if node.widget.is_frame() && self.is_shown(id.as_str()) {
                let clip = node.viewport.intersection(&node.clip);
                draw_scrollbars(node.viewport, clip, &node.scroll, thickness, theme, out);
            }
        }
        draw_scrollbars(self.rect, self.rect, &self.scroll, thickness, theme, out);
    }

    // --- Focus internals ---

    /// Focusable: selectable, enabled, and visible along with every
    /// ancestor frame.
    pub fn is_focusable(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|node| {
            node.widget.is_selectable() && node.widget.is_enabled() && self.is_shown(id)
        })
    }

    /// Focusable widgets in focus order.
    pub(crate) fn focusable(&self) -> Vec<WidgetId> {
        self.order
            .iter()
            .filter(|id| self.is_focusable(id.as_str()))
            .cloned()
            .collect()
    }

    /// Move focus to `id`, emitting blur then focus and scrolling it into
    /// view. `keep_hint` preserves the sticky row of horizontal moves.
    pub(crate) fn set_focus(&mut self, id: &WidgetId, keep_hint: bool) -> bool {
        if !keep_hint {
            self.row_hint = None;
        }
        if self.focused.as_ref() == Some(id) {
            return false;
        }
        if let Some(old) = self.focused.replace(id.clone()) {
            self.note(FocusChange::Blur(old));
        }
        self.note(FocusChange::Focus(id.clone()));
        menukit_core::debug!(widget = %id, menu = %self.title, "focus changed");
        self.reveal_focused();
        true
    }

    /// Record a focus transition and run the widget's `on_select`.
    fn note(&mut self, change: FocusChange) {
        let (id, selected) = match &change {
            FocusChange::Blur(id) => (id, false),
            FocusChange::Focus(id) => (id, true),
        };
        if let Some(node) = self.nodes.get_mut(id) {
            self.requested.extend(node.widget.fire_select(id, selected));
        }
        self.notes.push(change);
    }

    /// Refocus after the focused widget became unfocusable.
    fn repair_focus(&mut self) {
        match self.focused.clone() {
            Some(id) if self.is_focusable(id.as_str()) => {}
            Some(id) => {
                let former = self.order_index(id.as_str()).unwrap_or(0);
                self.focused = None;
                self.row_hint = None;
                self.note(FocusChange::Blur(id));
                self.focus_from(former + 1);
            }
            None => {
                if self.config.focus_first_on_open {
                    self.focus_first();
                }
            }
        }
    }

    /// Focus the first focusable widget at or after `start` in focus
    /// order, wrapping.
    fn focus_from(&mut self, start: usize) {
        let len = self.order.len();
        if len == 0 {
            return;
        }
        let next = (0..len)
            .map(|step| &self.order[(start + step) % len])
            .find(|id| self.is_focusable(id.as_str()))
            .cloned();
        if let Some(id) = next {
            self.set_focus(&id, false);
        }
    }

    /// Scroll every enclosing region so the focused widget is visible.
    fn reveal_focused(&mut self) {
        let Some(id) = self.focused.clone() else {
            return;
        };
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let mut rect = node.relative;
        let mut parent = node.parent.clone();
        let mut changed = false;
        while let Some(frame_id) = parent {
            let theme = &self.config.theme;
            let Some(frame) = self.nodes.get_mut(&frame_id) else {
                break;
            };
            changed |= frame.scroll.scroll_to_rect(rect);
            let offset = frame.scroll.offset();
            let margin = frame.widget.selection_margin(theme);
            let padding = frame.widget.padding_in(theme);
            rect = rect.offset(
                frame.relative.x + margin.left + padding.left - offset.x,
                frame.relative.y + margin.top + padding.top - offset.y,
            );
            parent = frame.parent.clone();
        }
        changed |= self.scroll.scroll_to_rect(rect);
        if changed {
            self.reposition();
        }
    }

    // --- Tree helpers ---

    fn known(&self, id: &str) -> Result<WidgetId, MenuError> {
        if self.nodes.contains_key(id) {
            Ok(WidgetId::from(id))
        } else {
            Err(MenuError::UnknownWidget(WidgetId::from(id)))
        }
    }

    pub(crate) fn order_index(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|member| member.as_str() == id)
    }

    /// Visible top-level widgets in focus order: the grid's cells.
    fn top_level_cells(&self) -> Vec<WidgetId> {
        self.order
            .iter()
            .filter(|id| {
                let node = &self.nodes[*id];
                node.parent.is_none() && node.widget.is_visible()
            })
            .cloned()
            .collect()
    }

    /// Fail if `cells`, as grid cells in this order, overflow the grid or
    /// a column's maximum width.
    fn check_cells(&mut self, cells: &[WidgetId]) -> Result<(), MenuError> {
        let grid = &self.config.grid;
        grid.check_capacity(cells.len())?;
        for (index, id) in cells.iter().enumerate() {
            let width = measure_node(&mut self.nodes, &self.config.theme, id).width;
            grid.check_cell_width(index, width)?;
        }
        Ok(())
    }

    /// Visible along with every ancestor.
    pub(crate) fn is_shown(&self, id: &str) -> bool {
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if !node.widget.is_visible() {
                return false;
            }
            current = node.parent.as_ref().and_then(|parent| self.nodes.get(parent));
        }
        true
    }

    fn ancestors(&self, id: &str) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|node| node.parent.clone());
        while let Some(parent) = current {
            current = self.nodes.get(&parent).and_then(|node| node.parent.clone());
            out.push(parent);
        }
        out
    }

    pub(crate) fn top_level_of(&self, id: &str) -> Option<WidgetId> {
        self.nodes.get(id)?;
        Some(
            self.ancestors(id)
                .pop()
                .unwrap_or_else(|| WidgetId::from(id)),
        )
    }

    /// `id` and all of its descendants.
    fn subtree(&self, id: &str) -> BTreeSet<WidgetId> {
        let mut out = BTreeSet::new();
        let mut stack = vec![WidgetId::from(id)];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().cloned());
            }
            out.insert(current);
        }
        out
    }

    /// Remove `id`'s subtree from the focus order, keeping its inner order.
    fn take_block(&mut self, id: &str) -> Vec<WidgetId> {
        let subtree = self.subtree(id);
        let (block, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.order)
            .into_iter()
            .partition(|member| subtree.contains(member));
        self.order = rest;
        block
    }

    fn scroll_area(&self, target: &ScrollTarget) -> Option<&ScrollArea> {
        match target {
            ScrollTarget::Menu => Some(&self.scroll),
            ScrollTarget::Frame(id) => self
                .nodes
                .get(id)
                .filter(|node| node.widget.is_frame())
                .map(|node| &node.scroll),
        }
    }

    fn scroll_area_mut(&mut self, target: &ScrollTarget) -> Option<&mut ScrollArea> {
        match target {
            ScrollTarget::Menu => Some(&mut self.scroll),
            ScrollTarget::Frame(id) => self
                .nodes
                .get_mut(id)
                .filter(|node| node.widget.is_frame())
                .map(|node| &mut node.scroll),
        }
    }
}

/// Measure `id` bottom-up and return its outer size.
fn measure_node(
    nodes: &mut BTreeMap<WidgetId, WidgetNode>,
    theme: &Theme,
    id: &WidgetId,
) -> Size {
    let Some(node) = nodes.get(id) else {
        return Size::ZERO;
    };
    let Some(spec) = node.widget.pack_spec().copied() else {
        let outer = node
            .widget
            .measure(theme)
            .expand(node.widget.selection_margin(theme));
        if let Some(node) = nodes.get_mut(id) {
            node.outer = outer;
        }
        return outer;
    };

    let visible: Vec<WidgetId> = node
        .children
        .iter()
        .filter(|child| nodes.get(*child).is_some_and(|c| c.widget.is_visible()))
        .cloned()
        .collect();
    let mut packed = Vec::with_capacity(visible.len());
    for child in &visible {
        let size = measure_node(nodes, theme, child);
        let node = &nodes[child];
        packed.push(
            PackChild::new(size)
                .margin(node.pack_margin)
                .align(node.pack_align),
        );
    }
    let layout = spec.solve(&packed);
    for (child, rect) in visible.iter().zip(&layout.children) {
        if let Some(node) = nodes.get_mut(child) {
            node.relative = *rect;
        }
    }

    let Some(node) = nodes.get_mut(id) else {
        return Size::ZERO;
    };
    node.scroll
        .set_content_size(layout.content.width, layout.content.height);
    node.scroll.set_viewport(layout.size.width, layout.size.height);
    node.outer = layout
        .size
        .expand(node.widget.padding_in(theme))
        .expand(node.widget.selection_margin(theme));
    node.outer
}

/// Position `id` from its container origin, recursing into frames.
fn place_node(
    nodes: &mut BTreeMap<WidgetId, WidgetNode>,
    theme: &Theme,
    id: &WidgetId,
    origin: Point,
    clip: Rect,
) {
    let Some(node) = nodes.get_mut(id) else {
        return;
    };
    let outer = node.relative.offset(origin.x, origin.y);
    node.rect = outer.inner(node.widget.selection_margin(theme));
    node.clip = clip;
    if !node.widget.is_frame() {
        return;
    }

    let padding = node.widget.padding_in(theme);
    node.viewport = Rect::from_origin_size(
        Point::new(node.rect.x + padding.left, node.rect.y + padding.top),
        node.scroll.viewport(),
    );
    let child_clip = clip.intersection(&node.viewport);
    let offset = node.scroll.offset();
    let child_origin = Point::new(node.viewport.x - offset.x, node.viewport.y - offset.y);
    let children: Vec<WidgetId> = node.children.clone();
    for child in &children {
        if nodes.get(child).is_some_and(|c| c.widget.is_visible()) {
            place_node(nodes, theme, child, child_origin, child_clip);
        }
    }
}

/// Scrollbar tracks along the right and bottom edges of `viewport`, for
/// each axis that can scroll.
pub(crate) fn scrollbar_tracks(
    viewport: Rect,
    scroll: &ScrollArea,
    thickness: i32,
) -> Vec<(Orientation, Rect)> {
    let mut tracks = Vec::new();
    if thickness <= 0 || viewport.is_empty() {
        return tracks;
    }
    if scroll.scrollable(Orientation::Vertical) {
        tracks.push((
            Orientation::Vertical,
            Rect::new(
                viewport.right() - thickness,
                viewport.y,
                thickness,
                viewport.height,
            ),
        ));
    }
    if scroll.scrollable(Orientation::Horizontal) {
        tracks.push((
            Orientation::Horizontal,
            Rect::new(
                viewport.x,
                viewport.bottom() - thickness,
                viewport.width,
                thickness,
            ),
        ));
    }
    tracks
}

fn draw_scrollbars(
    viewport: Rect,
    clip: Rect,
    scroll: &ScrollArea,
    thickness: i32,
    theme: &Theme,
    out: &mut dyn Renderer,
) {
    for (axis, track) in scrollbar_tracks(viewport, scroll, thickness) {
        let commands = [
            Some(DrawCommand::Fill {
                rect: track,
                clip,
                color: theme.scrollbar_track,
            }),
            scroll.thumb(axis, track).map(|thumb| DrawCommand::Fill {
                rect: thumb,
                clip,
                color: theme.scrollbar_thumb,
            }),
        ];
        for command in commands.into_iter().flatten() {
            if command.is_visible() {
                out.draw(&command);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use menukit_layout::grid::RowSpec;
    use menukit_layout::{LayoutError, PackSpec};
    use menukit_widgets::{CellMetrics, SelectionEffect};

    use super::*;

    /// Theme where a one-character button is exactly 8x20 with no
    /// selection margin.
    fn flat_theme() -> Theme {
        Theme::default()
            .with_metrics(CellMetrics::new(8, 16))
            .with_selection(SelectionEffect::none())
            .with_widget_padding(Sides::vertical(2))
    }

    fn menu_with(grid: GridSpec) -> Menu {
        let config = MenuConfig::new(400, 300)
            .with_grid(grid)
            .with_theme(flat_theme());
        Menu::new("test", config).expect("valid config")
    }

    fn vertical_menu() -> Menu {
        menu_with(GridSpec::default())
    }

    #[test]
    fn new_rejects_invalid_grid() {
        let config = MenuConfig::default().with_grid(GridSpec::new(0));
        assert!(matches!(
            Menu::new("bad", config),
            Err(MenuError::Layout(_))
        ));
    }

    #[test]
    fn add_focuses_first_selectable() {
        let mut menu = vertical_menu();
        menu.add_with_id("title", Widget::label("Title")).unwrap();
        assert_eq!(menu.focused(), None);
        menu.add_with_id("play", Widget::button("Play")).unwrap();
        menu.add_with_id("quit", Widget::button("Quit")).unwrap();
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("play"));
        assert_eq!(
            menu.take_focus_changes(),
            vec![FocusChange::Focus(WidgetId::from("play"))]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut menu = vertical_menu();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        assert_eq!(
            menu.add_with_id("a", Widget::button("B")),
            Err(MenuError::DuplicateWidget(WidgetId::from("a")))
        );
    }

    #[test]
    fn auto_ids_skip_taken_names() {
        let mut menu = vertical_menu();
        menu.add_with_id("widget-0", Widget::label("x")).unwrap();
        let id = menu.add(Widget::label("y")).unwrap();
        assert_eq!(id.as_str(), "widget-1");
    }

    #[test]
    fn capacity_is_checked_on_add() {
        let mut menu = menu_with(GridSpec::new(1).rows(RowSpec::Uniform(2)));
        menu.add(Widget::button("A")).unwrap();
        menu.add(Widget::button("B")).unwrap();
        assert!(matches!(
            menu.add(Widget::button("C")),
            Err(MenuError::Layout(_))
        ));
        // Hidden widgets take no cell.
        assert!(menu.add(Widget::button("D").hidden()).is_ok());
    }

    #[test]
    fn too_wide_widget_is_rejected() {
        let mut menu = menu_with(GridSpec::new(1).column_max_width(40));
        assert!(matches!(
            menu.add(Widget::button("much too wide")),
            Err(MenuError::Layout(_))
        ));
    }

    #[test]
    fn widgets_are_centered_in_the_menu() {
        let mut menu = vertical_menu();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        let rect = menu.rect("a").unwrap();
        assert_eq!(rect.size(), Size::new(8, 20));
        assert_eq!(rect.origin(), Point::new(196, 140));
    }

    #[test]
    fn frame_packs_children() {
        let mut menu = vertical_menu();
        let frame = menu
            .add_with_id("frame", Widget::frame(PackSpec::vertical().spacing(5)))
            .unwrap();
        for id in ["a", "b", "c"] {
            menu.add_with_id(id, Widget::button(id)).unwrap();
            menu.pack(frame.as_str(), id, Alignment::Start, Sides::ZERO)
                .unwrap();
        }
        assert_eq!(menu.frame_size("frame").unwrap().height, 80);
        assert_eq!(menu.children("frame").len(), 3);
        assert_eq!(menu.container("b").map(WidgetId::as_str), Some("frame"));
        let a = menu.rect("a").unwrap();
        let b = menu.rect("b").unwrap();
        assert_eq!(b.y - a.y, 25);
        assert_eq!(
            menu.widget_ids()
                .iter()
                .map(WidgetId::as_str)
                .collect::<Vec<_>>(),
            ["frame", "a", "b", "c"]
        );
    }

    #[test]
    fn pack_errors() {
        let mut menu = vertical_menu();
        menu.add_with_id("outer", Widget::frame(PackSpec::vertical()))
            .unwrap();
        menu.add_with_id("inner", Widget::frame(PackSpec::vertical()))
            .unwrap();
        menu.add_with_id("btn", Widget::button("B")).unwrap();

        assert_eq!(
            menu.pack("btn", "inner", Alignment::Start, 0),
            Err(MenuError::NotAFrame(WidgetId::from("btn")))
        );
        assert_eq!(
            menu.pack("outer", "outer", Alignment::Start, 0),
            Err(MenuError::PackIntoSelf(WidgetId::from("outer")))
        );
        assert_eq!(
            menu.pack("outer", "ghost", Alignment::Start, 0),
            Err(MenuError::UnknownWidget(WidgetId::from("ghost")))
        );
        menu.pack("outer", "inner", Alignment::Start, 0).unwrap();
        assert_eq!(
            menu.pack("inner", "outer", Alignment::Start, 0),
            Err(MenuError::PackAncestor {
                frame: WidgetId::from("inner"),
                widget: WidgetId::from("outer"),
            })
        );
        menu.pack("inner", "btn", Alignment::Start, 0).unwrap();
        assert_eq!(
            menu.pack("outer", "btn", Alignment::Start, 0),
            Err(MenuError::AlreadyPacked {
                widget: WidgetId::from("btn"),
                frame: WidgetId::from("inner"),
            })
        );
    }

    #[test]
    fn unpack_restores_top_level_and_order() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::vertical()))
            .unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.add_with_id("b", Widget::button("B")).unwrap();
        menu.pack("f", "a", Alignment::Start, 0).unwrap();
        assert_eq!(menu.unpack("b"), Err(MenuError::NotPacked(WidgetId::from("b"))));
        menu.unpack("a").unwrap();
        assert_eq!(menu.container("a"), None);
        assert_eq!(
            menu.widget_ids().last().map(WidgetId::as_str),
            Some("a")
        );
        assert!(menu.position("a").is_some());
    }

    #[test]
    fn repack_yields_identical_geometry() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::horizontal().spacing(3)))
            .unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.pack("f", "a", Alignment::Center, 2).unwrap();
        let before = (menu.rect("a"), menu.rect("f"));
        menu.unpack("a").unwrap();
        menu.pack("f", "a", Alignment::Center, 2).unwrap();
        assert_eq!((menu.rect("a"), menu.rect("f")), before);
    }

    #[test]
    fn removing_focused_widget_refocuses_next() {
        let mut menu = vertical_menu();
        for id in ["a", "b", "c"] {
            menu.add_with_id(id, Widget::button(id)).unwrap();
        }
        menu.focus("b");
        menu.take_focus_changes();
        assert!(menu.remove("b"));
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("c"));
        assert_eq!(
            menu.take_focus_changes(),
            vec![
                FocusChange::Blur(WidgetId::from("b")),
                FocusChange::Focus(WidgetId::from("c")),
            ]
        );
        menu.remove("c");
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("a"));
        menu.remove("a");
        assert_eq!(menu.focused(), None);
        assert!(!menu.remove("a"));
    }

    #[test]
    fn removing_a_frame_removes_its_subtree() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::vertical()))
            .unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.pack("f", "a", Alignment::Start, 0).unwrap();
        assert!(menu.remove("f"));
        assert!(!menu.contains("a"));
        assert!(menu.is_empty());
    }

    #[test]
    fn hiding_focused_widget_moves_focus() {
        let mut menu = vertical_menu();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.add_with_id("b", Widget::button("B")).unwrap();
        assert_eq!(menu.set_visible("a", false), Ok(true));
        assert_eq!(menu.set_visible("a", false), Ok(false));
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("b"));
        assert!(menu.set_enabled("b", false));
        assert_eq!(menu.focused(), None);
        assert_eq!(menu.set_visible("ghost", true), Ok(false));
    }

    #[test]
    fn hidden_frame_hides_children_from_focus() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::vertical()))
            .unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.pack("f", "a", Alignment::Start, 0).unwrap();
        menu.set_visible("f", false).unwrap();
        assert!(!menu.is_focusable("a"));
        assert_eq!(menu.focused(), None);
    }

    #[test]
    fn packing_focused_widget_into_hidden_frame_moves_focus() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::vertical()).hidden())
            .unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.add_with_id("b", Widget::button("B")).unwrap();
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("a"));
        menu.take_focus_changes();

        menu.pack("f", "a", Alignment::Start, 0).unwrap();
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("b"));
        assert!(menu.is_focusable("b"));
        assert_eq!(
            menu.take_focus_changes(),
            vec![
                FocusChange::Blur(WidgetId::from("a")),
                FocusChange::Focus(WidgetId::from("b")),
            ]
        );
    }

    #[test]
    fn unpacking_from_hidden_frame_restores_focus() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::vertical()).hidden())
            .unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.pack("f", "a", Alignment::Start, 0).unwrap();
        assert_eq!(menu.focused(), None);
        menu.unpack("a").unwrap();
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("a"));
    }

    #[test]
    fn showing_a_widget_rechecks_capacity() {
        let mut menu = menu_with(GridSpec::new(1).rows(RowSpec::Uniform(2)));
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.add_with_id("b", Widget::button("B")).unwrap();
        menu.add_with_id("c", Widget::button("C").hidden()).unwrap();
        assert!(matches!(
            menu.set_visible("c", true),
            Err(MenuError::Layout(LayoutError::CapacityExceeded { .. }))
        ));
        assert!(!menu.widget("c").unwrap().is_visible());
        assert_eq!(menu.position("c"), None);

        assert_eq!(menu.set_visible("b", false), Ok(true));
        assert_eq!(menu.set_visible("c", true), Ok(true));
        assert_eq!(menu.position("c"), Some((0, 1)));
    }

    #[test]
    fn showing_a_widget_rechecks_column_width() {
        let mut menu = menu_with(GridSpec::new(1).column_max_width(40));
        menu.add_with_id("wide", Widget::button("much too wide").hidden())
            .unwrap();
        assert!(matches!(
            menu.set_visible("wide", true),
            Err(MenuError::Layout(LayoutError::CellTooWide { .. }))
        ));
        assert!(!menu.widget("wide").unwrap().is_visible());
    }

    #[test]
    fn move_widget_reorders_top_level_blocks() {
        let mut menu = vertical_menu();
        menu.add_with_id("f", Widget::frame(PackSpec::vertical()))
            .unwrap();
        menu.add_with_id("x", Widget::button("X")).unwrap();
        menu.pack("f", "x", Alignment::Start, 0).unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.add_with_id("b", Widget::button("B")).unwrap();

        menu.move_widget("f", 2).unwrap();
        menu.move_widget("b", 0).unwrap();
        assert_eq!(
            menu.widget_ids()
                .iter()
                .map(WidgetId::as_str)
                .collect::<Vec<_>>(),
            ["b", "a", "f", "x"]
        );
        assert_eq!(menu.position("b"), Some((0, 0)));
        assert_eq!(menu.position("x"), Some((0, 2)));
        assert_eq!(
            menu.move_widget("x", 0),
            Err(MenuError::AlreadyPacked {
                widget: WidgetId::from("x"),
                frame: WidgetId::from("f"),
            })
        );
        assert_eq!(
            menu.move_widget("ghost", 0),
            Err(MenuError::UnknownWidget(WidgetId::from("ghost")))
        );
    }

    #[test]
    fn move_widget_rejects_a_column_it_does_not_fit() {
        let grid = GridSpec::new(2)
            .rows(RowSpec::Uniform(1))
            .column_max_widths(vec![Some(100), Some(20)]);
        let mut menu = menu_with(grid);
        menu.add_with_id("wide", Widget::button("wide!!")).unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        assert!(matches!(
            menu.move_widget("wide", 1),
            Err(MenuError::Layout(LayoutError::CellTooWide { .. }))
        ));
        assert_eq!(
            menu.widget_ids()
                .iter()
                .map(WidgetId::as_str)
                .collect::<Vec<_>>(),
            ["wide", "a"]
        );
        assert_eq!(menu.position("wide"), Some((0, 0)));
    }

    #[test]
    fn focus_callbacks_queue_actions() {
        let mut menu = vertical_menu();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.add_with_id(
            "b",
            Widget::button("B").on_select(|_, selected| selected.then_some(MenuAction::Back)),
        )
        .unwrap();
        menu.add_with_id(
            "c",
            Widget::button("C").on_select(|_, selected| (!selected).then_some(MenuAction::Exit)),
        )
        .unwrap();
        assert!(menu.take_requested_actions().is_empty());
        menu.focus("b");
        assert_eq!(menu.take_requested_actions(), vec![MenuAction::Back]);
        menu.focus("c");
        assert!(menu.take_requested_actions().is_empty());
        // Removal blurs before the widget is dropped.
        menu.remove("c");
        assert_eq!(menu.take_requested_actions(), vec![MenuAction::Exit]);
        assert_eq!(menu.focused().map(WidgetId::as_str), Some("a"));
    }

    #[test]
    fn submenus_lists_open_targets_once() {
        let mut menu = vertical_menu();
        menu.add(Widget::button("one").action(MenuAction::Open(MenuId(2))))
            .unwrap();
        menu.add(Widget::button("back").action(MenuAction::Back))
            .unwrap();
        menu.add(Widget::button("two").action(MenuAction::Open(MenuId(1))))
            .unwrap();
        menu.add(Widget::button("again").action(MenuAction::Open(MenuId(2))))
            .unwrap();
        assert_eq!(menu.submenus(), vec![MenuId(2), MenuId(1)]);
    }

    #[test]
    fn focus_rejects_unfocusable_and_unknown() {
        let mut menu = vertical_menu();
        menu.add_with_id("l", Widget::label("L")).unwrap();
        assert!(!menu.focus("l"));
        assert!(!menu.focus("ghost"));
    }

    #[test]
    fn values_and_reset() {
        let mut menu = vertical_menu();
        menu.add_with_id("t", Widget::toggle("Sound", true)).unwrap();
        menu.add_with_id("b", Widget::button("B")).unwrap();
        assert_eq!(menu.set_value("t", WidgetValue::Bool(false)), Ok(true));
        assert_eq!(menu.values().len(), 1);
        assert_eq!(menu.values()[&WidgetId::from("t")], WidgetValue::Bool(false));
        assert!(matches!(
            menu.set_value("t", WidgetValue::Index(1)),
            Err(MenuError::Value { .. })
        ));
        assert!(menu.reset_values());
        assert_eq!(menu.values()[&WidgetId::from("t")], WidgetValue::Bool(true));
    }

    #[test]
    fn frame_scrolls_focused_child_into_view() {
        let mut menu = vertical_menu();
        menu.add_with_id(
            "f",
            Widget::frame(PackSpec::vertical().max_size(None, Some(50))),
        )
        .unwrap();
        for id in ["a", "b", "c", "d"] {
            menu.add_with_id(id, Widget::button(id)).unwrap();
            menu.pack("f", id, Alignment::Start, 0).unwrap();
        }
        let scroll = menu.frame_scroll("f").unwrap();
        assert_eq!(scroll.content_size().height, 80);
        assert_eq!(scroll.viewport().height, 50);
        assert!(menu.focus("d"));
        assert_eq!(menu.frame_scroll("f").unwrap().offset().y, 30);
        let frame = menu.rect("f").unwrap();
        let d = menu.rect("d").unwrap();
        assert_eq!(d.bottom(), frame.bottom());
        assert_eq!(
            menu.scroll_target_at(d.center()),
            Some(ScrollTarget::Frame(WidgetId::from("f")))
        );
    }

    #[test]
    fn surface_centers_and_clamps_menu() {
        let mut menu = vertical_menu();
        menu.set_surface(Size::new(800, 200));
        assert_eq!(menu.menu_rect(), Rect::new(200, 0, 400, 200));
    }

    #[test]
    fn widget_at_hits_buttons_only() {
        let mut menu = vertical_menu();
        menu.add_with_id("l", Widget::label("L")).unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        let a = menu.rect("a").unwrap();
        let l = menu.rect("l").unwrap();
        assert_eq!(menu.widget_at(a.center()), Some(WidgetId::from("a")));
        assert_eq!(menu.widget_at(l.center()), None);
        assert_eq!(menu.widget_at(Point::new(-5, -5)), None);
    }

    #[test]
    fn draw_emits_focused_effect_and_text() {
        let config = MenuConfig::new(200, 100);
        let mut menu = Menu::new("draw", config).unwrap();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        let mut out: Vec<DrawCommand> = Vec::new();
        menu.draw(&mut out);
        assert!(matches!(out.first(), Some(DrawCommand::Fill { .. })));
        assert!(out.iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "A")));
        assert!(out.iter().any(|c| matches!(c, DrawCommand::Outline { .. })));
    }

    #[test]
    fn widget_mut_relayouts_lazily() {
        let mut menu = vertical_menu();
        menu.add_with_id("a", Widget::button("A")).unwrap();
        menu.widget_mut("a").unwrap().set_title("AAAA");
        assert_eq!(menu.rect("a").unwrap().width, 8);
        menu.ensure_layout();
        assert_eq!(menu.rect("a").unwrap().width, 32);
    }
}
