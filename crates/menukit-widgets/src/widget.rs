#![forbid(unsafe_code)]

//! The widget model.
//!
//! Widgets are a closed set of variants ([`WidgetKind`]) behind one
//! surface. Frames are widgets too: their packing spec lives here while the
//! runtime arena owns the child list and scroll state.

use std::fmt;

use bitflags::bitflags;
use menukit_core::event::{Event, KeyCode, KeyEvent};
use menukit_core::geometry::{Point, Rect, Sides, Size};
use menukit_layout::{Alignment, PackSpec};
use unicode_segmentation::UnicodeSegmentation;

use crate::draw::emit;
use crate::{
    Callback, DrawCommand, MenuAction, Renderer, SelectCallback, SelectionEffect, TextCursor,
    Theme, WidgetError,
    WidgetId, WidgetValue,
};

bitflags! {
    /// Widget attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        const VISIBLE    = 0b001;
        /// Cleared for read-only widgets.
        const ENABLED    = 0b010;
        const SELECTABLE = 0b100;
    }
}

/// Widget variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind {
    /// Static text.
    Label,
    /// Activatable text with an optional menu action.
    Button { action: Option<MenuAction> },
    /// Cycles through a list of options.
    Selector {
        options: Vec<String>,
        index: usize,
        default: usize,
    },
    /// On/off switch.
    Toggle { state: bool, default: bool },
    /// Single-line text entry.
    TextInput { cursor: TextCursor, default: String },
    /// Vertical blank space.
    VMargin { height: i32 },
    /// Container packing other widgets.
    Frame(PackSpec),
}

/// Outcome of [`Widget::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetResponse {
    /// The event is not for this widget.
    Ignored,
    /// Consumed without changing the value (e.g. caret moved).
    Consumed,
    /// The value changed; fire `on_change`.
    Changed,
    /// The widget was activated; fire `on_return`.
    Returned,
}

impl WidgetResponse {
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// A widget: shared attributes around a [`WidgetKind`].
pub struct Widget {
    title: String,
    kind: WidgetKind,
    flags: WidgetFlags,
    align: Alignment,
    padding: Option<Sides>,
    selection: Option<SelectionEffect>,
    on_change: Option<Callback>,
    on_return: Option<Callback>,
    on_select: Option<SelectCallback>,
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("flags", &self.flags)
            .field("align", &self.align)
            .field("on_change", &self.on_change.is_some())
            .field("on_return", &self.on_return.is_some())
            .field("on_select", &self.on_select.is_some())
            .finish_non_exhaustive()
    }
}

impl Widget {
    fn with_kind(title: impl Into<String>, kind: WidgetKind, selectable: bool) -> Self {
        let mut flags = WidgetFlags::VISIBLE | WidgetFlags::ENABLED;
        flags.set(WidgetFlags::SELECTABLE, selectable);
        Self {
            title: title.into(),
            kind,
            flags,
            align: Alignment::Center,
            padding: None,
            selection: None,
            on_change: None,
            on_return: None,
            on_select: None,
        }
    }

    pub fn label(title: impl Into<String>) -> Self {
        Self::with_kind(title, WidgetKind::Label, false)
    }

    pub fn button(title: impl Into<String>) -> Self {
        Self::with_kind(title, WidgetKind::Button { action: None }, true)
    }

    /// Selector starting at `default`. Out-of-range defaults clamp to the
    /// last option.
    pub fn selector<S: Into<String>>(
        title: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        default: usize,
    ) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let default = default.min(options.len().saturating_sub(1));
        Self::with_kind(
            title,
            WidgetKind::Selector {
                options,
                index: default,
                default,
            },
            true,
        )
    }

    pub fn toggle(title: impl Into<String>, default: bool) -> Self {
        Self::with_kind(
            title,
            WidgetKind::Toggle {
                state: default,
                default,
            },
            true,
        )
    }

    pub fn text_input(title: impl Into<String>, default: impl Into<String>) -> Self {
        let default = default.into();
        Self::with_kind(
            title,
            WidgetKind::TextInput {
                cursor: TextCursor::new().with_value(default.clone()),
                default,
            },
            true,
        )
    }

    pub fn vmargin(height: i32) -> Self {
        Self::with_kind(String::new(), WidgetKind::VMargin { height }, false)
    }

    pub fn frame(spec: PackSpec) -> Self {
        let mut frame = Self::with_kind(String::new(), WidgetKind::Frame(spec), false);
        frame.padding = Some(Sides::ZERO);
        frame
    }

    // --- Builder methods ---

    /// Menu action requested when a button is activated.
    #[must_use]
    pub fn action(mut self, action: MenuAction) -> Self {
        if let WidgetKind::Button { action: slot } = &mut self.kind {
            *slot = Some(action);
        }
        self
    }

    #[must_use]
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Override the theme padding.
    #[must_use]
    pub fn padding(mut self, padding: Sides) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Override the theme selection effect.
    #[must_use]
    pub fn selection_effect(mut self, effect: SelectionEffect) -> Self {
        self.selection = Some(effect);
        self
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.flags.remove(WidgetFlags::ENABLED);
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.flags.remove(WidgetFlags::VISIBLE);
        self
    }

    /// Limit a text input to `max` graphemes.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        if let WidgetKind::TextInput { cursor, .. } = &mut self.kind {
            *cursor = cursor.clone().with_max_length(max);
        }
        self
    }

    #[must_use]
    pub fn on_change(
        mut self,
        callback: impl FnMut(&WidgetId, &WidgetValue) -> Option<MenuAction> + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_return(
        mut self,
        callback: impl FnMut(&WidgetId, &WidgetValue) -> Option<MenuAction> + 'static,
    ) -> Self {
        self.on_return = Some(Box::new(callback));
        self
    }

    /// Called when the widget gains (`true`) or loses (`false`) focus.
    #[must_use]
    pub fn on_select(
        mut self,
        callback: impl FnMut(&WidgetId, bool) -> Option<MenuAction> + 'static,
    ) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    // --- Attributes ---

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn flags(&self) -> WidgetFlags {
        self.flags
    }

    pub fn alignment(&self) -> Alignment {
        self.align
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WidgetFlags::VISIBLE)
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.contains(WidgetFlags::ENABLED)
    }

    /// Selectable by kind. Visibility and enablement are checked separately.
    pub fn is_selectable(&self) -> bool {
        self.flags.contains(WidgetFlags::SELECTABLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(WidgetFlags::VISIBLE, visible);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(WidgetFlags::ENABLED, enabled);
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, WidgetKind::Frame(_))
    }

    pub fn pack_spec(&self) -> Option<&PackSpec> {
        match &self.kind {
            WidgetKind::Frame(spec) => Some(spec),
            _ => None,
        }
    }

    /// Effective selection effect under `theme`.
    pub fn effect(&self, theme: &Theme) -> SelectionEffect {
        self.selection.unwrap_or(theme.selection)
    }

    /// Margin reserved for the selection effect (zero when not selectable).
    pub fn selection_margin(&self, theme: &Theme) -> Sides {
        if self.is_selectable() {
            self.effect(theme).margin()
        } else {
            Sides::ZERO
        }
    }

    /// Padding between the widget edge and its text or packed content.
    pub fn padding_in(&self, theme: &Theme) -> Sides {
        self.padding.unwrap_or(theme.widget_padding)
    }

    // --- Capability surface ---

    /// Text shown for the widget.
    pub fn display_text(&self) -> String {
        let title = self.title.as_str();
        match &self.kind {
            WidgetKind::Label | WidgetKind::Button { .. } => title.to_owned(),
            WidgetKind::Selector { options, index, .. } => {
                let option = options.get(*index).map_or("", String::as_str);
                join_title(title, &format!("< {option} >"))
            }
            WidgetKind::Toggle { state, .. } => {
                join_title(title, if *state { "[ON]" } else { "[OFF]" })
            }
            WidgetKind::TextInput { cursor, .. } => format!("{title}{}", cursor.value()),
            WidgetKind::VMargin { .. } | WidgetKind::Frame(_) => String::new(),
        }
    }

    /// Natural size, padding included, selection margin excluded.
    ///
    /// Frames report only their padding; the runtime adds packed content.
    pub fn measure(&self, theme: &Theme) -> Size {
        match &self.kind {
            WidgetKind::VMargin { height } => Size::new(0, *height),
            WidgetKind::Frame(_) => Size::ZERO.expand(self.padding_in(theme)),
            _ => theme
                .metrics
                .measure(&self.display_text())
                .expand(self.padding_in(theme)),
        }
    }

    /// Whether the focused widget wants `key` before menu navigation sees it.
    pub fn captures(&self, key: &KeyEvent) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match &self.kind {
            WidgetKind::Selector { .. } | WidgetKind::Toggle { .. } => {
                matches!(key.code, KeyCode::Left | KeyCode::Right)
            }
            WidgetKind::TextInput { .. } => TextCursor::captures(key),
            _ => false,
        }
    }

    /// Apply an input event while focused.
    pub fn update(&mut self, event: &Event) -> WidgetResponse {
        if !self.is_enabled() {
            return WidgetResponse::Ignored;
        }
        let Event::Key(key) = event else {
            return WidgetResponse::Ignored;
        };
        if !key.is_press() {
            return WidgetResponse::Ignored;
        }

        match &mut self.kind {
            WidgetKind::Button { .. } => match key.code {
                KeyCode::Enter => WidgetResponse::Returned,
                _ => WidgetResponse::Ignored,
            },
            WidgetKind::Selector { options, index, .. } => {
                let len = options.len();
                match key.code {
                    KeyCode::Enter => WidgetResponse::Returned,
                    KeyCode::Left | KeyCode::Right if len > 1 => {
                        *index = if key.code == KeyCode::Left {
                            (*index + len - 1) % len
                        } else {
                            (*index + 1) % len
                        };
                        WidgetResponse::Changed
                    }
                    KeyCode::Left | KeyCode::Right => WidgetResponse::Consumed,
                    _ => WidgetResponse::Ignored,
                }
            }
            WidgetKind::Toggle { state, .. } => match key.code {
                KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                    *state = !*state;
                    WidgetResponse::Changed
                }
                _ => WidgetResponse::Ignored,
            },
            WidgetKind::TextInput { cursor, .. } => {
                if key.code == KeyCode::Enter {
                    return WidgetResponse::Returned;
                }
                let before = cursor.grapheme_count();
                let text_before = cursor.value().len();
                if !cursor.handle_key(key) {
                    return if TextCursor::captures(key) {
                        WidgetResponse::Consumed
                    } else {
                        WidgetResponse::Ignored
                    };
                }
                if cursor.grapheme_count() != before || cursor.value().len() != text_before {
                    WidgetResponse::Changed
                } else {
                    WidgetResponse::Consumed
                }
            }
            WidgetKind::Label | WidgetKind::VMargin { .. } | WidgetKind::Frame(_) => {
                WidgetResponse::Ignored
            }
        }
    }

    /// Run the callbacks for `response` and collect requested actions.
    ///
    /// A button's own action follows its `on_return` result.
    pub fn fire(&mut self, id: &WidgetId, response: WidgetResponse) -> Vec<MenuAction> {
        let value = self.value();
        let mut actions = Vec::new();
        match response {
            WidgetResponse::Changed => {
                if let Some(callback) = self.on_change.as_mut() {
                    actions.extend(callback(id, &value));
                }
            }
            WidgetResponse::Returned => {
                if let Some(callback) = self.on_return.as_mut() {
                    actions.extend(callback(id, &value));
                }
                if let WidgetKind::Button {
                    action: Some(action),
                } = self.kind
                {
                    actions.push(action);
                }
            }
            WidgetResponse::Ignored | WidgetResponse::Consumed => {}
        }
        actions
    }

    /// Run the focus callback.
    pub fn fire_select(&mut self, id: &WidgetId, selected: bool) -> Option<MenuAction> {
        self.on_select.as_mut().and_then(|callback| callback(id, selected))
    }

    pub fn value(&self) -> WidgetValue {
        match &self.kind {
            WidgetKind::Selector { index, .. } => WidgetValue::Index(*index),
            WidgetKind::Toggle { state, .. } => WidgetValue::Bool(*state),
            WidgetKind::TextInput { cursor, .. } => WidgetValue::Text(cursor.value().to_owned()),
            _ => WidgetValue::None,
        }
    }

    pub fn default_value(&self) -> WidgetValue {
        match &self.kind {
            WidgetKind::Selector { default, .. } => WidgetValue::Index(*default),
            WidgetKind::Toggle { default, .. } => WidgetValue::Bool(*default),
            WidgetKind::TextInput { default, .. } => WidgetValue::Text(default.clone()),
            _ => WidgetValue::None,
        }
    }

    /// Whether the widget carries a value at all.
    pub fn has_value(&self) -> bool {
        !self.default_value().is_none()
    }

    /// Assign a value. Returns `Ok(true)` if it differed from the current one.
    ///
    /// Callbacks are not fired; programmatic changes are silent.
    pub fn set_value(&mut self, value: WidgetValue) -> Result<bool, WidgetError> {
        let got = value.kind_name();
        match (&mut self.kind, value) {
            (WidgetKind::Selector { options, index, .. }, WidgetValue::Index(new)) => {
                if new >= options.len() {
                    return Err(WidgetError::IndexOutOfRange {
                        index: new,
                        len: options.len(),
                    });
                }
                Ok(std::mem::replace(index, new) != new)
            }
            (WidgetKind::Toggle { state, .. }, WidgetValue::Bool(new)) => {
                Ok(std::mem::replace(state, new) != new)
            }
            (WidgetKind::TextInput { cursor, .. }, WidgetValue::Text(new)) => {
                let len = new.graphemes(true).count();
                if let Some(max) = cursor.max_length()
                    && len > max
                {
                    return Err(WidgetError::TooLong { len, max });
                }
                let changed = cursor.value() != new;
                cursor.set_value(new);
                Ok(changed)
            }
            (kind, _) => Err(WidgetError::ValueMismatch {
                expected: expected_kind(kind),
                got,
            }),
        }
    }

    /// Restore the default value. Returns `true` if the value changed.
    pub fn reset_value(&mut self) -> bool {
        let default = self.default_value();
        if default.is_none() {
            return false;
        }
        self.set_value(default).unwrap_or(false)
    }

    /// Draw into `rect` (selection margin excluded), clipped to `clip`.
    ///
    /// The selection effect is drawn outside `rect`, so `clip` should be the
    /// container's clip rather than the widget's own rectangle.
    pub fn draw(
        &self,
        rect: Rect,
        clip: Rect,
        focused: bool,
        theme: &Theme,
        out: &mut dyn Renderer,
    ) {
        match &self.kind {
            WidgetKind::VMargin { .. } => return,
            WidgetKind::Frame(_) => {
                if theme.frame_background.a > 0 {
                    emit(
                        out,
                        DrawCommand::Fill {
                            rect,
                            clip,
                            color: theme.frame_background,
                        },
                    );
                }
                return;
            }
            _ => {}
        }

        let effect = self.effect(theme);
        let color = if !self.is_enabled() {
            theme.disabled_text
        } else if focused && effect.recolors_text() {
            theme.focused_text
        } else {
            theme.text
        };
        let padding = self.padding_in(theme);
        let origin = Point::new(rect.x + padding.left, rect.y + padding.top);
        let text_clip = clip.intersection(&rect);
        emit(
            out,
            DrawCommand::Text {
                origin,
                clip: text_clip,
                text: self.display_text(),
                color,
            },
        );

        if focused {
            if let WidgetKind::TextInput { cursor, .. } = &self.kind {
                let before = format!("{}{}", self.title, cursor.before_cursor());
                let caret_x = origin.x + theme.metrics.measure(&before).width;
                emit(
                    out,
                    DrawCommand::Fill {
                        rect: Rect::new(caret_x, origin.y, 1, theme.metrics.line_height()),
                        clip: text_clip,
                        color,
                    },
                );
            }
            effect.draw(rect, clip, out);
        }
    }
}

fn join_title(title: &str, body: &str) -> String {
    if title.is_empty() {
        body.to_owned()
    } else {
        format!("{title} {body}")
    }
}

fn expected_kind(kind: &WidgetKind) -> &'static str {
    match kind {
        WidgetKind::Selector { .. } => "index",
        WidgetKind::Toggle { .. } => "bool",
        WidgetKind::TextInput { .. } => "text",
        _ => "none",
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{CellMetrics, SelectionEffect};

    fn theme() -> Theme {
        Theme::default()
            .with_metrics(CellMetrics::new(10, 20))
            .with_widget_padding(Sides::ZERO)
    }

    fn key(code: KeyCode) -> Event {
        Event::key(code)
    }

    #[test]
    fn measure_uses_metrics_and_padding() {
        let t = theme();
        assert_eq!(Widget::button("Play").measure(&t), Size::new(40, 20));
        let padded = Widget::button("Play").padding(Sides::all(2));
        assert_eq!(padded.measure(&t), Size::new(44, 24));
        assert_eq!(Widget::vmargin(12).measure(&t), Size::new(0, 12));
    }

    #[test]
    fn selectable_by_kind() {
        assert!(Widget::button("b").is_selectable());
        assert!(!Widget::label("l").is_selectable());
        assert!(!Widget::vmargin(4).is_selectable());
        assert!(!Widget::frame(PackSpec::vertical()).is_selectable());
    }

    #[test]
    fn selection_margin_only_for_selectable() {
        let t = theme().with_selection(SelectionEffect::highlight());
        assert_eq!(Widget::label("x").selection_margin(&t), Sides::ZERO);
        assert_eq!(
            Widget::button("x").selection_margin(&t),
            SelectionEffect::highlight().margin()
        );
    }

    #[test]
    fn selector_wraps_both_ways() {
        let mut w = Widget::selector("Mode", ["a", "b", "c"], 0);
        assert_eq!(w.update(&key(KeyCode::Left)), WidgetResponse::Changed);
        assert_eq!(w.value(), WidgetValue::Index(2));
        assert_eq!(w.update(&key(KeyCode::Right)), WidgetResponse::Changed);
        assert_eq!(w.value(), WidgetValue::Index(0));
        assert_eq!(w.display_text(), "Mode < a >");
        assert_eq!(w.update(&key(KeyCode::Enter)), WidgetResponse::Returned);
    }

    #[test]
    fn toggle_flips() {
        let mut w = Widget::toggle("Sound", true);
        assert_eq!(w.update(&key(KeyCode::Enter)), WidgetResponse::Changed);
        assert_eq!(w.value(), WidgetValue::Bool(false));
        assert_eq!(w.display_text(), "Sound [OFF]");
    }

    #[test]
    fn text_input_edits_and_returns() {
        let mut w = Widget::text_input("Name: ", "");
        assert_eq!(w.update(&key(KeyCode::Char('a'))), WidgetResponse::Changed);
        assert_eq!(w.update(&key(KeyCode::Left)), WidgetResponse::Consumed);
        assert_eq!(w.update(&key(KeyCode::Home)), WidgetResponse::Consumed);
        assert_eq!(w.update(&key(KeyCode::Enter)), WidgetResponse::Returned);
        assert_eq!(w.value(), WidgetValue::Text("a".into()));
        assert!(w.captures(&KeyEvent::new(KeyCode::Backspace)));
        assert!(!w.captures(&KeyEvent::new(KeyCode::Up)));
    }

    #[test]
    fn readonly_ignores_input() {
        let mut w = Widget::toggle("t", false).readonly();
        assert_eq!(w.update(&key(KeyCode::Enter)), WidgetResponse::Ignored);
        assert!(!w.captures(&KeyEvent::new(KeyCode::Left)));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut w = Widget::button("b");
        let release = Event::Key(
            KeyEvent::new(KeyCode::Enter).with_kind(menukit_core::event::KeyEventKind::Release),
        );
        assert_eq!(w.update(&release), WidgetResponse::Ignored);
    }

    #[test]
    fn set_value_checks_type_and_range() {
        let mut w = Widget::selector("", ["x", "y"], 0);
        assert_eq!(w.set_value(WidgetValue::Index(1)), Ok(true));
        assert_eq!(w.set_value(WidgetValue::Index(1)), Ok(false));
        assert_eq!(
            w.set_value(WidgetValue::Index(5)),
            Err(WidgetError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            w.set_value(WidgetValue::Bool(true)),
            Err(WidgetError::ValueMismatch {
                expected: "index",
                got: "bool"
            })
        );
        assert!(w.reset_value());
        assert_eq!(w.value(), WidgetValue::Index(0));
        assert!(!Widget::button("b").reset_value());
    }

    #[test]
    fn text_input_max_length_rejects_long_values() {
        let mut w = Widget::text_input("", "").max_length(3);
        assert!(matches!(
            w.set_value(WidgetValue::Text("abcd".into())),
            Err(WidgetError::TooLong { len: 4, max: 3 })
        ));
    }

    #[test]
    fn fire_runs_callbacks_and_button_action() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut w = Widget::button("Quit")
            .action(MenuAction::Exit)
            .on_return(move |id, _| {
                log.borrow_mut().push(id.to_string());
                Some(MenuAction::Back)
            });
        let id = WidgetId::from("quit");
        let actions = w.fire(&id, WidgetResponse::Returned);
        assert_eq!(actions, vec![MenuAction::Back, MenuAction::Exit]);
        assert_eq!(*seen.borrow(), vec!["quit".to_string()]);
        assert!(w.fire(&id, WidgetResponse::Changed).is_empty());
    }

    #[test]
    fn on_change_receives_new_value() {
        let seen = Rc::new(RefCell::new(None));
        let log = Rc::clone(&seen);
        let mut w = Widget::toggle("t", false).on_change(move |_, value| {
            *log.borrow_mut() = value.as_bool();
            None
        });
        w.update(&key(KeyCode::Enter));
        w.fire(&WidgetId::from("t"), WidgetResponse::Changed);
        assert_eq!(*seen.borrow(), Some(true));
    }

    #[test]
    fn on_select_reports_focus_direction() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut w = Widget::button("b").on_select(move |_, selected| {
            log.borrow_mut().push(selected);
            selected.then_some(MenuAction::Back)
        });
        let id = WidgetId::from("b");
        assert_eq!(w.fire_select(&id, true), Some(MenuAction::Back));
        assert_eq!(w.fire_select(&id, false), None);
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert_eq!(Widget::label("l").fire_select(&id, true), None);
    }

    #[test]
    fn draw_focused_button_emits_text_and_effect() {
        let t = theme();
        let mut out: Vec<DrawCommand> = Vec::new();
        let rect = Rect::new(10, 10, 40, 20);
        let clip = Rect::new(0, 0, 200, 200);
        Widget::button("Play").draw(rect, clip, true, &t, &mut out);
        assert_eq!(out.len(), 2);
        assert!(matches!(
            &out[0],
            DrawCommand::Text { text, color, .. } if text == "Play" && *color == t.focused_text
        ));
        assert!(matches!(out[1], DrawCommand::Outline { .. }));
    }

    #[test]
    fn draw_text_input_caret() {
        let t = theme();
        let mut out: Vec<DrawCommand> = Vec::new();
        let w = Widget::text_input("N:", "ab");
        w.draw(Rect::new(0, 0, 100, 20), Rect::new(0, 0, 100, 100), true, &t, &mut out);
        assert!(out.iter().any(|cmd| matches!(
            cmd,
            DrawCommand::Fill { rect, .. } if rect.x == 40 && rect.width == 1
        )));
    }
}
