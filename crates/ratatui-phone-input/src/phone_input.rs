//! The phone number row: flag + calling-code selector next to a digit field.

use crate::country::Country;
use crate::flag::FlagImage;
use crate::flag::FlagLoader;
use crate::flag::FsFlagLoader;
use crate::picker::CloseReason;
use crate::picker::CountryPicker;
use crate::picker::CountryPickerOptions;
use crate::picker::PickerAction;
use crate::sanitize;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use ratatui_phone_input_core::input::InputEvent;
use ratatui_phone_input_core::input::KeyCode;
use ratatui_phone_input_core::input::KeyEvent;
use ratatui_phone_input_core::input::MouseEvent;
use ratatui_phone_input_core::keymap;
use ratatui_phone_input_core::keymap::Binding;
use ratatui_phone_input_core::line_input::LineInput;
use ratatui_phone_input_core::line_input::LineInputAction;
use ratatui_phone_input_core::line_input::LineInputOptions;
use ratatui_phone_input_core::render;
use ratatui_phone_input_core::theme::Theme;
use std::sync::Arc;

const CHEVRON: &str = " ▾";
const DIVIDER: &str = " │ ";

/// What the parent should do after an event.
///
/// The parent owns the selected country and the national number; the two `*Changed` variants
/// are the only way this widget reports new values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhoneInputAction {
    None,
    Redraw,
    PickerOpened,
    PickerClosed,
    CountryChanged(Country),
    /// Sanitized digits; replaces the previous value entirely.
    NationalNumberChanged(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    Selector,
    #[default]
    Number,
}

#[derive(Clone, Debug)]
pub struct PhoneInputBindings {
    pub open_picker: Binding,
    pub switch_focus: Binding,
    /// Opens the picker while the selector has focus.
    pub activate_selector: Binding,
}

impl Default for PhoneInputBindings {
    fn default() -> Self {
        Self {
            open_picker: Binding::new("ctrl+o", "country", vec![keymap::key_ctrl('o')]),
            switch_focus: Binding::new(
                "tab",
                "switch",
                vec![keymap::key(KeyCode::Tab), keymap::key(KeyCode::BackTab)],
            ),
            activate_selector: Binding::new(
                "enter",
                "choose country",
                vec![keymap::key(KeyCode::Enter), keymap::key_char(' ')],
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PhoneInputOptions {
    pub placeholder: String,
    pub auto_strip_leading_zero: bool,
    /// Patched over the theme; visual only.
    pub container_style: Style,
    pub selector_style: Style,
    pub input_style: Style,
    pub picker: CountryPickerOptions,
    pub bindings: PhoneInputBindings,
}

impl Default for PhoneInputOptions {
    fn default() -> Self {
        Self {
            placeholder: "Phone number".to_string(),
            auto_strip_leading_zero: true,
            container_style: Style::default(),
            selector_style: Style::default(),
            input_style: Style::default(),
            picker: CountryPickerOptions::default(),
            bindings: PhoneInputBindings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct RowLayout {
    selector: Rect,
    number: Rect,
}

/// Controlled phone number input.
///
/// Pass the current country and national number on every `handle_event` and `render` call and
/// apply the returned [`PhoneInputAction`]s. Render the picker overlay last with
/// [`PhoneInput::render_overlay`] so it covers the rest of the frame.
pub struct PhoneInput {
    options: PhoneInputOptions,
    picker: CountryPicker,
    number: LineInput,
    focus: Focus,
    flag: Option<(String, FlagImage)>,
    loader: Arc<dyn FlagLoader + Send + Sync>,
    layout: RowLayout,
}

impl PhoneInput {
    pub fn new(countries: Arc<[Country]>) -> Self {
        Self::with_options(countries, PhoneInputOptions::default())
    }

    pub fn with_options(countries: Arc<[Country]>, options: PhoneInputOptions) -> Self {
        let picker = CountryPicker::with_options(countries, options.picker.clone());
        Self {
            options,
            picker,
            number: LineInput::new(),
            focus: Focus::default(),
            flag: None,
            loader: Arc::new(FsFlagLoader),
            layout: RowLayout::default(),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn FlagLoader + Send + Sync>) -> Self {
        self.picker.set_loader(loader.clone());
        self.loader = loader;
        self.flag = None;
        self
    }

    pub fn options(&self) -> &PhoneInputOptions {
        &self.options
    }

    pub fn picker(&self) -> &CountryPicker {
        &self.picker
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker.is_open()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn open_picker(&mut self, current: &Country) -> PhoneInputAction {
        self.picker.open(Some(current));
        PhoneInputAction::PickerOpened
    }

    pub fn close_picker(&mut self) -> PhoneInputAction {
        if !self.picker.is_open() {
            return PhoneInputAction::None;
        }
        self.picker.close(CloseReason::Dismissed);
        PhoneInputAction::PickerClosed
    }

    pub fn handle_event(
        &mut self,
        event: InputEvent,
        country: &Country,
        national_number: &str,
    ) -> PhoneInputAction {
        if self.picker.is_open() {
            return match self.picker.handle_event(event) {
                PickerAction::None => PhoneInputAction::None,
                PickerAction::Redraw => PhoneInputAction::Redraw,
                PickerAction::Closed(_) => PhoneInputAction::PickerClosed,
                PickerAction::Selected(c) => PhoneInputAction::CountryChanged(c),
            };
        }

        match event {
            InputEvent::Key(key) => self.handle_key(key, country, national_number),
            InputEvent::Paste(_) => {
                self.focus = Focus::Number;
                self.edit_number(event, national_number)
            }
            InputEvent::Mouse(m) => self.handle_mouse(m, country, national_number),
        }
    }

    /// Caret position for `Frame::set_cursor_position`, from the last render.
    pub fn cursor_pos(&self) -> Option<(u16, u16)> {
        if self.picker.is_open() {
            return self.picker.cursor_pos();
        }
        match self.focus {
            Focus::Number => self.number.cursor_pos(self.layout.number),
            Focus::Selector => None,
        }
    }

    /// Draws the row. Areas at least three rows tall get a border.
    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        country: &Country,
        national_number: &str,
    ) {
        if area.width == 0 || area.height == 0 {
            self.layout = RowLayout::default();
            return;
        }

        let container = theme.text_primary.patch(self.options.container_style);
        let inner = if area.height >= 3 {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border.patch(self.options.container_style))
                .style(container);
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            buf.set_style(area, container);
            area
        };
        let line = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1) / 2, inner.width, 1);

        let mut selector_style = container.patch(self.options.selector_style);
        if self.focus == Focus::Selector && !self.picker.is_open() {
            selector_style = selector_style.patch(theme.accent).add_modifier(Modifier::REVERSED);
        }
        let fallback = self.options.picker.fallback_flag.as_str();
        let key = country.key();
        if self.flag.as_ref().is_none_or(|(k, _)| *k != key) {
            self.flag = Some((key, FlagImage::new()));
        }
        let flag = match self.flag.as_mut() {
            Some((_, image)) => image.glyph(country, &*self.loader, fallback),
            None => fallback,
        };

        let prefix = country.dial_prefix();
        let mut x = line.x;
        let end = line.x + line.width;
        for part in [flag, " ", prefix.as_str(), CHEVRON] {
            x += render::render_str_clipped(x, line.y, 0, end - x, buf, part, selector_style);
        }
        let selector = Rect::new(line.x, line.y, x - line.x, 1);
        x += render::render_str_clipped(x, line.y, 0, end - x, buf, DIVIDER, theme.text_muted);

        let number = Rect::new(x, line.y, end - x, 1);
        self.number.set_options(LineInputOptions {
            style: container.patch(self.options.input_style),
            placeholder: self.options.placeholder.clone(),
            placeholder_style: theme.text_muted,
        });
        self.number.sync(national_number);
        self.number.render_ref(number, buf);

        self.layout = RowLayout { selector, number };
    }

    /// Draws the country picker over `area` (usually the whole frame) when it is open.
    pub fn render_overlay(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.picker.render(area, buf, theme);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        country: &Country,
        national_number: &str,
    ) -> PhoneInputAction {
        let b = &self.options.bindings;
        if b.open_picker.matches(&key) {
            return self.open_picker(country);
        }
        if b.switch_focus.matches(&key) {
            self.focus = match self.focus {
                Focus::Selector => Focus::Number,
                Focus::Number => Focus::Selector,
            };
            return PhoneInputAction::Redraw;
        }
        match self.focus {
            Focus::Selector if b.activate_selector.matches(&key) => self.open_picker(country),
            Focus::Selector => PhoneInputAction::None,
            Focus::Number => self.edit_number(InputEvent::Key(key), national_number),
        }
    }

    fn handle_mouse(
        &mut self,
        m: MouseEvent,
        country: &Country,
        national_number: &str,
    ) -> PhoneInputAction {
        if !m.is_left_click() {
            return PhoneInputAction::None;
        }
        if render::rect_contains(self.layout.selector, m.x, m.y) {
            self.focus = Focus::Selector;
            return self.open_picker(country);
        }
        if render::rect_contains(self.layout.number, m.x, m.y) {
            self.focus = Focus::Number;
            self.number.sync(national_number);
            // Digits are one cell wide, so a column maps straight to a char index.
            let col = (m.x - self.layout.number.x) as usize + self.number.state.x as usize;
            self.number.set_cursor(col);
            return PhoneInputAction::Redraw;
        }
        PhoneInputAction::None
    }

    fn edit_number(&mut self, event: InputEvent, national_number: &str) -> PhoneInputAction {
        self.number.sync(national_number);
        match self.number.input(event) {
            LineInputAction::Changed => {
                let strip = self.options.auto_strip_leading_zero;
                let raw = self.number.text().to_string();
                let digits = sanitize::sanitize_national_number(&raw, strip);
                let cursor = sanitize::sanitized_cursor(&raw, self.number.cursor(), strip);
                self.number.set_text(digits.clone());
                self.number.set_cursor(cursor);
                PhoneInputAction::NationalNumberChanged(digits)
            }
            LineInputAction::Moved => PhoneInputAction::Redraw,
            LineInputAction::Unhandled => PhoneInputAction::None,
        }
    }
}
