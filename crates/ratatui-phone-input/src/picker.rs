//! Modal country picker: a search box over a filtered, virtualized country list.

use crate::country::Country;
use crate::filter;
use crate::flag::DEFAULT_FALLBACK_FLAG;
use crate::flag::FlagCache;
use crate::flag::FlagLoader;
use crate::flag::FsFlagLoader;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use ratatui_phone_input_core::help::HelpBar;
use ratatui_phone_input_core::help::HelpBarOptions;
use ratatui_phone_input_core::input::InputEvent;
use ratatui_phone_input_core::input::KeyCode;
use ratatui_phone_input_core::input::KeyEvent;
use ratatui_phone_input_core::input::MouseEvent;
use ratatui_phone_input_core::input::MouseEventKind;
use ratatui_phone_input_core::keymap;
use ratatui_phone_input_core::keymap::Binding;
use ratatui_phone_input_core::line_input::LineInput;
use ratatui_phone_input_core::line_input::LineInputAction;
use ratatui_phone_input_core::line_input::LineInputOptions;
use ratatui_phone_input_core::render;
use ratatui_phone_input_core::theme::Theme;
use ratatui_phone_input_core::virtual_list::VirtualListAction;
use ratatui_phone_input_core::virtual_list::VirtualListView;
use std::sync::Arc;

const CLOSE_LABEL: &str = "[x]";
const SEARCH_PREFIX: &str = "/ ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// Click outside the sheet.
    Backdrop,
    /// Close binding or the close control.
    Dismissed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerAction {
    None,
    Redraw,
    Closed(CloseReason),
    /// A country was chosen. The picker is already closed when this is returned.
    Selected(Country),
}

#[derive(Clone, Debug)]
pub struct PickerBindings {
    pub close: Binding,
    pub select: Binding,
    pub navigate: Binding,
}

impl Default for PickerBindings {
    fn default() -> Self {
        Self {
            close: Binding::new("esc", "close", vec![keymap::key(KeyCode::Esc)]),
            select: Binding::new("enter", "select", vec![keymap::key(KeyCode::Enter)]),
            navigate: Binding::new(
                "↑/↓",
                "move",
                vec![
                    keymap::key(KeyCode::Up),
                    keymap::key(KeyCode::Down),
                    keymap::key(KeyCode::PageUp),
                    keymap::key(KeyCode::PageDown),
                    keymap::key_ctrl('u'),
                    keymap::key_ctrl('d'),
                ],
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CountryPickerOptions {
    pub title: String,
    pub search_placeholder: String,
    pub empty_text: String,
    pub fallback_flag: String,
    /// Upper bound for the sheet; it shrinks to fit smaller frames.
    pub max_width: u16,
    pub max_height: u16,
    pub show_help: bool,
    pub bindings: PickerBindings,
}

impl Default for CountryPickerOptions {
    fn default() -> Self {
        Self {
            title: "Select country".to_string(),
            search_placeholder: "Search country...".to_string(),
            empty_text: "No countries found".to_string(),
            fallback_flag: DEFAULT_FALLBACK_FLAG.to_string(),
            max_width: 48,
            max_height: 24,
            show_help: true,
            bindings: PickerBindings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct PickerLayout {
    sheet: Rect,
    close: Rect,
    search: Rect,
    list: Rect,
}

pub struct CountryPicker {
    countries: Arc<[Country]>,
    filtered: Vec<usize>,
    search: LineInput,
    list: VirtualListView,
    flags: FlagCache,
    loader: Arc<dyn FlagLoader + Send + Sync>,
    options: CountryPickerOptions,
    open: bool,
    layout: PickerLayout,
}

impl CountryPicker {
    pub fn new(countries: Arc<[Country]>) -> Self {
        Self::with_options(countries, CountryPickerOptions::default())
    }

    pub fn with_options(countries: Arc<[Country]>, options: CountryPickerOptions) -> Self {
        let mut list = VirtualListView::new();
        list.set_fixed_item_size(1);
        let filtered = (0..countries.len()).collect();
        let search = LineInput::with_options(LineInputOptions {
            placeholder: options.search_placeholder.clone(),
            ..Default::default()
        });
        Self {
            countries,
            filtered,
            search,
            list,
            flags: FlagCache::default(),
            loader: Arc::new(FsFlagLoader),
            options,
            open: false,
            layout: PickerLayout::default(),
        }
    }

    pub fn set_loader(&mut self, loader: Arc<dyn FlagLoader + Send + Sync>) {
        self.loader = loader;
        self.flags.clear();
    }

    pub fn options(&self) -> &CountryPickerOptions {
        &self.options
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        self.search.text()
    }

    pub fn set_query(&mut self, query: &str) {
        self.search.set_text(query);
        self.refilter();
    }

    /// Countries currently shown, in list order.
    pub fn visible(&self) -> impl Iterator<Item = &Country> + '_ {
        self.filtered.iter().map(|&i| &self.countries[i])
    }

    pub fn highlighted(&self) -> Option<&Country> {
        let i = self.list.cursor()?;
        self.filtered.get(i).map(|&idx| &self.countries[idx])
    }

    /// Opens the sheet. The previous search query is kept; the cursor starts on `selected` when
    /// it is visible under that query, otherwise on the first row.
    pub fn open(&mut self, selected: Option<&Country>) {
        self.open = true;
        self.flags.clear();
        self.list.reset(self.filtered.len());
        if let Some(selected) = selected {
            let pos = self
                .filtered
                .iter()
                .position(|&i| self.countries[i] == *selected);
            if pos.is_some() {
                self.list.set_cursor(pos, self.filtered.len());
            }
        }
        tracing::debug!(query = %self.search.text(), "country picker opened");
    }

    pub fn close(&mut self, reason: CloseReason) -> PickerAction {
        self.open = false;
        tracing::debug!(?reason, "country picker closed");
        PickerAction::Closed(reason)
    }

    pub fn handle_event(&mut self, event: InputEvent) -> PickerAction {
        if !self.open {
            return PickerAction::None;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Paste(_) => self.edit_search(event),
            InputEvent::Mouse(m) => self.handle_mouse(m),
        }
    }

    /// Screen position of the search caret from the last render.
    pub fn cursor_pos(&self) -> Option<(u16, u16)> {
        if !self.open {
            return None;
        }
        self.search.cursor_pos(self.layout.search)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.open || area.width == 0 || area.height == 0 {
            self.layout = PickerLayout::default();
            return;
        }

        buf.set_style(area, theme.backdrop);
        let sheet = render::centered_rect(area, self.options.max_width, self.options.max_height);
        Clear.render(sheet, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border)
            .style(theme.sheet)
            .title(format!(" {} ", self.options.title));
        let inner = block.inner(sheet);
        block.render(sheet, buf);

        let close_w = render::str_width(CLOSE_LABEL);
        let close = if sheet.width > close_w + 2 {
            Rect::new(sheet.x + sheet.width - close_w - 1, sheet.y, close_w, 1)
        } else {
            Rect::default()
        };
        render::render_str_clipped(
            close.x,
            close.y,
            0,
            close.width,
            buf,
            CLOSE_LABEL,
            theme.danger,
        );

        let help_h = u16::from(self.options.show_help && inner.height >= 3);
        let search_row = Rect::new(inner.x, inner.y, inner.width, inner.height.min(1));
        let list = Rect::new(
            inner.x,
            inner.y + search_row.height,
            inner.width,
            inner.height.saturating_sub(search_row.height + help_h),
        );

        let prefix_w = render::render_str_clipped(
            search_row.x,
            search_row.y,
            0,
            search_row.width,
            buf,
            SEARCH_PREFIX,
            theme.text_muted,
        );
        let search = Rect::new(
            search_row.x + prefix_w,
            search_row.y,
            search_row.width - prefix_w,
            search_row.height,
        );
        self.search.set_options(LineInputOptions {
            style: theme.text_primary,
            placeholder: self.options.search_placeholder.clone(),
            placeholder_style: theme.text_muted,
        });
        self.search.render_ref(search, buf);

        self.layout = PickerLayout {
            sheet,
            close,
            search,
            list,
        };

        if self.filtered.is_empty() {
            render::render_str_clipped(
                list.x,
                list.y,
                0,
                list.width,
                buf,
                &self.options.empty_text,
                theme.text_muted,
            );
        } else {
            self.render_list(list, buf, theme);
        }

        if help_h > 0 {
            let b = &self.options.bindings;
            let help = HelpBar::with_options(
                vec![b.navigate.clone(), b.select.clone(), b.close.clone()],
                HelpBarOptions {
                    style: theme.text_muted,
                    key_style: theme.accent,
                    ..Default::default()
                },
            );
            help.render_ref(
                Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
                buf,
            );
        }
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let Self {
            countries,
            filtered,
            list,
            flags,
            loader,
            options,
            ..
        } = self;
        let count = filtered.len();
        list.render(area, buf, theme, count, |row, ctx, buf, theme| {
            let Some(country) = filtered.get(ctx.index).map(|&i| &countries[i]) else {
                return;
            };
            let style = if ctx.is_cursor {
                buf[(row.x, row.y)].style()
            } else {
                theme.text_primary
            };
            let flag = flags.glyph(country, &**loader, &options.fallback_flag);
            render_country_row(row, buf, country, flag, style, theme);
        });
    }

    fn handle_key(&mut self, key: KeyEvent) -> PickerAction {
        let b = &self.options.bindings;
        if b.close.matches(&key) {
            return self.close(CloseReason::Dismissed);
        }
        if b.select.matches(&key) {
            return match self.list.cursor() {
                Some(i) => self.select(i),
                None => PickerAction::None,
            };
        }
        if b.navigate.matches(&key) {
            return self.navigate(InputEvent::Key(key));
        }
        self.edit_search(InputEvent::Key(key))
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> PickerAction {
        match m.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                self.navigate(InputEvent::Mouse(m))
            }
            _ if m.is_left_click() => {
                let layout = self.layout;
                if render::rect_contains(layout.close, m.x, m.y) {
                    return self.close(CloseReason::Dismissed);
                }
                if !render::rect_contains(layout.sheet, m.x, m.y) {
                    return self.close(CloseReason::Backdrop);
                }
                if render::rect_contains(layout.list, m.x, m.y) {
                    return self.navigate(InputEvent::Mouse(m));
                }
                PickerAction::None
            }
            _ => PickerAction::None,
        }
    }

    fn navigate(&mut self, event: InputEvent) -> PickerAction {
        match self.list.handle_event(event, self.filtered.len()) {
            VirtualListAction::Activated(i) => self.select(i),
            VirtualListAction::Redraw => PickerAction::Redraw,
            VirtualListAction::None => PickerAction::None,
        }
    }

    fn edit_search(&mut self, event: InputEvent) -> PickerAction {
        let before = filter::normalize_query(self.search.text());
        match self.search.input(event) {
            LineInputAction::Changed => {
                if filter::normalize_query(self.search.text()) != before {
                    self.refilter();
                }
                PickerAction::Redraw
            }
            LineInputAction::Moved => PickerAction::Redraw,
            LineInputAction::Unhandled => PickerAction::None,
        }
    }

    fn refilter(&mut self) {
        self.filtered = filter::filter_indices(&self.countries, self.search.text());
        self.list.reset(self.filtered.len());
    }

    fn select(&mut self, filtered_idx: usize) -> PickerAction {
        let Some(country) = self
            .filtered
            .get(filtered_idx)
            .map(|&i| self.countries[i].clone())
        else {
            return PickerAction::None;
        };
        self.open = false;
        tracing::debug!(country = %country.name, code = %country.calling_code, "country selected");
        PickerAction::Selected(country)
    }
}

/// `<flag> <name> ... +<code>`, with the calling code right-aligned.
fn render_country_row(
    row: Rect,
    buf: &mut Buffer,
    country: &Country,
    flag: &str,
    style: ratatui::style::Style,
    theme: &Theme,
) {
    let code = country.dial_prefix();
    let code_w = render::str_width(&code);
    let mut x = row.x;
    let end = row.x + row.width;

    x += render::render_str_clipped(x, row.y, 0, end - x, buf, flag, style);
    if x < end {
        x += 1;
    }
    let name_room = (end - x).saturating_sub(code_w + 1);
    render::render_str_clipped(x, row.y, 0, name_room, buf, &country.name, style);

    if row.width > code_w {
        let code_style = if style == theme.text_primary {
            theme.text_muted
        } else {
            style
        };
        render::render_str_clipped(end - code_w, row.y, 0, code_w, buf, &code, code_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::Flag;
    use crate::country::builtin;

    fn screen(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    fn typed(picker: &mut CountryPicker, s: &str) {
        for c in s.chars() {
            picker.handle_event(InputEvent::key(KeyCode::Char(c)));
        }
    }

    fn rendered(picker: &mut CountryPicker, w: u16, h: u16) -> Buffer {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        picker.render(area, &mut buf, &Theme::default());
        buf
    }

    #[test]
    fn closed_picker_ignores_events() {
        let mut p = CountryPicker::new(builtin());
        assert_eq!(
            p.handle_event(InputEvent::key(KeyCode::Enter)),
            PickerAction::None
        );
        assert!(!p.is_open());
    }

    #[test]
    fn search_then_enter_selects_and_closes() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        typed(&mut p, "viet");
        assert_eq!(p.visible().count(), 1);
        let action = p.handle_event(InputEvent::key(KeyCode::Enter));
        let PickerAction::Selected(c) = action else {
            panic!("expected selection, got {action:?}");
        };
        assert_eq!(c.name, "Vietnam");
        assert_eq!(c.calling_code, "84");
        assert!(!p.is_open());
    }

    #[test]
    fn query_survives_close_and_reopen() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        typed(&mut p, "United");
        assert_eq!(
            p.handle_event(InputEvent::key(KeyCode::Esc)),
            PickerAction::Closed(CloseReason::Dismissed)
        );
        p.open(None);
        assert_eq!(p.query(), "United");
        let names: Vec<_> = p.visible().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["United Arab Emirates", "United Kingdom", "United States"]
        );
    }

    #[test]
    fn arrow_keys_move_highlight_not_query() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        typed(&mut p, "united");
        p.handle_event(InputEvent::key(KeyCode::Down));
        assert_eq!(p.highlighted().map(|c| c.name.as_str()), Some("United Kingdom"));
        assert_eq!(p.query(), "united");
        let PickerAction::Selected(c) = p.handle_event(InputEvent::key(KeyCode::Enter)) else {
            panic!("expected selection");
        };
        assert_eq!(c.name, "United Kingdom");
    }

    #[test]
    fn open_starts_on_selected_country() {
        let list = builtin();
        let vn = list.iter().find(|c| c.name == "Vietnam").cloned().unwrap();
        let mut p = CountryPicker::new(list);
        p.open(Some(&vn));
        assert_eq!(p.highlighted(), Some(&vn));
    }

    #[test]
    fn enter_with_no_matches_does_nothing() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        typed(&mut p, "atlantis");
        assert_eq!(p.visible().count(), 0);
        assert_eq!(
            p.handle_event(InputEvent::key(KeyCode::Enter)),
            PickerAction::None
        );
        assert!(p.is_open());
        let buf = rendered(&mut p, 60, 20);
        assert!(screen(&buf).iter().any(|l| l.contains("No countries found")));
    }

    #[test]
    fn backdrop_click_closes() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        rendered(&mut p, 80, 30);
        assert_eq!(
            p.handle_event(InputEvent::click(0, 0)),
            PickerAction::Closed(CloseReason::Backdrop)
        );
        assert!(!p.is_open());
    }

    #[test]
    fn close_control_click_closes() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        let buf = rendered(&mut p, 80, 30);
        let close = p.layout.close;
        assert_eq!(buf[(close.x, close.y)].symbol(), "[");
        assert_eq!(
            p.handle_event(InputEvent::click(close.x + 1, close.y)),
            PickerAction::Closed(CloseReason::Dismissed)
        );
    }

    #[test]
    fn row_click_selects_that_row() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        typed(&mut p, "united");
        rendered(&mut p, 80, 30);
        let list = p.layout.list;
        let PickerAction::Selected(c) = p.handle_event(InputEvent::click(list.x + 2, list.y + 2))
        else {
            panic!("expected selection");
        };
        assert_eq!(c.name, "United States");
        assert!(!p.is_open());
    }

    #[test]
    fn click_inside_sheet_outside_list_keeps_open() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        rendered(&mut p, 80, 30);
        let search = p.layout.search;
        assert_eq!(
            p.handle_event(InputEvent::click(search.x, search.y)),
            PickerAction::None
        );
        assert!(p.is_open());
    }

    #[test]
    fn missing_flag_renders_fallback_glyph() {
        let countries: Arc<[Country]> = vec![
            Country::new("Zzz", "999", Flag::Missing),
            Country::with_iso("Vietnam", "VN", "84"),
        ]
        .into();
        let mut p = CountryPicker::new(countries);
        p.open(None);
        let buf = rendered(&mut p, 40, 10);
        let lines = screen(&buf);
        let zzz = lines.iter().find(|l| l.contains("Zzz")).unwrap();
        assert!(zzz.contains(DEFAULT_FALLBACK_FLAG));
        assert!(zzz.contains("+999"));
        assert!(lines.iter().any(|l| l.contains("Vietnam")));
    }

    #[test]
    fn render_shows_title_search_placeholder_and_help() {
        let mut p = CountryPicker::new(builtin());
        p.open(None);
        let buf = rendered(&mut p, 60, 20);
        let lines = screen(&buf);
        assert!(lines.iter().any(|l| l.contains("Select country")));
        assert!(lines.iter().any(|l| l.contains("Search country...")));
        assert!(lines.iter().any(|l| l.contains("esc close")));
        assert!(p.cursor_pos().is_some());
    }
}
