use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, Default)]
pub struct LineInputOptions {
    pub style: Style,
    pub placeholder: String,
    pub placeholder_style: Style,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineInputAction {
    /// The event is not an editing event; the caller may route it elsewhere.
    Unhandled,
    Moved,
    Changed,
}

/// Single-line text editor used for the number field and the picker search box.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    cursor: usize, // char index
    pub state: ViewportState,
    options: LineInputOptions,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LineInputOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &LineInputOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LineInputOptions) {
        self.options = options;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, col: usize) {
        self.cursor = col.min(self.char_len());
        self.ensure_cursor_visible();
    }

    /// Replaces the text and moves the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = single_line(&text.into());
        self.cursor = self.char_len();
        self.recompute_content_size();
        self.ensure_cursor_visible();
    }

    /// Adopts an externally owned value, keeping the cursor where it is when possible.
    pub fn sync(&mut self, text: &str) {
        if self.text == text {
            return;
        }
        self.text = single_line(text);
        self.cursor = self.cursor.min(self.char_len());
        self.recompute_content_size();
        self.ensure_cursor_visible();
    }

    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let x = (self.cursor_display_x() as u32).checked_sub(self.state.x)?;
        if x >= area.width as u32 {
            return None;
        }
        Some((area.x + x as u16, area.y))
    }

    pub fn input(&mut self, event: InputEvent) -> LineInputAction {
        match event {
            InputEvent::Paste(s) => {
                let s = single_line(&s);
                if s.is_empty() {
                    return LineInputAction::Moved;
                }
                for ch in s.chars() {
                    self.insert_char(ch);
                }
                self.after_edit()
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) => LineInputAction::Unhandled,
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.state.set_viewport(area.width, 1);
        self.recompute_content_size();
        self.ensure_cursor_visible();

        let line = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(line, self.options.style);
        if self.text.is_empty() {
            let style = self.options.style.patch(self.options.placeholder_style);
            render::render_str_clipped(
                area.x,
                area.y,
                0,
                area.width,
                buf,
                &self.options.placeholder,
                style,
            );
            return;
        }
        render::render_str_clipped(
            area.x,
            area.y,
            self.state.x,
            area.width,
            buf,
            &self.text,
            self.options.style,
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> LineInputAction {
        if let Some(c) = key.text_char() {
            self.insert_char(c);
            return self.after_edit();
        }
        match key.code {
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return LineInputAction::Moved;
                }
                self.remove_char(self.cursor - 1);
                self.cursor -= 1;
                self.after_edit()
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return LineInputAction::Moved;
                }
                self.remove_char(self.cursor);
                self.after_edit()
            }
            KeyCode::Left => self.move_to(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_to(self.cursor + 1),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.char_len()),
            _ => LineInputAction::Unhandled,
        }
    }

    fn after_edit(&mut self) -> LineInputAction {
        self.recompute_content_size();
        self.ensure_cursor_visible();
        LineInputAction::Changed
    }

    fn move_to(&mut self, col: usize) -> LineInputAction {
        self.cursor = col.min(self.char_len());
        self.ensure_cursor_visible();
        LineInputAction::Moved
    }

    fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        let idx = byte_index_from_char_index(&self.text, self.cursor);
        self.text.insert(idx, ch);
        self.cursor += 1;
    }

    fn remove_char(&mut self, char_idx: usize) {
        let start = byte_index_from_char_index(&self.text, char_idx);
        let end = byte_index_from_char_index(&self.text, char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn recompute_content_size(&mut self) {
        self.state
            .set_content(UnicodeWidthStr::width(self.text.as_str()) as u32, 1);
    }

    fn ensure_cursor_visible(&mut self) {
        self.state.reveal_x(self.cursor_display_x() as u32);
        self.state.clamp();
    }

    fn cursor_display_x(&self) -> usize {
        self.text
            .chars()
            .take(self.cursor)
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }
}

fn byte_index_from_char_index(s: &str, char_idx: usize) -> usize {
    match s.char_indices().nth(char_idx) {
        Some((i, _)) => i,
        None => s.len(),
    }
}

fn single_line(s: &str) -> String {
    s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key(code)
    }

    #[test]
    fn inserts_and_moves_cursor() {
        let mut li = LineInput::new();
        assert_eq!(li.input(key(KeyCode::Char('a'))), LineInputAction::Changed);
        assert_eq!(li.text(), "a");
        assert_eq!(li.cursor(), 1);
        assert_eq!(li.input(key(KeyCode::Left)), LineInputAction::Moved);
        li.input(key(KeyCode::Char('b')));
        assert_eq!(li.text(), "ba");
        assert_eq!(li.cursor(), 1);
    }

    #[test]
    fn backspace_and_delete_edit_around_cursor() {
        let mut li = LineInput::new();
        li.set_text("abc");
        li.set_cursor(1);
        assert_eq!(li.input(key(KeyCode::Backspace)), LineInputAction::Changed);
        assert_eq!(li.text(), "bc");
        assert_eq!(li.input(key(KeyCode::Delete)), LineInputAction::Changed);
        assert_eq!(li.text(), "c");
        assert_eq!(li.cursor(), 0);
        assert_eq!(li.input(key(KeyCode::Backspace)), LineInputAction::Moved);
    }

    #[test]
    fn paste_drops_newlines() {
        let mut li = LineInput::new();
        li.input(InputEvent::Paste("09\n12\r\n34".to_string()));
        assert_eq!(li.text(), "091234");
        assert_eq!(li.cursor(), 6);
    }

    #[test]
    fn shortcuts_and_navigation_keys_are_unhandled() {
        let mut li = LineInput::new();
        let ctrl_o = KeyEvent::new(KeyCode::Char('o')).with_modifiers(KeyModifiers::ctrl());
        assert_eq!(li.input(InputEvent::Key(ctrl_o)), LineInputAction::Unhandled);
        assert_eq!(li.input(key(KeyCode::Up)), LineInputAction::Unhandled);
        assert_eq!(li.input(key(KeyCode::Enter)), LineInputAction::Unhandled);
        assert!(li.is_empty());
    }

    #[test]
    fn sync_keeps_cursor_when_value_shrinks() {
        let mut li = LineInput::new();
        li.set_text("0912");
        li.set_cursor(2);
        li.sync("912");
        assert_eq!(li.text(), "912");
        assert_eq!(li.cursor(), 2);
        li.sync("9");
        assert_eq!(li.cursor(), 1);
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let mut li = LineInput::with_options(LineInputOptions {
            placeholder: "Phone".to_string(),
            ..Default::default()
        });
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        li.render_ref(area, &mut buf);
        let s: String = (0..8)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(s, "Phone   ");
        assert_eq!(li.cursor_pos(area), Some((0, 0)));
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut li = LineInput::new();
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        li.render_ref(area, &mut buf);
        li.input(InputEvent::Paste("123456".to_string()));
        li.render_ref(area, &mut buf);
        let s: String = (0..4)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(s, "456 ");
        assert_eq!(li.cursor_pos(area), Some((3, 0)));
    }
}
