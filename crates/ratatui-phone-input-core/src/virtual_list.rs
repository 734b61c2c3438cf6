use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::render;
use crate::theme::Theme;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use virtualizer::Align;
use virtualizer::VirtualItem;
use virtualizer::Virtualizer;
use virtualizer::VirtualizerOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VirtualListAction {
    None,
    Redraw,
    Activated(usize),
}

#[derive(Clone, Debug)]
pub struct VirtualListViewOptions {
    pub show_scrollbar: bool,
    pub overscan: usize,
    pub style: Style,
    pub scrollbar_style: Style,
    pub cursor_style: Style,
    /// Rows moved per mouse wheel notch.
    pub wheel_step: usize,
}

impl Default for VirtualListViewOptions {
    fn default() -> Self {
        Self {
            show_scrollbar: true,
            overscan: 2,
            style: Style::default(),
            scrollbar_style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            wheel_step: 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VirtualListItemContext {
    pub index: usize,
    pub item: VirtualItem,
    /// Offset into the item due to top clipping (in scroll-axis units).
    pub clip_top: u32,
    pub is_cursor: bool,
}

/// Cursor-driven list that only renders the rows inside its viewport.
///
/// The list does not own its items. Callers pass the item count on every call and draw each
/// visible row from the `render` callback.
pub struct VirtualListView {
    pub viewport: ViewportState,
    options: VirtualListViewOptions,
    virtualizer: Virtualizer,

    cursor: Option<usize>,
    reveal_cursor: bool,
    rows: Vec<(Rect, usize)>,

    cached_width: Option<u16>,
    width_cell: Arc<AtomicU32>,
    estimator: Arc<dyn Fn(usize, u16) -> u32 + Send + Sync>,
}

impl Default for VirtualListView {
    fn default() -> Self {
        let width_cell = Arc::new(AtomicU32::new(0));
        let estimator: Arc<dyn Fn(usize, u16) -> u32 + Send + Sync> = Arc::new(|_, _| 1);
        let v = Self::make_virtualizer(0, width_cell.clone(), estimator.clone(), 2);

        Self {
            viewport: ViewportState::default(),
            options: VirtualListViewOptions::default(),
            virtualizer: v,
            cursor: None,
            reveal_cursor: false,
            rows: Vec::new(),
            cached_width: None,
            width_cell,
            estimator,
        }
    }
}

impl VirtualListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: VirtualListViewOptions) -> Self {
        let mut v = Self::default();
        v.set_options(options);
        v
    }

    pub fn options(&self) -> &VirtualListViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: VirtualListViewOptions) {
        self.options = options;
        self.virtualizer.set_overscan(self.options.overscan);
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn set_fixed_item_size(&mut self, size: u32) {
        self.estimator = Arc::new(move |_, _| size);
        self.virtualizer = Self::make_virtualizer(
            self.virtualizer.count(),
            self.width_cell.clone(),
            self.estimator.clone(),
            self.options.overscan,
        );
        self.cached_width = None;
        self.viewport.clamp();
    }

    pub fn set_cursor(&mut self, cursor: Option<usize>, count: usize) {
        self.cursor = match cursor {
            Some(i) if count > 0 => Some(i.min(count - 1)),
            _ => None,
        };
        // The viewport may not be sized yet; scroll again on the next render.
        self.reveal_cursor = true;
        self.ensure_cursor_visible(count);
    }

    /// Jumps back to the first row, e.g. after the underlying items were filtered.
    pub fn reset(&mut self, count: usize) {
        self.viewport.y = 0;
        self.virtualizer.set_scroll_offset(0);
        self.rows.clear();
        self.set_cursor(Some(0), count);
    }

    pub fn ensure_cursor_visible(&mut self, count: usize) {
        if count == 0 {
            self.cursor = None;
            self.viewport.set_content(self.viewport.viewport_w as u32, 0);
            self.viewport.y = 0;
            return;
        }
        self.sync_virtualizer(count);
        if let Some(cursor) = self.cursor {
            self.virtualizer.scroll_to_index(cursor, Align::Auto);
            self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        }
        self.viewport.clamp();
    }

    /// Index of the row drawn at screen cell `(x, y)` during the last render.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        self.rows
            .iter()
            .find(|(area, _)| render::rect_contains(*area, x, y))
            .map(|(_, idx)| *idx)
    }

    pub fn handle_event(&mut self, event: InputEvent, count: usize) -> VirtualListAction {
        match event {
            InputEvent::Paste(_) => VirtualListAction::None,
            InputEvent::Key(key) => self.handle_key(key, count),
            InputEvent::Mouse(m) => self.handle_mouse(m, count),
        }
    }

    pub fn render<F>(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        count: usize,
        mut render_item: F,
    ) where
        F: FnMut(Rect, VirtualListItemContext, &mut Buffer, &Theme),
    {
        self.rows.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (content_area, scrollbar_x) = if self.options.show_scrollbar && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.x + area.width - 1),
            )
        } else {
            (area, None)
        };

        self.viewport
            .set_viewport(content_area.width, content_area.height);
        self.width_cell
            .store(content_area.width as u32, Ordering::Relaxed);
        if self.cached_width != Some(content_area.width) {
            self.cached_width = Some(content_area.width);
            let closure = Self::estimate_closure(self.width_cell.clone(), self.estimator.clone());
            self.virtualizer.set_estimate_size(closure);
        }

        self.sync_virtualizer(count);
        if std::mem::take(&mut self.reveal_cursor) {
            self.ensure_cursor_visible(count);
        }

        let base_style = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        buf.set_style(content_area, base_style);
        let cursor_style = self.options.cursor_style.patch(theme.accent);

        let scroll = self.virtualizer.scroll_offset();
        let mut items = Vec::new();
        self.virtualizer.collect_virtual_items(&mut items);
        for item in items {
            let rel_start = item.start as i64 - scroll as i64;
            let clip_top = (-rel_start).max(0) as u32;
            let visible_start = rel_start.max(0) as u16;
            let remaining_h = content_area.height.saturating_sub(visible_start);
            let visible_h = item.size.saturating_sub(clip_top).min(remaining_h as u32) as u16;
            if visible_h == 0 {
                continue;
            }

            let item_area = Rect::new(
                content_area.x,
                content_area.y + visible_start,
                content_area.width,
                visible_h,
            );

            let idx = item.index;
            let is_cursor = self.cursor == Some(idx);
            buf.set_style(
                item_area,
                if is_cursor { cursor_style } else { base_style },
            );
            self.rows.push((item_area, idx));

            let ctx = VirtualListItemContext {
                index: idx,
                item,
                clip_top,
                is_cursor,
            };
            render_item(item_area, ctx, buf, theme);
        }

        if let Some(sb_x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(sb_x, area.y, 1, area.height),
                buf,
                &self.viewport,
                self.options.scrollbar_style,
            );
        }
    }

    fn handle_key(&mut self, key: KeyEvent, count: usize) -> VirtualListAction {
        if count == 0 {
            self.cursor = None;
            self.viewport.y = 0;
            return VirtualListAction::None;
        }

        self.sync_virtualizer(count);

        if key.modifiers.ctrl && !key.modifiers.alt {
            let page = self.viewport.viewport_h.saturating_sub(1) as i32;
            match key.code {
                KeyCode::Char('d') => return self.scroll_page(page),
                KeyCode::Char('u') => return self.scroll_page(-page),
                _ => return VirtualListAction::None,
            }
        }

        match key.code {
            KeyCode::Down => self.move_cursor_by(1, count),
            KeyCode::Up => self.move_cursor_by(-1, count),
            KeyCode::PageDown => {
                let page = self.viewport.viewport_h.saturating_sub(1) as i32;
                self.scroll_page(page)
            }
            KeyCode::PageUp => {
                let page = self.viewport.viewport_h.saturating_sub(1) as i32;
                self.scroll_page(-page)
            }
            KeyCode::Home => self.jump_to(0, count),
            KeyCode::End => self.jump_to(count - 1, count),
            KeyCode::Enter => self
                .cursor
                .map(VirtualListAction::Activated)
                .unwrap_or(VirtualListAction::None),
            _ => VirtualListAction::None,
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent, count: usize) -> VirtualListAction {
        if count == 0 {
            return VirtualListAction::None;
        }
        let step = self.options.wheel_step.max(1) as i32;
        match m.kind {
            MouseEventKind::ScrollDown => self.move_cursor_by(step, count),
            MouseEventKind::ScrollUp => self.move_cursor_by(-step, count),
            _ if m.is_left_click() => match self.hit_test(m.x, m.y) {
                Some(idx) if idx < count => {
                    self.cursor = Some(idx);
                    VirtualListAction::Activated(idx)
                }
                _ => VirtualListAction::None,
            },
            _ => VirtualListAction::None,
        }
    }

    fn jump_to(&mut self, idx: usize, count: usize) -> VirtualListAction {
        self.cursor = Some(idx);
        self.ensure_cursor_visible(count);
        VirtualListAction::Redraw
    }

    fn scroll_page(&mut self, delta: i32) -> VirtualListAction {
        self.viewport.scroll_y_by(delta);
        self.virtualizer.set_scroll_offset(self.viewport.y as u64);
        self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        if let Some(i) = self
            .virtualizer
            .index_at_offset(self.virtualizer.scroll_offset())
        {
            self.cursor = Some(i);
        }
        VirtualListAction::Redraw
    }

    fn move_cursor_by(&mut self, delta: i32, count: usize) -> VirtualListAction {
        let cur = self.cursor.unwrap_or(0);
        let next = (cur as i64 + delta as i64).clamp(0, count.saturating_sub(1) as i64) as usize;
        if Some(next) == self.cursor {
            return VirtualListAction::None;
        }
        self.cursor = Some(next);
        self.ensure_cursor_visible(count);
        VirtualListAction::Redraw
    }

    fn sync_virtualizer(&mut self, count: usize) {
        self.virtualizer.set_count(count);
        self.virtualizer
            .set_viewport_size(self.viewport.viewport_h as u32);
        self.virtualizer.set_overscan(self.options.overscan);
        self.virtualizer.set_scroll_offset(self.viewport.y as u64);
        self.viewport.y = self.virtualizer.scroll_offset().min(u32::MAX as u64) as u32;
        self.viewport
            .set_content(self.viewport.viewport_w as u32, self.total_size_u32());
    }

    fn total_size_u32(&self) -> u32 {
        self.virtualizer.total_size().min(u32::MAX as u64) as u32
    }

    fn make_virtualizer(
        count: usize,
        width_cell: Arc<AtomicU32>,
        estimator: Arc<dyn Fn(usize, u16) -> u32 + Send + Sync>,
        overscan: usize,
    ) -> Virtualizer {
        let mut opts = VirtualizerOptions::new(count, Self::estimate_closure(width_cell, estimator));
        opts.overscan = overscan;
        Virtualizer::new(opts)
    }

    fn estimate_closure(
        width_cell: Arc<AtomicU32>,
        estimator: Arc<dyn Fn(usize, u16) -> u32 + Send + Sync>,
    ) -> impl Fn(usize) -> u32 + Send + Sync + 'static {
        move |idx| {
            let w = width_cell.load(Ordering::Relaxed).min(u16::MAX as u32) as u16;
            estimator(idx, w)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key(code)
    }

    #[test]
    fn cursor_moves_and_stays_visible() {
        let mut v = VirtualListView::new();
        v.set_fixed_item_size(1);
        v.viewport.set_viewport(10, 3);
        v.set_cursor(Some(0), 100);
        assert_eq!(v.cursor(), Some(0));
        assert_eq!(v.viewport.y, 0);

        v.handle_event(key(KeyCode::Down), 100);
        v.handle_event(key(KeyCode::Down), 100);
        v.handle_event(key(KeyCode::Down), 100);
        assert_eq!(v.cursor(), Some(3));
        assert_eq!(v.viewport.y, 1);
    }

    #[test]
    fn enter_activates_cursor_row() {
        let mut v = VirtualListView::new();
        v.set_fixed_item_size(1);
        v.viewport.set_viewport(10, 3);
        v.set_cursor(Some(2), 5);
        assert_eq!(
            v.handle_event(key(KeyCode::Enter), 5),
            VirtualListAction::Activated(2)
        );
    }

    #[test]
    fn end_and_home_jump() {
        let mut v = VirtualListView::new();
        v.set_fixed_item_size(1);
        v.viewport.set_viewport(10, 3);
        v.set_cursor(Some(0), 10);
        v.handle_event(key(KeyCode::End), 10);
        assert_eq!(v.cursor(), Some(9));
        v.handle_event(key(KeyCode::Home), 10);
        assert_eq!(v.cursor(), Some(0));
    }

    #[test]
    fn click_on_rendered_row_activates_it() {
        let mut v = VirtualListView::with_options(VirtualListViewOptions {
            show_scrollbar: false,
            ..Default::default()
        });
        v.set_fixed_item_size(1);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        let theme = Theme::default();
        v.set_cursor(Some(0), 20);
        v.render(area, &mut buf, &theme, 20, |_, _, _, _| {});
        assert_eq!(v.hit_test(3, 2), Some(2));
        assert_eq!(
            v.handle_event(InputEvent::click(3, 2), 20),
            VirtualListAction::Activated(2)
        );
        assert_eq!(v.cursor(), Some(2));
        assert_eq!(v.hit_test(3, 9), None);
    }

    #[test]
    fn empty_list_ignores_keys() {
        let mut v = VirtualListView::new();
        v.set_cursor(Some(3), 0);
        assert_eq!(v.cursor(), None);
        assert_eq!(
            v.handle_event(key(KeyCode::Enter), 0),
            VirtualListAction::None
        );
    }
}
