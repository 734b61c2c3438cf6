use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::viewport::ViewportState;

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if state.content_h <= state.viewport_h as u32 || state.content_h == 0 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let thumb_top = ((state.y as f64 / max_y) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Writes `input` starting at display column `start_col`, never past `max_cols` cells.
///
/// Wide characters that straddle either edge are skipped rather than split. Returns the number
/// of cells written.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    let mut w = ClipWriter::new(x, y, start_col, max_cols);
    w.push_str(buf, input, style);
    w.written()
}

/// Span flavour of [`render_str_clipped`]. Spans with a default style use `fallback_style`.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback_style: Style,
) -> u16 {
    let mut w = ClipWriter::new(x, y, start_col, max_cols);
    for span in spans {
        let style = if span.style == Style::default() {
            fallback_style
        } else {
            span.style
        };
        if !w.push_str(buf, span.content.as_ref(), style) {
            break;
        }
    }
    w.written()
}

pub fn str_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

pub fn rect_contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x
        && y >= area.y
        && (x as u32) < area.x as u32 + area.width as u32
        && (y as u32) < area.y as u32 + area.height as u32
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

struct ClipWriter {
    x: u16,
    y: u16,
    start_col: usize,
    max_cols: usize,
    col: usize,
    out_cols: usize,
}

impl ClipWriter {
    fn new(x: u16, y: u16, start_col: u32, max_cols: u16) -> Self {
        Self {
            x,
            y,
            start_col: start_col as usize,
            max_cols: max_cols as usize,
            col: 0,
            out_cols: 0,
        }
    }

    fn written(&self) -> u16 {
        self.out_cols as u16
    }

    /// Returns `false` once the clip width is exhausted.
    fn push_str(&mut self, buf: &mut Buffer, input: &str, style: Style) -> bool {
        let mut tmp = [0u8; 4];
        for ch in input.chars() {
            if ch == '\t' {
                for _ in 0..4 {
                    if !self.put(buf, " ", 1, style) {
                        return false;
                    }
                }
                continue;
            }
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if !self.put(buf, ch.encode_utf8(&mut tmp), w, style) {
                return false;
            }
        }
        true
    }

    fn put(&mut self, buf: &mut Buffer, symbol: &str, w: usize, style: Style) -> bool {
        if self.col + w <= self.start_col || self.col < self.start_col {
            self.col += w;
            return true;
        }
        if self.out_cols + w > self.max_cols {
            return false;
        }
        let cx = self.x + self.out_cols as u16;
        if let Some(cell) = buf.cell_mut((cx, self.y)) {
            cell.set_style(style);
            cell.set_symbol(symbol);
        }
        for extra in 1..w {
            if let Some(cell) = buf.cell_mut((cx + extra as u16, self.y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        self.out_cols += w;
        self.col += w;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn render_spans_clipped_expands_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let spans = vec![Span::raw("\t1")];
        render_spans_clipped(0, 0, 0, 6, &mut buf, &spans, Style::default());
        assert!(row(&buf, 0).starts_with("    1"));
    }

    #[test]
    fn render_str_clipped_skips_wide_char_on_left_edge() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 1));
        let n = render_str_clipped(0, 0, 1, 4, &mut buf, "你好", Style::default());
        assert_eq!(n, 2);
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "好");
    }

    #[test]
    fn render_str_clipped_stops_at_max_cols() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 1));
        let n = render_str_clipped(0, 0, 0, 3, &mut buf, "0912345", Style::default());
        assert_eq!(n, 3);
        assert_eq!(row(&buf, 0), "091     ");
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(2, 2, 3, 1);
        assert!(rect_contains(r, 2, 2));
        assert!(rect_contains(r, 4, 2));
        assert!(!rect_contains(r, 5, 2));
        assert!(!rect_contains(r, 2, 3));
    }

    #[test]
    fn centered_rect_shrinks_to_fit() {
        let r = centered_rect(Rect::new(0, 0, 10, 4), 20, 2);
        assert_eq!(r, Rect::new(0, 1, 10, 2));
    }

    #[test]
    fn render_scrollbar_does_not_panic() {
        let mut state = ViewportState::default();
        state.set_viewport(10, 5);
        state.set_content(10, 50);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 5));
        render_scrollbar(Rect::new(0, 0, 1, 5), &mut buf, &state, Style::default());
    }
}
