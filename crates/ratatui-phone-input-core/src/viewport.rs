/// Scroll offsets of a view over content that may be larger than its viewport.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub x: u32,
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_w: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        self.viewport_w = w;
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, w: u32, h: u32) {
        self.content_w = w;
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
        self.x = self.x.min(self.max_x());
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    /// Scrolls horizontally just enough for column `col` to be inside the viewport.
    pub fn reveal_x(&mut self, col: u32) {
        if col < self.x {
            self.x = col;
        } else if self.viewport_w > 0 && col >= self.x + self.viewport_w as u32 {
            self.x = col + 1 - self.viewport_w as u32;
        }
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }

    // One extra column so a caret can sit after the last character.
    fn max_x(&self) -> u32 {
        (self.content_w + 1).saturating_sub(self.viewport_w as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_clamps_both_axes() {
        let mut s = ViewportState::default();
        s.set_viewport(10, 5);
        s.set_content(12, 6);
        s.x = 99;
        s.y = 99;
        s.clamp();
        assert_eq!(s.x, 3);
        assert_eq!(s.y, 1);
    }

    #[test]
    fn reveal_x_scrolls_minimally() {
        let mut s = ViewportState::default();
        s.set_viewport(4, 1);
        s.set_content(20, 1);
        s.reveal_x(6);
        assert_eq!(s.x, 3);
        s.reveal_x(1);
        assert_eq!(s.x, 1);
        s.reveal_x(3);
        assert_eq!(s.x, 1);
    }
}
