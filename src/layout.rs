use raylib::prelude::*;
use crate::constants::*;

/// Something on screen the pointer can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Prev,
    Next,
    Dot(usize),
}

/// Where the slideshow controls sit for a given window size.
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub prev: Option<Rectangle>,
    pub next: Option<Rectangle>,
    pub dots: Vec<Rectangle>,
}

impl Layout {
    /// Arrows only get a rectangle when the page has the matching button.
    pub fn new(width: f32, height: f32, dot_count: usize, has_prev: bool, has_next: bool) -> Layout {
        let arrow_y = (height - ARROW_SIZE) * 0.5;
        let prev = has_prev.then(|| Rectangle::new(ARROW_MARGIN, arrow_y, ARROW_SIZE, ARROW_SIZE));
        let next = has_next
            .then(|| Rectangle::new(width - ARROW_MARGIN - ARROW_SIZE, arrow_y, ARROW_SIZE, ARROW_SIZE));

        // Dots are centered as a strip along the bottom edge
        let strip_width = dot_count.saturating_sub(1) as f32 * DOT_SPACING;
        let first_x = width * 0.5 - strip_width * 0.5;
        let y = height - DOT_MARGIN_BOTTOM;
        let dots = (0..dot_count)
            .map(|i| {
                let x = first_x + i as f32 * DOT_SPACING;
                Rectangle::new(x - DOT_RADIUS, y - DOT_RADIUS, DOT_RADIUS * 2.0, DOT_RADIUS * 2.0)
            })
            .collect();

        Layout { width, height, prev, next, dots }
    }

    pub fn control_at(&self, point: Vector2) -> Option<Control> {
        if self.prev.is_some_and(|r| contains(&r, point)) {
            return Some(Control::Prev);
        }
        if self.next.is_some_and(|r| contains(&r, point)) {
            return Some(Control::Next);
        }
        self.dots.iter().position(|r| contains(r, point)).map(Control::Dot)
    }
}

fn contains(rect: &Rectangle, point: Vector2) -> bool {
    point.x >= rect.x && point.x < rect.x + rect.width && point.y >= rect.y && point.y < rect.y + rect.height
}

/// Scale that fits an image into `FIT_RATIO` of the view along its long side,
/// never enlarging it.
pub fn fit_scale(image_width: f32, image_height: f32, view_width: f32, view_height: f32) -> f32 {
    if image_width <= 0.0 || image_height <= 0.0 {
        return 1.0;
    }
    let max_width = view_width * FIT_RATIO;
    let max_height = view_height * FIT_RATIO;
    (max_width / image_width).min(max_height / image_height).min(1.0)
}
