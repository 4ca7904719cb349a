//! raylib window driving a [`Slideshow`].
//!
//! Each frame: load at most one image, advance the slideshow clock to the
//! wall time, turn this frame's input into page events, then paint what the
//! page says is active.

use std::collections::VecDeque;
use std::path::Path;

use raylib::prelude::*;
use tracing::{debug, warn};

use crate::constants::*;
use crate::input::PageEvent;
use crate::layout::{Control, Layout};
use crate::page::{ElementId, Page};
use crate::slide::Slide;
use crate::slideshow::Slideshow;
use crate::texture_loader::load_texture_with_exif_rotation;

/// What the left button went down on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Press {
    Control(Control),
    Swipe,
}

/// Cross-fade from the previously shown slide to the current one.
struct Fade {
    shown: usize,
    previous: Option<usize>,
    tween: ease::Tween,
    duration: f32,
    alpha: f32,
}

impl Fade {
    fn new(duration_ms: u64) -> Self {
        let duration = duration_ms as f32 / 1000.0;
        Self {
            shown: 0,
            previous: None,
            tween: ease::Tween::new(ease::cubic_out, 0.0, 1.0, duration),
            duration,
            alpha: 1.0,
        }
    }

    fn update(&mut self, current: usize, dt: f32) {
        if current != self.shown {
            self.previous = Some(self.shown);
            self.shown = current;
            self.tween = ease::Tween::new(ease::cubic_out, 0.0, 1.0, self.duration);
            self.alpha = 0.0;
        }
        if self.previous.is_none() {
            return;
        }

        self.alpha = self.tween.apply(dt);
        // A zero-length tween never reports completion on its own
        if self.duration <= 0.0 || self.tween.has_completed() {
            self.previous = None;
            self.alpha = 1.0;
        }
    }
}

pub struct App {
    slideshow: Slideshow,
    slides: Vec<Option<Slide>>,
    pending: VecDeque<usize>,
    fade: Fade,
    pointer_inside: bool,
    press: Option<Press>,
    titled: Option<usize>,
    started_at: f64,
}

impl App {
    pub fn new(slideshow: Slideshow, rl: &RaylibHandle) -> Self {
        let count = slideshow.slide_count();
        let fade = Fade::new(slideshow.config().transition_duration);
        Self {
            slideshow,
            slides: (0..count).map(|_| None).collect(),
            pending: (0..count).collect(),
            fade,
            pointer_inside: false,
            press: None,
            titled: None,
            started_at: rl.get_time(),
        }
    }

    pub fn run(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        while !rl.window_should_close() {
            let dt = rl.get_frame_time();

            self.load_next_image(rl, thread);

            let now_ms = ((rl.get_time() - self.started_at) * 1000.0).max(0.0) as u64;
            self.slideshow.advance_to(now_ms);

            let anchors = self.slideshow.anchors();
            let layout = Layout::new(
                rl.get_screen_width() as f32,
                rl.get_screen_height() as f32,
                self.slideshow.slide_count(),
                anchors.prev.is_some(),
                anchors.next.is_some(),
            );
            for event in self.collect_events(rl, &layout) {
                self.slideshow.dispatch(event);
            }

            self.fade.update(self.slideshow.current_index(), dt);
            self.update_title(rl, thread);

            let mut d = rl.begin_drawing(thread);
            self.draw(&mut d, &layout);
        }
    }

    fn update_title(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let current = self.slideshow.current_index();
        if self.titled == Some(current) {
            return;
        }
        if let Some(slide) = self.slideshow.active_slide() {
            rl.set_window_title(thread, &format!("Carousel - {}", slide.alt_text));
        }
        self.titled = Some(current);
    }

    /// Images load one per frame so the window stays responsive. A failed
    /// image still counts as settled and its alt text is shown instead.
    fn load_next_image(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let Some(index) = self.pending.pop_front() else {
            return;
        };
        let img = self.slideshow.images()[index];
        let source = self.slideshow.config().slides[index].source.clone();

        let event = match load_texture_with_exif_rotation(rl, thread, Path::new(&source)) {
            Ok(texture) => {
                debug!(index, source = %source, "image loaded");
                self.slides[index] = Some(Slide::new(texture));
                PageEvent::ImageLoad(img)
            }
            Err(e) => {
                warn!("Error loading slide {}: {}", index, e);
                PageEvent::ImageError(img)
            }
        };
        self.slideshow.dispatch(event);
    }

    fn collect_events(&mut self, rl: &mut RaylibHandle, layout: &Layout) -> Vec<PageEvent> {
        let mut events = Vec::new();

        let inside = rl.is_cursor_on_screen();
        if inside != self.pointer_inside {
            self.pointer_inside = inside;
            events.push(if inside { PageEvent::PointerEnter } else { PageEvent::PointerLeave });
        }

        // Mouse drags double as touch swipes, presses on controls as clicks
        let mouse = rl.get_mouse_position();
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            match layout.control_at(mouse) {
                Some(control) => self.press = Some(Press::Control(control)),
                None => {
                    self.press = Some(Press::Swipe);
                    events.push(PageEvent::TouchStart { x: mouse.x });
                }
            }
        }
        if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
            match self.press.take() {
                Some(Press::Control(control)) if layout.control_at(mouse) == Some(control) => {
                    if let Some(target) = self.control_element(control) {
                        events.push(PageEvent::Click(target));
                    }
                }
                Some(Press::Swipe) => events.push(PageEvent::TouchEnd { x: mouse.x }),
                _ => {}
            }
        }

        while let Some(key) = rl.get_key_pressed() {
            events.push(PageEvent::KeyDown(key.into()));
        }

        events
    }

    fn control_element(&self, control: Control) -> Option<ElementId> {
        match control {
            Control::Prev => self.slideshow.anchors().prev,
            Control::Next => self.slideshow.anchors().next,
            Control::Dot(i) => self.slideshow.dots().get(i).copied(),
        }
    }

    fn draw(&self, d: &mut RaylibDrawHandle, layout: &Layout) {
        d.clear_background(Color::BLACK);

        if self.slideshow.slide_count() == 0 {
            d.draw_text("No slides configured.", 20, 20, 20, Color::LIGHTGRAY);
            return;
        }

        if let Some(previous) = self.fade.previous {
            self.draw_slide(d, layout, previous, 1.0);
        }
        self.draw_slide(d, layout, self.fade.shown, self.fade.alpha);

        // Arrows grey out while the transition lock ignores them
        let locked = self.slideshow.is_transitioning();
        if let Some(rect) = &layout.prev {
            draw_arrow(d, rect, true, locked);
        }
        if let Some(rect) = &layout.next {
            draw_arrow(d, rect, false, locked);
        }

        let page = self.slideshow.page();
        for (dot, rect) in page.find_all_by_class(DOT_CLASS).iter().zip(&layout.dots) {
            let color = if page.has_class(*dot, ACTIVE_CLASS) { Color::WHITE } else { Color::GRAY };
            let center = Vector2::new(rect.x + rect.width * 0.5, rect.y + rect.height * 0.5);
            d.draw_circle_v(center, DOT_RADIUS, color);
        }

        if self.slideshow.config().enable_auto_play && !self.slideshow.is_autoplay_running() {
            d.draw_text("Paused", layout.width as i32 - 100, 20, 20, Color::GRAY);
        }

        if self.slideshow.is_loading() {
            let loaded = self.slideshow.loaded_image_count();
            let text = format!("Loading {}/{}", loaded, self.slideshow.slide_count());
            d.draw_text(&text, 20, 20, 20, Color::LIGHTGRAY);
        }
    }

    fn draw_slide(&self, d: &mut RaylibDrawHandle, layout: &Layout, index: usize, alpha: f32) {
        match self.slides.get(index) {
            Some(Some(slide)) => slide.draw(d, layout.width, layout.height, alpha),
            _ => {
                // Broken or not yet loaded: fall back to the alt text, like a browser
                let alt = slide_alt_text(self.slideshow.page(), index).unwrap_or_default();
                let tint = Color::new(200, 200, 200, (alpha.clamp(0.0, 1.0) * 255.0) as u8);
                d.draw_text(alt, 40, (layout.height * 0.5) as i32, 30, tint);
            }
        }
    }
}

/// Alt text of the `<img>` inside the `index`-th slide element.
fn slide_alt_text(page: &Page, index: usize) -> Option<&str> {
    let slide = *page.find_all_by_class(SLIDE_CLASS).get(index)?;
    let img = page.children(slide).iter().copied().find(|c| page.tag(*c) == "img")?;
    page.attribute(img, "alt")
}

fn draw_arrow(d: &mut RaylibDrawHandle, rect: &Rectangle, left: bool, locked: bool) {
    d.draw_rectangle_rec(*rect, Color::new(0, 0, 0, 96));
    let color = if locked { Color::GRAY } else { Color::WHITE };

    let inset = rect.width * 0.3;
    let (x0, x1) = (rect.x + inset, rect.x + rect.width - inset);
    let (top, mid, bottom) = (rect.y + inset, rect.y + rect.height * 0.5, rect.y + rect.height - inset);

    // Vertices counter-clockwise on screen
    if left {
        d.draw_triangle(Vector2::new(x0, mid), Vector2::new(x1, bottom), Vector2::new(x1, top), color);
    } else {
        d.draw_triangle(Vector2::new(x1, mid), Vector2::new(x0, top), Vector2::new(x0, bottom), color);
    }
}
