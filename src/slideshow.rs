//! The slideshow controller.
//!
//! Owns the generated slide and dot elements, the current index, the
//! transition lock and the autoplay timer. Every way of navigating (timer,
//! arrows, keys, swipe, dots) ends up in [`Slideshow::go_to_slide`].

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{SlideDescriptor, SlideshowConfig};
use crate::constants::*;
use crate::error::{Result, SlideshowError};
use crate::input::{Key, PageEvent};
use crate::page::{ElementId, Page};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::state::{Task, TransitionState};

/// Page elements the slideshow hooks into.
#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    pub slides_wrapper: ElementId,
    pub dots: ElementId,
    pub loading: ElementId,
    pub prev: Option<ElementId>,
    pub next: Option<ElementId>,
}

impl Anchors {
    pub fn resolve(page: &Page) -> Result<Self> {
        let required = |class: &'static str| {
            page.find_by_class(class).ok_or(SlideshowError::MissingAnchor { class })
        };

        // Only checked for presence, the host routes pointer events itself
        required(CONTAINER_CLASS)?;

        Ok(Self {
            slides_wrapper: required(SLIDES_WRAPPER_CLASS)?,
            dots: required(DOTS_CLASS)?,
            loading: required(LOADING_CLASS)?,
            prev: page.find_by_class(PREV_CLASS),
            next: page.find_by_class(NEXT_CLASS),
        })
    }
}

/// A failed [`Slideshow::init`]. The page comes back exactly as it was
/// handed in, so the host can keep using it.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct InitError {
    pub error: SlideshowError,
    #[allow(dead_code)]
    pub page: Page,
}

pub struct Slideshow {
    config: SlideshowConfig,
    page: Page,
    anchors: Anchors,

    slides: Vec<ElementId>,
    dots: Vec<ElementId>,
    images: Vec<ElementId>,
    settled: Vec<bool>,

    current_index: usize,
    transition: TransitionState,
    autoplay_timer: Option<TimerHandle>,
    loaded_image_count: usize,
    touch_start_x: Option<f32>,

    scheduler: Scheduler<Task>,
}

impl Slideshow {
    /// Renders the configured slides into `page` and starts autoplay.
    ///
    /// Fails without touching the page when the config is invalid or a
    /// required anchor is missing.
    pub fn init(config: SlideshowConfig, page: Page) -> std::result::Result<Self, InitError> {
        let anchors = match config.validate().and_then(|_| Anchors::resolve(&page)) {
            Ok(anchors) => anchors,
            Err(error) => return Err(InitError { error, page }),
        };

        let mut slideshow = Self {
            config,
            page,
            anchors,
            slides: Vec::new(),
            dots: Vec::new(),
            images: Vec::new(),
            settled: Vec::new(),
            current_index: 0,
            transition: TransitionState::Idle,
            autoplay_timer: None,
            loaded_image_count: 0,
            touch_start_x: None,
            scheduler: Scheduler::new(),
        };

        slideshow.create_slides();
        if slideshow.slides.is_empty() {
            slideshow.page.set_hidden(slideshow.anchors.loading, true);
        }
        if slideshow.config.enable_auto_play {
            slideshow.start_autoplay();
        }

        info!(
            slides = slideshow.slides.len(),
            autoplay = slideshow.config.enable_auto_play,
            "slideshow initialized"
        );
        Ok(slideshow)
    }

    fn create_slides(&mut self) {
        for (index, slide) in self.config.slides.iter().enumerate() {
            let slide_el = self.page.create_element("div");
            self.page.add_class(slide_el, SLIDE_CLASS);

            let img = self.page.create_element("img");
            self.page.set_attribute(img, "src", slide.source.as_str());
            self.page.set_attribute(img, "alt", slide.alt_text.as_str());
            self.page.set_attribute(img, "loading", "lazy");
            self.page.append_child(slide_el, img);
            self.page.append_child(self.anchors.slides_wrapper, slide_el);

            let dot = self.page.create_element("button");
            self.page.add_class(dot, DOT_CLASS);
            self.page.set_attribute(dot, "data-index", index.to_string());
            self.page.set_attribute(dot, "aria-label", format!("Go to slide {}", index + 1));
            self.page.append_child(self.anchors.dots, dot);

            if index == 0 {
                self.page.add_class(slide_el, ACTIVE_CLASS);
                self.page.add_class(dot, ACTIVE_CLASS);
            }

            self.slides.push(slide_el);
            self.dots.push(dot);
            self.images.push(img);
            self.settled.push(false);
        }
    }

    /// Moves to `target`, clamped into range.
    ///
    /// Ignored while a transition holds the lock or when `target` is the
    /// current slide.
    pub fn go_to_slide(&mut self, target: isize) {
        if self.transition == TransitionState::Transitioning || target == self.current_index as isize {
            return;
        }
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        let index = target.clamp(0, count as isize - 1) as usize;

        self.transition = TransitionState::Transitioning;

        self.page.remove_class(self.slides[self.current_index], ACTIVE_CLASS);
        self.page.remove_class(self.dots[self.current_index], ACTIVE_CLASS);
        self.page.add_class(self.slides[index], ACTIVE_CLASS);
        self.page.add_class(self.dots[index], ACTIVE_CLASS);

        debug!(from = self.current_index, to = index, at = self.scheduler.now(), "slide change");
        self.current_index = index;

        // Released by time alone, the in-flight release is never cancelled
        self.scheduler.set_timeout(self.config.transition_duration, Task::ReleaseLock);

        self.reset_autoplay();
    }

    pub fn next(&mut self) {
        let count = self.slides.len();
        if count > 0 {
            self.go_to_slide(((self.current_index + 1) % count) as isize);
        }
    }

    pub fn previous(&mut self) {
        let count = self.slides.len();
        if count > 0 {
            self.go_to_slide(((self.current_index + count - 1) % count) as isize);
        }
    }

    pub fn first(&mut self) {
        self.go_to_slide(0);
    }

    pub fn last(&mut self) {
        self.go_to_slide(self.slides.len() as isize - 1);
    }

    /// Arms the autoplay timer unless it is already running or disabled.
    pub fn start_autoplay(&mut self) {
        if !self.config.enable_auto_play || self.autoplay_timer.is_some() {
            return;
        }
        self.autoplay_timer = Some(self.scheduler.set_timeout(self.config.interval_time, Task::AutoAdvance));
    }

    pub fn pause_autoplay(&mut self) {
        if let Some(handle) = self.autoplay_timer.take() {
            self.scheduler.clear_timeout(handle);
        }
    }

    fn reset_autoplay(&mut self) {
        self.pause_autoplay();
        self.start_autoplay();
    }

    /// Runs every timer due up to `now_ms` (milliseconds since init).
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((at, task)) = self.scheduler.pop_due(now_ms) {
            match task {
                Task::ReleaseLock => {
                    self.transition = TransitionState::Idle;
                }
                Task::AutoAdvance => {
                    debug!(at, "autoplay tick");
                    self.autoplay_timer = None;
                    self.next();
                    // Keeps ticking like an interval when next() was ignored
                    self.start_autoplay();
                }
            }
        }
    }

    pub fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::Click(target) => self.handle_click(target),
            PageEvent::PointerEnter if self.config.enable_auto_play => self.pause_autoplay(),
            PageEvent::PointerLeave if self.config.enable_auto_play => self.start_autoplay(),
            PageEvent::TouchStart { x } if self.config.enable_touch => {
                self.touch_start_x = Some(x);
            }
            PageEvent::TouchEnd { x } if self.config.enable_touch => {
                if let Some(start) = self.touch_start_x.take() {
                    self.handle_swipe(x - start);
                }
            }
            PageEvent::KeyDown(key) if self.config.enable_keyboard => self.handle_key(key),
            PageEvent::ImageLoad(img) | PageEvent::ImageError(img) => {
                if matches!(event, PageEvent::ImageError(_)) {
                    debug!(src = self.page.attribute(img, "src"), "image failed, counted as settled");
                }
                self.image_settled(img);
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, target: ElementId) {
        if Some(target) == self.anchors.prev {
            self.previous();
        } else if Some(target) == self.anchors.next {
            self.next();
        } else if let Some(index) = self.dots.iter().position(|dot| *dot == target) {
            self.go_to_slide(index as isize);
        }
    }

    /// Negative delta (finger moved left) shows the next slide.
    fn handle_swipe(&mut self, delta_x: f32) {
        let threshold = self.config.swipe_threshold;
        if delta_x < -threshold {
            self.next();
        } else if delta_x > threshold {
            self.previous();
        }
    }

    fn handle_key(&mut self, key: Key) {
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Home => self.first(),
            Key::End => self.last(),
            Key::Other => {}
        }
    }

    fn image_settled(&mut self, img: ElementId) {
        let Some(index) = self.images.iter().position(|i| *i == img) else {
            return;
        };
        if std::mem::replace(&mut self.settled[index], true) {
            return;
        }

        self.loaded_image_count += 1;
        if self.loaded_image_count >= self.slides.len() {
            self.page.set_hidden(self.anchors.loading, true);
            info!(images = self.loaded_image_count, "all images settled");
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition == TransitionState::Transitioning
    }

    pub fn is_autoplay_running(&self) -> bool {
        self.autoplay_timer.is_some()
    }

    /// When the pending autoplay advance will fire.
    #[cfg(test)]
    pub fn autoplay_due(&self) -> Option<u64> {
        self.autoplay_timer.and_then(|h| self.scheduler.due(h))
    }

    pub fn loaded_image_count(&self) -> usize {
        self.loaded_image_count
    }

    pub fn is_loading(&self) -> bool {
        !self.page.is_hidden(self.anchors.loading)
    }

    pub fn active_slide(&self) -> Option<&SlideDescriptor> {
        self.config.slides.get(self.current_index)
    }

    pub fn config(&self) -> &SlideshowConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    pub fn dots(&self) -> &[ElementId] {
        &self.dots
    }

    pub fn images(&self) -> &[ElementId] {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize) -> SlideshowConfig {
        SlideshowConfig {
            slides: (0..count)
                .map(|i| SlideDescriptor::new(format!("image-{i}.jpg"), format!("image {i}")))
                .collect(),
            ..Default::default()
        }
    }

    fn slideshow(count: usize) -> Slideshow {
        Slideshow::init(config(count), Page::slideshow_markup()).unwrap()
    }

    fn active(show: &Slideshow, class: &str) -> Vec<usize> {
        show.page()
            .find_all_by_class(class)
            .iter()
            .enumerate()
            .filter(|(_, id)| show.page().has_class(**id, ACTIVE_CLASS))
            .map(|(i, _)| i)
            .collect()
    }

    /// Moves the clock far enough for the transition lock to lapse.
    fn settle(show: &mut Slideshow) {
        let now = show.scheduler.now() + show.config().transition_duration;
        show.advance_to(now);
    }

    #[test]
    fn first_slide_and_dot_start_active() {
        for n in 1..5 {
            let show = slideshow(n);
            assert_eq!(show.current_index(), 0);
            assert_eq!(active(&show, SLIDE_CLASS), vec![0]);
            assert_eq!(active(&show, DOT_CLASS), vec![0]);
        }
    }

    #[test]
    fn generated_markup() {
        let show = slideshow(3);
        let page = show.page();
        let wrapper = show.anchors().slides_wrapper;
        assert_eq!(page.children(wrapper).len(), 3);

        let slide = page.children(wrapper)[1];
        let img = page.children(slide)[0];
        assert_eq!(page.tag(img), "img");
        assert_eq!(page.attribute(img, "src"), Some("image-1.jpg"));
        assert_eq!(page.attribute(img, "alt"), Some("image 1"));
        assert_eq!(page.attribute(img, "loading"), Some("lazy"));

        let dot = show.dots()[2];
        assert_eq!(page.tag(dot), "button");
        assert_eq!(page.parent(dot), Some(show.anchors().dots));
        assert_eq!(page.attribute(dot, "data-index"), Some("2"));
        assert_eq!(page.attribute(dot, "aria-label"), Some("Go to slide 3"));
    }

    #[test]
    fn missing_anchor_aborts_without_rendering() {
        for class in [CONTAINER_CLASS, SLIDES_WRAPPER_CLASS, DOTS_CLASS, LOADING_CLASS] {
            let mut page = Page::slideshow_markup();
            let anchor = page.find_by_class(class).unwrap();
            page.remove_class(anchor, class);

            match Slideshow::init(config(3), page) {
                Err(InitError { error: SlideshowError::MissingAnchor { class: missing }, page }) => {
                    assert_eq!(missing, class);
                    assert!(page.find_all_by_class(SLIDE_CLASS).is_empty());
                    assert!(page.find_all_by_class(DOT_CLASS).is_empty());
                    // The rest of the markup is still there
                    assert!(page.find_by_class(PREV_CLASS).is_some());
                    assert!(page.find_by_class(NEXT_CLASS).is_some());
                }
                other => panic!("expected missing .{class}, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn arrows_are_optional() {
        let mut page = Page::new();
        let root = page.root();
        for class in [CONTAINER_CLASS, SLIDES_WRAPPER_CLASS, DOTS_CLASS, LOADING_CLASS] {
            let el = page.create_element("div");
            page.add_class(el, class);
            page.append_child(root, el);
        }
        let show = Slideshow::init(config(2), page).unwrap();
        assert!(show.anchors().prev.is_none());
        assert!(show.anchors().next.is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = SlideshowConfig { interval_time: 0, ..config(2) };
        match Slideshow::init(bad, Page::slideshow_markup()) {
            Err(InitError { error: SlideshowError::Config { .. }, page }) => {
                assert!(page.find_by_class(SLIDES_WRAPPER_CLASS).is_some());
                assert!(page.find_all_by_class(SLIDE_CLASS).is_empty());
            }
            other => panic!("expected a config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn next_and_previous_close_the_ring() {
        let n = 4;
        for start in 0..n {
            let mut show = slideshow(n);
            show.go_to_slide(start as isize);
            settle(&mut show);
            assert_eq!(show.current_index(), start);

            for _ in 0..n {
                show.next();
                settle(&mut show);
            }
            assert_eq!(show.current_index(), start);

            for _ in 0..n {
                show.previous();
                settle(&mut show);
            }
            assert_eq!(show.current_index(), start);
        }
    }

    #[test]
    fn previous_from_first_wraps_to_last() {
        let mut show = slideshow(3);
        show.previous();
        assert_eq!(show.current_index(), 2);
        assert_eq!(active(&show, SLIDE_CLASS), vec![2]);
        assert_eq!(active(&show, DOT_CLASS), vec![2]);
    }

    #[test]
    fn lock_blocks_navigation_until_duration_elapses() {
        let mut show = slideshow(3);
        show.next();
        assert!(show.is_transitioning());

        show.advance_to(599);
        show.next();
        assert_eq!(show.current_index(), 1);

        show.advance_to(600);
        assert!(!show.is_transitioning());
        show.next();
        assert_eq!(show.current_index(), 2);
    }

    #[test]
    fn going_to_the_current_slide_is_a_no_op() {
        let mut show = slideshow(3);
        show.go_to_slide(0);
        assert!(!show.is_transitioning());
        assert_eq!(show.autoplay_due(), Some(5000));

        show.go_to_slide(1);
        settle(&mut show);
        show.go_to_slide(1);
        assert!(!show.is_transitioning());
    }

    #[test]
    fn out_of_range_targets_are_clamped() {
        let mut show = slideshow(3);
        show.go_to_slide(42);
        assert_eq!(show.current_index(), 2);
        settle(&mut show);
        show.go_to_slide(-5);
        assert_eq!(show.current_index(), 0);
        assert_eq!(active(&show, SLIDE_CLASS), vec![0]);
    }

    #[test]
    fn swipes_respect_the_threshold() {
        let mut show = slideshow(3);
        for (start, end) in [(200.0, 150.0), (200.0, 250.0), (200.0, 200.0)] {
            show.dispatch(PageEvent::TouchStart { x: start });
            show.dispatch(PageEvent::TouchEnd { x: end });
            assert_eq!(show.current_index(), 0, "swipe {start} -> {end}");
        }

        show.dispatch(PageEvent::TouchStart { x: 200.0 });
        show.dispatch(PageEvent::TouchEnd { x: 149.0 });
        assert_eq!(show.current_index(), 1);
        settle(&mut show);

        show.dispatch(PageEvent::TouchStart { x: 100.0 });
        show.dispatch(PageEvent::TouchEnd { x: 151.0 });
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn touch_end_without_start_is_ignored() {
        let mut show = slideshow(3);
        show.dispatch(PageEvent::TouchEnd { x: -500.0 });
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn keyboard_navigation() {
        let mut show = slideshow(5);
        show.dispatch(PageEvent::KeyDown(Key::End));
        assert_eq!(show.current_index(), 4);
        settle(&mut show);

        show.dispatch(PageEvent::KeyDown(Key::ArrowRight));
        assert_eq!(show.current_index(), 0);
        settle(&mut show);

        show.dispatch(PageEvent::KeyDown(Key::ArrowLeft));
        assert_eq!(show.current_index(), 4);
        settle(&mut show);

        show.dispatch(PageEvent::KeyDown(Key::Other));
        assert!(!show.is_transitioning());

        show.dispatch(PageEvent::KeyDown(Key::Home));
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn disabled_inputs_are_ignored() {
        let cfg = SlideshowConfig { enable_keyboard: false, enable_touch: false, ..config(3) };
        let mut show = Slideshow::init(cfg, Page::slideshow_markup()).unwrap();

        show.dispatch(PageEvent::KeyDown(Key::ArrowRight));
        show.dispatch(PageEvent::TouchStart { x: 300.0 });
        show.dispatch(PageEvent::TouchEnd { x: 0.0 });
        assert_eq!(show.current_index(), 0);

        let dot = show.dots()[2];
        show.dispatch(PageEvent::Click(dot));
        assert_eq!(show.current_index(), 2);
    }

    #[test]
    fn arrow_buttons_navigate() {
        let mut show = slideshow(3);
        let (prev, next) = (show.anchors().prev.unwrap(), show.anchors().next.unwrap());

        show.dispatch(PageEvent::Click(next));
        assert_eq!(show.current_index(), 1);
        settle(&mut show);
        show.dispatch(PageEvent::Click(prev));
        assert_eq!(show.current_index(), 0);
        settle(&mut show);

        let root = show.page().root();
        show.dispatch(PageEvent::Click(root));
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn autoplay_advances_every_interval() {
        let mut show = slideshow(3);
        show.advance_to(4999);
        assert_eq!(show.current_index(), 0);
        show.advance_to(5000);
        assert_eq!(show.current_index(), 1);
        show.advance_to(10_000);
        assert_eq!(show.current_index(), 2);
        show.advance_to(15_000);
        assert_eq!(show.current_index(), 0);
        assert_eq!(show.autoplay_due(), Some(20_000));
    }

    #[test]
    fn catching_up_runs_each_missed_tick() {
        let mut show = slideshow(4);
        show.advance_to(15_000);
        assert_eq!(show.current_index(), 3);
    }

    #[test]
    fn single_slide_keeps_ticking_without_moving() {
        let mut show = slideshow(1);
        show.advance_to(12_000);
        assert_eq!(show.current_index(), 0);
        assert_eq!(show.autoplay_due(), Some(15_000));
    }

    #[test]
    fn autoplay_disabled_never_starts() {
        let cfg = SlideshowConfig { enable_auto_play: false, ..config(3) };
        let mut show = Slideshow::init(cfg, Page::slideshow_markup()).unwrap();
        assert!(!show.is_autoplay_running());

        show.dispatch(PageEvent::PointerLeave);
        show.start_autoplay();
        show.next();
        assert!(!show.is_autoplay_running());

        show.advance_to(60_000);
        assert_eq!(show.current_index(), 1);
    }

    #[test]
    fn hover_pauses_and_leave_restarts_one_timer() {
        let mut show = slideshow(3);
        show.advance_to(1000);

        show.dispatch(PageEvent::PointerEnter);
        show.dispatch(PageEvent::PointerEnter);
        assert!(!show.is_autoplay_running());
        show.advance_to(8000);
        assert_eq!(show.current_index(), 0);

        show.dispatch(PageEvent::PointerLeave);
        show.dispatch(PageEvent::PointerLeave);
        assert_eq!(show.scheduler.pending(), 1);
        assert_eq!(show.autoplay_due(), Some(13_000));

        show.advance_to(13_000);
        assert_eq!(show.current_index(), 1);
    }

    #[test]
    fn manual_navigation_grants_a_full_interval() {
        let mut show = slideshow(3);
        show.advance_to(4000);
        show.next();
        assert_eq!(show.autoplay_due(), Some(9000));

        show.advance_to(8999);
        assert_eq!(show.current_index(), 1);
        show.advance_to(9000);
        assert_eq!(show.current_index(), 2);
    }

    #[test]
    fn dot_clicks_scenario() {
        let mut show = slideshow(3);
        let dots = show.dots().to_vec();

        show.advance_to(100);
        show.dispatch(PageEvent::Click(dots[2]));
        assert_eq!(show.current_index(), 2);
        assert!(show.is_transitioning());
        assert_eq!(show.autoplay_due(), Some(5100));

        show.advance_to(200);
        show.dispatch(PageEvent::Click(dots[2]));
        assert_eq!(show.current_index(), 2);

        show.advance_to(300);
        show.dispatch(PageEvent::Click(dots[0]));
        assert_eq!(show.current_index(), 2);

        show.advance_to(699);
        assert!(show.is_transitioning());
        show.advance_to(700);
        assert!(!show.is_transitioning());

        show.advance_to(5000);
        assert_eq!(show.current_index(), 2);
        show.advance_to(5100);
        assert_eq!(show.current_index(), 0);
    }

    #[test]
    fn loading_indicator_hides_once_every_image_settled() {
        let mut show = slideshow(3);
        let images = show.images().to_vec();
        assert!(show.is_loading());

        show.dispatch(PageEvent::ImageLoad(images[0]));
        show.dispatch(PageEvent::ImageError(images[1]));
        show.dispatch(PageEvent::ImageLoad(images[1]));
        assert_eq!(show.loaded_image_count(), 2);
        assert!(show.is_loading());

        let stray = show.page().root();
        show.dispatch(PageEvent::ImageLoad(stray));
        assert!(show.is_loading());

        show.dispatch(PageEvent::ImageError(images[2]));
        assert_eq!(show.loaded_image_count(), 3);
        assert!(!show.is_loading());
    }

    #[test]
    fn zero_slides_hide_the_indicator_and_ignore_navigation() {
        let mut show = slideshow(0);
        assert!(!show.is_loading());
        show.next();
        show.previous();
        show.dispatch(PageEvent::KeyDown(Key::End));
        show.advance_to(20_000);
        assert_eq!(show.current_index(), 0);
        assert!(show.active_slide().is_none());
    }

    #[test]
    fn active_slide_follows_the_index() {
        let mut show = slideshow(3);
        show.last();
        assert_eq!(show.active_slide().map(|s| s.source.as_str()), Some("image-2.jpg"));
    }
}
