pub const RENDER_WIDTH: i32 = 1920;           // Width of the window at full size
pub const RENDER_HEIGHT: i32 = 1080;          // Height of the window at full size
pub const FPS: u32 = 60;                      // Frames per second

pub const DEFAULT_INTERVAL_MS: u64 = 5000;    // Time between automatic advances
pub const DEFAULT_TRANSITION_MS: u64 = 600;   // How long the transition lock is held
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0; // Minimum horizontal swipe distance (pixels)

pub const ERROR_DISPLAY: u64 = 5;             // Seconds an init error stays on screen

// Class names of the page anchors and generated nodes
pub const CONTAINER_CLASS: &str = "kt-slideshow-container";
pub const SLIDES_WRAPPER_CLASS: &str = "kt-slides-wrapper";
pub const DOTS_CLASS: &str = "kt-slide-dots";
pub const LOADING_CLASS: &str = "kt-slideshow-loading";
pub const PREV_CLASS: &str = "kt-prev-arrow";
pub const NEXT_CLASS: &str = "kt-next-arrow";
pub const SLIDE_CLASS: &str = "kt-slide";
pub const DOT_CLASS: &str = "kt-dot";
pub const ACTIVE_CLASS: &str = "active";

// Layout of the on-screen controls (pixels)
pub const DOT_RADIUS: f32 = 8.0;
pub const DOT_SPACING: f32 = 28.0;
pub const DOT_MARGIN_BOTTOM: f32 = 32.0;
pub const ARROW_SIZE: f32 = 56.0;
pub const ARROW_MARGIN: f32 = 24.0;
pub const FIT_RATIO: f32 = 0.9;               // Share of the view an image may cover
