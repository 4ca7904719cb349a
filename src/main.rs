use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod constants;
mod error;
mod input;
mod layout;
mod page;
mod scheduler;
mod slide;
mod slideshow;
mod state;
mod texture_loader;

use crate::app::App;
use crate::config::Args;
use crate::constants::*;
use crate::page::Page;
use crate::slideshow::{InitError, Slideshow};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "carousel=debug" } else { "carousel=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = args.to_config().context("Failed to build slideshow configuration")?;
    config.shuffle_slides(&mut rand::rng());
    info!(
        slides = config.slides.len(),
        interval_ms = config.interval_time,
        transition_ms = config.transition_duration,
        "configuration loaded"
    );

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Carousel")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let slideshow = match Slideshow::init(config, Page::slideshow_markup()) {
        Ok(slideshow) => slideshow,
        Err(InitError { error: e, .. }) => {
            error!("Slideshow initialization failed: {}", e);
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            d.draw_text(&format!("Error: {}", e), 20, 20, 20, Color::RED);
            drop(d);
            std::thread::sleep(Duration::from_secs(ERROR_DISPLAY));
            return Err(e).context("Slideshow initialization failed");
        }
    };

    let mut app = App::new(slideshow, &rl);
    app.run(&mut rl, &thread);

    info!("window closed");
    Ok(())
}
