mod app;
mod blend;
mod config;
mod error;
mod menu;
mod normalize;
mod pyramid;
mod timer;
mod window;

use crate::{
    app::HybridApp,
    config::{ Args, Config },
    normalize::{ load_image, normalize_pair },
    window::ImageWindow,
    timer::Timer,
};

use sdl2::{
    event::{ Event, WindowEvent },
    keyboard::Keycode,
    mouse::MouseButton,
};

use clap::Parser;

use std::io;

const HYBRID_BAR: usize = 0;
const ZOOM_BAR: usize = 1;
const GAP: i32 = 16;

pub fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("hybridimg=info"))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args).vital("Hybridimg: could not load config");
    let mut timer = Timer::new();

    let (first, second) = match (load_image(&cfg.first), load_image(&cfg.second)) {
        (Ok(first), Ok(second)) => (first, second),
        (first, second) => {
            for e in [first.err(), second.err()].into_iter().flatten() {
                log::error!("{e}");
            }
            println!("Error while loading image/s");
            std::process::exit(-1);
        },
    };
    log::info!("Images: {:?}ms", timer.lap());

    let (first, second) = normalize_pair(first, second);
    let (w, h) = first.dimensions();
    log::info!("Normalized to ({w}, {h}): {:?}ms", timer.lap());

    let mut app = HybridApp::new(first, second, cfg.levels, cfg.max_zoom);
    log::info!("Pyramids ({} levels): {:?}ms", app.levels(), timer.lap());

    let selection = match cfg.select {
        Some(selection) => selection,
        None => menu::prompt_selection(io::stdin().lock(), io::stdout())
            .vital("Hybridimg: no selection"),
    };
    app.select(selection);
    log::info!("{} image is dominant", selection);
    timer.lap();

    let sdl_context = sdl2::init()?;
    let video = sdl_context.video()?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut win1 = ImageWindow::create(&video, "Image 1", w, h, 0)?;
    let mut win2 = ImageWindow::create(&video, "Image 2", w, h, w as i32 + GAP)?;
    let mut result = ImageWindow::create(&video, "Hybrid image (result)", w, h, 2 * (w as i32 + GAP))?;
    result.add_trackbar("Hybrid", app.max_hybrid());
    result.add_trackbar("Zoom", app.max_zoom());

    win1.set_image(app.first())?;
    win2.set_image(app.second())?;
    show_result(&mut result, &app)?;
    win1.draw()?;
    win2.draw()?;
    log::info!("Windows: {:?}ms (startup {:?}ms)", timer.lap(), timer.total());

    let mut dragging: Option<usize> = None;

    'main: loop {
        let mut changed: Option<(usize, usize)> = None;
        let mut redraw = false;

        let first_event = event_pump.wait_event();
        for event in std::iter::once(first_event).chain(event_pump.poll_iter()) {
            match event {
                Event::Quit { .. }
                | Event::KeyDown { keycode: Some(Keycode::Escape), .. }
                | Event::Window { win_event: WindowEvent::Close, .. } => {
                    break 'main;
                },
                Event::Window { win_event: WindowEvent::Exposed, .. } => {
                    redraw = true;
                },
                Event::KeyDown { keycode: Some(kc), .. } => {
                    let (bar, delta) = match kc {
                        Keycode::Up => (HYBRID_BAR, 1),
                        Keycode::Down => (HYBRID_BAR, -1),
                        Keycode::Right => (ZOOM_BAR, 1),
                        Keycode::Left => (ZOOM_BAR, -1),
                        Keycode::S => {
                            match app.save(&cfg.save) {
                                Ok(()) => log::info!("Saved hybrid to {:?}", cfg.save),
                                Err(e) => log::error!("Could not save {:?}: {e}", cfg.save),
                            }
                            continue;
                        },
                        _ => continue,
                    };
                    if result.bars[bar].step(delta) {
                        changed = Some((bar, result.bars[bar].value()));
                    }
                },
                Event::MouseButtonDown { window_id, mouse_btn: MouseButton::Left, x, y, .. }
                    if window_id == result.id() => {
                    dragging = result.bar_at(y);
                    if let Some(bar) = dragging {
                        if let Some(v) = result.drag_bar(bar, x) {
                            changed = Some((bar, v));
                        }
                    }
                },
                Event::MouseMotion { window_id, mousestate, x, .. }
                    if window_id == result.id() && mousestate.left() => {
                    if let Some(bar) = dragging {
                        if let Some(v) = result.drag_bar(bar, x) {
                            changed = Some((bar, v));
                        }
                    }
                },
                Event::MouseButtonUp { mouse_btn: MouseButton::Left, .. } => {
                    dragging = None;
                },
                _ => {},
            }

            if let Some((bar, value)) = changed.take() {
                if bar == HYBRID_BAR {
                    app.set_hybrid_level(value);
                } else {
                    app.set_zoom_level(value);
                }
                log::debug!("hybrid {}, zoom {}", app.hybrid_level(), app.zoom_level());
                redraw = true;
            }
        }

        if redraw {
            show_result(&mut result, &app)?;
            win1.draw()?;
            win2.draw()?;
        }
    }

    log::info!("Hybridimg: finished.");
    Ok(())
}

/// Push the zoomed image to the result window, sized for the unzoomed hybrid.
fn show_result(window: &mut ImageWindow, app: &HybridApp) -> Result<(), String> {
    let (w, h) = app.hybrid().dimensions();
    window.fit_to(w, h)?;
    window.set_image(app.zoomed())?;
    let status = window.bar_status();
    window.set_status(&status)?;
    window.draw()
}

trait Vital<T> {
    fn vital(self, msg: &str) -> T;
}

impl<T, U: std::fmt::Display> Vital<T> for Result<T, U> {
    fn vital(self, msg: &str) -> T {
        match self {
            Ok(res) => res,
            Err(err) => {
                println!("{msg}: {err}");
                std::process::exit(-1);
            },
        }
    }
}
