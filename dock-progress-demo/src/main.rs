//! dock-progress demo
//!
//! Drives a progress controller through every overlay style on a 60 Hz
//! timer thread and writes each repainted frame to disk as PNG.
//!
//! Usage: dock-progress-demo [config.json] [output-dir]

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use dock_progress::{
    theme, Canvas, EngineConfig, LabelFont, PixmapHost, ProgressController, ProgressSource, Rect,
    Style, ThreadClock,
};
use glam::Vec2;
use tiny_skia::Pixmap;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ICON_SIZE: u32 = 128;
const TARGET_FPS: u32 = 60;
const TOTAL_UNITS: u64 = 20;
/// Frames to let the animation run after each source update.
const FRAMES_PER_STEP: u32 = 6;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => EngineConfig::default(),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "frames".to_string()));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let host = PixmapHost::new(demo_icon()?).with_font(LabelFont::embedded()?);
    let mut controller =
        ProgressController::with_config(host.clone(), ThreadClock::with_rate(TARGET_FPS), config);

    let source = ProgressSource::new(TOTAL_UNITS);
    controller.attach_external_source(Some(&source));

    let frame_duration = Duration::from_secs_f64(1.0 / TARGET_FPS as f64);
    let mut written = 0usize;

    info!(out = %out_dir.display(), "rendering demo frames");
    for (name, style) in demo_styles(&source) {
        info!(style = name, "switching style");
        controller.set_style(style);
        source.set_completed(0);

        for step in 1..=TOTAL_UNITS {
            source.set_completed(step);
            for _ in 0..FRAMES_PER_STEP {
                let frame_start = Instant::now();
                controller.pump();

                if host.take_dirty() {
                    if let Some(frame) = controller.compose() {
                        let path = out_dir.join(format!("{name}-{written:05}.png"));
                        frame
                            .save_png(&path)
                            .with_context(|| format!("writing {}", path.display()))?;
                        written += 1;
                    }
                }

                // Frame rate limiting
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }
    }

    controller.attach_external_source(None);
    info!(frames = written, "done");
    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = EngineConfig::from_json(&json)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// A plain rounded-square icon to draw the overlays on.
fn demo_icon() -> Result<Pixmap> {
    let mut canvas = Canvas::new(ICON_SIZE, ICON_SIZE)?;
    let bounds = canvas.bounds().inset(8.0, 8.0);
    canvas.fill_rounded_rect(bounds, 24.0, theme::Color::rgb(0x16, 0x1B, 0x22));
    canvas.fill_circle(bounds.center(), 20.0, theme::Color::rgb(0x30, 0x36, 0x3D));
    Ok(canvas.into_pixmap())
}

fn demo_styles(source: &ProgressSource) -> Vec<(&'static str, Style)> {
    let counter = source.clone();
    vec![
        ("bar", Style::Bar),
        ("squircle", Style::squircle(theme::ACCENT_BLUE)),
        ("circle", Style::circle(48.0, theme::ACCENT_GREEN)),
        (
            "badge",
            Style::badge(theme::ACCENT_BLUE, move || counter.completed() as i64 * 60),
        ),
        ("pie", Style::pie(theme::ACCENT_RED)),
        (
            "custom",
            Style::custom_with_progress(|canvas: &mut Canvas, bounds: Rect, progress: f64| {
                let height = bounds.height * progress as f32;
                let column = Rect::new(bounds.max_x() - 12.0, bounds.max_y() - height, 8.0, height);
                canvas.fill_rounded_rect(column, 4.0, theme::ACCENT_GREEN);
                canvas.fill_circle(Vec2::new(column.x + 4.0, column.y), 5.0, theme::WHITE);
            }),
        ),
    ]
}
