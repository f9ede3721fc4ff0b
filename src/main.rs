use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sensesketch::api::ApiClient;
use sensesketch::capture::{DialogPicker, FilePicker, ImagePicker, PickerError};
use sensesketch::config::AppConfig;
use sensesketch::domain::Point;
use sensesketch::drawing::{DrawingSurface, GestureEvent};
use sensesketch::session::Session;

/// Sketch something, then ask the analysis service what it means
#[derive(Debug, Parser)]
#[command(name = "sensesketch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a stroke file to a PNG
    Export {
        /// JSON array of strokes, each an array of [x, y] pairs
        #[arg(long)]
        strokes: PathBuf,
        /// Output file, defaults to a timestamped name in the current directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a stroke file and analyze it
    Analyze {
        #[arg(long)]
        strokes: PathBuf,
    },
    /// Analyze a PNG or JPEG image, opening a file dialog without a path
    AnalyzeImage { path: Option<PathBuf> },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = AppConfig::load();

    match cli.command {
        Command::Export { strokes, out } => {
            let surface = replay(&config, &strokes)?;
            let image = surface.export()?;
            let out = out.unwrap_or_else(default_export_path);
            std::fs::write(&out, image.bytes())
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Saved {}", out.display());
            Ok(())
        }
        Command::Analyze { strokes } => {
            let surface = replay(&config, &strokes)?;
            runtime()?.block_on(analyze_drawing(&config, &surface))
        }
        Command::AnalyzeImage { path } => {
            // The dialog runs before the runtime starts
            let picked = match path {
                Some(path) => FilePicker::new(path).pick(),
                None => DialogPicker.pick(),
            };
            if matches!(picked, Ok(None)) {
                return Ok(());
            }
            runtime()?.block_on(analyze_picked(&config, picked))
        }
    }
}

async fn analyze_drawing(config: &AppConfig, surface: &DrawingSurface) -> Result<()> {
    let client = ApiClient::new(config)?;
    let mut session = Session::new();
    session.analyze_drawing(surface, &client).await?;
    print!("{}", session.state().results());
    Ok(())
}

async fn analyze_picked(config: &AppConfig, picked: Result<Option<String>, PickerError>) -> Result<()> {
    let client = ApiClient::new(config)?;
    let mut session = Session::new();
    let result = session.analyze_picked_image(picked, &client).await;
    if let Some(prompt) = &session.state().permission_prompt {
        eprintln!("{prompt}");
    }
    result?;
    print!("{}", session.state().results());
    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Feed a stroke file through the gesture tracker of a mounted surface
fn replay(config: &AppConfig, path: &Path) -> Result<DrawingSurface> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stroke file: {}", path.display()))?;
    let strokes: Vec<Vec<[f32; 2]>> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid stroke file: {}", path.display()))?;

    let mut surface = DrawingSurface::mounted(config);
    for stroke in &strokes {
        let mut points = stroke.iter().copied().map(Point::from);
        let Some(first) = points.next() else {
            continue;
        };
        surface.handle_gesture(GestureEvent::Start(first));
        for point in points {
            surface.handle_gesture(GestureEvent::Move(point));
        }
        surface.handle_gesture(GestureEvent::End);
    }
    log::info!(
        "Replayed {} strokes from {}",
        surface.model().completed().len(),
        path.display()
    );
    Ok(surface)
}

fn default_export_path() -> PathBuf {
    let name = chrono::Local::now()
        .format("Sketch_%Y-%m-%d_%H-%M-%S.png")
        .to_string();
    PathBuf::from(name)
}
