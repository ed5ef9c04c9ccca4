//! Lantern command-line renderer.
//!
//! Builds one of the built-in scenes, renders it on all cores and writes
//! the result as an image file.

mod scenes;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lantern_renderer::{render, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

use scenes::{SceneName, SceneOptions};

#[derive(Debug, Parser)]
#[command(name = "lantern", version, about = "Offline CPU path tracer")]
struct Cli {
    /// Scene to render
    #[arg(short, long, value_enum, default_value_t = SceneName::Cornell)]
    scene: SceneName,

    /// Output image; the format follows the extension, `.exr` keeps float samples
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// JSON render settings; flags given on the command line take precedence
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(short = 'n', long)]
    samples: Option<u32>,
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// OBJ file for the mesh scene
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Image texture for the perlin scene's small sphere
    #[arg(long)]
    texture: Option<PathBuf>,
}

impl Cli {
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.settings {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse settings {}", path.display()))?
            }
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }

        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "Image size must be non-zero, got {}x{}",
            config.width,
            config.height
        );
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = cli.render_config()?;

    let options = SceneOptions {
        aspect_ratio: config.aspect_ratio(),
        mesh: cli.mesh.as_deref(),
        texture: cli.texture.as_deref(),
    };
    let mut rng = StdRng::from_entropy();
    let scene = scenes::build(cli.scene, &options, &mut rng)
        .with_context(|| format!("Failed to build scene {:?}", cli.scene))?;

    let start = Instant::now();
    let framebuffer = render(&scene.camera, &scene.world, &config)?;
    log::info!("Rendered in {:.2?}", start.elapsed());

    framebuffer
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    Ok(())
}
