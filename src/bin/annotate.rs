//! annotate - one-shot detection and annotation render
//!
//! Loads an image, runs the selected detection backend, optionally
//! writes the rendered result as PNG, and prints the annotation surface
//! (boxes, labels, confidences, echo fields) as JSON on stdout.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use labelkit::{Annotator, AnnotatorConfig, BackendRegistry, ImageInput, StubBackend};

#[derive(Parser, Debug)]
#[command(name = "annotate", about = "Run detection on an image and print the annotation surface")]
struct Args {
    /// Image to annotate (PNG or JPEG)
    image: PathBuf,

    /// Detection backend to use
    #[arg(long, default_value = "stub", env = "LABELKIT_BACKEND")]
    backend: String,

    /// Write the rendered annotations to this PNG path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = AnnotatorConfig::load()?;

    let mut registry = BackendRegistry::new();
    registry.register(StubBackend::new());

    let backend = registry.resolve(Some(&args.backend))?;
    let mut annotator = Annotator::new(backend, &cfg)?;

    let outcome = annotator.run_detection(Some(&ImageInput::Path(args.image)))?;

    if let Some(path) = &args.output {
        let image = outcome
            .image
            .as_ref()
            .ok_or_else(|| anyhow!("detection produced no rendered image"))?;
        image.save(path)?;
        log::info!("wrote rendered annotations to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
