//! Headless command-line renderer.
//!
//! Reads a persisted scene file, renders it, and writes a plain-text
//! PPM image to stdout. Progress and diagnostics go to stderr via the
//! logger, so the image stream stays clean and can be redirected:
//!
//! ```text
//! glint --render scene.txt > out.ppm
//! glint --render scene.txt --output out.png
//! ```

use std::io::Write;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use glint_core::SceneDesc;
use glint_render::{render_parallel, write_ppm, ImageBuffer};

struct Args {
    scene_path: String,
    output: Option<String>,
    seed: u64,
}

fn print_usage() {
    eprintln!("Usage: glint --render <scenefile> [--output <image.png>] [--seed <n>]");
    eprintln!();
    eprintln!("  --render <scenefile>   Render the scene and write PPM to stdout");
    eprintln!("  --output <image.png>   Write a PNG file instead of PPM on stdout");
    eprintln!("  --seed <n>             Seed for the sampler (default 0)");
}

fn parse_args(mut argv: std::env::Args) -> Result<Option<Args>> {
    argv.next(); // program name

    let mut scene_path = None;
    let mut output = None;
    let mut seed = 0u64;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--render" => {
                scene_path = Some(argv.next().context("--render requires a scene file")?);
            }
            "--output" => {
                output = Some(argv.next().context("--output requires a file path")?);
            }
            "--seed" => {
                let value = argv.next().context("--seed requires a number")?;
                seed = value
                    .parse()
                    .with_context(|| format!("invalid seed '{value}'"))?;
            }
            other => bail!("unknown argument '{other}'"),
        }
    }

    Ok(scene_path.map(|scene_path| Args {
        scene_path,
        output,
        seed,
    }))
}

fn save_png(image: &ImageBuffer, path: &str) -> Result<()> {
    image::save_buffer(
        path,
        &image.to_rgba(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("failed to write '{path}'"))
}

fn run(args: Args) -> Result<()> {
    let scene = SceneDesc::load(&args.scene_path)
        .with_context(|| format!("failed to load scene '{}'", args.scene_path))?;

    let (world, camera) = glint_render::build_scene(&scene);
    let image = render_parallel(&camera, &world, args.seed);

    match &args.output {
        Some(path) => {
            save_png(&image, path)?;
            log::info!("wrote {path}");
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_ppm(&image, &mut out).context("failed to write PPM to stdout")?;
            out.flush()?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args()) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
