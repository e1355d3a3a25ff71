//! Render the Mandelbrot set with the adaptive patch solver.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;

use perflab::output::ppm::write_ppm_file;
use perflab::render::escape::{mandelbrot_kernel, MANDELBROT_VIEW};
use perflab::render::{self, RenderOptions};

#[derive(Debug, Parser)]
#[command(about = "Adaptive task-parallel Mandelbrot renderer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 4096)]
    width: usize,

    /// Image height in pixels
    #[arg(long, default_value_t = 4096)]
    height: usize,

    /// Maximum escape iterations
    #[arg(long, default_value_t = 1000)]
    max_iter: u32,

    /// Side of the initial patch tiling (default: width / 32)
    #[arg(long)]
    patch: Option<usize>,

    /// Recursion floor; mixed patches at or below this side are evaluated
    /// per pixel
    #[arg(long, default_value_t = 8)]
    min_patch: usize,

    /// Output image path
    #[arg(long, default_value = "mandelbrot.ppm")]
    output: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut opts = RenderOptions::new(args.width, args.height).min_patch(args.min_patch);
    if let Some(patch) = args.patch {
        opts = opts.initial_patch(patch);
    }

    println!(
        "Rendering {}x{} with max {} iterations, patches of {}...",
        args.width, args.height, args.max_iter, opts.initial_patch
    );

    let kernel = mandelbrot_kernel(MANDELBROT_VIEW, args.width, args.height, args.max_iter);

    let start = Instant::now();
    let canvas = render::render(&opts, &kernel);
    let elapsed = start.elapsed().as_secs_f64();
    println!("Rendered in {}", format!("{elapsed:.4} s").cyan());

    let counts = canvas.into_counts();
    if let Err(err) = write_ppm_file(&args.output, &counts, args.width, args.height) {
        eprintln!("{} {err}", "error:".red().bold());
        return ExitCode::FAILURE;
    }
    println!("Wrote {}", args.output.bold());

    ExitCode::SUCCESS
}
