use anyhow::Context;
use clap::Parser;
use log::info;
use sierpinski_carpet::canvas::Canvas;
use sierpinski_carpet::config::Args;
use sierpinski_carpet::{carpet, export};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = Args::parse().validate()?;
    info!("Using {} worker threads", params.threads);
    let pool = carpet::build_pool(params.threads)?;

    if params.threads < params.requested_threads {
        println!(
            "Threads used: {} (requested {})",
            params.threads, params.requested_threads
        );
    } else {
        println!("Threads used: {}", params.threads);
    }

    println!("Generating {}x{} carpet...", params.size, params.size);
    let mut canvas = Canvas::new(params.size);
    let start = Instant::now();
    carpet::render(&mut canvas, params.depth, &pool);
    let elapsed = start.elapsed();

    println!("Generation time: {:.6} s", elapsed.as_secs_f64());
    println!("Image size: {}x{}", params.size, params.size);
    println!("Recursion depth: {}", params.depth);

    export::save_image(&canvas, &params.output)
        .with_context(|| format!("could not write {}", params.output.display()))?;
    println!("Image saved as {}", params.output.display());

    Ok(())
}
