// src/config.rs
use crate::error::CarpetError;
use crate::utils::{available_threads, validate_positive, validate_size};
use clap::Parser;
use log::warn;
use std::path::PathBuf;

pub const DEFAULT_SIZE: i64 = 729;
pub const DEFAULT_DEPTH: i64 = 5;
pub const DEFAULT_OUTPUT: &str = "sierpinski_carpet.png";

/// Render a Sierpinski carpet and save it as an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Side of the square image in pixels, a power of three
    #[arg(default_value_t = DEFAULT_SIZE, allow_negative_numbers = true)]
    pub size: i64,

    /// Recursion depth
    #[arg(default_value_t = DEFAULT_DEPTH, allow_negative_numbers = true)]
    pub depth: i64,

    /// Worker threads [default: all hardware threads]
    #[arg(allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// Output file; the extension picks the format
    #[arg(default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

/// Validated render settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub size: u32,
    pub depth: u32,
    /// Workers actually used, never more than the hardware offers.
    pub threads: usize,
    pub requested_threads: usize,
    pub output: PathBuf,
}

impl Args {
    /// Check the arguments against a machine with `hardware_threads` threads.
    pub fn validate_with(&self, hardware_threads: usize) -> Result<Params, CarpetError> {
        let size = validate_size(self.size)?;
        let depth = validate_positive("depth", self.depth)?;
        let requested_threads = match self.threads {
            Some(threads) => validate_positive("threads", threads)? as usize,
            None => hardware_threads,
        };

        let threads = requested_threads.min(hardware_threads.max(1));
        if threads < requested_threads {
            warn!(
                "requested {} threads but only {} are available, using {}",
                requested_threads, hardware_threads, threads
            );
        }

        Ok(Params {
            size,
            depth,
            threads,
            requested_threads,
            output: self.output.clone(),
        })
    }

    pub fn validate(&self) -> Result<Params, CarpetError> {
        self.validate_with(available_threads())
    }
}
