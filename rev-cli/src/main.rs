mod cli;
mod error;

use std::fs::File;
use std::io;
use std::path::Path;

use clap::Parser;
use log::debug;

use crate::cli::{parse_size, Cli};
use crate::error::AppError;
use stream_reverse::{ReverseEngine, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE};

fn main() {
    env_logger::init();

    let args = Cli::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Cli) -> Result<(), AppError> {
    let cap = match &args.buffer_size {
        Some(size) => parse_size(size)
            .ok_or_else(|| AppError::InvalidBufferSize(size.clone()))?,
        None => MAX_BUFFER_SIZE,
    };

    let mut engine = ReverseEngine::with_bounds(cap, MIN_BUFFER_SIZE)?;
    debug!("working buffer capacity: {} bytes", engine.capacity());

    let input = open_input(args.input.as_deref())?;
    let stdout = io::stdout();
    engine.reverse(input, stdout.lock())?;

    Ok(())
}

/// Opens the named file, or hands out the stdin descriptor when the
/// argument is absent or `-`.
///
/// Stdin is duplicated into a `File` so the engine can probe it for
/// seekability: a shell-redirected file takes the chunked path, a pipe
/// falls back to the single bounded pass.
fn open_input(path: Option<&Path>) -> Result<File, AppError> {
    match path {
        Some(path) if path.as_os_str() != "-" => File::open(path)
            .map_err(|e| AppError::Open(path.display().to_string(), e)),
        _ => stdin_file()
            .map_err(|e| AppError::Open("standard input".to_string(), e)),
    }
}

#[cfg(unix)]
fn stdin_file() -> io::Result<File> {
    use std::os::fd::AsFd;

    let fd = io::stdin().as_fd().try_clone_to_owned()?;
    Ok(File::from(fd))
}

#[cfg(windows)]
fn stdin_file() -> io::Result<File> {
    use std::os::windows::io::AsHandle;

    let handle = io::stdin().as_handle().try_clone_to_owned()?;
    Ok(File::from(handle))
}
