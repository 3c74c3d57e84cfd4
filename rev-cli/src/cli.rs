use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "rev-cli", version)]
#[clap(
    about = "Write a file or standard input byte-reversed to standard output",
    long_about = None
)]
pub struct Cli {
    /// File to reverse; `-` or no argument reads standard input
    #[clap(value_parser)]
    pub input: Option<PathBuf>,

    /// Cap for the working buffer, e.g. `64KB` or `16MB`
    #[clap(long, value_name = "SIZE")]
    pub buffer_size: Option<String>,
}

/// Parses a human-readable size: plain bytes or a B/KB/MB/GB suffix.
pub fn parse_size(input: &str) -> Option<usize> {
    let input = input.trim().to_uppercase();
    let digits: String = input
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let unit: String = input.chars().skip(digits.len()).collect();
    if digits.is_empty() {
        return None;
    }
    let num = digits.parse::<usize>().ok()?;
    match unit.trim() {
        "GB" | "G" => num.checked_mul(1024 * 1024 * 1024),
        "MB" | "M" => num.checked_mul(1024 * 1024),
        "KB" | "K" => num.checked_mul(1024),
        "B" | "" => Some(num),
        _ => None,
    }
}
