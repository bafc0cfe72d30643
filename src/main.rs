mod app;
mod config;
mod controls;
mod error;
mod input;
mod logging;
mod model;
mod playback;
mod render;
mod session;
mod sim;
mod ticker;
mod trajectory;

use anyhow::Result;
use clap::Parser;

/// Spell a password by lobbing shots at a row of letters.
#[derive(Parser, Debug)]
#[command(version)]
pub(crate) struct Args {
    /// frame rate cap (10-240)
    #[arg(long)]
    fps: Option<u32>,

    /// draw the chart with plain characters instead of braille
    #[arg(long)]
    ascii: bool,

    /// monochrome output
    #[arg(long)]
    no_color: bool,

    /// starting power (0-100)
    #[arg(long)]
    power: Option<i64>,

    /// starting gravity (0-100)
    #[arg(long)]
    gravity: Option<i64>,

    /// starting scale (1-100)
    #[arg(long)]
    scale: Option<i64>,

    /// log filter written to the log file, e.g. "debug"; RUST_LOG overrides
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    app::run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_overrides() {
        let a = Args::try_parse_from(["arcpass", "--ascii", "--power", "66", "--fps", "30"]).unwrap();
        assert!(a.ascii);
        assert_eq!(a.power, Some(66));
        assert_eq!(a.fps, Some(30));
        assert_eq!(a.scale, None);
    }

    #[test]
    fn negative_values_parse_and_are_left_to_controls() {
        let a = Args::try_parse_from(["arcpass", "--gravity=-5"]).unwrap();
        assert_eq!(a.gravity, Some(-5));
        assert!(controls::Controls::new(50, -5, 50).is_err());
    }
}
