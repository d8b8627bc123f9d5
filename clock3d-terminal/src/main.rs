/// Clock3D Terminal - Animated Analog Clock
///
/// Draws the clock with the ASCII rasterizer, following local time.
/// Controls:
///   - A / S / D: Numeric, roman or no numerals
///   - Arrow Keys: Tilt the clock
///   - Q/ESC: Quit

use clap::Parser;
use clock3d_core::{ClockConfig, LabelMode, BUILTIN_FONT};
use clock3d_terminal::TerminalApp;

#[derive(Parser, Debug, Clone)]
#[command(name = "clock3d-terminal")]
#[command(about = "Animated 3D analog clock rendered in the terminal", long_about = None)]
struct Cli {
    /// Typeface JSON file used for the numerals
    #[arg(long, default_value = BUILTIN_FONT)]
    font: String,

    /// Numerals shown at startup: numeric, roman or none
    #[arg(long, default_value = "numeric")]
    labels: LabelMode,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=120))]
    fps: u32,
}

impl From<Cli> for ClockConfig {
    fn from(cli: Cli) -> Self {
        Self {
            font_id: cli.font,
            initial_labels: cli.labels,
            frame_rate: cli.fps,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = ClockConfig::from(Cli::parse());
    log::info!("starting clock with {config:?}");

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    println!("Thank you for using Clock3D!");
    Ok(())
}
