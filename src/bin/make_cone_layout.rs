use std::error::Error as StdError;
use std::process::ExitCode;

use clap::Parser;
use led_layout::{generate_cone_layout, write_layout, ConeParams};

/// Lays out LED strips on poles around a hemisphere and prints the layout
/// as JSON.
#[derive(Parser)]
#[command(name = "make-cone-layout")]
struct Cli {
    /// Radius of the hemisphere.
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    radius: f64,
    /// LEDs on each pole.
    #[arg(long, default_value_t = 150)]
    leds: usize,
    /// Number of poles.
    #[arg(long, default_value_t = 20)]
    poles: usize,
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn StdError>> {
    let params = ConeParams {
        radius: cli.radius,
        leds_per_pole: cli.leds,
        pole_count: cli.poles,
    };
    let layout = generate_cone_layout(&params)?;
    write_layout(std::io::stdout().lock(), &layout, cli.pretty)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("make-cone-layout: {}", e);
            ExitCode::FAILURE
        }
    }
}
