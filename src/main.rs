//! drizzle - walk through falling rain or snow.
//!
//! Usage:
//!   drizzle [--preset rain|snow] [--particles N] [--seed S] ...

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use drizzle::{WeatherConfig, WeatherPreset};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Rain,
    Snow,
}

impl From<Preset> for WeatherPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Rain => WeatherPreset::Rain,
            Preset::Snow => WeatherPreset::Snow,
        }
    }
}

#[derive(Parser)]
#[command(name = "drizzle")]
#[command(about = "First-person walk through GPU-animated rain or snow")]
struct Args {
    /// Weather preset
    #[arg(long, value_enum, default_value = "snow")]
    preset: Preset,

    /// Number of particles to generate
    #[arg(
        long,
        default_value_t = WeatherConfig::DEFAULT_PARTICLE_COUNT,
        value_parser = particle_count_parser(),
    )]
    particles: u32,

    /// Override the preset's particle density (0 or greater)
    #[arg(long, value_parser = parse_density)]
    density: Option<f32>,

    /// Seed for particle generation (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Window width in logical pixels
    #[arg(long, default_value_t = WeatherConfig::DEFAULT_WINDOW_SIZE.0)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = WeatherConfig::DEFAULT_WINDOW_SIZE.1)]
    height: u32,

    /// Minimum time between frames in milliseconds
    #[arg(long, default_value_t = 20)]
    frame_interval_ms: u64,
}

fn particle_count_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(WeatherConfig::MAX_PARTICLE_COUNT))
}

fn parse_density(s: &str) -> Result<f32, String> {
    let density: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if density.is_finite() && density >= 0.0 {
        Ok(density)
    } else {
        Err(format!("density must be a finite value >= 0, got {density}"))
    }
}

impl Args {
    fn into_config(self) -> WeatherConfig {
        let mut config = WeatherConfig::new()
            .with_preset(self.preset.into())
            .with_particle_count(self.particles)
            .with_window_size(self.width, self.height)
            .with_frame_interval(Duration::from_millis(self.frame_interval_ms));
        if let Some(density) = self.density {
            config = config.with_particle_density(density);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config();

    println!("Controls:");
    println!("  W / Up     - Move forward");
    println!("  S / Down   - Move backward");
    println!("  D / Right  - Strafe right");
    println!("  A / Left   - Strafe left");
    println!("  Mouse      - Look");
    println!("  Escape     - Exit");

    match drizzle::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
