use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use trazo::config::Config;
use trazo::csv_loader::load_character_from_csv;
use trazo::pipeline::run_stages;

/// Trata una grabación entera como un solo carácter y vuelca cada etapa
#[derive(Parser, Debug)]
#[command(name = "replay_csv")]
struct Args {
    /// Grabación CSV con cabecera t_ms,event,x,y
    recording: PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Puntos remuestreados
    #[arg(long)]
    dump_resampled: bool,

    /// Puntos dentro de la ventana
    #[arg(long)]
    dump_normalized: bool,

    #[arg(long)]
    dump_features: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    println!("🎞️  Reproduciendo carácter desde {:?}", args.recording);
    let character = load_character_from_csv(&args.recording)?;
    let stages = run_stages(&character, &config.pipeline);

    println!(
        "ℹ️  {} muestras -> {} puntos -> {} características",
        character.len(),
        stages.resampled.len(),
        stages.features.len()
    );
    ensure!(
        stages.features.len() == config.feature_len(),
        "El carácter da {} características, el clasificador espera {}",
        stages.features.len(),
        config.feature_len()
    );

    if args.dump_resampled {
        println!("\n📍 Remuestreo ({} puntos):", stages.resampled.len());
        for (idx, p) in stages.resampled.iter().enumerate() {
            println!("  {:03}: ({:>5}, {:>5})", idx, p.x, p.y);
        }
    }

    if args.dump_normalized {
        println!("\n📐 Normalizados:");
        for (idx, p) in stages.normalized.iter().enumerate() {
            println!("  {:03}: ({:>8.3}, {:>8.3})", idx, p.x, p.y);
        }
    }

    if args.dump_features {
        println!("\n📊 {} features (orden exacto):", stages.features.len());
        for (idx, value) in stages.features.iter().enumerate() {
            println!("  {:03}: {:>8.2}", idx, value);
        }
    }

    Ok(())
}
