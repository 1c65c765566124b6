/*
Reconocimiento de caracteres manuscritos a partir de grabaciones de lápiz

Reproduce una grabación `t_ms,event,x,y`:
1. Agrupa los trazos en caracteres según la pausa entre pen-up y pen-down
2. Remuestrea, normaliza y extrae el vector de características de cada carácter
3. Opcionalmente consulta un rectángulo de selección sobre todo el lienzo
4. Con la feature `onnx`, clasifica cada vector con un modelo ONNX

Para ejecutar:
    RUST_LOG=debug ./target/release/trazo grabacion.csv --select 0 0 300 300
    cargo run --release --features onnx -- grabacion.csv --model model.onnx --classes classes.json
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use trazo::canvas::{Canvas, SquareOutcome};
use trazo::config::Config;
use trazo::csv_loader::load_events_from_csv;
use trazo::region::SelectionRect;

#[derive(Parser, Debug)]
#[command(name = "trazo", version, about = "Segmenta y extrae características de una grabación de lápiz")]
struct Args {
    /// Grabación CSV con cabecera t_ms,event,x,y
    recording: PathBuf,

    /// Configuración JSON (campos omitidos = valores por defecto)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rectángulo de selección sobre todo el lienzo
    #[arg(long, num_args = 4, value_names = ["X0", "Y0", "X1", "Y1"], allow_negative_numbers = true)]
    select: Option<Vec<f32>>,

    /// Imprime cada vector completo
    #[arg(long)]
    dump_features: bool,

    /// Modelo ONNX con entrada [1, N]
    #[cfg(feature = "onnx")]
    #[arg(long, requires = "classes")]
    model: Option<PathBuf>,

    /// Tabla de etiquetas `index_to_class`
    #[cfg(feature = "onnx")]
    #[arg(long, requires = "model")]
    classes: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("No se pudo cargar {:?}", path)),
        None => Ok(Config::default()),
    }
}

fn print_features(title: &str, features: &[f64], dump: bool) {
    let preview: Vec<String> = features.iter().take(6).map(|v| format!("{:.2}", v)).collect();
    println!("  {} -> {} valores [{}, ...]", title, features.len(), preview.join(", "));
    if dump {
        for (idx, value) in features.iter().enumerate() {
            println!("    {:03}: {:>8.2}", idx, value);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    info!(
        "Pausa entre caracteres: {}ms, vector de {} valores",
        config.segmenter.gap_threshold_ms,
        config.feature_len()
    );

    println!("🎞️  Reproduciendo {:?}", args.recording);
    let events = load_events_from_csv(&args.recording)?;

    let mut canvas = Canvas::new(config.segmenter, config.pipeline);
    for event in events.iter().copied() {
        canvas.handle(event);
    }

    let batch = canvas.pending_features();
    println!("✍️  {} caracteres detectados", batch.len());
    for (idx, features) in batch.iter().enumerate() {
        print_features(&format!("Carácter {}", idx + 1), features, args.dump_features);
    }

    if let Some(corners) = args.select.as_deref() {
        let rect = SelectionRect::from_corners(corners[0], corners[1], corners[2], corners[3])?;
        println!("\n🔲 Selección {:?}", rect);
        match canvas.select(rect) {
            SquareOutcome::Features { features, .. } => {
                print_features("Selección", &features, args.dump_features)
            }
            SquareOutcome::NoCharacter { .. } => println!("  No Char"),
        }
    }

    #[cfg(feature = "onnx")]
    if let (Some(model), Some(classes)) = (args.model.as_ref(), args.classes.as_ref()) {
        use trazo::classifier::{predict_batch, LabelTable, OnnxClassifier};

        println!("\n🔧 Inicializando clasificador ONNX...");
        let labels = LabelTable::load(classes)?;
        let mut classifier = OnnxClassifier::new(model, config.feature_len())?;
        println!("✅ Clasificador cargado ({} clases)\n", labels.len());

        for (idx, prediction) in predict_batch(&mut classifier, &labels, &batch)
            .iter()
            .enumerate()
        {
            println!("🥇 Carácter {}: {}", idx + 1, prediction);
        }
    }

    Ok(())
}
