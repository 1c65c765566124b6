use serde::{Deserialize, Serialize};

use crate::feature_extractor::{FeatureExtractor, Rounding};
use crate::normalize::{normalize_to_window, NormalizeConfig};
use crate::resample::{resample, ResampleConfig};
use crate::types::{feature_len, NormPoint, Point, Sample};

/// Parámetros de la cadena remuestreo -> normalización -> características
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub resample: ResampleConfig,
    pub normalize: NormalizeConfig,
    pub rounding: Rounding,
}

impl PipelineConfig {
    /// Longitud del vector que produce esta configuración
    pub fn feature_len(&self) -> usize {
        feature_len(self.resample.target_count)
    }
}

/// Resultado de cada etapa, para inspección y volcados
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStages {
    pub resampled: Vec<Point>,
    pub normalized: Vec<NormPoint>,
    pub features: Vec<f64>,
}

/// Ejecuta la cadena completa conservando las etapas intermedias
pub fn run_stages(samples: &[Sample], config: &PipelineConfig) -> PipelineStages {
    let points: Vec<Point> = samples.iter().map(|s| s.point()).collect();
    let resampled = resample(&points, &config.resample);
    let normalized = normalize_to_window(&resampled, &config.normalize);
    let features = FeatureExtractor::new(config.rounding).extract(&normalized);

    log::debug!(
        "{} muestras -> {} remuestreadas -> {} características",
        samples.len(),
        resampled.len(),
        features.len()
    );

    PipelineStages {
        resampled,
        normalized,
        features,
    }
}

/// Función pura y determinista: muestras de un carácter -> vector de características.
///
/// Un carácter vacío da un vector vacío ("nada que clasificar"). Con un único
/// punto no hay remuestreo posible y el vector tiene `18 + 2` valores; el
/// llamador lo rechaza al comparar con la longitud esperada del clasificador.
pub fn extract_features(samples: &[Sample], config: &PipelineConfig) -> Vec<f64> {
    run_stages(samples, config).features
}
