use serde::{Deserialize, Serialize};

use crate::types::{NormPoint, Point, NORMALIZE_PADDING, NORMALIZE_WINDOW};

/// Ventana cuadrada de destino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Lado de la ventana (default: 64)
    pub window: u32,
    /// Margen en cada lado (default: 2)
    pub padding: u32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            window: NORMALIZE_WINDOW,
            padding: NORMALIZE_PADDING,
        }
    }
}

/// Escala y traslada `points` a la ventana `[padding, window - padding]`
/// conservando la proporción (escala uniforme por la dimensión mayor).
///
/// Si el ancho o el alto son 0 (un punto, o una línea perfectamente
/// horizontal/vertical) todos los puntos colapsan a `(padding, padding)`.
pub fn normalize_to_window(points: &[Point], config: &NormalizeConfig) -> Vec<NormPoint> {
    let padding = config.padding as f64;

    let Some(first) = points.first() else {
        return Vec::new();
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let width = max_x as i64 - min_x as i64;
    let height = max_y as i64 - min_y as i64;

    if width == 0 || height == 0 {
        return vec![NormPoint::new(padding, padding); points.len()];
    }

    let usable = config.window as f64 - 2.0 * padding;
    let scale = usable / width.max(height) as f64;

    points
        .iter()
        .map(|p| {
            NormPoint::new(
                (p.x as i64 - min_x as i64) as f64 * scale + padding,
                (p.y as i64 - min_y as i64) as f64 * scale + padding,
            )
        })
        .collect()
}
