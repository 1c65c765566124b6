use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stroke_log::StrokeLog;
use crate::types::Sample;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegionError {
    #[error("Rectángulo degenerado: {width}x{height}")]
    Degenerate { width: f32, height: f32 },

    #[error("Coordenada no finita en el rectángulo")]
    NotFinite,
}

/// Rectángulo de selección alineado a los ejes (coordenadas de pantalla, y hacia abajo).
///
/// Contención semiabierta: `left <= x < right` y `top <= y < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl SelectionRect {
    /// Construye el rectángulo de un arrastre a partir de sus dos esquinas.
    /// Los arrastres de área cero se rechazan antes de cualquier consulta.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Result<Self, RegionError> {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return Err(RegionError::NotFinite);
        }
        let rect = Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        };
        if rect.width() > 0.0 && rect.height() > 0.0 {
            Ok(rect)
        } else {
            Err(RegionError::Degenerate {
                width: rect.width(),
                height: rect.height(),
            })
        }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as f32, y as f32);
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }
}

/// Muestras de `samples` dentro de `rect`, en el orden original
pub fn select<'a>(rect: &SelectionRect, samples: impl IntoIterator<Item = &'a Sample>) -> Vec<Sample> {
    samples
        .into_iter()
        .filter(|s| rect.contains(s.x, s.y))
        .copied()
        .collect()
}

/// Consulta sobre todo el historial vivo del lienzo (sin segmentar por tiempo)
pub fn query(rect: &SelectionRect, log: &StrokeLog) -> Vec<Sample> {
    select(rect, log.samples())
}
