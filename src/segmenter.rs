use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::stroke_log::{Stroke, StrokeId, StrokeLog};
use crate::types::{CharacterBuffer, GAP_THRESHOLD_MS};

/// Parámetros de la segmentación temporal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Pausa mínima (estricta) entre pen-up y pen-down para empezar un carácter nuevo (default: 3000)
    pub gap_threshold_ms: u64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            gap_threshold_ms: GAP_THRESHOLD_MS,
        }
    }
}

/// Segmentación derivada del log: caracteres cerrados + carácter en curso
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub finalized: Vec<CharacterBuffer>,
    pub current: CharacterBuffer,
}

/// Agrupa trazos en caracteres según la pausa entre levantar y volver a apoyar el lápiz.
///
/// No guarda buffers mutables: el log de trazos es la única fuente de verdad y
/// la segmentación se recalcula a demanda, así deshacer/rehacer nunca deja
/// buffers desincronizados.
#[derive(Debug, Default)]
pub struct TemporalSegmenter {
    config: SegmenterConfig,
    log: StrokeLog,
    /// Último trazo sellado de cada carácter cerrado por un flush; el trazo
    /// siguiente siempre empieza carácter nuevo
    forced_ends: BTreeSet<StrokeId>,
    /// Caracteres ya entregados por `flush_pending`
    delivered: usize,
}

impl TemporalSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn log(&self) -> &StrokeLog {
        &self.log
    }

    pub fn on_pen_down(&mut self, x: i32, y: i32, t_ms: u64) {
        if let Some(lift) = self.last_lift() {
            let gap = t_ms.saturating_sub(lift);
            if gap > self.config.gap_threshold_ms {
                debug!("Nuevo carácter tras una pausa de {}ms", gap);
            }
        }
        self.log.begin(x, y, t_ms);
    }

    pub fn on_pen_move(&mut self, x: i32, y: i32, _t_ms: u64) {
        self.log.extend(x, y);
    }

    pub fn on_pen_up(&mut self, x: i32, y: i32, t_ms: u64) {
        self.log.end(x, y, t_ms);
    }

    /// Instante del último pen-up registrado en el log
    pub fn last_lift(&self) -> Option<u64> {
        self.log.strokes().last().map(Stroke::lift_ms)
    }

    /// Segmentación actual. El trazo abierto, si lo hay, cuenta en `current`.
    pub fn segmentation(&self) -> Segmentation {
        self.segment(self.log.strokes().iter().chain(self.log.open_stroke()))
    }

    fn segment<'a>(&self, strokes: impl Iterator<Item = &'a Stroke>) -> Segmentation {
        let mut finalized = Vec::new();
        let mut current: CharacterBuffer = Vec::new();
        let mut last_lift: Option<u64> = None;
        let mut after_boundary = false;

        for stroke in strokes {
            let long_pause = last_lift
                .map(|lift| stroke.down_ms.saturating_sub(lift) > self.config.gap_threshold_ms)
                .unwrap_or(false);

            if !current.is_empty() && (long_pause || after_boundary) {
                finalized.push(std::mem::take(&mut current));
            }
            current.extend_from_slice(&stroke.samples);
            last_lift = Some(stroke.lift_ms());
            after_boundary = self.forced_ends.contains(&stroke.id);
        }

        Segmentation { finalized, current }
    }

    /// Todos los caracteres (cerrados y el actual), sin consumir nada
    pub fn characters(&self) -> Vec<CharacterBuffer> {
        let Segmentation {
            mut finalized,
            current,
        } = self.segmentation();
        if !current.is_empty() {
            finalized.push(current);
        }
        finalized
    }

    /// Cierra el carácter en curso y devuelve los caracteres aún no entregados.
    ///
    /// Solo cuentan los trazos sellados; un trazo abierto sigue perteneciendo
    /// al carácter siguiente. Dos llamadas seguidas sin dibujar entre medias:
    /// la segunda devuelve una lista vacía.
    pub fn flush_pending(&mut self) -> Vec<CharacterBuffer> {
        let Segmentation {
            mut finalized,
            current,
        } = self.segment(self.log.strokes().iter());

        if !current.is_empty() {
            finalized.push(current);
            if let Some(last) = self.log.strokes().last() {
                self.forced_ends.insert(last.id);
            }
        }

        self.delivered = self.delivered.min(finalized.len());
        let pending = finalized.split_off(self.delivered);
        self.delivered += pending.len();

        debug!(
            "flush: {} caracteres nuevos ({} entregados en total)",
            pending.len(),
            self.delivered
        );
        pending
    }

    /// Deshace el último trazo y recalcula la segmentación.
    ///
    /// Si el trazo cerraba un carácter ya entregado, la frontera pasa al
    /// trazo sellado anterior para que la tinta nueva no se una a él.
    pub fn undo(&mut self) -> Option<StrokeId> {
        let id = self.log.undo()?;
        if self.forced_ends.remove(&id) {
            if let Some(prev) = self.log.strokes().last() {
                self.forced_ends.insert(prev.id);
            }
        }
        self.clamp_delivered();
        Some(id)
    }

    pub fn redo(&mut self) -> Option<StrokeId> {
        let id = self.log.redo()?;
        self.clamp_delivered();
        Some(id)
    }

    fn clamp_delivered(&mut self) {
        let closed = self.characters_sealed();
        self.delivered = self.delivered.min(closed);
    }

    fn characters_sealed(&self) -> usize {
        let seg = self.segment(self.log.strokes().iter());
        seg.finalized.len() + usize::from(!seg.current.is_empty())
    }

    /// Vuelve al estado inicial (lienzo limpio)
    pub fn reset(&mut self) {
        self.log.clear();
        self.forced_ends.clear();
        self.delivered = 0;
    }
}
