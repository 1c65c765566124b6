use log::debug;

use crate::pipeline::{extract_features, PipelineConfig};
use crate::region::{self, SelectionRect};
use crate::segmenter::{SegmenterConfig, TemporalSegmenter};
use crate::stroke_log::StrokeId;
use crate::types::{CharacterBuffer, PenEvent, PenState};

/// Modo de dibujo del lienzo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    /// Los eventos se registran como trazos
    #[default]
    Freehand,
    /// Los eventos dibujan un rectángulo de selección de un solo carácter
    Square,
}

/// Estado de la predicción de un rectángulo
#[derive(Debug, Clone, PartialEq)]
pub enum SquareStatus {
    Predicting,
    NoCharacter,
    Labeled(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictedSquare {
    pub rect: SelectionRect,
    pub status: SquareStatus,
}

/// Resultado de cerrar un rectángulo de selección
#[derive(Debug, Clone, PartialEq)]
pub enum SquareOutcome {
    /// Vector listo para el clasificador; `index` identifica el rectángulo
    Features { index: usize, features: Vec<f64> },
    /// Ningún punto dentro: no se debe llamar al clasificador
    NoCharacter { index: usize },
}

/// Sesión de dibujo: un segmentador por lienzo y los rectángulos de selección
#[derive(Debug, Default)]
pub struct Canvas {
    mode: DrawingMode,
    segmenter: TemporalSegmenter,
    pipeline: PipelineConfig,
    squares: Vec<PredictedSquare>,
    drag_start: Option<(f32, f32)>,
}

impl Canvas {
    pub fn new(segmenter: SegmenterConfig, pipeline: PipelineConfig) -> Self {
        Self {
            segmenter: TemporalSegmenter::new(segmenter),
            pipeline,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawingMode) {
        debug!("Modo de dibujo: {:?}", mode);
        self.drag_start = None;
        self.mode = mode;
    }

    pub fn segmenter(&self) -> &TemporalSegmenter {
        &self.segmenter
    }

    pub fn squares(&self) -> &[PredictedSquare] {
        &self.squares
    }

    /// Encamina un evento según el modo. Solo el pen-up en modo `Square`
    /// produce un resultado.
    pub fn handle(&mut self, event: PenEvent) -> Option<SquareOutcome> {
        let PenEvent { t_ms, kind, x, y } = event;
        match (self.mode, kind) {
            (DrawingMode::Freehand, PenState::Down) => self.segmenter.on_pen_down(x, y, t_ms),
            (DrawingMode::Freehand, PenState::Move) => self.segmenter.on_pen_move(x, y, t_ms),
            (DrawingMode::Freehand, PenState::Up) => self.segmenter.on_pen_up(x, y, t_ms),
            (DrawingMode::Square, PenState::Down) => self.drag_start = Some((x as f32, y as f32)),
            (DrawingMode::Square, PenState::Move) => {}
            (DrawingMode::Square, PenState::Up) => return self.finish_square(x as f32, y as f32),
        }
        None
    }

    fn finish_square(&mut self, x: f32, y: f32) -> Option<SquareOutcome> {
        let (x0, y0) = self.drag_start.take()?;
        match SelectionRect::from_corners(x0, y0, x, y) {
            Ok(rect) => Some(self.select(rect)),
            Err(e) => {
                debug!("Rectángulo descartado: {}", e);
                None
            }
        }
    }

    /// Consulta los puntos dentro de `rect` sobre todo el historial y
    /// ejecuta la cadena de características
    pub fn select(&mut self, rect: SelectionRect) -> SquareOutcome {
        let index = self.squares.len();
        let points = region::query(&rect, self.segmenter.log());
        let features = extract_features(&points, &self.pipeline);

        if features.is_empty() {
            debug!("Sin puntos dentro del rectángulo {:?}", rect);
            self.squares.push(PredictedSquare {
                rect,
                status: SquareStatus::NoCharacter,
            });
            SquareOutcome::NoCharacter { index }
        } else {
            self.squares.push(PredictedSquare {
                rect,
                status: SquareStatus::Predicting,
            });
            SquareOutcome::Features { index, features }
        }
    }

    /// Registra la etiqueta predicha para un rectángulo
    pub fn set_square_label(&mut self, index: usize, label: impl Into<String>) -> bool {
        match self.squares.get_mut(index) {
            Some(square) => {
                square.status = SquareStatus::Labeled(label.into());
                true
            }
            None => false,
        }
    }

    /// Caracteres nuevos desde el último flush, listos para predecir
    pub fn flush_pending(&mut self) -> Vec<CharacterBuffer> {
        self.segmenter.flush_pending()
    }

    /// Vectores de los caracteres nuevos (uno por carácter, en orden)
    pub fn pending_features(&mut self) -> Vec<Vec<f64>> {
        self.flush_pending()
            .iter()
            .map(|character| extract_features(character, &self.pipeline))
            .collect()
    }

    pub fn undo(&mut self) -> Option<StrokeId> {
        self.segmenter.undo()
    }

    pub fn redo(&mut self) -> Option<StrokeId> {
        self.segmenter.redo()
    }

    /// Limpia trazos, rectángulos y cualquier arrastre en curso
    pub fn clear(&mut self) {
        self.segmenter.reset();
        self.squares.clear();
        self.drag_start = None;
    }
}
