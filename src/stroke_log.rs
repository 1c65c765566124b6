use log::warn;

use crate::types::{PenState, Sample};

/// Identificador monótono de trazo dentro de un log
pub type StrokeId = u64;

/// Un trazo: muestras desde el Down hasta el Up correspondiente
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub id: StrokeId,
    pub samples: Vec<Sample>,
    /// Instante del pen-down (ms)
    pub down_ms: u64,
    /// Instante del pen-up (ms); `None` mientras está abierto o si el pen-up se perdió
    pub up_ms: Option<u64>,
}

impl Stroke {
    /// `false` si el trazo se selló sin muestra Up (pen-up perdido)
    pub fn has_pen_up(&self) -> bool {
        self.up_ms.is_some()
    }

    /// Instante usado como "último levantamiento" al segmentar.
    /// Un trazo sellado sin Up (pen-up perdido) usa su instante de inicio.
    pub fn lift_ms(&self) -> u64 {
        self.up_ms.unwrap_or(self.down_ms)
    }
}

/// Log append-only de trazos con historial de deshacer/rehacer.
///
/// Los trazos sellados nunca se modifican; deshacer los mueve a la pila de
/// rehacer y la segmentación se recalcula desde aquí.
#[derive(Debug, Default)]
pub struct StrokeLog {
    strokes: Vec<Stroke>,
    open: Option<Stroke>,
    redo: Vec<Stroke>,
    next_id: StrokeId,
}

impl StrokeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abre un trazo nuevo con una muestra Down
    pub fn begin(&mut self, x: i32, y: i32, t_ms: u64) -> StrokeId {
        if let Some(lost) = self.open.take() {
            warn!(
                "pen-down con el trazo {} abierto; se sella sin pen-up",
                lost.id
            );
            self.strokes.push(lost);
        }
        self.redo.clear();

        let id = self.next_id;
        self.next_id += 1;
        self.open = Some(Stroke {
            id,
            samples: vec![Sample::new(x, y, PenState::Down)],
            down_ms: t_ms,
            up_ms: None,
        });
        id
    }

    /// Añade una muestra Move al trazo abierto
    pub fn extend(&mut self, x: i32, y: i32) -> bool {
        match self.open.as_mut() {
            Some(stroke) => {
                stroke.samples.push(Sample::new(x, y, PenState::Move));
                true
            }
            None => {
                warn!("pen-move sin trazo abierto en ({}, {}); ignorado", x, y);
                false
            }
        }
    }

    /// Añade la muestra Up y sella el trazo
    pub fn end(&mut self, x: i32, y: i32, t_ms: u64) -> Option<StrokeId> {
        let Some(mut stroke) = self.open.take() else {
            warn!("pen-up sin trazo abierto en ({}, {}); ignorado", x, y);
            return None;
        };
        stroke.samples.push(Sample::new(x, y, PenState::Up));
        stroke.up_ms = Some(t_ms);
        let id = stroke.id;
        self.strokes.push(stroke);
        Some(id)
    }

    /// Retira el último trazo sellado a la pila de rehacer
    pub fn undo(&mut self) -> Option<StrokeId> {
        let stroke = self.strokes.pop()?;
        let id = stroke.id;
        self.redo.push(stroke);
        Some(id)
    }

    /// Restaura el último trazo deshecho
    pub fn redo(&mut self) -> Option<StrokeId> {
        let stroke = self.redo.pop()?;
        let id = stroke.id;
        self.strokes.push(stroke);
        Some(id)
    }

    /// Borra todo, incluido el historial
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.redo.clear();
        self.open = None;
    }

    /// Trazos sellados en orden de dibujo
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn open_stroke(&self) -> Option<&Stroke> {
        self.open.as_ref()
    }

    /// Id que recibirá el próximo trazo
    pub fn next_id(&self) -> StrokeId {
        self.next_id
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Todas las muestras en orden de dibujo (sellados y luego el abierto)
    pub fn samples(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.strokes
            .iter()
            .chain(self.open.iter())
            .flat_map(|stroke| stroke.samples.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.open.is_none()
    }
}
