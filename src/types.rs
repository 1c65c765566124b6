use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Estado del lápiz en una muestra.
///
/// En el formato plano `Down` y `Move` comparten el valor 1 y solo `Up` usa 0:
/// el flag indica "el trazo continúa" frente a "el trazo terminó".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenState {
    Down,
    Move,
    Up,
}

impl PenState {
    /// Valor plano (1 = continúa, 0 = levantado)
    pub fn flag(self) -> u8 {
        match self {
            PenState::Down | PenState::Move => 1,
            PenState::Up => 0,
        }
    }
}

impl fmt::Display for PenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PenState::Down => "down",
            PenState::Move => "move",
            PenState::Up => "up",
        };
        f.write_str(name)
    }
}

impl FromStr for PenState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(PenState::Down),
            "move" => Ok(PenState::Move),
            "up" => Ok(PenState::Up),
            other => Err(format!("evento de lápiz desconocido: {:?}", other)),
        }
    }
}

/// Evento de entrada tal como lo entrega la capa de captura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenEvent {
    /// Reloj de pared en milisegundos
    pub t_ms: u64,
    pub kind: PenState,
    pub x: i32,
    pub y: i32,
}

impl PenEvent {
    pub fn new(t_ms: u64, kind: PenState, x: i32, y: i32) -> Self {
        Self { t_ms, kind, x, y }
    }
}

/// Una muestra de entrada en coordenadas de pantalla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    pub pen: PenState,
}

impl Sample {
    pub fn new(x: i32, y: i32, pen: PenState) -> Self {
        Self { x, y, pen }
    }

    /// Tupla plana `(x, y, flag)`
    pub fn to_triple(self) -> (i32, i32, u8) {
        (self.x, self.y, self.pen.flag())
    }

    pub fn point(self) -> Point {
        Point { x: self.x, y: self.y }
    }
}

/// Punto entero (salida del remuestreo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Punto normalizado dentro de la ventana cuadrada
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Secuencia de muestras de un carácter lógico (uno o varios trazos)
pub type CharacterBuffer = Vec<Sample>;

/// Constantes del sistema
pub const GAP_THRESHOLD_MS: u64 = 3000;
pub const RESAMPLE_TARGET_COUNT: usize = 100;
pub const NORMALIZE_WINDOW: u32 = 64;
pub const NORMALIZE_PADDING: u32 = 2;

/// Centroide (2) + centroides de cuadrante (8) + conteos (4) + distancias a cuadrantes (4)
pub const FIXED_FEATURES: usize = 2 + 2 * 4 + 4 + 4;

/// Longitud del vector de características para `target_count` puntos remuestreados.
///
/// El clasificador se entrena con esta longitud: cambiar `target_count` exige
/// un modelo nuevo.
pub const fn feature_len(target_count: usize) -> usize {
    FIXED_FEATURES + 2 * target_count
}

/// 218 con la configuración por defecto
pub const TOTAL_EXTRACTED_FEATURES: usize = feature_len(RESAMPLE_TARGET_COUNT);
