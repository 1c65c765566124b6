use serde::{Deserialize, Serialize};

use crate::types::{Point, RESAMPLE_TARGET_COUNT};

/// Qué hacer con el extremo final cuando el remuestreo excede `target_count`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Recorta a los primeros `target_count` puntos (descarta el punto final real).
    /// Es el comportamiento con el que se entrenó el clasificador existente.
    #[default]
    Truncate,
    /// Recorta igual, pero el último punto conservado es el punto final real
    PreserveEnds,
}

/// Parámetros del remuestreo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Número de puntos de salida (default: 100)
    pub target_count: usize,
    pub endpoint_policy: EndpointPolicy,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            target_count: RESAMPLE_TARGET_COUNT,
            endpoint_policy: EndpointPolicy::Truncate,
        }
    }
}

/// Redondeo al entero más cercano con empates hacia +inf
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Remuestrea `points` a exactamente `config.target_count` puntos por
/// interpolación lineal a lo largo de cada segmento.
///
/// Con menos de 2 puntos no hay nada que interpolar y se devuelve la entrada.
pub fn resample(points: &[Point], config: &ResampleConfig) -> Vec<Point> {
    let target = config.target_count;
    if points.len() < 2 {
        return points.to_vec();
    }

    let segments = points.len() - 1;
    let per_segment = (target / segments).max(1);

    let mut out = Vec::with_capacity(segments * per_segment + 1);
    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        out.push(p1);

        for j in 1..per_segment {
            let t = j as f64 / per_segment as f64;
            let x = p1.x as f64 + t * (p2.x as f64 - p1.x as f64);
            let y = p1.y as f64 + t * (p2.y as f64 - p1.y as f64);
            out.push(Point::new(round_half_up(x), round_half_up(y)));
        }
    }

    let last = points[points.len() - 1];
    out.push(last);

    if out.len() > target {
        out.truncate(target);
        if config.endpoint_policy == EndpointPolicy::PreserveEnds {
            if let Some(tail) = out.last_mut() {
                *tail = last;
            }
        }
    } else {
        out.resize(target, last);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn cfg(target_count: usize, endpoint_policy: EndpointPolicy) -> ResampleConfig {
        ResampleConfig {
            target_count,
            endpoint_policy,
        }
    }

    #[test]
    fn test_golden_truncate() {
        let input = pts(&[(0, 0), (10, 0), (10, 10)]);
        let out = resample(&input, &cfg(4, EndpointPolicy::Truncate));
        assert_eq!(out, pts(&[(0, 0), (5, 0), (10, 0), (10, 5)]));
    }

    #[test]
    fn test_golden_preserve_ends() {
        let input = pts(&[(0, 0), (10, 0), (10, 10)]);
        let out = resample(&input, &cfg(4, EndpointPolicy::PreserveEnds));
        assert_eq!(out, pts(&[(0, 0), (5, 0), (10, 0), (10, 10)]));
    }

    #[test]
    fn test_short_input_passthrough() {
        let config = ResampleConfig::default();
        assert!(resample(&[], &config).is_empty());
        let single = pts(&[(3, 4)]);
        assert_eq!(resample(&single, &config), single);
    }

    #[test]
    fn test_length_invariant() {
        let config = ResampleConfig::default();
        for n in 2..260 {
            let input: Vec<Point> = (0..n).map(|i| Point::new(i * 3, (i * 7) % 11)).collect();
            assert_eq!(resample(&input, &config).len(), 100, "n = {}", n);
        }
        for target in [1, 2, 7, 33] {
            let input = pts(&[(0, 0), (5, 5), (9, 1)]);
            let out = resample(&input, &cfg(target, EndpointPolicy::PreserveEnds));
            assert_eq!(out.len(), target);
        }
    }

    #[test]
    fn test_start_preserved_and_padding() {
        let input = pts(&[(7, -3), (20, 40), (41, 2)]);
        let out = resample(&input, &ResampleConfig::default());
        assert_eq!(out[0], Point::new(7, -3));
        // 2 segmentos x 50 puntos + final = 101 -> recortado
        assert_eq!(out[50], Point::new(20, 40));

        // 5 segmentos x 2 puntos + final = 11 < 14: se rellena con el último
        let input = pts(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        let out = resample(&input, &cfg(14, EndpointPolicy::Truncate));
        assert_eq!(out.len(), 14);
        assert_eq!(out[1], Point::new(1, 1));
        assert!(out[9..].iter().all(|p| *p == Point::new(5, 5)));
    }

    #[test]
    fn test_interpolation_rounds_ties_up() {
        // t = 1/2 sobre (0,0)-(-5,5) -> (-2.5, 2.5) -> (-2, 3)
        let input = pts(&[(0, 0), (-5, 5)]);
        let out = resample(&input, &cfg(2, EndpointPolicy::Truncate));
        assert_eq!(out, pts(&[(0, 0), (-2, 3)]));

        let out = resample(&input, &cfg(2, EndpointPolicy::PreserveEnds));
        assert_eq!(out, pts(&[(0, 0), (-5, 5)]));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let input = pts(&[(i32::MIN, i32::MAX), (i32::MAX, i32::MIN)]);
        let out = resample(&input, &cfg(3, EndpointPolicy::Truncate));
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], Point::new(i32::MIN, i32::MAX));
        assert!(out[1].x < 0 && out[1].y > 0);
        assert!(out[2].x > 0 && out[2].y < 0);
    }
}
