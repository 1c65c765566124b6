use serde::{Deserialize, Serialize};

use crate::types::{feature_len, NormPoint};

/// Regla de redondeo a 2 decimales aplicada a cada escalar intermedio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// `floor(v * 100 + 0.5) / 100`
    #[default]
    HalfUp,
    /// Empates al par, para modelos entrenados con ese redondeo
    HalfEven,
}

impl Rounding {
    pub fn round2(self, v: f64) -> f64 {
        let scaled = v * 100.0;
        let r = match self {
            Rounding::HalfUp => (scaled + 0.5).floor(),
            Rounding::HalfEven => scaled.round_ties_even(),
        };
        r / 100.0
    }
}

/// Cuadrante relativo al centroide. Los empates van al cuadrante superior/derecho.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    pub fn of(p: NormPoint, centroid: NormPoint) -> Self {
        match (p.x >= centroid.x, p.y >= centroid.y) {
            (true, true) => Quadrant::Q1,
            (false, true) => Quadrant::Q2,
            (false, false) => Quadrant::Q3,
            (true, false) => Quadrant::Q4,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Resumen geométrico intermedio, útil para depurar un vector
#[derive(Debug, Clone, PartialEq)]
pub struct QuadrantSummary {
    pub centroid: NormPoint,
    pub quadrant_centroids: [NormPoint; 4],
    pub quadrant_counts: [usize; 4],
}

/// Convierte `T` puntos normalizados en el vector de características
/// `[CG, 4 x CG cuadrante, 4 x conteo, 4 x dist(CG, CG cuadrante),
/// T x dist(CG, p_i), T x dist(p_0, p_i)]`.
///
/// El orden es parte del contrato con el clasificador entrenado.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    rounding: Rounding,
}

impl FeatureExtractor {
    pub fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    /// Extrae `18 + 2T` características; vacío si no hay puntos
    pub fn extract(&self, points: &[NormPoint]) -> Vec<f64> {
        let Some(summary) = self.summarize(points) else {
            return Vec::new();
        };
        let centroid = summary.centroid;

        let mut features = Vec::with_capacity(feature_len(points.len()));

        features.push(centroid.x);
        features.push(centroid.y);

        for qc in &summary.quadrant_centroids {
            features.push(qc.x);
            features.push(qc.y);
        }

        features.extend(summary.quadrant_counts.iter().map(|&n| n as f64));

        for qc in &summary.quadrant_centroids {
            features.push(self.distance(centroid, *qc));
        }

        features.extend(points.iter().map(|p| self.distance(centroid, *p)));

        let first = points[0];
        features.extend(points.iter().map(|p| self.distance(first, *p)));

        debug_assert_eq!(features.len(), feature_len(points.len()));
        features
    }

    /// Centroide, partición en cuadrantes y sus centroides/conteos
    pub fn summarize(&self, points: &[NormPoint]) -> Option<QuadrantSummary> {
        let centroid = self.centroid(points.iter().copied())?;

        let mut buckets: [Vec<NormPoint>; 4] = Default::default();
        for p in points {
            buckets[Quadrant::of(*p, centroid).index()].push(*p);
        }

        let quadrant_centroids = Quadrant::ALL.map(|q| {
            self.centroid(buckets[q.index()].iter().copied())
                .unwrap_or(centroid)
        });
        let quadrant_counts = Quadrant::ALL.map(|q| buckets[q.index()].len());

        Some(QuadrantSummary {
            centroid,
            quadrant_centroids,
            quadrant_counts,
        })
    }

    /// Media aritmética redondeada; `None` si no hay puntos
    fn centroid(&self, points: impl Iterator<Item = NormPoint>) -> Option<NormPoint> {
        let (mut sum_x, mut sum_y, mut count) = (0.0, 0.0, 0usize);
        for p in points {
            sum_x += p.x;
            sum_y += p.y;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(NormPoint::new(
            self.rounding.round2(sum_x / n),
            self.rounding.round2(sum_y / n),
        ))
    }

    fn distance(&self, a: NormPoint, b: NormPoint) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        self.rounding.round2((dx * dx + dy * dy).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn np(raw: &[(f64, f64)]) -> Vec<NormPoint> {
        raw.iter().map(|&(x, y)| NormPoint::new(x, y)).collect()
    }

    #[test]
    fn test_empty_input_gives_empty_vector() {
        assert!(FeatureExtractor::default().extract(&[]).is_empty());
    }

    #[test]
    fn test_vector_layout() {
        let points = np(&[(2.0, 2.0), (62.0, 2.0), (62.0, 62.0), (2.0, 62.0)]);
        let f = FeatureExtractor::default().extract(&points);

        assert_eq!(f.len(), 18 + 2 * 4);
        // centroide
        assert_eq!(&f[0..2], &[32.0, 32.0]);
        // Q1 = (62,62), Q2 = (2,62), Q3 = (2,2), Q4 = (62,2)
        assert_eq!(&f[2..10], &[62.0, 62.0, 2.0, 62.0, 2.0, 2.0, 62.0, 2.0]);
        assert_eq!(&f[10..14], &[1.0, 1.0, 1.0, 1.0]);
        // sqrt(30^2 + 30^2) = 42.426.. -> 42.43
        assert_eq!(&f[14..18], &[42.43; 4]);
        assert_eq!(&f[18..22], &[42.43; 4]);
        assert_eq!(&f[22..26], &[0.0, 60.0, 84.85, 60.0]);
    }

    #[test]
    fn test_ties_go_to_upper_right() {
        let centroid = NormPoint::new(10.0, 10.0);
        assert_eq!(Quadrant::of(NormPoint::new(10.0, 10.0), centroid), Quadrant::Q1);
        assert_eq!(Quadrant::of(NormPoint::new(9.99, 10.0), centroid), Quadrant::Q2);
        assert_eq!(Quadrant::of(NormPoint::new(9.0, 9.0), centroid), Quadrant::Q3);
        assert_eq!(Quadrant::of(NormPoint::new(10.0, 9.99), centroid), Quadrant::Q4);
    }

    #[test]
    fn test_empty_quadrant_uses_main_centroid() {
        // todos los puntos iguales -> todos en Q1
        let points = np(&[(2.0, 2.0); 5]);
        let f = FeatureExtractor::default().extract(&points);
        assert_eq!(&f[0..2], &[2.0, 2.0]);
        assert!(f[2..10].iter().all(|&v| v == 2.0));
        assert_eq!(&f[10..14], &[5.0, 0.0, 0.0, 0.0]);
        assert!(f[14..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_quadrant_counts_cover_all_points() {
        let points: Vec<NormPoint> = (0..100)
            .map(|i| {
                let t = i as f64 * 0.37;
                NormPoint::new(32.0 + 20.0 * t.cos(), 32.0 + 13.0 * (1.7 * t).sin())
            })
            .collect();
        let extractor = FeatureExtractor::default();
        let summary = extractor.summarize(&points).unwrap();
        assert_eq!(summary.quadrant_counts.iter().sum::<usize>(), 100);

        let f = extractor.extract(&points);
        assert_eq!(f.len(), 218);
        assert_eq!(f[10..14].iter().sum::<f64>(), 100.0);
    }

    #[test]
    fn test_rounding_modes() {
        assert_eq!(Rounding::HalfUp.round2(0.125), 0.13);
        assert_eq!(Rounding::HalfEven.round2(0.125), 0.12);
        assert_eq!(Rounding::HalfUp.round2(-0.125), -0.12);
        assert_eq!(Rounding::HalfEven.round2(1.23456), 1.23);
    }
}
