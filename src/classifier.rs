use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    OnnxError(#[from] ort::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid feature size: expected {expected}, got {actual}")]
    InvalidFeatureSize { expected: usize, actual: usize },

    #[error("Empty feature vector")]
    EmptyFeatures,

    #[error("No output tensor found")]
    NoOutputTensor,

    #[error("Missing ONNX {kind}")]
    MissingIo { kind: &'static str },

    #[error("Class index {0} has no label")]
    UnknownClass(usize),
}

/// Modelo de clasificación de caracteres visto como caja negra
pub trait Classifier {
    /// Longitud de vector con la que se entrenó el modelo
    fn expected_len(&self) -> usize;

    /// Índice de la clase predicha
    fn predict(&mut self, features: &[f64]) -> Result<usize, ClassifierError>;
}

/// Rechaza un vector antes de llamar a `predict`
pub fn validate_features(expected: usize, features: &[f64]) -> Result<(), ClassifierError> {
    if features.is_empty() {
        return Err(ClassifierError::EmptyFeatures);
    }
    if features.len() != expected {
        return Err(ClassifierError::InvalidFeatureSize {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ClassesJson {
    index_to_class: HashMap<String, String>,
}

/// Tabla índice -> etiqueta mostrable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Carga `{"index_to_class": {"0": "A/अ", ...}}`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let content = fs::read_to_string(path.as_ref())?;
        let table = Self::from_json_str(&content)?;
        info!(
            "Etiquetas cargadas de {:?}: {} clases",
            path.as_ref(),
            table.len()
        );
        Ok(table)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ClassifierError> {
        let data: ClassesJson = serde_json::from_str(content)?;

        // Convertir HashMap a Vec ordenado por índice
        let mut pairs: Vec<(usize, String)> = data
            .index_to_class
            .into_iter()
            .filter_map(|(k, v)| k.parse::<usize>().ok().map(|idx| (idx, v)))
            .collect();

        pairs.sort_by_key(|(idx, _)| *idx);
        Ok(Self::new(pairs.into_iter().map(|(_, name)| name).collect()))
    }

    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Resultado por carácter en una predicción por lotes
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Label(String),
    /// Vector vacío: no se llamó al clasificador
    NoCharacter,
    /// Fallo aislado de este carácter; el resto del lote sigue
    Failed(String),
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::Label(label) => write!(f, "{}", label),
            Prediction::NoCharacter => write!(f, "No Char"),
            Prediction::Failed(_) => write!(f, "Error"),
        }
    }
}

/// Predice un carácter: vacío -> `NoCharacter`, cualquier error -> `Failed`
pub fn predict_one<C: Classifier + ?Sized>(
    classifier: &mut C,
    labels: &LabelTable,
    features: &[f64],
) -> Prediction {
    if features.is_empty() {
        return Prediction::NoCharacter;
    }

    let result = validate_features(classifier.expected_len(), features)
        .and_then(|_| classifier.predict(features))
        .and_then(|idx| {
            labels
                .label_for(idx)
                .map(str::to_owned)
                .ok_or(ClassifierError::UnknownClass(idx))
        });

    match result {
        Ok(label) => Prediction::Label(label),
        Err(e) => {
            warn!("Predicción fallida para un carácter: {}", e);
            Prediction::Failed(e.to_string())
        }
    }
}

/// Predice cada carácter del lote por separado; un fallo no aborta a los demás
pub fn predict_batch<C: Classifier + ?Sized>(
    classifier: &mut C,
    labels: &LabelTable,
    batch: &[Vec<f64>],
) -> Vec<Prediction> {
    batch
        .iter()
        .map(|features| predict_one(classifier, labels, features))
        .collect()
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

#[cfg(feature = "onnx")]
mod onnx {
    use std::path::Path;

    use log::info;
    use ort::session::Session;
    use ort::tensor::TensorElementType;
    use ort::value::ValueType;

    use super::{validate_features, Classifier, ClassifierError};

    /// Clasificador ONNX Runtime con entrada `[1, N]` f32
    pub struct OnnxClassifier {
        session: Session,
        input_name: String,
        prob_output_name: String,
        expected_len: usize,
    }

    impl OnnxClassifier {
        pub fn new(model_path: impl AsRef<Path>, expected_len: usize) -> Result<Self, ClassifierError> {
            let model_path = model_path.as_ref();
            let session = Session::builder()?.commit_from_file(model_path)?;

            let input_name = session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or(ClassifierError::MissingIo { kind: "input" })?;

            let prob_output_name = session
                .outputs
                .iter()
                .find(|output| {
                    matches!(
                        output.output_type,
                        ValueType::Tensor {
                            ty: TensorElementType::Float32,
                            ..
                        }
                    )
                })
                .or_else(|| session.outputs.first())
                .map(|output| output.name.clone())
                .ok_or(ClassifierError::MissingIo { kind: "output" })?;

            info!("[ONNX] Modelo cargado: {:?}", model_path);
            info!("[ONNX] Input: {} [1, {}]", input_name, expected_len);
            info!("[ONNX] Output: {}", prob_output_name);

            Ok(Self {
                session,
                input_name,
                prob_output_name,
                expected_len,
            })
        }
    }

    impl Classifier for OnnxClassifier {
        fn expected_len(&self) -> usize {
            self.expected_len
        }

        fn predict(&mut self, features: &[f64]) -> Result<usize, ClassifierError> {
            validate_features(self.expected_len, features)?;

            let input_data: Vec<f32> = features.iter().map(|&v| v as f32).collect();
            let shape_vec = vec![1_usize, self.expected_len];
            let input_value = ort::value::Value::from_array((shape_vec, input_data))?;

            let outputs = self.session.run(ort::inputs![
                self.input_name.as_str() => &input_value,
            ])?;

            let (_, prob_data) =
                outputs[self.prob_output_name.as_str()].try_extract_tensor::<f32>()?;

            prob_data
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(idx, _)| idx)
                .ok_or(ClassifierError::NoOutputTensor)
        }
    }
}
