use trazo::canvas::{Canvas, DrawingMode, SquareOutcome};
use trazo::classifier::{predict_batch, Classifier, ClassifierError, LabelTable, Prediction};
use trazo::config::Config;
use trazo::csv_loader::read_events;
use trazo::region::SelectionRect;
use trazo::segmenter::TemporalSegmenter;
use trazo::types::{PenEvent, TOTAL_EXTRACTED_FEATURES};

/// Dos trazos con 5000ms de pausa, luego dos trazos con 1000ms de pausa
const RECORDING: &str = "t_ms,event,x,y
0,down,10,10
20,move,20,40
40,up,30,10
5040,down,200,10
5060,move,210,30
5080,up,220,60
6080,down,205,20
6100,up,230,20
";

fn replay(segmenter: &mut TemporalSegmenter, events: &[PenEvent]) {
    for ev in events {
        match ev.kind {
            trazo::types::PenState::Down => segmenter.on_pen_down(ev.x, ev.y, ev.t_ms),
            trazo::types::PenState::Move => segmenter.on_pen_move(ev.x, ev.y, ev.t_ms),
            trazo::types::PenState::Up => segmenter.on_pen_up(ev.x, ev.y, ev.t_ms),
        }
    }
}

struct FixedClassifier(usize);

impl Classifier for FixedClassifier {
    fn expected_len(&self) -> usize {
        TOTAL_EXTRACTED_FEATURES
    }

    fn predict(&mut self, _features: &[f64]) -> Result<usize, ClassifierError> {
        Ok(self.0)
    }
}

#[test]
fn recording_splits_on_long_pause_only() {
    let events = read_events(RECORDING.as_bytes()).unwrap();
    let mut segmenter = TemporalSegmenter::default();
    replay(&mut segmenter, &events);

    let characters = segmenter.flush_pending();
    assert_eq!(characters.len(), 2);
    assert_eq!(characters[0].len(), 3);
    // la pausa de 1000ms no separa: el segundo carácter tiene dos trazos
    assert_eq!(characters[1].len(), 5);
    assert!(segmenter.flush_pending().is_empty());
}

#[test]
fn recording_to_predictions() {
    let events = read_events(RECORDING.as_bytes()).unwrap();
    let mut canvas = Canvas::new(Config::default().segmenter, Config::default().pipeline);
    for ev in events {
        canvas.handle(ev);
    }

    let mut batch = canvas.pending_features();
    assert!(batch.iter().all(|f| f.len() == TOTAL_EXTRACTED_FEATURES));
    batch.push(Vec::new());

    let labels = LabelTable::from_json_str(r#"{"index_to_class": {"0": "KA", "1": "KHA"}}"#).unwrap();
    let predictions = predict_batch(&mut FixedClassifier(1), &labels, &batch);
    assert_eq!(
        predictions,
        vec![
            Prediction::Label("KHA".into()),
            Prediction::Label("KHA".into()),
            Prediction::NoCharacter,
        ]
    );
}

#[test]
fn selection_outside_ink_is_no_character() {
    let events = read_events(RECORDING.as_bytes()).unwrap();
    let mut canvas = Canvas::default();
    for ev in events {
        canvas.handle(ev);
    }
    canvas.set_mode(DrawingMode::Square);

    let empty = SelectionRect::from_corners(500.0, 500.0, 700.0, 700.0).unwrap();
    assert_eq!(canvas.select(empty), SquareOutcome::NoCharacter { index: 0 });

    let second = SelectionRect::from_corners(190.0, 0.0, 240.0, 70.0).unwrap();
    match canvas.select(second) {
        SquareOutcome::Features { index, features } => {
            assert_eq!(index, 1);
            assert_eq!(features.len(), TOTAL_EXTRACTED_FEATURES);
        }
        other => panic!("selección vacía inesperada: {:?}", other),
    }
}
