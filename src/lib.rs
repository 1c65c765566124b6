pub mod canvas;
pub mod classifier;
pub mod config;
pub mod csv_loader;
pub mod feature_extractor;
pub mod normalize;
pub mod pipeline;
pub mod region;
pub mod resample;
pub mod segmenter;
pub mod stroke_log;
pub mod types;
