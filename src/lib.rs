//! Multiclass text classification pipeline for GitHub issue triage.
//!
//! Predicts an "Area" label from an issue's title and description. The crate
//! provides:
//! - TSV dataset loading bound to the fixed issue schema
//! - A declarative feature pipeline (label encoding, per-column TF-IDF
//!   featurization, concatenation, cache checkpoint)
//! - A multiclass linear trainer delegating optimization to smartcore
//! - Model persistence to a single binary artifact
//! - Batch evaluation (micro/macro accuracy, log loss, log-loss reduction)
//! - A single-record prediction engine
//!
//! The `issue-triage` binary wires the components into one sequential run:
//! load, build the pipeline, train, save, evaluate, predict.

pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod model;
pub mod pipeline;
pub mod predict;

pub use config::Config;
pub use data::{load_tsv, IssueDataset, IssueRecord};
pub use error::{Result, TriageError};
pub use eval::{evaluate, ClassificationMetrics};
pub use model::{load_model, save_model, PredictionResult, Trainer, Transformer, TriageModel};
pub use pipeline::{feature_pipeline, FeaturePipeline, PipelineDescriptor};
pub use predict::PredictionEngine;
