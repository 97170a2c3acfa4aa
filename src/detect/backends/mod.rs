pub mod stub;

#[cfg(feature = "backend-tract")]
pub mod tract;

pub use stub::{
    ScriptedNoiseClassifier, ScriptedSequenceDetector, StubNoiseClassifier, StubSequenceDetector,
};

#[cfg(feature = "backend-tract")]
pub use tract::{TractNoiseClassifier, TractSequenceDetector};

use anyhow::{anyhow, Result};

use crate::config::LabellerConfig;

use super::model::{NoiseClassifier, SequenceDetector};

/// Build the classifier/detector pair named by the configuration.
pub fn from_config(
    cfg: &LabellerConfig,
) -> Result<(Box<dyn NoiseClassifier>, Box<dyn SequenceDetector>)> {
    match cfg.backend.as_str() {
        "stub" => Ok((
            Box::new(StubNoiseClassifier::new()),
            Box::new(StubSequenceDetector::new()),
        )),
        "tract" => tract_pair(cfg),
        other => Err(anyhow!("unknown backend '{}'", other)),
    }
}

#[cfg(feature = "backend-tract")]
fn tract_pair(
    cfg: &LabellerConfig,
) -> Result<(Box<dyn NoiseClassifier>, Box<dyn SequenceDetector>)> {
    let models = &cfg.models;
    let classifier_path = models
        .classifier_path
        .as_ref()
        .ok_or_else(|| anyhow!("tract backend requires models.classifier_path"))?;
    let detector_path = models
        .detector_path
        .as_ref()
        .ok_or_else(|| anyhow!("tract backend requires models.detector_path"))?;

    let classifier = TractNoiseClassifier::new(classifier_path, models.classifier_input)?;
    let detector = TractSequenceDetector::new(
        detector_path,
        models.detector_width,
        models.detector_height,
    )?
    .with_threshold(models.detector_confidence);
    Ok((Box::new(classifier), Box::new(detector)))
}

#[cfg(not(feature = "backend-tract"))]
fn tract_pair(
    _cfg: &LabellerConfig,
) -> Result<(Box<dyn NoiseClassifier>, Box<dyn SequenceDetector>)> {
    Err(anyhow!(
        "tract backend requested but crate was built without the backend-tract feature"
    ))
}
