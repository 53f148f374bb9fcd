use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Ordered stages of the generation pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Research,
    Script,
    Media,
    PostProcess,
    StageForReview,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PipelineStage::Research => write!(f, "research"),
            PipelineStage::Script => write!(f, "script"),
            PipelineStage::Media => write!(f, "media"),
            PipelineStage::PostProcess => write!(f, "post_process"),
            PipelineStage::StageForReview => write!(f, "stage_for_review"),
        }
    }
}
