#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingInputs,
    BuildingModel,
    OpeningOutput,
    Evaluating,
    WritingManifest,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingInputs => "loading inputs",
            RunStage::BuildingModel => "building model",
            RunStage::OpeningOutput => "opening output",
            RunStage::Evaluating => "evaluating",
            RunStage::WritingManifest => "writing manifest",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridProgress {
    pub time: f64,
    pub t_max: f64,
    pub index: usize,
    pub time_points: usize,
    pub fraction_complete: f64,
    pub rows_written: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub grid: Option<GridProgress>,
}
