//! The four wizard steps and the actions that belong to them

use crate::api::{
    OP_DAILY_NEWS, OP_GENERATE_AUDIO, OP_GENERATE_OUTLINE, OP_GENERATE_QUESTIONS,
    OP_GENERATE_SCRIPT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepId {
    ContentAcquisition,
    ContentOutline,
    ScriptGeneration,
    AudioGeneration,
}

impl StepId {
    pub fn all() -> &'static [StepId] {
        &[
            StepId::ContentAcquisition,
            StepId::ContentOutline,
            StepId::ScriptGeneration,
            StepId::AudioGeneration,
        ]
    }

    /// 1-based position shown to the user
    pub fn number(&self) -> usize {
        match self {
            StepId::ContentAcquisition => 1,
            StepId::ContentOutline => 2,
            StepId::ScriptGeneration => 3,
            StepId::AudioGeneration => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StepId::ContentAcquisition => "Content Acquisition",
            StepId::ContentOutline => "Content Outline",
            StepId::ScriptGeneration => "Podcast Generation",
            StepId::AudioGeneration => "Audio Generation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StepId::ContentAcquisition => {
                "Fetch daily news or input your own content for the podcast."
            }
            StepId::ContentOutline => "Generate an outline and questions based on the content.",
            StepId::ScriptGeneration => {
                "Create the podcast script based on the outline and questions."
            }
            StepId::AudioGeneration => "Convert the podcast script into audio.",
        }
    }

    pub fn next(&self) -> Option<StepId> {
        match self {
            StepId::ContentAcquisition => Some(StepId::ContentOutline),
            StepId::ContentOutline => Some(StepId::ScriptGeneration),
            StepId::ScriptGeneration => Some(StepId::AudioGeneration),
            StepId::AudioGeneration => None,
        }
    }

    pub fn prev(&self) -> Option<StepId> {
        match self {
            StepId::ContentAcquisition => None,
            StepId::ContentOutline => Some(StepId::ContentAcquisition),
            StepId::ScriptGeneration => Some(StepId::ContentOutline),
            StepId::AudioGeneration => Some(StepId::ScriptGeneration),
        }
    }

    /// Actions that can be triggered while this step is shown
    pub fn actions(&self) -> &'static [Action] {
        match self {
            StepId::ContentAcquisition => &[Action::FetchNews],
            StepId::ContentOutline => &[Action::GenerateOutline, Action::GenerateQuestions],
            StepId::ScriptGeneration => &[Action::GenerateScript],
            StepId::AudioGeneration => &[Action::GenerateAudio],
        }
    }
}

/// A backend-bound action triggered from a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FetchNews,
    GenerateOutline,
    GenerateQuestions,
    GenerateScript,
    GenerateAudio,
}

impl Action {
    pub fn step(&self) -> StepId {
        match self {
            Action::FetchNews => StepId::ContentAcquisition,
            Action::GenerateOutline | Action::GenerateQuestions => StepId::ContentOutline,
            Action::GenerateScript => StepId::ScriptGeneration,
            Action::GenerateAudio => StepId::AudioGeneration,
        }
    }

    /// Backend operation name used in errors and logs
    pub fn operation(&self) -> &'static str {
        match self {
            Action::FetchNews => OP_DAILY_NEWS,
            Action::GenerateOutline => OP_GENERATE_OUTLINE,
            Action::GenerateQuestions => OP_GENERATE_QUESTIONS,
            Action::GenerateScript => OP_GENERATE_SCRIPT,
            Action::GenerateAudio => OP_GENERATE_AUDIO,
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Action::FetchNews => "Fetch today's news",
            Action::GenerateOutline => "Generate outline",
            Action::GenerateQuestions => "Generate questions",
            Action::GenerateScript => "Generate podcast script",
            Action::GenerateAudio => "Generate podcast audio",
        }
    }

    pub fn loading_label(&self) -> &'static str {
        match self {
            Action::FetchNews => "Fetching...",
            _ => "Generating...",
        }
    }
}
