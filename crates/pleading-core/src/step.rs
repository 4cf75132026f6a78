//! The four workflow steps.

use crate::error::WorkflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A step in the complaint assembly flow, ordered by progression.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    /// Connect the drive and pick a case folder.
    #[default]
    CaseSetup,
    /// Pick source documents from the case folder.
    DocumentSelection,
    /// Pick a complaint template.
    TemplateSelection,
    /// Review extracted data and the legal analysis.
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::CaseSetup,
        Step::DocumentSelection,
        Step::TemplateSelection,
        Step::Review,
    ];

    pub fn index(self) -> u8 {
        match self {
            Step::CaseSetup => 0,
            Step::DocumentSelection => 1,
            Step::TemplateSelection => 2,
            Step::Review => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::CaseSetup => "Case Setup",
            Step::DocumentSelection => "Select Documents",
            Step::TemplateSelection => "Select Template",
            Step::Review => "Review Data",
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.index()
    }
}

impl TryFrom<u8> for Step {
    type Error = WorkflowError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::from_index(value).ok_or_else(|| WorkflowError::InvalidStep(value.to_string()))
    }
}

impl FromStr for Step {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index: u8 = s
            .trim()
            .parse()
            .map_err(|_| WorkflowError::InvalidStep(s.to_string()))?;
        Step::try_from(index)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered_by_progression() {
        assert!(Step::CaseSetup < Step::DocumentSelection);
        assert!(Step::TemplateSelection < Step::Review);
        assert_eq!(Step::default(), Step::CaseSetup);
    }

    #[test]
    fn parse_accepts_only_known_indices() {
        assert_eq!("3".parse::<Step>().unwrap(), Step::Review);
        assert_eq!(" 1 ".parse::<Step>().unwrap(), Step::DocumentSelection);
        assert!("4".parse::<Step>().is_err());
        assert!("review".parse::<Step>().is_err());
    }

    #[test]
    fn serializes_as_index() {
        assert_eq!(serde_json::to_string(&Step::Review).unwrap(), "3");
        let step: Step = serde_json::from_str("2").unwrap();
        assert_eq!(step, Step::TemplateSelection);
        assert!(serde_json::from_str::<Step>("9").is_err());
    }
}
