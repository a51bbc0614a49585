//! Questionnaire scoring: NAQ section analysis and symptom burden.

pub mod analyzer;
pub mod sections;
pub mod symptom_burden;
pub mod types;

pub use analyzer::{section_score, NaqAnalyzer};
pub use sections::{SectionDef, NAQ_SECTIONS};
pub use symptom_burden::{analyze_symptom_burden, interpret_burden};
pub use types::*;
