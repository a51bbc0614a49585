pub mod similarity;
pub mod classification;
pub mod extraction;
pub mod assessment;
pub mod protocol;
pub mod processor; // Classify -> route -> extract/score
