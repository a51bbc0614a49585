use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CoachingCategory, Priority, SupplementVendor};

/// Structured view of a free-form practitioner protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedProtocol {
    pub phases: Vec<ProtocolPhase>,
    pub supplements: Vec<SupplementRecommendation>,
    pub coaching_notes: Vec<CoachingNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolPhase {
    pub id: Uuid,
    /// 1, 2 or 3.
    pub number: u8,
    pub name: String,
    pub duration: String,
    pub goals: Vec<String>,
    pub success_criteria: Vec<String>,
    pub next_phase_conditions: Vec<String>,
}

/// A product reference found in a supplement's parenthetical notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorReference {
    pub vendor: SupplementVendor,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementRecommendation {
    pub id: Uuid,
    pub name: String,
    /// At most one entry per vendor, in vendor table order.
    pub vendor_refs: Vec<VendorReference>,
    pub dosage: String,
    pub timing: String,
    pub duration: String,
    pub purpose: String,
    pub priority: Priority,
    /// Number of the enclosing phase, "1" outside any phase.
    pub phase: String,
    /// Practical timing instruction for a driver on the road.
    pub instructions: String,
}

impl SupplementRecommendation {
    pub fn vendor_reference(&self, vendor: SupplementVendor) -> Option<&str> {
        self.vendor_refs
            .iter()
            .find(|r| r.vendor == vendor)
            .map(|r| r.reference.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingNote {
    pub id: Uuid,
    pub category: CoachingCategory,
    pub content: String,
    pub phase: String,
    pub priority: Priority,
}
