//! Line-oriented protocol parser.
//!
//! Phases open at a `Phase 1/2/3` header and run until the next phase header
//! or a markdown heading at the same or a higher level (level 2 for plain-text
//! headers). Inside a phase, `Goals` / `Success Criteria` / `Next Phase`
//! headers start bullet lists. Supplement and coaching blocks open at their own
//! headings and collect bullet lines until closed the same way.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use super::types::{
    CoachingNote, ParsedProtocol, ProtocolPhase, SupplementRecommendation, VendorReference,
};
use crate::models::{CoachingCategory, Priority, SupplementVendor};

pub const DEFAULT_PHASE_DURATION: &str = "30 days";
pub const DEFAULT_SUPPLEMENT_DURATION: &str = "90 days";
pub const DEFAULT_PURPOSE: &str = "General health support";
/// Phase tag for supplements and notes outside any phase.
pub const DEFAULT_PHASE_TAG: &str = "1";

const MAX_GOALS: usize = 5;
const MAX_SUCCESS_CRITERIA: usize = 5;
const MAX_NEXT_PHASE_CONDITIONS: usize = 3;

/// List items must be strictly longer than this, in characters.
const MIN_LIST_ITEM_CHARS: usize = 10;

const HIGH_PRIORITY_WORDS: &[&str] = &["critical", "essential", "urgent", "priority", "foundation"];
const LOW_PRIORITY_WORDS: &[&str] = &["optional", "consider", "if needed", "supplement"];

/// Checked in order; the first keyword found in the supplement text wins.
const TIMING_INSTRUCTIONS: &[(&str, &str)] = &[
    ("morning", "Take with breakfast at truck stop or during pre-trip inspection"),
    ("evening", "Take before sleep during 10-hour break"),
    ("before bed", "Take 30 minutes before sleep during mandatory rest period"),
    ("with meals", "Take with meal at truck stop or packed lunch"),
    ("daily", "Take at consistent time each day, set phone reminder"),
];

const FALLBACK_INSTRUCTION: &str =
    "Follow dosage instructions, maintain consistency while on the road";

/// Checked in order; notes matching none are education.
const COACHING_KEYWORDS: &[(CoachingCategory, &[&str])] = &[
    (
        CoachingCategory::Troubleshooting,
        &["if you", "problem", "issue", "side effect", "trouble", "difficult"],
    ),
    (
        CoachingCategory::Expectations,
        &["expect", "may notice", "might notice", "within", "timeline", "normal to"],
    ),
    (
        CoachingCategory::Motivation,
        &["you can", "celebrate", "progress", "proud", "keep going", "motivat"],
    ),
];

fn pattern(p: &str) -> Regex {
    Regex::new(p).expect("valid regex")
}

static PHASE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^[#*\s]*phase\s*([123])\b"));

static LIST_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)^[#*\s]*(goals?|objectives?|targets?|success\s*criteria|outcomes?|progress\s*indicators?|next\s*phase|transition|advance\s*to)\b[^:]*?(?::\s*\**\s*(.*))?$",
    )
});

static SUPPLEMENT_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)^[#*\s]*(?:[\w&/'-]+\s+){0,3}(?:supplements?|recommendations?|protocol)\b")
});

static COACHING_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bcoaching\b"));

static LIFESTYLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\b(?:lifestyle|diet)"));

/// Overrides the lifestyle match: "Dietary Supplements" is a supplement block.
static SUPPLEMENT_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bsupplements?\b"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(?:•|-[^-]|\*\s|\d+[.)]\s)"));

static BULLET_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[•\-*\d.)]+\s*"));

/// `- Name dose timing (notes)`
static SUPPLEMENT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(?:[-•*]|\d+[.)])\s*([^(]+?)(?:\s*\(([^)]+)\))?$")
});

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\b\d+\s*(?:days?|weeks?|months?)\b"));

static PURPOSE_RE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bfor\s+([^,.\n]+)"));

fn sku_pattern(vendor: &str) -> Regex {
    // "Vendor label words: CODE" or "Vendor CODE" where CODE has a digit or hyphen
    pattern(&format!(
        r"(?i)\b{vendor}\b(?:(?:\s+[a-z]+)*\s*:\s*([a-z0-9][a-z0-9-]*)|\s+([a-z]*\d[a-z0-9-]*|[a-z0-9]+-[a-z0-9-]+))"
    ))
}

static VENDOR_PATTERNS: LazyLock<Vec<(SupplementVendor, Regex)>> = LazyLock::new(|| {
    vec![
        (SupplementVendor::LetsTruck, sku_pattern("LetsTruck")),
        (SupplementVendor::Biotiics, sku_pattern("Biotiics")),
        (
            SupplementVendor::FullScript,
            pattern(r"(?i)\bFullScript\b(?:\s+[a-z]+)*\s*:\s*([^,;]+)"),
        ),
    ]
});

/// Parse free-form protocol text. Malformed input yields a partial or empty
/// result, never an error.
pub fn parse_protocol(text: &str) -> ParsedProtocol {
    let mut builder = ProtocolBuilder::default();
    for line in text.lines() {
        builder.feed(line.trim());
    }
    let parsed = builder.finish();

    tracing::debug!(
        phases = parsed.phases.len(),
        supplements = parsed.supplements.len(),
        coaching_notes = parsed.coaching_notes.len(),
        "Protocol parsed"
    );
    parsed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Goals,
    SuccessCriteria,
    NextPhase,
}

impl ListKind {
    fn from_keyword(keyword: &str) -> Self {
        let k = keyword.to_lowercase();
        if k.starts_with("goal") || k.starts_with("objective") || k.starts_with("target") {
            Self::Goals
        } else if k.starts_with("success") || k.starts_with("outcome") || k.starts_with("progress")
        {
            Self::SuccessCriteria
        } else {
            Self::NextPhase
        }
    }

    fn cap(self) -> usize {
        match self {
            Self::Goals => MAX_GOALS,
            Self::SuccessCriteria => MAX_SUCCESS_CRITERIA,
            Self::NextPhase => MAX_NEXT_PHASE_CONDITIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Supplements,
    Coaching,
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    kind: BlockKind,
    level: usize,
}

#[derive(Debug)]
struct PhaseDraft {
    number: u8,
    level: usize,
    text: String,
    list: Option<ListKind>,
    goals: Vec<String>,
    success_criteria: Vec<String>,
    next_phase_conditions: Vec<String>,
}

impl PhaseDraft {
    fn new(number: u8, level: usize) -> Self {
        Self {
            number,
            level,
            text: String::new(),
            list: None,
            goals: Vec::new(),
            success_criteria: Vec::new(),
            next_phase_conditions: Vec::new(),
        }
    }

    fn push_item(&mut self, line: &str) {
        let Some(kind) = self.list else { return };
        let cleaned = clean_list_item(line);
        if cleaned.chars().count() <= MIN_LIST_ITEM_CHARS {
            return;
        }
        let items = match kind {
            ListKind::Goals => &mut self.goals,
            ListKind::SuccessCriteria => &mut self.success_criteria,
            ListKind::NextPhase => &mut self.next_phase_conditions,
        };
        if items.len() < kind.cap() && !items.iter().any(|i| i == cleaned) {
            items.push(cleaned.to_string());
        }
    }

    fn build(self, ordinal: usize) -> ProtocolPhase {
        let name = format!("Phase {}", self.number);
        let duration = DURATION_RE
            .find(&self.text)
            .map_or(DEFAULT_PHASE_DURATION, |m| m.as_str())
            .to_string();
        ProtocolPhase {
            id: stable_id("phase", ordinal, &name),
            number: self.number,
            name,
            duration,
            goals: self.goals,
            success_criteria: self.success_criteria,
            next_phase_conditions: self.next_phase_conditions,
        }
    }
}

#[derive(Debug, Default)]
struct ProtocolBuilder {
    parsed: ParsedProtocol,
    phase: Option<PhaseDraft>,
    block: Option<OpenBlock>,
}

impl ProtocolBuilder {
    fn feed(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if BULLET_RE.is_match(line) {
            self.bullet(line);
            return;
        }

        let level = heading_level(line);
        if let Some(caps) = PHASE_HEADER_RE.captures(line) {
            let Ok(number) = caps[1].parse::<u8>() else {
                return;
            };
            self.close_phase();
            self.block = None;
            let mut draft = PhaseDraft::new(number, level);
            draft.text.push_str(line);
            draft.text.push('\n');
            self.phase = Some(draft);
            return;
        }

        if level > 0 {
            if self.phase.as_ref().is_some_and(|p| closes(level, p.level)) {
                self.close_phase();
            }
            if self.block.is_some_and(|b| closes(level, b.level)) {
                self.block = None;
            }
        }

        if let Some(phase) = self.phase.as_mut() {
            phase.text.push_str(line);
            phase.text.push('\n');
        }

        let heading = is_heading_like(line);
        if heading {
            let opened = if COACHING_HEADER_RE.is_match(line) {
                Some(Some(BlockKind::Coaching))
            } else if LIFESTYLE_HEADER_RE.is_match(line) && !SUPPLEMENT_WORD_RE.is_match(line) {
                Some(None)
            } else if SUPPLEMENT_HEADER_RE.is_match(line) {
                Some(Some(BlockKind::Supplements))
            } else {
                None
            };
            if let Some(kind) = opened {
                self.block = kind.map(|kind| OpenBlock { kind, level });
                if let Some(phase) = self.phase.as_mut() {
                    phase.list = None;
                }
                return;
            }
        }

        let Some(phase) = self.phase.as_mut() else {
            return;
        };
        if let Some(caps) = LIST_HEADER_RE.captures(line) {
            let inline = caps.get(2);
            if inline.is_some() || heading {
                phase.list = Some(ListKind::from_keyword(&caps[1]));
                if let Some(rest) = inline {
                    phase.push_item(rest.as_str());
                }
                return;
            }
        }
        if heading {
            phase.list = None;
        }
    }

    fn bullet(&mut self, line: &str) {
        if let Some(phase) = self.phase.as_mut() {
            phase.text.push_str(line);
            phase.text.push('\n');
            if phase.list.is_some() {
                phase.push_item(line);
                return;
            }
        }

        let phase_tag = self
            .phase
            .as_ref()
            .map_or_else(|| DEFAULT_PHASE_TAG.to_string(), |p| p.number.to_string());

        match self.block.map(|b| b.kind) {
            Some(BlockKind::Supplements) => {
                let ordinal = self.parsed.supplements.len();
                if let Some(supplement) = parse_supplement_line(line, &phase_tag, ordinal) {
                    self.parsed.supplements.push(supplement);
                }
            }
            Some(BlockKind::Coaching) => {
                let content = clean_list_item(line);
                if !content.is_empty() {
                    let ordinal = self.parsed.coaching_notes.len();
                    self.parsed.coaching_notes.push(CoachingNote {
                        id: stable_id("coaching", ordinal, content),
                        category: coaching_category(content),
                        content: content.to_string(),
                        phase: phase_tag,
                        priority: priority_for(content),
                    });
                }
            }
            None => {}
        }
    }

    fn close_phase(&mut self) {
        if let Some(draft) = self.phase.take() {
            let ordinal = self.parsed.phases.len();
            self.parsed.phases.push(draft.build(ordinal));
        }
    }

    fn finish(mut self) -> ParsedProtocol {
        self.close_phase();
        self.parsed
    }
}

/// Parse one bullet line from a supplement block. Lines with fewer than
/// three words before the parenthetical have no name and are skipped.
fn parse_supplement_line(
    line: &str,
    phase_tag: &str,
    ordinal: usize,
) -> Option<SupplementRecommendation> {
    let caps = SUPPLEMENT_LINE_RE.captures(line)?;
    let text = caps.get(1)?.as_str().trim();
    let notes = caps.get(2).map_or("", |m| m.as_str().trim());

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    let (name_parts, tail) = parts.split_at(parts.len() - 2);
    let name = name_parts.join(" ");

    Some(SupplementRecommendation {
        id: stable_id("supplement", ordinal, &name),
        vendor_refs: vendor_references(notes),
        dosage: tail[0].to_string(),
        timing: tail[1].to_string(),
        duration: DURATION_RE
            .find(notes)
            .map_or(DEFAULT_SUPPLEMENT_DURATION, |m| m.as_str())
            .to_string(),
        purpose: PURPOSE_RE
            .captures(notes)
            .map(|c| c[1].trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PURPOSE.to_string()),
        priority: priority_for(&format!("{text} {notes}")),
        phase: phase_tag.to_string(),
        instructions: find_timing(&tail.join(" "))
            .or_else(|| find_timing(text))
            .unwrap_or(FALLBACK_INSTRUCTION)
            .to_string(),
        name,
    })
}

pub fn vendor_references(notes: &str) -> Vec<VendorReference> {
    VENDOR_PATTERNS
        .iter()
        .filter_map(|(vendor, re)| {
            let caps = re.captures(notes)?;
            let reference = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
            (!reference.is_empty()).then(|| VendorReference {
                vendor: *vendor,
                reference: reference.to_string(),
            })
        })
        .collect()
}

/// High keywords win over low ones; neither gives medium.
pub fn priority_for(text: &str) -> Priority {
    let lower = text.to_lowercase();
    if HIGH_PRIORITY_WORDS.iter().any(|w| lower.contains(w)) {
        Priority::High
    } else if LOW_PRIORITY_WORDS.iter().any(|w| lower.contains(w)) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

pub fn timing_instruction(text: &str) -> &'static str {
    find_timing(text).unwrap_or(FALLBACK_INSTRUCTION)
}

fn find_timing(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    TIMING_INSTRUCTIONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, instruction)| instruction)
}

pub fn coaching_category(text: &str) -> CoachingCategory {
    let lower = text.to_lowercase();
    COACHING_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map_or(CoachingCategory::Education, |(category, _)| *category)
}

fn clean_list_item(line: &str) -> &str {
    let trimmed = line.trim();
    match BULLET_PREFIX_RE.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim(),
        None => trimmed,
    }
}

fn heading_level(line: &str) -> usize {
    line.chars().take_while(|c| *c == '#').count()
}

/// Whether a markdown heading at `level` ends a section opened at `open_level`.
fn closes(level: usize, open_level: usize) -> bool {
    if open_level > 0 {
        level <= open_level
    } else {
        level <= 2
    }
}

fn is_heading_like(line: &str) -> bool {
    let bare = line.trim_end_matches('*').trim_end();
    line.starts_with('#')
        || bare.ends_with(':')
        || (line.len() > 4 && line.starts_with("**") && line.ends_with("**"))
}

fn stable_id(kind: &str, ordinal: usize, key: &str) -> Uuid {
    let name = format!("clinidoc/protocol/{kind}/{ordinal}/{key}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
