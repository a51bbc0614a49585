use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The `as_str` literal doubles as the serde representation.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Severity tier derived from a percentage-of-maximum score.
    Severity {
        Low => "low",
        Moderate => "moderate",
        High => "high",
        Critical => "critical",
    }
);

impl Severity {
    /// Fixed tiers: critical >= 75, high >= 50, moderate >= 25, else low.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 75.0 {
            Self::Critical
        } else if percentage >= 50.0 {
            Self::High
        } else if percentage >= 25.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// High and critical sections count as concerns.
    pub fn is_concern(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

str_enum!(
    /// Priority tier for protocol items and symptom-burden items.
    Priority {
        High => "HIGH",
        Medium => "MEDIUM",
        Low => "LOW",
    }
);

impl Priority {
    /// Lenient label parsing ("High", "high priority", "LOW").
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.starts_with("high") {
            Some(Self::High)
        } else if lower.starts_with("medium") || lower.starts_with("moderate") {
            Some(Self::Medium)
        } else if lower.starts_with("low") {
            Some(Self::Low)
        } else {
            None
        }
    }
}

str_enum!(
    /// Where a lab value sits relative to its conventional and functional bands.
    RangeStatus {
        CriticalLow => "critical_low",
        BelowConventional => "below_conventional",
        BelowFunctional => "below_functional",
        Optimal => "optimal",
        Functional => "functional",
        AboveFunctional => "above_functional",
        AboveConventional => "above_conventional",
        CriticalHigh => "critical_high",
    }
);

str_enum!(
    /// Category of a free-form coaching note.
    CoachingCategory {
        Education => "education",
        Motivation => "motivation",
        Troubleshooting => "troubleshooting",
        Expectations => "expectations",
    }
);

str_enum!(
    /// Supplement vendors whose product references appear in protocol notes.
    SupplementVendor {
        LetsTruck => "letstruck",
        Biotiics => "biotiics",
        FullScript => "fullscript",
    }
);

str_enum!(
    /// Kind of raw source handed to the lab document processor.
    SourceKind {
        Pdf => "pdf",
        Image => "image",
        PlainText => "plain_text",
    }
);

impl SourceKind {
    /// Detect from magic bytes (NOT file extensions).
    /// Anything that is not a PDF or a known image container is read as text.
    pub fn detect(bytes: &[u8]) -> Self {
        const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];
        const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
        const TIFF_LE: &[u8] = b"II*\0";
        const TIFF_BE: &[u8] = b"MM\0*";

        if bytes.starts_with(b"%PDF") {
            Self::Pdf
        } else if [PNG, JPEG, TIFF_LE, TIFF_BE]
            .iter()
            .any(|magic| bytes.starts_with(magic))
        {
            Self::Image
        } else {
            Self::PlainText
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trip() {
        for (variant, s) in [
            (Severity::Low, "low"),
            (Severity::Moderate, "moderate"),
            (Severity::High, "high"),
            (Severity::Critical, "critical"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Severity::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn severity_thresholds() {
        assert_eq!(Severity::from_percentage(0.0), Severity::Low);
        assert_eq!(Severity::from_percentage(24.99), Severity::Low);
        assert_eq!(Severity::from_percentage(25.0), Severity::Moderate);
        assert_eq!(Severity::from_percentage(50.0), Severity::High);
        assert_eq!(Severity::from_percentage(74.9), Severity::High);
        assert_eq!(Severity::from_percentage(75.0), Severity::Critical);
        assert_eq!(Severity::from_percentage(80.0), Severity::Critical);
        assert_eq!(Severity::from_percentage(130.0), Severity::Critical);
    }

    #[test]
    fn priority_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
    }

    #[test]
    fn priority_from_label_is_lenient() {
        assert_eq!(Priority::from_label("High"), Some(Priority::High));
        assert_eq!(Priority::from_label(" medium "), Some(Priority::Medium));
        assert_eq!(Priority::from_label("LOW priority"), Some(Priority::Low));
        assert_eq!(Priority::from_label("urgent"), None);
    }

    #[test]
    fn source_kind_from_magic_bytes() {
        assert_eq!(SourceKind::detect(b"%PDF-1.4\n..."), SourceKind::Pdf);
        assert_eq!(SourceKind::detect(&[0x89, b'P', b'N', b'G', 0x0D]), SourceKind::Image);
        assert_eq!(SourceKind::detect(&[0xFF, 0xD8, 0xFF, 0xE0]), SourceKind::Image);
        assert_eq!(SourceKind::detect(b"Glucose 95 mg/dL"), SourceKind::PlainText);
        assert_eq!(SourceKind::detect(b""), SourceKind::PlainText);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(Severity::from_str("severe").is_err());
        assert!(Priority::from_str("high").is_err());
        assert!(RangeStatus::from_str("").is_err());
    }
}
