use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage tiers a recommendation may target
///
/// Serialized with the exact S3 storage class names. The current tier reported
/// by the object store is kept as a plain string elsewhere, since S3 knows more
/// classes than the four a recommendation may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageTier {
    Standard,
    StandardIa,
    Glacier,
    DeepArchive,
}

impl StorageTier {
    pub const ALL: [StorageTier; 4] = [
        StorageTier::Standard,
        StorageTier::StandardIa,
        StorageTier::Glacier,
        StorageTier::DeepArchive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageTier::Standard => "STANDARD",
            StorageTier::StandardIa => "STANDARD_IA",
            StorageTier::Glacier => "GLACIER",
            StorageTier::DeepArchive => "DEEP_ARCHIVE",
        }
    }
}

impl FromStr for StorageTier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STANDARD" => Ok(StorageTier::Standard),
            "STANDARD_IA" => Ok(StorageTier::StandardIa),
            "GLACIER" => Ok(StorageTier::Glacier),
            "DEEP_ARCHIVE" => Ok(StorageTier::DeepArchive),
            _ => Err(anyhow::anyhow!("Invalid storage tier: {}", s)),
        }
    }
}

impl Display for StorageTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// How sure the inference service claims to be about a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl FromStr for Confidence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(anyhow::anyhow!("Invalid confidence: {}", s)),
        }
    }
}

impl Display for Confidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_serializes_as_s3_class_name() {
        let json = serde_json::to_string(&StorageTier::StandardIa).unwrap();
        assert_eq!(json, "\"STANDARD_IA\"");
        let json = serde_json::to_string(&StorageTier::DeepArchive).unwrap();
        assert_eq!(json, "\"DEEP_ARCHIVE\"");
    }

    #[test]
    fn tier_display_matches_serde_name() {
        for tier in StorageTier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier));
        }
    }

    #[test]
    fn tier_from_str_is_case_insensitive() {
        assert_eq!(
            "glacier".parse::<StorageTier>().unwrap(),
            StorageTier::Glacier
        );
        assert_eq!(
            " STANDARD_IA ".parse::<StorageTier>().unwrap(),
            StorageTier::StandardIa
        );
        assert!("INTELLIGENT_TIERING".parse::<StorageTier>().is_err());
    }

    #[test]
    fn tier_deserialize_rejects_unknown_class() {
        assert!(serde_json::from_str::<StorageTier>("\"ONEZONE_IA\"").is_err());
        assert!(serde_json::from_str::<StorageTier>("\"standard\"").is_err());
    }

    #[test]
    fn confidence_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Confidence::Medium).unwrap(), "\"medium\"");
        assert_eq!("HIGH".parse::<Confidence>().unwrap(), Confidence::High);
        assert!("alta".parse::<Confidence>().is_err());
    }
}
