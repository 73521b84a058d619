//! Advice selected from a risk score.

use serde::{Serialize, Serializer};

/// Lower bound of the [`Recommendation::BreakDown`] band.
pub const BREAK_DOWN_THRESHOLD: f64 = 0.7;
/// Lower bound of the [`Recommendation::ChangeEnvironment`] band.
pub const CHANGE_ENVIRONMENT_THRESHOLD: f64 = 0.4;

/// One of three fixed advisory messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// risk >= 0.7
    BreakDown,
    /// 0.4 <= risk < 0.7
    ChangeEnvironment,
    /// risk < 0.4
    Safe,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::BreakDown => "break task into smaller parts and take breaks",
            Recommendation::ChangeEnvironment => "change environment or reschedule",
            Recommendation::Safe => "task looks safe, maintain approach",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Pick the recommendation for a risk score. Bands are closed below.
pub fn recommend(risk: f64) -> Recommendation {
    if risk >= BREAK_DOWN_THRESHOLD {
        Recommendation::BreakDown
    } else if risk >= CHANGE_ENVIRONMENT_THRESHOLD {
        Recommendation::ChangeEnvironment
    } else {
        Recommendation::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(recommend(0.7), Recommendation::BreakDown);
        assert_eq!(recommend(1.0), Recommendation::BreakDown);
        assert_eq!(recommend(0.69999), Recommendation::ChangeEnvironment);
        assert_eq!(recommend(0.4), Recommendation::ChangeEnvironment);
        assert_eq!(recommend(0.39999), Recommendation::Safe);
        assert_eq!(recommend(0.0), Recommendation::Safe);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            recommend(0.8).to_string(),
            "break task into smaller parts and take breaks"
        );
        assert_eq!(recommend(0.5).message(), "change environment or reschedule");
        assert_eq!(recommend(0.2).message(), "task looks safe, maintain approach");
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&Recommendation::Safe).unwrap();
        assert_eq!(json, "\"task looks safe, maintain approach\"");
    }
}
