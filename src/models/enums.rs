use crate::models::ModelError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
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

str_enum!(ValueStatus {
    Low => "low",
    Normal => "normal",
    High => "high",
});

str_enum!(AlertSeverity {
    Medium => "medium",
    High => "high",
});

str_enum!(InsightKind {
    Change => "change",
    Baseline => "baseline",
});

str_enum!(TrendDirection {
    Increasing => "increasing",
    Decreasing => "decreasing",
});

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn value_status_round_trips() {
        for status in [ValueStatus::Low, ValueStatus::Normal, ValueStatus::High] {
            assert_eq!(ValueStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = ValueStatus::from_str("critical").unwrap_err();
        assert!(matches!(err, ModelError::InvalidEnum { .. }));
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&AlertSeverity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn insight_kind_round_trips() {
        assert_eq!(InsightKind::from_str("baseline").unwrap(), InsightKind::Baseline);
        assert_eq!(InsightKind::Change.as_str(), "change");
    }

    #[test]
    fn trend_direction_round_trips() {
        assert_eq!(
            TrendDirection::from_str("increasing").unwrap(),
            TrendDirection::Increasing
        );
        assert_eq!(TrendDirection::Decreasing.as_str(), "decreasing");
    }
}
