use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::OperatorRng;

/// How a variable pushed outside its bounds is brought back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategy {
    /// Uniform value inside the bounds.
    Random,
    /// The opposite bound.
    Round,
    /// The violated bound.
    Bounds,
}

impl RepairStrategy {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "random" => Some(Self::Random),
            "round" => Some(Self::Round),
            "bounds" => Some(Self::Bounds),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Round => "round",
            Self::Bounds => "bounds",
        }
    }

    pub fn repair(self, value: f64, low: f64, high: f64, rng: &mut OperatorRng) -> f64 {
        if value >= low && value <= high {
            return value;
        }
        match self {
            Self::Random => low + rng.random::<f64>() * (high - low),
            Self::Round => {
                if value < low {
                    high
                } else {
                    low
                }
            }
            Self::Bounds => value.clamp(low, high),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator_rng;

    #[test]
    fn strategies() {
        let mut rng = operator_rng(Some(1));
        assert_eq!(RepairStrategy::Bounds.repair(1.5, 0.0, 1.0, &mut rng), 1.0);
        assert_eq!(RepairStrategy::Bounds.repair(-0.5, 0.0, 1.0, &mut rng), 0.0);
        assert_eq!(RepairStrategy::Round.repair(1.5, 0.0, 1.0, &mut rng), 0.0);
        assert_eq!(RepairStrategy::Round.repair(-0.5, 0.0, 1.0, &mut rng), 1.0);
        let random = RepairStrategy::Random.repair(7.0, 2.0, 3.0, &mut rng);
        assert!((2.0..=3.0).contains(&random));
        assert_eq!(RepairStrategy::Random.repair(0.3, 0.0, 1.0, &mut rng), 0.3);
    }

    #[test]
    fn labels_round_trip() {
        for s in [RepairStrategy::Random, RepairStrategy::Round, RepairStrategy::Bounds] {
            assert_eq!(RepairStrategy::from_label(s.label()), Some(s));
        }
        assert_eq!(RepairStrategy::from_label("wrap"), None);
    }
}
