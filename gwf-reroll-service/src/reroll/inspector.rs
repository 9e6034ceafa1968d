//! Finds the roll in a message that rolled low on the target die.

use crate::config::HouseRuleConfig;
use crate::foundry::Roll;

/// Scans rolls for an active result at or below the threshold on the
/// configured die type.
#[derive(Debug, Clone)]
pub struct RollInspector {
    die_faces: u32,
    low_threshold: f64,
    /// Literal die token (`d12`) used as a cheap textual pre-filter
    die_token: String,
}

impl RollInspector {
    pub fn new(rule: &HouseRuleConfig) -> Self {
        Self {
            die_faces: rule.die_faces,
            low_threshold: f64::from(rule.low_threshold),
            die_token: format!("d{}", rule.die_faces),
        }
    }

    /// Index of the first roll that qualifies for a reroll.
    ///
    /// Only one roll per message is ever targeted; later qualifying rolls are
    /// ignored.
    pub fn find_target(&self, rolls: &[Roll]) -> Option<usize> {
        rolls
            .iter()
            .position(|roll| roll.formula.contains(&self.die_token) && self.has_low_result(roll))
    }

    /// Whether any active result on a die of the configured type is at or
    /// below the threshold.
    pub fn has_low_result(&self, roll: &Roll) -> bool {
        roll.dice()
            .into_iter()
            .filter(|die| die.faces == Some(self.die_faces))
            .flat_map(|die| die.results.iter())
            .filter(|result| result.is_active())
            .filter_map(|result| result.value())
            .any(|value| value <= self.low_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundry::{DieResult, DieTerm, RollTerm};
    use crate::reroll::fixtures::{die, roll};

    fn inspector() -> RollInspector {
        RollInspector::new(&HouseRuleConfig::default())
    }

    #[test]
    fn test_low_active_d12_qualifies() {
        let rolls = vec![roll("1d12 + 3", vec![die(12, &[(2.0, true)])])];
        assert_eq!(inspector().find_target(&rolls), Some(0));

        let rolls = vec![roll("1d12 + 3", vec![die(12, &[(1.0, true)])])];
        assert_eq!(inspector().find_target(&rolls), Some(0));
    }

    #[test]
    fn test_high_or_inactive_results_do_not_qualify() {
        let rolls = vec![
            roll("1d12", vec![die(12, &[(3.0, true)])]),
            roll("2d12", vec![die(12, &[(1.0, false), (9.0, true)])]),
            roll("1d12", vec![die(12, &[(2.0, false)])]),
        ];
        assert_eq!(inspector().find_target(&rolls), None);
    }

    #[test]
    fn test_missing_active_flag_counts_as_active() {
        let term = RollTerm::Die(DieTerm {
            number: Some(1),
            faces: Some(12),
            results: vec![DieResult {
                result: serde_json::json!(1),
                active: None,
            }],
        });
        let rolls = vec![roll("1d12", vec![term])];
        assert_eq!(inspector().find_target(&rolls), Some(0));
    }

    #[test]
    fn test_non_numeric_results_are_skipped() {
        let term = RollTerm::Die(DieTerm {
            number: Some(2),
            faces: Some(12),
            results: vec![
                DieResult {
                    result: serde_json::json!("n/a"),
                    active: Some(true),
                },
                DieResult {
                    result: serde_json::Value::Null,
                    active: Some(true),
                },
            ],
        });
        assert!(!inspector().has_low_result(&roll("2d12", vec![term])));
    }

    #[test]
    fn test_low_die_inside_function_qualifies() {
        let term = RollTerm::FunctionTerm {
            rolls: vec![roll("1d12", vec![die(12, &[(1.0, true)])])],
        };
        let rolls = vec![roll("max(1d12, 3)", vec![term])];
        assert_eq!(inspector().find_target(&rolls), Some(0));
    }

    #[test]
    fn test_other_die_types_are_ignored() {
        // Low d8 and d6 results don't matter, even in a roll that has a d12
        let rolls = vec![roll(
            "1d12 + 1d8 + 1d6",
            vec![
                die(12, &[(10.0, true)]),
                die(8, &[(1.0, true)]),
                die(6, &[(2.0, true)]),
            ],
        )];
        assert_eq!(inspector().find_target(&rolls), None);
    }

    #[test]
    fn test_formula_prefilter() {
        // A d12 term whose formula text doesn't mention d12 is not a candidate
        let rolls = vec![roll("1d@scale.barbarian.die", vec![die(12, &[(1.0, true)])])];
        assert_eq!(inspector().find_target(&rolls), None);
    }

    #[test]
    fn test_first_qualifying_roll_wins() {
        let rolls = vec![
            roll("1d8 + 3", vec![die(8, &[(1.0, true)])]),
            roll("1d12 + 3", vec![die(12, &[(2.0, true)])]),
            roll("2d12", vec![die(12, &[(1.0, true), (1.0, true)])]),
        ];
        assert_eq!(inspector().find_target(&rolls), Some(1));
    }

    #[test]
    fn test_empty_rolls() {
        assert_eq!(inspector().find_target(&[]), None);
    }

    #[test]
    fn test_custom_rule() {
        let rule = HouseRuleConfig {
            die_faces: 6,
            low_threshold: 1,
            ..HouseRuleConfig::default()
        };
        let inspector = RollInspector::new(&rule);

        let rolls = vec![
            roll("1d6", vec![die(6, &[(2.0, true)])]),
            roll("2d6", vec![die(6, &[(4.0, true), (1.0, true)])]),
        ];
        assert_eq!(inspector.find_target(&rolls), Some(1));
    }
}
