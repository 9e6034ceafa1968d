//! Rewrites a roll formula so the target die rerolls low results once.

use regex::Regex;

use crate::config::HouseRuleConfig;
use crate::error::{ServiceError, ServiceResult};

/// Appends `ro<=N` to every term of the configured die type.
///
/// A die token only matches when the next character is not a letter or a
/// digit. `d12kh` already carries modifiers and `d120` is a different die;
/// both are left alone. Everything outside the matched tokens is copied
/// through byte for byte.
#[derive(Debug, Clone)]
pub struct FormulaRewriter {
    token: Regex,
    replacement: String,
}

impl FormulaRewriter {
    pub fn new(rule: &HouseRuleConfig) -> ServiceResult<Self> {
        let token = Regex::new(&format!(r"d{}(?P<next>[^A-Za-z0-9]|$)", rule.die_faces))
            .map_err(|e| ServiceError::Internal {
                message: format!("Invalid die token pattern: {}", e),
            })?;

        Ok(Self {
            token,
            replacement: format!("d{}ro<={}${{next}}", rule.die_faces, rule.low_threshold),
        })
    }

    pub fn rewrite(&self, formula: &str) -> String {
        self.token
            .replace_all(formula, self.replacement.as_str())
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> FormulaRewriter {
        FormulaRewriter::new(&HouseRuleConfig::default()).unwrap()
    }

    #[test]
    fn test_only_target_die_is_rewritten() {
        assert_eq!(rewriter().rewrite("1d12 + 2d8 + 3"), "1d12ro<=2 + 2d8 + 3");
    }

    #[test]
    fn test_every_occurrence_is_rewritten() {
        assert_eq!(
            rewriter().rewrite("1d12 + 1d12[slashing] + 2d6"),
            "1d12ro<=2 + 1d12ro<=2[slashing] + 2d6"
        );
        assert_eq!(rewriter().rewrite("2d12"), "2d12ro<=2");
        assert_eq!(rewriter().rewrite("(1d12+1d12)*2"), "(1d12ro<=2+1d12ro<=2)*2");
    }

    #[test]
    fn test_dice_sharing_a_digit_prefix_are_untouched() {
        assert_eq!(rewriter().rewrite("1d120 + 1d12"), "1d120 + 1d12ro<=2");
        assert_eq!(rewriter().rewrite("1d1 + 1d10"), "1d1 + 1d10");
    }

    #[test]
    fn test_tokens_followed_by_letters_are_untouched() {
        assert_eq!(rewriter().rewrite("2d12kh + 1d12"), "2d12kh + 1d12ro<=2");
        assert_eq!(rewriter().rewrite("1d12r1"), "1d12r1");
    }

    #[test]
    fn test_formula_without_target_die() {
        let formula = "2d6 + @mod + 1d8[fire]";
        assert_eq!(rewriter().rewrite(formula), formula);
    }

    #[test]
    fn test_custom_rule() {
        let rule = HouseRuleConfig {
            die_faces: 6,
            low_threshold: 1,
            ..HouseRuleConfig::default()
        };
        let rewriter = FormulaRewriter::new(&rule).unwrap();
        assert_eq!(rewriter.rewrite("2d6 + 1d60 + 1d12"), "2d6ro<=1 + 1d60 + 1d12");
    }
}
