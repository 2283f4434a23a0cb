//! Structured qualification gates compiled from offer condition text
//!
//! Offers publish their conditions as free text, e.g.
//! `"Score > 650, no mora >30 días"`. The text is split into clauses and each
//! clause is matched case-insensitively against a small set of known phrases.
//! Clauses that match nothing are kept for diagnostics and impose no gate.

use serde::Serialize;

/// Customers need a score strictly above this for score-gated offers
pub const SCORE_GATE_THRESHOLD: u32 = 650;

/// Largest days-past-due tolerated by delinquency-gated offers
pub const DELINQUENCY_GATE_DAYS: u32 = 30;

const SCORE_PHRASES: &[&str] = &["score > 650"];
const DELINQUENCY_PHRASES: &[&str] = &["no mora >30", "no mora > 30", "sin mora activa"];

/// A single qualification gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EligibilityRule {
    /// Credit score must be known and strictly greater than the threshold
    CreditScoreAbove(u32),
    /// No included debt may be more than this many days past due
    NoDelinquencyOver(u32),
}

impl EligibilityRule {
    /// Evaluate the gate against a customer's score and worst delinquency
    pub fn allows(&self, credit_score: Option<u32>, max_days_past_due: u32) -> bool {
        match *self {
            EligibilityRule::CreditScoreAbove(threshold) => {
                credit_score.map_or(false, |score| score > threshold)
            }
            EligibilityRule::NoDelinquencyOver(days) => max_days_past_due <= days,
        }
    }
}

/// Compiled form of an offer's condition text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OfferRules {
    pub rules: Vec<EligibilityRule>,

    /// Clauses no known phrase matched
    pub unrecognized: Vec<String>,
}

impl OfferRules {
    /// Compile condition text into rules
    pub fn parse(conditions: &str) -> Self {
        let text = conditions.to_lowercase();
        let mut compiled = OfferRules::default();

        // Whole-text matching decides the gates, so phrases that straddle a
        // separator still count.
        if SCORE_PHRASES.iter().any(|p| text.contains(p)) {
            compiled.rules.push(EligibilityRule::CreditScoreAbove(SCORE_GATE_THRESHOLD));
        }
        if DELINQUENCY_PHRASES.iter().any(|p| text.contains(p)) {
            compiled.rules.push(EligibilityRule::NoDelinquencyOver(DELINQUENCY_GATE_DAYS));
        }

        compiled.unrecognized = text
            .split(|c| c == ',' || c == ';' || c == '\n')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .filter(|clause| {
                !SCORE_PHRASES
                    .iter()
                    .chain(DELINQUENCY_PHRASES)
                    .any(|p| clause.contains(p))
            })
            .map(str::to_string)
            .collect();

        compiled
    }

    /// Whether every gate passes
    pub fn allows(&self, credit_score: Option<u32>, max_days_past_due: u32) -> bool {
        self.rules.iter().all(|r| r.allows(credit_score, max_days_past_due))
    }

    pub fn has_unrecognized(&self) -> bool {
        !self.unrecognized.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_phrases_case_insensitive() {
        let rules = OfferRules::parse("Score > 650, No Mora > 30 dias");
        assert_eq!(
            rules.rules,
            vec![
                EligibilityRule::CreditScoreAbove(650),
                EligibilityRule::NoDelinquencyOver(30),
            ]
        );
        assert!(!rules.has_unrecognized());
    }

    #[test]
    fn test_sin_mora_activa_is_delinquency_gate() {
        let rules = OfferRules::parse("Cliente sin mora activa");
        assert_eq!(rules.rules, vec![EligibilityRule::NoDelinquencyOver(30)]);
    }

    #[test]
    fn test_unrecognized_text_is_permissive() {
        let rules = OfferRules::parse("ingresos demostrables; antiguedad 1 año");
        assert!(rules.rules.is_empty());
        assert_eq!(rules.unrecognized.len(), 2);
        assert!(rules.allows(None, 365));
    }

    #[test]
    fn test_score_gate_requires_known_score_above_threshold() {
        let rule = EligibilityRule::CreditScoreAbove(650);
        assert!(!rule.allows(None, 0));
        assert!(!rule.allows(Some(650), 0));
        assert!(rule.allows(Some(651), 0));
    }

    #[test]
    fn test_delinquency_gate_boundary() {
        let rule = EligibilityRule::NoDelinquencyOver(30);
        assert!(rule.allows(None, 30));
        assert!(!rule.allows(None, 31));
    }

    #[test]
    fn test_empty_conditions() {
        let rules = OfferRules::parse("");
        assert!(rules.rules.is_empty());
        assert!(!rules.has_unrecognized());
    }
}
