//! VADER compound scoring.

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::SentimentScorer;

/// [`SentimentScorer`] backed by the VADER lexicon and rules.
///
/// Returns the `compound` polarity, already normalised to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderScorer {
    fn score_text(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        // the analyzer only borrows the lazily built lexicons
        let analyzer = SentimentIntensityAnalyzer::new();
        let compound = analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0);
        if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_neutral() {
        let s = VaderScorer::new();
        assert_eq!(s.score_text(""), 0.0);
        assert_eq!(s.score_text("   \n\t"), 0.0);
    }

    #[test]
    fn polarity_follows_the_words() {
        let s = VaderScorer::new();
        let up = s.score_text("Company beats expectations with great results");
        let down = s.score_text("Terrible quarter, awful guidance and bad outlook");
        assert!(up > 0.0, "{up}");
        assert!(down < 0.0, "{down}");
        assert!((-1.0..=1.0).contains(&up));
        assert!((-1.0..=1.0).contains(&down));
    }

    #[test]
    fn exclamation_amplifies() {
        let s = VaderScorer::new();
        assert!(s.score_text("great!!!") > s.score_text("great"));
    }

    #[test]
    fn negation_flips_sign() {
        let s = VaderScorer::new();
        assert!(s.score_text("good") > 0.0);
        assert!(s.score_text("not good") < 0.0);
    }

    #[test]
    fn neutral_words_score_zero() {
        assert_eq!(VaderScorer::new().score_text("the table is brown"), 0.0);
    }
}
