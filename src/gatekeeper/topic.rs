//! Topic classification for inbound messages.
//!
//! A fixed rule set, represented as data so it can be unit-tested
//! independently of the network-calling pipeline. A message is on-topic
//! when any of the following holds against its lower-cased content:
//! - a configured keyword appears as a substring
//! - the message starts with an interrogative prefix
//! - the message contains an explanatory cue
//! - the message contains a comparison cue

use crate::config::TopicConfig;

/// Pure on-topic/off-topic classifier.
#[derive(Debug, Clone)]
pub struct TopicFilter {
    keywords: Vec<String>,
    question_prefixes: Vec<String>,
    explanatory_cues: Vec<String>,
    comparison_cues: Vec<String>,
}

impl TopicFilter {
    /// Build a filter from configuration. Rules are lower-cased once here
    /// so the per-message check only lower-cases the message.
    pub fn from_config(config: &TopicConfig) -> Self {
        let lower = |items: &[String]| items.iter().map(|s| s.to_lowercase()).collect();

        Self {
            keywords: lower(&config.keywords),
            question_prefixes: lower(&config.question_prefixes),
            explanatory_cues: lower(&config.explanatory_cues),
            comparison_cues: lower(&config.comparison_cues),
        }
    }

    /// Classify a message as on-topic or off-topic.
    pub fn is_on_topic(&self, content: &str) -> bool {
        let text = content.to_lowercase();

        self.keywords.iter().any(|k| text.contains(k.as_str()))
            || self
                .question_prefixes
                .iter()
                .any(|p| starts_with_word(&text, p))
            || self
                .explanatory_cues
                .iter()
                .any(|c| text.contains(c.as_str()))
            || self
                .comparison_cues
                .iter()
                .any(|c| text.contains(c.as_str()))
    }
}

/// True when `text` begins with `prefix` as a whole word.
///
/// "what is..." matches the prefix "what"; "what's" and "whatever" do not.
/// This keeps contractions like "What's the weather" from slipping past
/// the interrogative rule.
fn starts_with_word(text: &str, prefix: &str) -> bool {
    match text.strip_prefix(prefix) {
        Some(rest) => match rest.chars().next() {
            None => true,
            Some(c) => !c.is_alphanumeric() && c != '\'',
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> TopicFilter {
        TopicFilter::from_config(&TopicConfig::default())
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let f = filter();

        assert!(f.is_on_topic("Show me REVENUE for last quarter"));
        assert!(f.is_on_topic("i'd like a mednavi demo"));
        assert!(f.is_on_topic("our patients keep cancelling"));
    }

    #[test]
    fn interrogative_prefixes_pass_without_keywords() {
        let f = filter();

        assert!(f.is_on_topic("How do I get started?"));
        assert!(f.is_on_topic("What is included?"));
        assert!(f.is_on_topic("Can it do scheduling?"));
        assert!(f.is_on_topic("Does it work offline?"));
    }

    #[test]
    fn explanatory_cues_pass() {
        let f = filter();

        assert!(f.is_on_topic("please explain the onboarding"));
        assert!(f.is_on_topic("tell me about your platform"));
    }

    #[test]
    fn comparison_cues_pass() {
        let f = filter();

        assert!(f.is_on_topic("compare your plans"));
        assert!(f.is_on_topic("the difference between the tiers"));
        assert!(f.is_on_topic("your product versus competitors"));
        assert!(f.is_on_topic("yours vs theirs"));
    }

    #[test]
    fn unrelated_text_is_off_topic() {
        let f = filter();

        assert!(!f.is_on_topic("nice weather today"));
        assert!(!f.is_on_topic("sing me a song"));
        assert!(!f.is_on_topic(""));
    }

    #[test]
    fn prefix_must_be_at_start() {
        let f = filter();

        // "how" mid-sentence is not an interrogative prefix, and nothing
        // else in this message matches a rule.
        assert!(!f.is_on_topic("somehow I ended up here"));
    }

    #[test]
    fn prefix_must_be_a_whole_word() {
        let f = filter();

        assert!(!f.is_on_topic("What's the weather today?"));
        assert!(!f.is_on_topic("whatever you say"));
        assert!(!f.is_on_topic("canvas prints for sale"));
        assert!(f.is_on_topic("what? me worry?"));
    }
}
