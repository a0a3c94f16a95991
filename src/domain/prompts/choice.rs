//! Choice-list prompt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::turn::TurnContext;

use super::prompt::{Prompt, PromptOptions, PromptRecognizer};

/// The choice a reply matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundChoice {
    /// Title of the matched choice, exactly as registered.
    pub value: String,

    /// Zero-based position within the options' choice list.
    pub index: usize,
}

/// Matches the reply against the options' choice titles.
///
/// Tried in order: exact title match, title contained in the utterance,
/// then a 1-based list position ("2" picks the second choice). All text
/// comparison is case-insensitive.
#[derive(Debug, Default)]
pub struct ChoiceRecognizer;

impl PromptRecognizer for ChoiceRecognizer {
    fn recognize(&self, turn: &TurnContext, options: &PromptOptions) -> Option<Value> {
        let choices = options.choices.as_deref().unwrap_or(&[]);
        let found = find_choice(turn.text()?, choices)?;
        serde_json::to_value(found).ok()
    }
}

fn find_choice(utterance: &str, choices: &[String]) -> Option<FoundChoice> {
    let needle = utterance.trim().to_lowercase();
    if needle.is_empty() || choices.is_empty() {
        return None;
    }

    for (index, choice) in choices.iter().enumerate() {
        if choice.to_lowercase() == needle {
            return found(choices, index);
        }
    }
    for (index, choice) in choices.iter().enumerate() {
        if needle.contains(&choice.to_lowercase()) {
            return found(choices, index);
        }
    }
    if let Ok(position) = needle.parse::<usize>() {
        if (1..=choices.len()).contains(&position) {
            return found(choices, position - 1);
        }
    }
    None
}

fn found(choices: &[String], index: usize) -> Option<FoundChoice> {
    Some(FoundChoice {
        value: choices[index].clone(),
        index,
    })
}

/// A prompt that resolves with the [`FoundChoice`] the reply matched.
pub type ChoicePrompt = Prompt<ChoiceRecognizer>;

/// Creates a choice prompt. Candidate titles travel in the
/// [`PromptOptions::choices`] field at begin time.
pub fn choice_prompt() -> ChoicePrompt {
    Prompt::new(ChoiceRecognizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["Standard Room".into(), "Deluxe Suite".into(), "Penthouse".into()]
    }

    #[test]
    fn exact_title_matches_case_insensitively() {
        let found = find_choice("deluxe suite", &choices()).unwrap();
        assert_eq!(found.value, "Deluxe Suite");
        assert_eq!(found.index, 1);
    }

    #[test]
    fn title_inside_a_longer_utterance_matches() {
        let found = find_choice("the penthouse please", &choices()).unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn one_based_position_matches() {
        let found = find_choice("1", &choices()).unwrap();
        assert_eq!(found.value, "Standard Room");
        assert_eq!(found.index, 0);
    }

    #[test]
    fn out_of_range_position_fails() {
        assert!(find_choice("4", &choices()).is_none());
        assert!(find_choice("0", &choices()).is_none());
    }

    #[test]
    fn unrelated_text_fails() {
        assert!(find_choice("the cheapest one", &choices()).is_none());
    }

    #[test]
    fn empty_choice_list_never_matches() {
        assert!(find_choice("anything", &[]).is_none());
    }

    #[test]
    fn exact_match_wins_over_containment() {
        let choices: Vec<String> = vec!["Tea".into(), "Iced Tea".into()];
        let found = find_choice("iced tea", &choices).unwrap();
        assert_eq!(found.value, "Iced Tea");
    }
}
