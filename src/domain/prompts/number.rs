//! Numeric prompt.

use serde_json::{Number, Value};

use crate::domain::turn::TurnContext;

use super::prompt::{Prompt, PromptOptions, PromptRecognizer};

/// Finds the first number in the message text.
///
/// Tokens are tried in order after trimming surrounding punctuation, so
/// "room 12, please" recognizes as 12. Integral values resolve as JSON
/// integers, everything else as floats.
#[derive(Debug, Default)]
pub struct NumberRecognizer;

impl PromptRecognizer for NumberRecognizer {
    fn recognize(&self, turn: &TurnContext, _options: &PromptOptions) -> Option<Value> {
        first_number(turn.text()?).map(Value::Number)
    }
}

fn first_number(text: &str) -> Option<Number> {
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.');
        if token.is_empty() {
            continue;
        }
        if let Ok(int) = token.parse::<i64>() {
            return Some(Number::from(int));
        }
        if let Ok(float) = token.parse::<f64>() {
            // "12." is still twelve; keep whole values as JSON integers.
            if float.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&float) {
                return Some(Number::from(float as i64));
            }
            return Number::from_f64(float);
        }
    }
    None
}

/// A prompt that resolves with a number parsed from the reply.
pub type NumberPrompt = Prompt<NumberRecognizer>;

/// Creates a number prompt.
pub fn number_prompt() -> NumberPrompt {
    Prompt::new(NumberRecognizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::BufferingSender;
    use crate::domain::turn::Activity;
    use serde_json::json;
    use std::sync::Arc;

    fn recognize(text: &str) -> Option<Value> {
        let turn = TurnContext::new(Activity::message(text), Arc::new(BufferingSender::new()));
        NumberRecognizer.recognize(&turn, &PromptOptions::default())
    }

    #[test]
    fn bare_integer_recognizes() {
        assert_eq!(recognize("3"), Some(json!(3)));
    }

    #[test]
    fn number_embedded_in_a_sentence_recognizes() {
        assert_eq!(recognize("we are 4 people, thanks"), Some(json!(4)));
    }

    #[test]
    fn trailing_punctuation_is_ignored() {
        assert_eq!(recognize("12."), Some(json!(12)));
    }

    #[test]
    fn decimals_recognize_as_floats() {
        assert_eq!(recognize("about 2.5 hours"), Some(json!(2.5)));
    }

    #[test]
    fn negative_numbers_recognize() {
        assert_eq!(recognize("-3"), Some(json!(-3)));
    }

    #[test]
    fn text_without_a_number_fails() {
        assert_eq!(recognize("a few of us"), None);
    }
}
