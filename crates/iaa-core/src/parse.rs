//! Answer parsing: raw answer text into comparable labels.

use regex::Regex;

use crate::domain::{IaaError, Label, Result};

/// Turns a raw answer field into a [`Label`].
///
/// Implementations must be pure: the same raw answer always yields the same
/// label, because label equality is the only thing agreement statistics see.
/// Return [`IaaError::Parse`] only for input the parser cannot map at all;
/// an error aborts the whole variant.
pub trait AnswerParser: Send + Sync {
    fn parse(&self, raw: &str) -> Result<Label>;
}

impl<F> AnswerParser for F
where
    F: Fn(&str) -> Result<Label> + Send + Sync,
{
    fn parse(&self, raw: &str) -> Result<Label> {
        self(raw)
    }
}

/// Default parser for free-text crowd answers.
///
/// Lowercases, collapses runs of whitespace, strips surrounding quotes and
/// trailing sentence punctuation. `"  Yes. "` and `"yes"` become the same label.
///
/// Blank or punctuation-only answers map to the empty label, so they agree
/// with each other and disagree with every real answer.
#[derive(Debug, Clone)]
pub struct NormalizingParser {
    whitespace: Regex,
    trailing: Regex,
}

impl NormalizingParser {
    pub fn new() -> Result<Self> {
        let whitespace =
            Regex::new(r"\s+").map_err(|e| IaaError::Config(format!("whitespace pattern: {e}")))?;
        let trailing = Regex::new(r#"^["']+|["'.!?;,:]+$"#)
            .map_err(|e| IaaError::Config(format!("punctuation pattern: {e}")))?;
        Ok(Self {
            whitespace,
            trailing,
        })
    }
}

impl AnswerParser for NormalizingParser {
    fn parse(&self, raw: &str) -> Result<Label> {
        let lowered = raw.trim().to_lowercase();
        let stripped = self.trailing.replace_all(&lowered, "");
        let collapsed = self.whitespace.replace_all(stripped.trim(), " ");
        Ok(Label::new(collapsed.into_owned()))
    }
}

/// Uses the raw answer verbatim as the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbatimParser;

impl AnswerParser for VerbatimParser {
    fn parse(&self, raw: &str) -> Result<Label> {
        Ok(Label::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> NormalizingParser {
        NormalizingParser::new().expect("static patterns compile")
    }

    #[test]
    fn test_normalizes_case_whitespace_and_punctuation() {
        let p = parser();
        assert_eq!(p.parse("  Yes. ").unwrap(), Label::from("yes"));
        assert_eq!(p.parse("\"No!\"").unwrap(), Label::from("no"));
        assert_eq!(
            p.parse("Not   sure\tat all").unwrap(),
            Label::from("not sure at all")
        );
    }

    #[test]
    fn test_equivalent_answers_share_a_label() {
        let p = parser();
        assert_eq!(p.parse("TRUE").unwrap(), p.parse("true.").unwrap());
    }

    #[test]
    fn test_blank_answers_share_the_empty_label() {
        let p = parser();
        for raw in ["", "   ", "...", "?", "\"!\""] {
            assert_eq!(p.parse(raw).unwrap(), Label::from(""), "raw = {:?}", raw);
        }
        assert_ne!(p.parse("?").unwrap(), p.parse("no").unwrap());
    }

    #[test]
    fn test_closure_parser() {
        let upper = |raw: &str| -> Result<Label> { Ok(Label::new(raw.to_uppercase())) };
        assert_eq!(upper.parse("x").unwrap(), Label::from("X"));
    }

    #[test]
    fn test_verbatim_parser_keeps_text() {
        assert_eq!(VerbatimParser.parse(" A ").unwrap(), Label::from(" A "));
    }
}
