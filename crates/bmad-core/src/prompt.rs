//! The seam between configuration questions and whoever answers them.

use crate::error::{BmadError, Result};
use crate::fields::Validate;

/// Something that can answer questions: a terminal, a script, or defaults.
pub trait Prompter {
    /// Ask for free text. `default` is offered to the user and used when
    /// the answer is left blank.
    fn input(&mut self, message: &str, default: Option<&str>, validate: Validate) -> Result<String>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Answers every question with its default. Used for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptDefaults;

impl Prompter for AcceptDefaults {
    fn input(&mut self, message: &str, default: Option<&str>, validate: Validate) -> Result<String> {
        let answer = default.unwrap_or_default().to_string();
        validate
            .check(&answer)
            .map_err(|reason| BmadError::InvalidAnswer {
                field: message.to_string(),
                reason,
            })?;
        Ok(answer)
    }

    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
        Ok(default)
    }
}

/// Replays a fixed list of answers, in order. Confirm answers are given as
/// `"y"`/`"n"`; an empty string takes the default.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct Scripted {
    answers: std::collections::VecDeque<String>,
    /// Every message asked, in order.
    pub asked: Vec<String>,
}

#[cfg(test)]
impl Scripted {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, message: &str) -> Result<String> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| BmadError::Prompt(format!("no scripted answer for '{message}'")))
    }
}

#[cfg(test)]
impl Prompter for Scripted {
    fn input(&mut self, message: &str, default: Option<&str>, _validate: Validate) -> Result<String> {
        let answer = self.next(message)?;
        if answer.is_empty() {
            return Ok(default.unwrap_or_default().to_string());
        }
        Ok(answer)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        match self.next(message)?.as_str() {
            "" => Ok(default),
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(BmadError::Prompt(format!("not a yes/no answer: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_defaults_uses_defaults() {
        let mut p = AcceptDefaults;
        assert_eq!(p.input("Dir:", Some("./"), Validate::None).unwrap(), "./");
        assert!(p.confirm("Proceed?", true).unwrap());
        assert!(!p.confirm("Overwrite?", false).unwrap());
    }

    #[test]
    fn accept_defaults_rejects_invalid_default() {
        let err = AcceptDefaults
            .input("Project name:", None, Validate::NonEmpty)
            .unwrap_err();
        assert!(matches!(err, BmadError::InvalidAnswer { .. }));
    }

    #[test]
    fn scripted_replays_in_order() {
        let mut p = Scripted::new(["", "n", "custom"]);
        assert_eq!(p.input("A:", Some("dflt"), Validate::None).unwrap(), "dflt");
        assert!(!p.confirm("B?", true).unwrap());
        assert_eq!(p.input("C:", None, Validate::None).unwrap(), "custom");
        assert_eq!(p.asked, vec!["A:", "B?", "C:"]);
        assert!(matches!(p.confirm("D?", true), Err(BmadError::Prompt(_))));
    }
}
