//! Terminal implementation of the core `Prompter`.

use bmad_core::fields::Validate;
use bmad_core::prompt::{AcceptDefaults, Prompter};
use bmad_core::BmadError;
use dialoguer::{Confirm, Input};

/// Interactive prompts on the controlling terminal.
pub struct Terminal;

fn prompt_error(e: dialoguer::Error) -> BmadError {
    BmadError::Prompt(format!("failed to get user input: {e}"))
}

impl Prompter for Terminal {
    fn input(
        &mut self,
        message: &str,
        default: Option<&str>,
        validate: Validate,
    ) -> bmad_core::Result<String> {
        let mut input = Input::<String>::new().with_prompt(message).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .validate_with(move |answer: &String| validate.check(answer))
            .interact_text()
            .map_err(prompt_error)
    }

    fn confirm(&mut self, message: &str, default: bool) -> bmad_core::Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}

pub fn for_mode(non_interactive: bool) -> Box<dyn Prompter> {
    if non_interactive {
        Box::new(AcceptDefaults)
    } else {
        Box::new(Terminal)
    }
}
