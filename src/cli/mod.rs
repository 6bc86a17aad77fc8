//! Encrypt and decrypt commands

pub mod decrypt;
pub mod encrypt;

use std::io::Write;

use colored::Colorize;
use secrecy::SecretString;

use crate::error::Result;

/// Where passwords come from
///
/// The terminal in production; tests script the answers.
pub trait PasswordSource {
    fn read_password(&mut self, prompt: &str) -> Result<SecretString>;
}

/// Hidden-input prompt on the controlling terminal
pub struct TerminalPrompt;

impl PasswordSource for TerminalPrompt {
    fn read_password(&mut self, prompt: &str) -> Result<SecretString> {
        let password = rpassword::prompt_password(prompt)?;
        Ok(SecretString::new(password))
    }
}

/// Print a step label and leave the cursor on the same line
fn step(label: &str) -> Result<()> {
    print!("{}", label.cyan());
    std::io::stdout().flush()?;
    Ok(())
}

fn step_done() {
    println!("{}", "done".green());
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;
    use crate::crypto::KdfParams;

    /// Replays a fixed list of answers, one per prompt
    pub struct ScriptedPasswords {
        answers: VecDeque<String>,
        pub prompts: Vec<String>,
    }

    impl ScriptedPasswords {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl PasswordSource for ScriptedPasswords {
        fn read_password(&mut self, prompt: &str) -> Result<SecretString> {
            self.prompts.push(prompt.to_string());
            let answer = self
                .answers
                .pop_front()
                .expect("more prompts than scripted answers");
            Ok(SecretString::new(answer))
        }
    }

    /// Keeps debug-build tests fast
    pub fn fast_kdf() -> KdfParams {
        KdfParams::default().with_iterations(1_000)
    }
}
