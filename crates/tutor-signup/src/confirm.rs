//! Injectable confirmation oracle.
//!
//! Signup auto-enrollment and removal both pause at a blocking yes/no
//! decision point before any mutation is issued. The engine takes the
//! decision provider as a dependency so it stays independent of any UI;
//! the CLI wires up a stdin prompt, tests script the answers.

use std::collections::VecDeque;
use std::sync::Mutex;

/// A blocking yes/no decision provider.
pub trait Confirmer {
    /// Present the prompt and return the user's decision.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Scripted confirmer for tests: pops pre-seeded answers in order and
/// records every prompt it was shown. Answers `false` once the script
/// runs out, so an unexpected extra gate cancels instead of mutating.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt presented so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.asked.lock().expect("confirmer mutex poisoned").clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.asked
            .lock()
            .expect("confirmer mutex poisoned")
            .push(prompt.to_string());
        self.answers
            .lock()
            .expect("confirmer mutex poisoned")
            .pop_front()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_confirmer_pops_in_order() {
        let confirmer = ScriptedConfirmer::answering([true, false]);
        assert!(confirmer.confirm("first?"));
        assert!(!confirmer.confirm("second?"));
        // Exhausted script declines.
        assert!(!confirmer.confirm("third?"));
        assert_eq!(confirmer.prompts(), vec!["first?", "second?", "third?"]);
    }
}
