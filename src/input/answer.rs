/// Longest answer the puzzle field accepts
pub const MAX_ANSWER_LEN: usize = 24;

/// Free-text field of the puzzle overlay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerField {
    text: String,
}

impl AnswerField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() && self.text.chars().count() < MAX_ANSWER_LEN {
            self.text.push(c);
        }
    }

    pub fn erase(&mut self) {
        self.text.pop();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hand the typed text over and empty the field
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
