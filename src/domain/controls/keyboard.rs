//! Inline keyboard value objects attached to chat messages.

use serde::{Deserialize, Serialize};

/// Prefix marking the user's current choice on a button.
pub const CHOICE_MARK: &str = "✅ ";

/// A single pressable button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }

    /// Button text without a choice mark.
    pub fn label(&self) -> &str {
        self.text.strip_prefix(CHOICE_MARK).unwrap_or(&self.text)
    }

    pub fn is_marked(&self) -> bool {
        self.text.starts_with(CHOICE_MARK)
    }
}

/// Grid of buttons under a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    /// Lays `buttons` out left to right, `row_width` per row.
    pub fn grid(buttons: Vec<InlineButton>, row_width: usize) -> Self {
        let width = row_width.max(1);
        let mut rows = Vec::new();
        let mut row = Vec::with_capacity(width);
        for button in buttons {
            row.push(button);
            if row.len() == width {
                rows.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
        Self { rows }
    }

    /// One button per row.
    pub fn column(buttons: Vec<InlineButton>) -> Self {
        Self::grid(buttons, 1)
    }

    pub fn push_row(&mut self, row: Vec<InlineButton>) {
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    pub fn with_row(mut self, row: Vec<InlineButton>) -> Self {
        self.push_row(row);
        self
    }

    pub fn rows(&self) -> &[Vec<InlineButton>] {
        &self.rows
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Vec::is_empty)
    }

    /// Unmarked label of the button that carries `callback_data`.
    pub fn label_for(&self, callback_data: &str) -> Option<&str> {
        self.buttons()
            .find(|b| b.callback_data == callback_data)
            .map(InlineButton::label)
    }

    /// Removes every choice mark.
    pub fn clear_marks(&mut self) {
        for button in self.rows.iter_mut().flatten() {
            if let Some(plain) = button.text.strip_prefix(CHOICE_MARK) {
                button.text = plain.to_string();
            }
        }
    }

    /// Marks the first button labelled `choice`, clearing older marks.
    ///
    /// Returns false (keyboard left unmarked) when no button matches.
    pub fn mark_choice(&mut self, choice: &str) -> bool {
        self.clear_marks();
        match self
            .rows
            .iter_mut()
            .flatten()
            .find(|b| b.text == choice)
        {
            Some(button) => {
                button.text = format!("{}{}", CHOICE_MARK, button.text);
                true
            }
            None => false,
        }
    }

    /// Builder form of [`InlineKeyboard::mark_choice`].
    pub fn marked(mut self, choice: &str) -> Self {
        self.mark_choice(choice);
        self
    }

    /// Rewrites each button's payload as `make(position)`, position counted
    /// from 1 in reading order.
    pub fn rebind(&mut self, make: impl Fn(usize) -> String) {
        for (i, button) in self.rows.iter_mut().flatten().enumerate() {
            button.callback_data = make(i + 1);
        }
    }
}
