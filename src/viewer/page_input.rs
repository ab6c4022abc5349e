// SPDX-License-Identifier: MPL-2.0
//! The page number entry box.

/// What the viewer should do after an edit of the page box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCommit {
    /// Jump to this one-based page.
    Jump(usize),
    Ignore,
}

/// Text of the page number box, tracked separately from the current page so
/// an edit can be abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInput {
    text: String,
}

impl Default for PageInput {
    fn default() -> Self {
        Self::showing(1)
    }
}

impl PageInput {
    pub fn showing(page: usize) -> Self {
        Self {
            text: page.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Keeps only the digits of what was typed.
    pub fn edit(&mut self, typed: &str) {
        self.text = typed.chars().filter(char::is_ascii_digit).collect();
    }

    pub fn show(&mut self, page: usize) {
        self.text = page.to_string();
    }

    /// Reverts an abandoned edit to the current page.
    pub fn blur(&mut self, current_page: usize) {
        if self.text.parse::<usize>().ok() != Some(current_page) {
            self.show(current_page);
        }
    }

    /// Enter: a non-zero number becomes a jump request.
    pub fn submit(&self) -> PageCommit {
        match self.text.parse::<usize>() {
            Ok(page) if page > 0 => PageCommit::Jump(page),
            _ => PageCommit::Ignore,
        }
    }
}
