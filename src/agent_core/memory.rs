//! Bounded conversation memory.
//!
//! Both the orchestrator and each agent keep a short rolling window of
//! role-tagged turns. The window feeds prompt context, so it is capped:
//! when a push would exceed capacity the oldest turn is evicted first.
//!
//! Responsibilities:
//! - Record turns as "{role}: {text}" lines in arrival order
//! - Enforce the capacity bound on every push
//! - Render the window as a newline-joined transcript for prompts

use std::collections::VecDeque;

// ─── Constants ────────────────────────────────────────────────────────────────

/// Default number of turns kept before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 10;

// ─── ConversationMemory ──────────────────────────────────────────────────────

/// Rolling window of role-tagged conversation turns.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<String>,
    capacity: usize,
}

impl ConversationMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one turn as "{role}: {text}", evicting the oldest when full.
    ///
    /// A zero-capacity window records nothing.
    pub fn push(&mut self, role: &str, text: &str) {
        if self.capacity == 0 {
            return;
        }
        while self.turns.len() >= self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(format!("{role}: {text}"));
    }

    /// The window as prompt context, oldest turn first.
    pub fn transcript(&self) -> String {
        let lines: Vec<&str> = self.turns.iter().map(String::as_str).collect();
        lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
