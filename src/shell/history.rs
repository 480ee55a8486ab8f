/// Number of input lines kept
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Previously entered lines, most recent first, without duplicates.
///
/// The cursor walks the entries like arrow keys at a prompt: `Up` moves to
/// older lines, `Down` back towards the empty input.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl History {
    pub fn record(&mut self, line: &str) {
        self.entries.retain(|entry| entry != line);
        self.entries.insert(0, line.to_string());
        self.entries.truncate(HISTORY_LIMIT);
        self.cursor = None;
    }

    /// Moves the cursor and returns the line to show at the prompt.
    ///
    /// Returns `None` when there is no history at all, and an empty line
    /// after moving down past the most recent entry.
    pub fn navigate(&mut self, direction: Direction) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        self.cursor = match (direction, self.cursor) {
            (Direction::Up, None) => Some(0),
            (Direction::Up, Some(index)) => Some((index + 1).min(self.entries.len() - 1)),
            (Direction::Down, Some(index)) if index > 0 => Some(index - 1),
            (Direction::Down, _) => None,
        };

        Some(self.cursor.map_or("", |index| self.entries[index].as_str()))
    }

    pub fn most_recent_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn oldest_first(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().rev().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
