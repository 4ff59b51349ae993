/// Number of candidates shown at once.
pub const PAGE_SIZE: usize = 10;

/// Indices of the items containing `query`, ignoring case, in their original order.
///
/// An empty query matches everything.
pub fn filter_candidates(items: &[String], query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.to_lowercase().contains(&query))
        .map(|(index, _)| index)
        .collect()
}

/// Search text, cursor and matching candidates of a running selector.
#[derive(Debug)]
pub struct SelectState<'a> {
    items: &'a [String],
    query: String,
    matches: Vec<usize>,
    cursor: usize,
}

impl<'a> SelectState<'a> {
    pub fn new(items: &'a [String]) -> Self {
        Self {
            items,
            query: String::new(),
            matches: (0..items.len()).collect(),
            cursor: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    pub fn move_up(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.matches.len() - 1);
    }

    pub fn move_down(&mut self) {
        if self.matches.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.matches.len();
    }

    /// Index into the original items of the highlighted candidate.
    pub fn selected(&self) -> Option<usize> {
        self.matches.get(self.cursor).copied()
    }

    /// Candidates on the page holding the cursor, paired with "is highlighted".
    pub fn visible(&self) -> impl Iterator<Item = (&'a str, bool)> + '_ {
        let items = self.items;
        let cursor = self.cursor;
        let start = (cursor / PAGE_SIZE) * PAGE_SIZE;
        self.matches
            .iter()
            .enumerate()
            .skip(start)
            .take(PAGE_SIZE)
            .map(move |(position, &index)| (items[index].as_str(), position == cursor))
    }

    fn refilter(&mut self) {
        self.matches = filter_candidates(self.items, &self.query);
        self.cursor = 0;
    }
}
