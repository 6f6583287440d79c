use crate::{MessageEntry, Role};

/// Which messages the panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    User,
    Assistant,
}

impl Category {
    /// Tab order as shown in the panel header.
    pub const TABS: [Category; 3] = [Category::All, Category::User, Category::Assistant];

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::User => "My Posts",
            Category::Assistant => "AI",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Category::All => "Filter all messages...",
            Category::User => "Filter my posts...",
            Category::Assistant => "Filter AI answers...",
        }
    }

    pub fn admits(self, role: Role) -> bool {
        match self {
            Category::All => true,
            Category::User => role == Role::User,
            Category::Assistant => role == Role::Assistant,
        }
    }
}

/// Active tab plus the raw contents of the search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    category: Category,
    search_term: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Search box text exactly as typed.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn switch_tab(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Normalized search needle, `None` when the box is blank.
    pub fn needle(&self) -> Option<String> {
        normalize_term(&self.search_term)
    }

    pub fn matches(&self, message: &MessageEntry) -> bool {
        if !self.category.admits(message.role) {
            return false;
        }
        match self.needle() {
            Some(needle) => message.normalized_text.contains(&needle),
            None => true,
        }
    }

    /// Visible subset, in document order.
    pub fn apply<'a>(&self, messages: &'a [MessageEntry]) -> Vec<&'a MessageEntry> {
        let needle = self.needle();
        filter_by_term(filter_by_category(messages, self.category), needle.as_deref())
    }
}

/// Trims and lowercases a search term. Blank terms yield `None`.
pub fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

pub fn filter_by_category<'a, I>(messages: I, category: Category) -> Vec<&'a MessageEntry>
where
    I: IntoIterator<Item = &'a MessageEntry>,
{
    messages
        .into_iter()
        .filter(|message| category.admits(message.role))
        .collect()
}

/// Substring filter against the normalized full text. `needle` must already be normalized.
pub fn filter_by_term<'a, I>(messages: I, needle: Option<&str>) -> Vec<&'a MessageEntry>
where
    I: IntoIterator<Item = &'a MessageEntry>,
{
    match needle {
        Some(needle) => messages
            .into_iter()
            .filter(|message| message.normalized_text.contains(needle))
            .collect(),
        None => messages.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_term, Category};
    use crate::Role;

    #[test]
    fn blank_terms_normalize_to_none() {
        assert_eq!(normalize_term(""), None);
        assert_eq!(normalize_term("   \t"), None);
        assert_eq!(normalize_term("  HeLLo "), Some("hello".to_string()));
    }

    #[test]
    fn category_admits_by_exact_role() {
        assert!(Category::All.admits(Role::User));
        assert!(Category::All.admits(Role::Assistant));
        assert!(Category::User.admits(Role::User));
        assert!(!Category::User.admits(Role::Assistant));
        assert!(!Category::Assistant.admits(Role::User));
    }
}
