//! Category and text filtering over the charity directory

use crate::types::Charity;

/// Category value that matches every charity
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Default)]
pub struct CharityDirectory {
    charities: Vec<Charity>,
}

impl CharityDirectory {
    pub fn new(charities: Vec<Charity>) -> Self {
        Self { charities }
    }

    pub fn len(&self) -> usize {
        self.charities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charities.is_empty()
    }

    /// "All" followed by each distinct non-empty category, in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for charity in &self.charities {
            if !charity.category.is_empty() && !categories.contains(&charity.category) {
                categories.push(charity.category.clone());
            }
        }
        categories
    }

    /// Charities in `category` whose name or organization contains `query`
    /// (case-insensitive). `None` or "All" matches any category; an empty
    /// query matches everything.
    pub fn filter(&self, category: Option<&str>, query: &str) -> Vec<&Charity> {
        let query = query.trim().to_lowercase();
        self.charities
            .iter()
            .filter(|c| match category {
                None | Some(ALL_CATEGORIES) => true,
                Some(wanted) => c.category == wanted,
            })
            .filter(|c| {
                query.is_empty()
                    || c.name.to_lowercase().contains(&query)
                    || c.organization.to_lowercase().contains(&query)
            })
            .collect()
    }
}
