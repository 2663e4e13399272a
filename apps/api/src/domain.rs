use std::fmt;

/// The two independent content areas. Each has its own secret, its own
/// storage key, and its own cache invalidation list; nothing is shared
/// across domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Portfolio,
    Resume,
}

impl Domain {
    /// Key the canonical document is stored under (without extension).
    pub fn storage_key(self) -> &'static str {
        match self {
            Domain::Portfolio => "portfolio-data",
            Domain::Resume => "resume-data",
        }
    }

    /// Pages whose cached renders depend on this domain's document.
    /// Configured once here, never derived from content.
    pub fn pages(self) -> &'static [&'static str] {
        match self {
            Domain::Portfolio => &["/", "/projects", "/api/v1/portfolio"],
            Domain::Resume => &["/resume", "/api/v1/resume"],
        }
    }

    /// Cache path for the domain's own document read endpoint.
    pub fn api_page(self) -> &'static str {
        match self {
            Domain::Portfolio => "/api/v1/portfolio",
            Domain::Resume => "/api/v1/resume",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Portfolio => write!(f, "portfolio"),
            Domain::Resume => write!(f, "resume"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_isolated() {
        assert_ne!(
            Domain::Portfolio.storage_key(),
            Domain::Resume.storage_key()
        );
    }

    #[test]
    fn test_page_lists_are_isolated() {
        for page in Domain::Portfolio.pages() {
            assert!(!Domain::Resume.pages().contains(page));
        }
    }

    #[test]
    fn test_api_page_is_invalidated_on_publish() {
        // The read endpoint caches under api_page, so it must be part of
        // the domain's invalidation list.
        for domain in [Domain::Portfolio, Domain::Resume] {
            assert!(domain.pages().contains(&domain.api_page()));
        }
    }
}
