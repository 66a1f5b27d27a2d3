//! Resource names derived from one base name.

/// Names of the four resources provisioned for a base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub index: String,
    pub data_source: String,
    pub skillset: String,
    pub indexer: String,
}

impl ResourceNames {
    pub fn from_base(base: &str) -> Self {
        Self {
            index: format!("{base}-index"),
            data_source: format!("{base}-ds"),
            skillset: format!("{base}-skills"),
            indexer: format!("{base}-indexer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base() {
        let names = ResourceNames::from_base("docs");
        assert_eq!(names.index, "docs-index");
        assert_eq!(names.data_source, "docs-ds");
        assert_eq!(names.skillset, "docs-skills");
        assert_eq!(names.indexer, "docs-indexer");
    }

    #[test]
    fn test_distinct_bases_do_not_collide() {
        assert_ne!(
            ResourceNames::from_base("a"),
            ResourceNames::from_base("b")
        );
    }
}
