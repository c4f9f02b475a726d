use std::fmt;

/// A 1-based, inclusive span on a protein sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub start: u32,
    pub end: u32,
}

impl Location {
    pub fn new(start: u32, end: u32) -> Self {
        Location { start, end }
    }
}

impl From<(u32, u32)> for Location {
    fn from((start, end): (u32, u32)) -> Self {
        Location::new(start, end)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A Gene Ontology cross-reference attached to a feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoTerm {
    pub id: String,
    pub category: String,
    pub name: String,
}

impl GoTerm {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        GoTerm {
            id: id.into(),
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for GoTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.id, self.category, self.name)
    }
}

/// One annotation hit reported by a provider.
///
/// Features are immutable once built. Two features with identical fields are
/// still distinct hits, so no equality is offered: a sequence may legitimately
/// carry duplicates when the upstream service reports overlapping matches.
#[derive(Debug, Clone)]
pub struct Feature {
    service: String,
    name: String,
    locations: Vec<Location>,
    go_terms: Vec<GoTerm>,
}

impl Feature {
    pub fn new(
        service: impl Into<String>,
        name: impl Into<String>,
        locations: Vec<Location>,
        go_terms: Vec<GoTerm>,
    ) -> Self {
        Feature {
            service: service.into(),
            name: name.into(),
            locations,
            go_terms,
        }
    }

    /// Name of the provider that produced this feature.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn go_terms(&self) -> &[GoTerm] {
        &self.go_terms
    }

    /// Start of the first reported location, or 0 when there is none.
    pub fn sort_key(&self) -> u32 {
        self.locations.first().map_or(0, |loc| loc.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::new(1, 10).to_string(), "1-10");
        assert_eq!(Location::from((50, 60)), Location::new(50, 60));
    }

    #[test]
    fn test_go_term_display() {
        let term = GoTerm::new("GO:0000001", "BIOLOGICAL_PROCESS", "Replication");
        assert_eq!(term.to_string(), "GO:0000001 (BIOLOGICAL_PROCESS) Replication");
    }

    #[test]
    fn test_feature_sort_key() {
        let located = Feature::new(
            "svc",
            "Domain",
            vec![Location::new(40, 60), Location::new(5, 10)],
            vec![],
        );
        let unlocated = Feature::new("svc", "Family", vec![], vec![]);

        assert_eq!(located.sort_key(), 40);
        assert_eq!(unlocated.sort_key(), 0);
    }
}
