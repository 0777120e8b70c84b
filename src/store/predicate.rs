/// A conjunction of column filters, built by callers and rendered by the store backend.
///
/// Column names are static so only code-defined identifiers ever reach SQL;
/// backends still check them against the table's column list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Eq(&'static str, String),
    /// The column holds the id of an exam paper linked to the branch.
    LinkedToBranch(&'static str, String),
}

impl Clause {
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Clause::Eq(column, _) | Clause::LinkedToBranch(column, _) => column,
        }
    }
}

impl Predicate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an equality predicate over every pair of an attribute map.
    #[must_use]
    pub fn from_attributes<I, V>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<String>,
    {
        attributes
            .into_iter()
            .fold(Self::new(), |p, (column, value)| p.eq(column, value))
    }

    #[must_use]
    pub fn eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Eq(column, value.into()));
        self
    }

    #[must_use]
    pub fn linked_to_branch(mut self, column: &'static str, branch: impl Into<String>) -> Self {
        self.clauses.push(Clause::LinkedToBranch(column, branch.into()));
        self
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_attributes_keeps_order() {
        let p = Predicate::from_attributes([("filename", "a.pdf"), ("year", "1st Year")]);
        assert_eq!(
            p.clauses(),
            &[
                Clause::Eq("filename", "a.pdf".into()),
                Clause::Eq("year", "1st Year".into()),
            ]
        );
    }

    #[test]
    fn test_builder_chains() {
        let p = Predicate::new().linked_to_branch("id", "CSE").eq("year", "2nd Year");
        assert_eq!(p.clauses().len(), 2);
        assert_eq!(p.clauses()[0].column(), "id");
        assert!(Predicate::new().is_empty());
    }
}
