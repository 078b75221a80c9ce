//! Word and word group types.

/// A named collection of words, created per uploaded CSV file
#[derive(Debug, Clone, PartialEq)]
pub struct WordGroup {
  pub id: i64,
  pub name: String,
}

/// A single vocabulary entry belonging to exactly one group
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
  pub id: i64,
  pub text: String,
  pub meaning: String,
  pub group_id: i64,
}
