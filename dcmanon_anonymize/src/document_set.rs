//! The documents of one series, and the roles they play in it.

/// The documents belonging to one series. A series has at most one structure
/// set, plan, and dose, and any number of images in order.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSet<D> {
  pub structure_set: Option<D>,
  pub plan: Option<D>,
  pub dose: Option<D>,
  pub images: Vec<D>,
}

impl<D> Default for DocumentSet<D> {
  fn default() -> Self {
    Self {
      structure_set: None,
      plan: None,
      dose: None,
      images: vec![],
    }
  }
}

impl<D> DocumentSet<D> {
  /// Returns the number of documents in the set.
  ///
  pub fn len(&self) -> usize {
    usize::from(self.structure_set.is_some())
      + usize::from(self.plan.is_some())
      + usize::from(self.dose.is_some())
      + self.images.len()
  }

  /// Returns whether the set holds no documents.
  ///
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the roles of the documents in the set, in the order they're
  /// processed.
  ///
  pub fn roles(&self) -> Vec<DocumentRole> {
    let mut roles = vec![];

    if self.structure_set.is_some() {
      roles.push(DocumentRole::StructureSet);
    }
    if self.plan.is_some() {
      roles.push(DocumentRole::Plan);
    }
    if self.dose.is_some() {
      roles.push(DocumentRole::Dose);
    }

    for index in 0..self.images.len() {
      roles.push(DocumentRole::Image { index });
    }

    roles
  }
}

/// The role of a document within its series. Errors that affect a whole
/// series use [`DocumentRole::Series`].
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DocumentRole {
  Series,
  StructureSet,
  Plan,
  Dose,
  Image { index: usize },
}

impl core::fmt::Display for DocumentRole {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Series => f.write_str("series"),
      Self::StructureSet => f.write_str("structure set"),
      Self::Plan => f.write_str("plan"),
      Self::Dose => f.write_str("dose"),
      Self::Image { index } => write!(f, "image {index}"),
    }
  }
}
