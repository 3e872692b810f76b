use {
  crate::{b58::ToBase58String, Operation},
  multihash::{Multihash, MultihashDigest},
  once_cell::sync::OnceCell,
  serde::{Deserialize, Serialize},
  std::{fmt::Debug, ops::Index},
};

/// An ordered bundle of operations that the ledger applies atomically.
///
/// Either all operations in a group take effect or none of them do.
/// Operations of a group must never be submitted individually.
#[derive(Clone, Serialize, Deserialize)]
pub struct OperationGroup {
  operations: Vec<Operation>,

  #[serde(skip)]
  hash_cache: OnceCell<Multihash>,
}

impl OperationGroup {
  pub fn new(operations: Vec<Operation>) -> Self {
    Self {
      operations,
      hash_cache: OnceCell::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.operations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Operation> {
    self.operations.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Operation> {
    self.operations.iter()
  }

  pub fn operations(&self) -> &[Operation] {
    &self.operations
  }

  pub fn into_operations(self) -> Vec<Operation> {
    self.operations
  }

  /// Hash of the group contents that uniquely identifies it.
  pub fn hash(&self) -> &Multihash {
    self.hash_cache.get_or_init(|| {
      multihash::Code::Sha3_256.digest(
        &rmp_serde::to_vec(&self.operations)
          .expect("operations are always serializable"),
      )
    })
  }
}

impl Index<usize> for OperationGroup {
  type Output = Operation;

  fn index(&self, index: usize) -> &Self::Output {
    &self.operations[index]
  }
}

impl PartialEq for OperationGroup {
  fn eq(&self, other: &Self) -> bool {
    self.operations == other.operations
  }
}

impl Eq for OperationGroup {}

impl FromIterator<Operation> for OperationGroup {
  fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
    Self::new(iter.into_iter().collect())
  }
}

impl From<Vec<Operation>> for OperationGroup {
  fn from(operations: Vec<Operation>) -> Self {
    Self::new(operations)
  }
}

impl Debug for OperationGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OperationGroup")
      .field("operations", &self.operations)
      .field("hash", &self.hash().to_b58())
      .finish()
  }
}
