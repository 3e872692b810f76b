use {
  keysig_primitives::{Address, Key, OperationKind, TemplateError},
  thiserror::Error,
};

/// Reason a group was rejected.
///
/// Rejections are permanent for the exact group that produced them.
/// Validating the same group again yields the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Key derivation failed: {0}")]
  Derivation(#[from] TemplateError),

  #[error("Malformed group: {0}")]
  GroupShape(#[from] ShapeError),

  #[error("Predicate violated: {0}")]
  Predicate(#[from] Violation),

  #[error("Could not synthesize follow-up operation: {0}")]
  SynthesisFailure(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
  #[error("expected a group of {expected} operations, got {actual}")]
  GroupSize { expected: usize, actual: usize },

  #[error("operation {index} ({role}) must be a {expected}, got {actual}")]
  OperationKind {
    index: usize,
    role: &'static str,
    expected: OperationKind,
    actual: OperationKind,
  },

  #[error("operation {0} does not exist in the group")]
  MissingOperation(usize),

  #[error("operation {0} is not an application call")]
  NotApplicationCall(usize),
}

/// A named condition of a lifecycle transition that the group failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
  #[error("seed sender {0} is not a recognized funding authority")]
  SeedSender(Address),

  #[error("seed amount {actual} does not match the required {expected}")]
  SeedAmount { expected: u64, actual: u64 },

  #[error("{role} targets application {actual}, expected {expected}")]
  WrongApplication {
    role: &'static str,
    expected: u64,
    actual: u64,
  },

  #[error("{role} must carry exactly one argument, got {actual}")]
  ArgumentCount { role: &'static str, actual: usize },

  #[error("{role} must not transfer funds, amount is {actual}")]
  NonZeroAmount { role: &'static str, actual: u64 },

  #[error("{role} delegates to {actual}, expected {expected}")]
  RekeyTarget {
    role: &'static str,
    expected: Address,
    actual: Address,
  },

  #[error("{role} closes remainder to {actual}, expected {expected}")]
  CloseRemainder {
    role: &'static str,
    expected: Address,
    actual: Address,
  },

  #[error("seed pays {actual}, expected the opting in account {expected}")]
  SeedReceiver { expected: Address, actual: Address },

  #[error("rekey is sent by {actual}, expected the opting in account {expected}")]
  RekeySender { expected: Address, actual: Address },

  #[error("trigger is sent by {actual}, expected the creator {expected}")]
  TriggerSender { expected: Address, actual: Address },

  #[error("close out is sent by {closeout}, close payment by {closeto}")]
  CloseOutSender { closeout: Address, closeto: Address },

  #[error("close payment pays {actual}, expected the trigger sender {expected}")]
  CloseToReceiver { expected: Address, actual: Address },

  #[error("{key:?} derives to {derived}, but the claimed account is {claimed}")]
  IdentityMismatch {
    key: Key,
    derived: Address,
    claimed: Address,
  },
}
