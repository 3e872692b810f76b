mod context;
mod create;
mod delete;
mod error;
mod execution;
mod shape;
mod state;
mod transition;

#[cfg(test)]
mod fixture;

pub use {
  context::{Context, ProtocolVersion},
  create::validate_create,
  delete::{validate_delete, SynthesizedOperation},
  error::{Error, ShapeError, Violation},
  execution::{execute, ExecutionError},
  shape::GROUP_SIZE,
  state::{AccountState, InMemoryStateStore, State, StateDiff},
  transition::{approve, evaluate, evaluate_many, Transition},
};
