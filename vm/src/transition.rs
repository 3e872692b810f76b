use {
  crate::{
    shape::expect_application,
    validate_create,
    validate_delete,
    Context,
    Error,
    ShapeError,
    SynthesizedOperation,
  },
  keysig_primitives::{ApplicationCall, OnCompletion, OperationGroup},
  rayon::prelude::*,
  tracing::trace,
};

/// What an application call asks of the controlling application.
///
/// Administrative transitions are approved unconditionally, they are
/// guarded by the ledger itself (only the creator may update or delete
/// an application). Opting in creates a key and a plain call deletes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
  CreateApplication,
  UpdateApplication,
  DeleteApplication,
  CloseOut,
  ClearState,
  CreateKey,
  DeleteKey,
}

impl Transition {
  pub fn select(call: &ApplicationCall) -> Self {
    if call.application_id == 0 {
      return Self::CreateApplication;
    }

    match call.on_completion {
      OnCompletion::UpdateApplication => Self::UpdateApplication,
      OnCompletion::DeleteApplication => Self::DeleteApplication,
      OnCompletion::CloseOut => Self::CloseOut,
      OnCompletion::ClearState => Self::ClearState,
      OnCompletion::OptIn => Self::CreateKey,
      OnCompletion::NoOp => Self::DeleteKey,
    }
  }
}

/// Runs the approval logic of the application for the call at `index`
/// within the group, as the ledger does when it executes the call.
///
/// Returns the operations the application issues as a consequence of
/// approving the call.
pub fn approve(
  ctx: &Context,
  group: &OperationGroup,
  index: usize,
) -> Result<Option<SynthesizedOperation>, Error> {
  let call = group
    .get(index)
    .ok_or(ShapeError::MissingOperation(index))?
    .as_call()
    .ok_or(ShapeError::NotApplicationCall(index))?;

  let transition = Transition::select(call);
  trace!("operation {index} selects {transition:?}");

  if transition != Transition::CreateApplication {
    expect_application(call, "call", ctx.application.id)?;
  }

  match transition {
    Transition::CreateApplication
    | Transition::UpdateApplication
    | Transition::DeleteApplication
    | Transition::CloseOut
    | Transition::ClearState => Ok(None),
    Transition::CreateKey => validate_create(ctx, group).map(|()| None),
    Transition::DeleteKey => validate_delete(ctx, group),
  }
}

/// Runs the approval logic for every application call in the group and
/// collects all synthesized operations. Fails on the first rejected call.
pub fn evaluate(
  ctx: &Context,
  group: &OperationGroup,
) -> Result<Vec<SynthesizedOperation>, Error> {
  let mut synthesized = vec![];
  for (index, op) in group.iter().enumerate() {
    if op.as_call().is_some() {
      synthesized.extend(approve(ctx, group, index)?);
    }
  }
  Ok(synthesized)
}

/// Evaluates many independent groups in parallel.
///
/// Validation is a pure function of the context and the group, so
/// groups can be evaluated concurrently. Ordering between groups that
/// concern the same key is the ledger's job, not the validator's.
pub fn evaluate_many(
  ctx: &Context,
  groups: &[OperationGroup],
) -> Vec<Result<Vec<SynthesizedOperation>, Error>> {
  groups.par_iter().map(|group| evaluate(ctx, group)).collect()
}
