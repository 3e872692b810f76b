use {
  crate::{Error, ShapeError, Violation},
  keysig_primitives::{
    ApplicationCall,
    Key,
    OnCompletion,
    OperationGroup,
    OperationKind,
    Payment,
  },
};

/// Both lifecycle transitions are expressed as groups of this size.
pub const GROUP_SIZE: usize = 3;

pub(crate) fn expect_size(group: &OperationGroup) -> Result<(), Error> {
  if group.len() != GROUP_SIZE {
    return Err(
      ShapeError::GroupSize {
        expected: GROUP_SIZE,
        actual: group.len(),
      }
      .into(),
    );
  }
  Ok(())
}

pub(crate) fn expect_payment<'g>(
  group: &'g OperationGroup,
  index: usize,
  role: &'static str,
) -> Result<&'g Payment, Error> {
  let op = group.get(index).ok_or(ShapeError::MissingOperation(index))?;
  op.as_payment().ok_or_else(|| {
    ShapeError::OperationKind {
      index,
      role,
      expected: OperationKind::Payment,
      actual: op.kind(),
    }
    .into()
  })
}

pub(crate) fn expect_call<'g>(
  group: &'g OperationGroup,
  index: usize,
  role: &'static str,
  on_completion: OnCompletion,
) -> Result<&'g ApplicationCall, Error> {
  let op = group.get(index).ok_or(ShapeError::MissingOperation(index))?;
  match op.as_call() {
    Some(call) if call.on_completion == on_completion => Ok(call),
    _ => Err(
      ShapeError::OperationKind {
        index,
        role,
        expected: OperationKind::ApplicationCall(on_completion),
        actual: op.kind(),
      }
      .into(),
    ),
  }
}

pub(crate) fn expect_application(
  call: &ApplicationCall,
  role: &'static str,
  expected: u64,
) -> Result<(), Error> {
  if call.application_id != expected {
    return Err(
      Violation::WrongApplication {
        role,
        expected,
        actual: call.application_id,
      }
      .into(),
    );
  }
  Ok(())
}

/// The key a call claims to act for, carried as its only argument.
pub(crate) fn key_argument(
  call: &ApplicationCall,
  role: &'static str,
) -> Result<Key, Error> {
  match call.args.as_slice() {
    [key] => Ok(Key::new(key.as_slice())?),
    args => Err(
      Violation::ArgumentCount {
        role,
        actual: args.len(),
      }
      .into(),
    ),
  }
}
