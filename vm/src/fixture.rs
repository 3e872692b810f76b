//! Shared builders for validator unit tests.

use {
  crate::Context,
  keysig_primitives::{
    Address,
    ControllingApplication,
    Key,
    OnCompletion,
    Operation,
    OperationGroup,
    ProgramTemplate,
  },
};

pub const APP_ID: u64 = 42;

// pushbytes TMPL_KEY; pop; pushint 1; return
pub const KEYSIG: [u8; 7] = [0x05, 0x80, 0x00, 0x48, 0x81, 0x01, 0x43];

pub fn creator() -> Address {
  Address::from_bytes([7; 32])
}

pub fn stranger() -> Address {
  Address::from_bytes([9; 32])
}

pub fn context() -> Context {
  Context::new(
    ControllingApplication::new(APP_ID, creator()),
    ProgramTemplate::new(KEYSIG.to_vec(), 2, 1).unwrap(),
  )
}

pub fn account(ctx: &Context, key: &str) -> Address {
  ctx.derive(&Key::try_from(key).unwrap()).unwrap()
}

pub fn create_group(ctx: &Context, key: &str) -> OperationGroup {
  let account = account(ctx, key);
  OperationGroup::new(vec![
    Operation::payment(creator(), account, ctx.version.seed_amount()),
    Operation::call(account, ctx.application.id, OnCompletion::OptIn)
      .arg(key.as_bytes()),
    Operation::payment(account, account, 0).rekey_to(ctx.application.address()),
  ])
}

pub fn delete_group(ctx: &Context, key: &str) -> OperationGroup {
  let account = account(ctx, key);
  OperationGroup::new(vec![
    Operation::call(creator(), ctx.application.id, OnCompletion::NoOp)
      .arg(key.as_bytes())
      .account(account),
    Operation::call(account, ctx.application.id, OnCompletion::CloseOut),
    Operation::payment(account, creator(), 0).close_remainder_to(creator()),
  ])
}

/// Returns a copy of the group with the given modification applied.
pub fn modified(
  group: &OperationGroup,
  modify: impl FnOnce(&mut Vec<Operation>),
) -> OperationGroup {
  let mut ops = group.clone().into_operations();
  modify(&mut ops);
  OperationGroup::new(ops)
}
