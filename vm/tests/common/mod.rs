use {
  keysig_primitives::{
    Address,
    CompiledProgram,
    ControllingApplication,
    Key,
    OnCompletion,
    Operation,
    OperationGroup,
    ProgramTemplate,
    KEY_LABEL,
  },
  keysig_vm::{AccountState, Context, InMemoryStateStore, State, StateDiff},
  tracing_subscriber::EnvFilter,
};

pub const APP_ID: u64 = 1;

/// Balance the creator starts with in every scenario.
pub const CREATOR_FUNDS: u64 = 10_000_000_000;

/// Source map of the key program as emitted by the assembler:
///
/// ```text
/// #pragma version 5
/// pushbytes TMPL_KEY
/// pop
/// pushint 1
/// return
/// ```
const KEYSIG_SOURCE_MAP: &str = r#"{
  "bytecode": "BYAASIEBQw==",
  "template_labels": {
    "TMPL_KEY": { "source_line": 1, "position": 2, "bytes": true }
  }
}"#;

pub fn init_logging() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub fn creator() -> Address {
  Address::from_bytes([3; 32])
}

pub fn context() -> anyhow::Result<Context> {
  let compiled = CompiledProgram::from_source_map(KEYSIG_SOURCE_MAP)?;
  Ok(Context::new(
    ControllingApplication::new(APP_ID, creator()),
    ProgramTemplate::from_compiled(compiled, KEY_LABEL)?,
  ))
}

/// A ledger where only the application creator holds funds.
pub fn genesis() -> InMemoryStateStore {
  let mut diff = StateDiff::default();
  diff.set(creator(), AccountState::with_balance(CREATOR_FUNDS));
  let mut store = InMemoryStateStore::default();
  store.apply(diff);
  store
}

pub fn account(ctx: &Context, key: &str) -> anyhow::Result<Address> {
  Ok(ctx.derive(&Key::try_from(key)?)?)
}

pub fn create_group(ctx: &Context, key: &str) -> anyhow::Result<OperationGroup> {
  let account = account(ctx, key)?;
  Ok(OperationGroup::new(vec![
    Operation::payment(creator(), account, ctx.version.seed_amount()),
    Operation::call(account, APP_ID, OnCompletion::OptIn).arg(key.as_bytes()),
    Operation::payment(account, account, 0).rekey_to(ctx.application.address()),
  ]))
}

pub fn delete_group(ctx: &Context, key: &str) -> anyhow::Result<OperationGroup> {
  let account = account(ctx, key)?;
  Ok(OperationGroup::new(vec![
    Operation::call(creator(), APP_ID, OnCompletion::NoOp)
      .arg(key.as_bytes())
      .account(account),
    Operation::call(account, APP_ID, OnCompletion::CloseOut),
    Operation::payment(account, creator(), 0).close_remainder_to(creator()),
  ]))
}
