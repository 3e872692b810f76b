use {
  crate::{evaluate, AccountState, Context, Error, State, StateDiff},
  keysig_primitives::{
    Address,
    Body,
    OnCompletion,
    Operation,
    OperationGroup,
    ToBase58String,
  },
  thiserror::Error,
  tracing::{info, warn},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
  #[error("Rejected by the application: {0}")]
  Rejected(#[from] Error),

  #[error("Account {0} does not exist")]
  AccountDoesNotExist(Address),

  #[error("Account {account} has {balance} and cannot pay {amount}")]
  InsufficientFunds {
    account: Address,
    balance: u64,
    amount: u64,
  },

  #[error("Account {account} is already opted into application {application}")]
  AlreadyOptedIn { account: Address, application: u64 },

  #[error("Account {account} is not opted into application {application}")]
  NotOptedIn { account: Address, application: u64 },

  #[error("Account {account} cannot be closed while opted into applications")]
  StillOptedIn { account: Address },

  #[error("{authorizer} is not authorized to spend from {account}")]
  Unauthorized { account: Address, authorizer: Address },

  #[error("Account {account} has {balance} and cannot receive {amount}")]
  BalanceOverflow {
    account: Address,
    balance: u64,
    amount: u64,
  },
}

/// Executes a group against the current state the way the ledger does,
/// without submitting anything.
///
/// The approval logic of the application is run for every application
/// call in the group first, then all operations are applied in order.
/// Operations synthesized by the application are applied right after
/// the call that produced them. Group operations are signed by their
/// sender, so a sender that delegated its authority elsewhere cannot
/// issue them. The resulting diff can be applied to
/// the state if and only if every step succeeded, otherwise nothing
/// of the group takes effect.
pub fn execute(
  ctx: &Context,
  group: &OperationGroup,
  state: &impl State,
) -> Result<StateDiff, ExecutionError> {
  let result = try_execute(ctx, group, state);
  match &result {
    Ok(diff) => info!(
      "group {} executed with {} account mutations",
      group.hash().to_b58(),
      diff.iter().count()
    ),
    Err(e) => warn!("group {} failed: {e}", group.hash().to_b58()),
  }
  result
}

fn try_execute(
  ctx: &Context,
  group: &OperationGroup,
  state: &impl State,
) -> Result<StateDiff, ExecutionError> {
  let synthesized = evaluate(ctx, group)?;

  let mut scratch = Scratch {
    base: state,
    diff: StateDiff::default(),
  };

  for (index, op) in group.iter().enumerate() {
    scratch.authorize(op, &op.sender)?;
    scratch.apply(op)?;
    for synth in synthesized.iter().filter(|s| s.trigger == index) {
      scratch.authorize(&synth.operation, &synth.authorizer)?;
      scratch.apply(&synth.operation)?;
    }
  }

  Ok(scratch.diff)
}

/// State changes accumulated so far on top of a read-only base.
struct Scratch<'s, S: State> {
  base: &'s S,
  diff: StateDiff,
}

impl<'s, S: State> Scratch<'s, S> {
  fn get(&self, address: &Address) -> Option<AccountState> {
    match self.diff.lookup(address) {
      Some(account) => account.cloned(),
      None => self.base.get(address),
    }
  }

  fn existing(&self, address: &Address) -> Result<AccountState, ExecutionError> {
    self
      .get(address)
      .ok_or(ExecutionError::AccountDoesNotExist(*address))
  }

  /// The spending authority of an account is its delegate when it has
  /// one and the account itself otherwise. Only that authority may issue
  /// operations on its behalf.
  fn authorize(
    &self,
    op: &Operation,
    authorizer: &Address,
  ) -> Result<(), ExecutionError> {
    let authority = self.existing(&op.sender)?.delegate.unwrap_or(op.sender);
    if authority != *authorizer {
      return Err(ExecutionError::Unauthorized {
        account: op.sender,
        authorizer: *authorizer,
      });
    }
    Ok(())
  }

  fn apply(&mut self, op: &Operation) -> Result<(), ExecutionError> {
    let mut sender = self.existing(&op.sender)?;

    match &op.body {
      Body::Payment(payment) => {
        if sender.balance < payment.amount {
          return Err(ExecutionError::InsufficientFunds {
            account: op.sender,
            balance: sender.balance,
            amount: payment.amount,
          });
        }
        sender.balance -= payment.amount;
        self.diff.set(op.sender, sender);
        self.credit(&payment.receiver, payment.amount)?;

        if !payment.close_remainder_to.is_zero() {
          return self.close(&op.sender, &payment.close_remainder_to);
        }
      }
      Body::ApplicationCall(call) => {
        let application = call.application_id;
        match call.on_completion {
          OnCompletion::OptIn => {
            if !sender.applications.insert(application) {
              return Err(ExecutionError::AlreadyOptedIn {
                account: op.sender,
                application,
              });
            }
          }
          OnCompletion::CloseOut | OnCompletion::ClearState => {
            if !sender.applications.remove(&application) {
              return Err(ExecutionError::NotOptedIn {
                account: op.sender,
                application,
              });
            }
          }
          OnCompletion::NoOp
          | OnCompletion::UpdateApplication
          | OnCompletion::DeleteApplication => {}
        }
        self.diff.set(op.sender, sender);
      }
    }

    if !op.rekey_to.is_zero() {
      let mut sender = self.existing(&op.sender)?;
      sender.delegate = (op.rekey_to != op.sender).then_some(op.rekey_to);
      self.diff.set(op.sender, sender);
    }

    Ok(())
  }

  fn credit(
    &mut self,
    address: &Address,
    amount: u64,
  ) -> Result<(), ExecutionError> {
    let mut account = self.get(address).unwrap_or_default();
    account.balance = account.balance.checked_add(amount).ok_or(
      ExecutionError::BalanceOverflow {
        account: *address,
        balance: account.balance,
        amount,
      },
    )?;
    self.diff.set(*address, account);
    Ok(())
  }

  fn close(
    &mut self,
    address: &Address,
    remainder_to: &Address,
  ) -> Result<(), ExecutionError> {
    let account = self.existing(address)?;
    if !account.applications.is_empty() {
      return Err(ExecutionError::StillOptedIn { account: *address });
    }
    self.diff.remove(address);
    self.credit(remainder_to, account.balance)
  }
}
