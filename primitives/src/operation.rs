use {
  crate::Address,
  serde::{Deserialize, Serialize},
};

/// What an application call asks the application to do besides
/// running its approval logic.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum OnCompletion {
  #[default]
  NoOp,
  OptIn,
  CloseOut,
  ClearState,
  UpdateApplication,
  DeleteApplication,
}

/// Coarse classification of an operation, used when checking the shape
/// of a group before looking at individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
  Payment,
  ApplicationCall(OnCompletion),
}

impl std::fmt::Display for OperationKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Payment => write!(f, "payment"),
      Self::ApplicationCall(oc) => write!(f, "application call ({oc:?})"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payment {
  pub receiver: Address,
  pub amount: u64,

  /// When not zero, the sender account is closed after the payment and
  /// all of its remaining balance is swept to this address.
  pub close_remainder_to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationCall {
  /// Zero when the call creates a new application.
  pub application_id: u64,
  pub on_completion: OnCompletion,
  pub args: Vec<Vec<u8>>,

  /// Accounts explicitly attached to the call. When referenced by index,
  /// index 0 is the sender and index `i` is `accounts[i - 1]`.
  pub accounts: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
  Payment(Payment),
  ApplicationCall(ApplicationCall),
}

/// A single operation proposed as a member of an operation group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
  pub sender: Address,

  /// When not zero, the spending authority of the sender is delegated
  /// to this address once the operation is applied. Delegating to the
  /// sender itself revokes any existing delegation.
  pub rekey_to: Address,

  pub body: Body,
}

impl Operation {
  pub fn payment(sender: Address, receiver: Address, amount: u64) -> Self {
    Self {
      sender,
      rekey_to: Address::ZERO,
      body: Body::Payment(Payment {
        receiver,
        amount,
        close_remainder_to: Address::ZERO,
      }),
    }
  }

  pub fn call(
    sender: Address,
    application_id: u64,
    on_completion: OnCompletion,
  ) -> Self {
    Self {
      sender,
      rekey_to: Address::ZERO,
      body: Body::ApplicationCall(ApplicationCall {
        application_id,
        on_completion,
        args: vec![],
        accounts: vec![],
      }),
    }
  }

  pub fn rekey_to(mut self, address: Address) -> Self {
    self.rekey_to = address;
    self
  }

  /// Has no effect on application calls.
  pub fn close_remainder_to(mut self, address: Address) -> Self {
    if let Body::Payment(p) = &mut self.body {
      p.close_remainder_to = address;
    }
    self
  }

  /// Appends a call argument. Has no effect on payments.
  pub fn arg(mut self, arg: impl Into<Vec<u8>>) -> Self {
    if let Body::ApplicationCall(c) = &mut self.body {
      c.args.push(arg.into());
    }
    self
  }

  /// Attaches an account reference. Has no effect on payments.
  pub fn account(mut self, address: Address) -> Self {
    if let Body::ApplicationCall(c) = &mut self.body {
      c.accounts.push(address);
    }
    self
  }

  pub fn kind(&self) -> OperationKind {
    match &self.body {
      Body::Payment(_) => OperationKind::Payment,
      Body::ApplicationCall(c) => OperationKind::ApplicationCall(c.on_completion),
    }
  }

  pub fn as_payment(&self) -> Option<&Payment> {
    match &self.body {
      Body::Payment(p) => Some(p),
      Body::ApplicationCall(_) => None,
    }
  }

  pub fn as_payment_mut(&mut self) -> Option<&mut Payment> {
    match &mut self.body {
      Body::Payment(p) => Some(p),
      Body::ApplicationCall(_) => None,
    }
  }

  pub fn as_call(&self) -> Option<&ApplicationCall> {
    match &self.body {
      Body::ApplicationCall(c) => Some(c),
      Body::Payment(_) => None,
    }
  }

  pub fn as_call_mut(&mut self) -> Option<&mut ApplicationCall> {
    match &mut self.body {
      Body::ApplicationCall(c) => Some(c),
      Body::Payment(_) => None,
    }
  }

  /// Resolves an account reference of an application call, using the
  /// ledger convention where index 0 is the sender.
  pub fn account_ref(&self, index: usize) -> Option<Address> {
    match (index, &self.body) {
      (0, Body::ApplicationCall(_)) => Some(self.sender),
      (i, Body::ApplicationCall(c)) => c.accounts.get(i - 1).copied(),
      (_, Body::Payment(_)) => None,
    }
  }
}
