use {
  crate::Address,
  serde::{Deserialize, Serialize},
};

/// The stateful application that holds delegated spending authority
/// over derived accounts while they are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControllingApplication {
  pub id: u64,

  /// Account that created the application. It funds new derived
  /// accounts and receives their balances when they are revoked.
  pub creator: Address,
}

impl ControllingApplication {
  pub fn new(id: u64, creator: Address) -> Self {
    Self { id, creator }
  }

  /// Control address of the application, the address derived accounts
  /// delegate to.
  pub fn address(&self) -> Address {
    Address::for_application(self.id)
  }
}
