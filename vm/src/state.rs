use {
  keysig_primitives::Address,
  serde::{Deserialize, Serialize},
  std::collections::{BTreeMap, BTreeSet, HashMap},
};

/// Ledger view of a single account, limited to what key lifecycle
/// transitions touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
  pub balance: u64,

  /// The address whose authority spends from this account, when it
  /// is not the account itself.
  pub delegate: Option<Address>,

  /// Applications this account is opted into.
  pub applications: BTreeSet<u64>,
}

impl AccountState {
  pub fn with_balance(balance: u64) -> Self {
    Self {
      balance,
      ..Default::default()
    }
  }

  /// True when the account is opted into the application and has its
  /// spending authority delegated to the application's address.
  pub fn is_active(&self, application: u64, control: &Address) -> bool {
    self.applications.contains(&application)
      && self.delegate.as_ref() == Some(control)
  }
}

/// Represents a change in accounts state.
///
/// A group produces a state diff. Applying two diffs consecutively is
/// equivalent to applying their merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
  upserts: BTreeMap<Address, AccountState>,
  deletes: BTreeSet<Address>,
}

impl StateDiff {
  /// Inserts or updates an account under a given address.
  ///
  /// If the state diff had an account stored under this address
  /// then the old value is returned, otherwise `None` is returned.
  pub fn set(
    &mut self,
    address: Address,
    account: AccountState,
  ) -> Option<AccountState> {
    self.deletes.remove(&address);
    self.upserts.insert(address, account)
  }

  /// Removes an account under a given address.
  ///
  /// If the state diff contained an account at the given address
  /// then the removed value is returned, otherwise `None`.
  pub fn remove(&mut self, address: &Address) -> Option<AccountState> {
    self.deletes.insert(*address);
    self.upserts.remove(address)
  }

  /// Merges a state diff with a newer diff.
  pub fn merge(self, newer: StateDiff) -> StateDiff {
    let mut upserts = self.upserts;
    let mut deletes = self.deletes;
    for (addr, acc) in newer.upserts {
      deletes.remove(&addr);
      upserts.insert(addr, acc);
    }
    for addr in newer.deletes {
      upserts.remove(&addr);
      deletes.insert(addr);
    }
    StateDiff { upserts, deletes }
  }

  /// What this diff says about an address: `Some(Some(_))` when the
  /// account is written, `Some(None)` when it is deleted and `None`
  /// when the diff does not touch it.
  pub fn lookup(&self, address: &Address) -> Option<Option<&AccountState>> {
    if self.deletes.contains(address) {
      return Some(None);
    }
    self.upserts.get(address).map(Some)
  }

  pub fn is_empty(&self) -> bool {
    self.upserts.is_empty() && self.deletes.is_empty()
  }

  /// Iterate over all account changes in a state diff.
  ///
  /// There are two variants of changes:
  ///   1. (Address, Some(AccountState)) => account under a given address
  ///      was created or changed.
  ///   2. (Address, None) => account under a given address was deleted.
  pub fn iter(
    &self,
  ) -> impl Iterator<Item = (&Address, Option<&AccountState>)> {
    self
      .upserts
      .iter()
      .map(|(addr, acc)| (addr, Some(acc)))
      .chain(self.deletes.iter().map(|addr| (addr, None)))
  }
}

impl State for StateDiff {
  fn get(&self, address: &Address) -> Option<AccountState> {
    self.lookup(address).flatten().cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    *self = std::mem::take(self).merge(diff);
  }
}

pub trait State {
  fn get(&self, address: &Address) -> Option<AccountState>;
  fn apply(&mut self, diff: StateDiff);
}

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
  data: HashMap<Address, AccountState>,
}

impl InMemoryStateStore {
  pub fn iter(&self) -> impl Iterator<Item = (&Address, &AccountState)> {
    self.data.iter()
  }
}

impl State for InMemoryStateStore {
  fn get(&self, address: &Address) -> Option<AccountState> {
    self.data.get(address).cloned()
  }

  fn apply(&mut self, diff: StateDiff) {
    for (k, v) in diff.upserts {
      self.data.insert(k, v);
    }

    for addr in diff.deletes {
      self.data.remove(&addr);
    }
  }
}

#[cfg(test)]
mod tests {
  use {
    super::{AccountState, InMemoryStateStore, State, StateDiff},
    keysig_primitives::Address,
  };

  #[test]
  fn statediff_smoke() {
    let addr1 = Address::from_bytes([1; 32]);
    let addr2 = Address::from_bytes([2; 32]);
    let mut store = InMemoryStateStore::default();

    assert_eq!(store.iter().count(), 0);

    let mut diff1 = StateDiff::default();
    diff1.set(addr1, AccountState::with_balance(10));
    diff1.set(addr2, AccountState::with_balance(20));

    store.apply(diff1);

    assert_eq!(store.iter().count(), 2);
    assert_eq!(store.get(&addr1).unwrap().balance, 10);
    assert_eq!(store.get(&addr2).unwrap().balance, 20);

    let mut diff2 = StateDiff::default();
    diff2.remove(&addr1);

    store.apply(diff2);

    assert_eq!(store.iter().count(), 1);
    assert!(store.get(&addr1).is_none());
  }

  #[test]
  fn merge_keeps_latest_change() {
    let addr = Address::from_bytes([1; 32]);

    let mut older = StateDiff::default();
    older.set(addr, AccountState::with_balance(1));
    let mut newer = StateDiff::default();
    newer.remove(&addr);

    let merged = older.clone().merge(newer.clone());
    assert_eq!(merged.lookup(&addr), Some(None));
    assert!(merged.get(&addr).is_none());

    let mut revived = StateDiff::default();
    revived.set(addr, AccountState::with_balance(3));
    let merged = merged.merge(revived);
    assert_eq!(merged.get(&addr).map(|a| a.balance), Some(3));
    assert_eq!(merged.iter().count(), 1);

    assert!(StateDiff::default().is_empty());
    assert_eq!(StateDiff::default().lookup(&addr), None);
  }

  #[test]
  fn active_requires_membership_and_delegation() {
    let control = Address::for_application(5);
    let mut account = AccountState::with_balance(1);
    assert!(!account.is_active(5, &control));

    account.applications.insert(5);
    assert!(!account.is_active(5, &control));

    account.delegate = Some(control);
    assert!(account.is_active(5, &control));
    assert!(!account.is_active(6, &control));
  }
}
