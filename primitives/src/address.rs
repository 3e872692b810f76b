use {
  serde::{Deserialize, Serialize},
  sha2::{Digest, Sha512_256},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
};

/// Domain separation tag for addresses of executable programs.
const PROGRAM_PREFIX: &[u8] = b"Program";

/// Domain separation tag for application control addresses.
const APPLICATION_PREFIX: &[u8] = b"appID";

/// Represents an address of an account on the host ledger.
///
/// The same address could either represent a user wallet that
/// has a corresponding private key (externally owned), an account
/// controlled by a program (its address is the hash of the program
/// bytes) or the control address of an application.
///
/// Program accounts have no private key. Whoever presents the program
/// bytes that hash to the address may sign for it, so the address of
/// a program is a commitment to its exact contents.
#[derive(
  Copy,
  Clone,
  Default,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
  /// The null address. Used in operation fields that are "not set",
  /// like delegate-to or close-remainder-to.
  pub const ZERO: Address = Address([0u8; 32]);

  pub const fn from_bytes(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }

  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.0
  }

  pub fn is_zero(&self) -> bool {
    *self == Self::ZERO
  }

  /// Computes the address of an account controlled by the given
  /// program bytes.
  ///
  /// The program is hashed together with a fixed prefix so that
  /// program addresses never collide with hashes computed for other
  /// purposes on the ledger.
  pub fn for_program(program: &[u8]) -> Self {
    Self::hashed(&[PROGRAM_PREFIX, program])
  }

  /// Computes the control address of an application with a given id.
  ///
  /// This is the address that accounts delegate their spending
  /// authority to when they are managed by the application.
  pub fn for_application(id: u64) -> Self {
    Self::hashed(&[APPLICATION_PREFIX, &id.to_be_bytes()])
  }

  fn hashed(parts: &[&[u8]]) -> Self {
    let mut hasher = Sha512_256::new();
    for part in parts {
      hasher.update(part);
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Self(bytes)
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for Address {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", bs58::encode(self.0).into_string())
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "address({})", bs58::encode(self.0).into_string())
  }
}

impl From<Address> for String {
  fn from(addr: Address) -> Self {
    bs58::encode(addr.0).into_string()
  }
}

impl From<[u8; 32]> for Address {
  fn from(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }
}

impl FromStr for Address {
  type Err = bs58::decode::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut bytes = [0u8; 32];
    let len = bs58::decode(s).into(&mut bytes)?;
    if len != bytes.len() {
      return Err(bs58::decode::Error::BufferTooSmall);
    }
    Ok(Self(bytes))
  }
}

impl TryFrom<&str> for Address {
  type Error = bs58::decode::Error;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    FromStr::from_str(value)
  }
}
