use {
  crate::TemplateError,
  serde::{Deserialize, Serialize},
  std::{fmt::Debug, ops::Deref},
};

/// A public identifier that spending authority is bound to.
///
/// Keys are not secret, anyone can compute the account a key derives
/// to. They are arbitrary byte strings, usually short ASCII names.
/// Deduplication of keys is left to the caller.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Key(Vec<u8>);

impl Key {
  /// Largest byte string the host ledger will accept as a single
  /// program constant or call argument.
  pub const MAX_LEN: usize = 4096;

  pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TemplateError> {
    let bytes = bytes.into();
    if bytes.len() > Self::MAX_LEN {
      return Err(TemplateError::KeyTooLarge {
        len: bytes.len(),
        max: Self::MAX_LEN,
      });
    }
    Ok(Self(bytes))
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.0
  }
}

impl Deref for Key {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<[u8]> for Key {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Debug for Key {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match std::str::from_utf8(&self.0) {
      Ok(s) if s.chars().all(|c| c.is_ascii_graphic()) => {
        write!(f, "key({s})")
      }
      _ => write!(f, "key(0x{})", hex::encode(&self.0)),
    }
  }
}

impl TryFrom<Vec<u8>> for Key {
  type Error = TemplateError;

  fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl TryFrom<&[u8]> for Key {
  type Error = TemplateError;

  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    Self::new(value)
  }
}

impl TryFrom<&str> for Key {
  type Error = TemplateError;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    Self::new(value.as_bytes())
  }
}

impl From<Key> for Vec<u8> {
  fn from(key: Key) -> Self {
    key.0
  }
}

#[cfg(test)]
mod tests {
  use {super::Key, crate::TemplateError};

  #[test]
  fn accepts_up_to_max_len() -> anyhow::Result<()> {
    assert_eq!(Key::new(vec![7u8; Key::MAX_LEN])?.len(), Key::MAX_LEN);
    assert!(Key::new(Vec::new())?.is_empty());
    assert!(matches!(
      Key::new(vec![7u8; Key::MAX_LEN + 1]),
      Err(TemplateError::KeyTooLarge { len, max })
        if len == Key::MAX_LEN + 1 && max == Key::MAX_LEN
    ));
    Ok(())
  }

  #[test]
  fn debug_output() -> anyhow::Result<()> {
    assert_eq!(format!("{:?}", Key::try_from("abcdefghij")?), "key(abcdefghij)");
    assert_eq!(format!("{:?}", Key::new(vec![0u8, 255])?), "key(0x00ff)");
    Ok(())
  }
}
