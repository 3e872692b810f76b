use {
  keysig_primitives::{
    Address,
    ControllingApplication,
    Key,
    ProgramTemplate,
    TemplateError,
  },
  serde::{Deserialize, Serialize},
  std::collections::BTreeSet,
};

/// Revision of the key lifecycle rules.
///
/// Revisions differ in the amount a new derived account is seeded
/// with and in whether deleting a key hands its delegation back
/// before the account is closed.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum ProtocolVersion {
  V1,
  #[default]
  V2,
}

impl ProtocolVersion {
  pub const LATEST: Self = Self::V2;

  /// Exact amount the funding payment of a creation group must carry.
  ///
  /// Covers the base reserve of the account, the reserve of its
  /// application membership and a small buffer for its own operations.
  pub fn seed_amount(&self) -> u64 {
    match self {
      Self::V1 => 1_000_500,
      Self::V2 => 1_005_000,
    }
  }

  /// Newest program language version the deployment runs. Key
  /// templates assembled for a later version are refused.
  pub fn program_version(&self) -> u8 {
    match self {
      Self::V1 => 5,
      Self::V2 => 6,
    }
  }

  /// Whether an approved deletion emits the operation that delegates
  /// the derived account back to itself.
  pub fn rekeys_back_on_delete(&self) -> bool {
    match self {
      Self::V1 => false,
      Self::V2 => true,
    }
  }
}

/// Everything the validator needs to know about the deployment it
/// guards. Passed explicitly into every call, there is no ambient
/// client or session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
  pub application: ControllingApplication,
  pub template: ProgramTemplate,

  #[serde(default)]
  pub version: ProtocolVersion,

  /// Accounts besides the application creator that may seed new
  /// derived accounts.
  #[serde(default)]
  pub funders: BTreeSet<Address>,
}

impl Context {
  pub fn new(
    application: ControllingApplication,
    template: ProgramTemplate,
  ) -> Self {
    Self {
      application,
      template,
      version: ProtocolVersion::default(),
      funders: BTreeSet::new(),
    }
  }

  pub fn with_version(mut self, version: ProtocolVersion) -> Self {
    self.version = version;
    self
  }

  pub fn with_funder(mut self, funder: Address) -> Self {
    self.funders.insert(funder);
    self
  }

  pub fn is_funding_authority(&self, address: &Address) -> bool {
    *address == self.application.creator || self.funders.contains(address)
  }

  /// Verifies that the key template targets a program language version
  /// this deployment runs.
  pub fn check_template(&self) -> Result<(), TemplateError> {
    let max = u64::from(self.version.program_version());
    match self.template.language_version() {
      Some(version) if version <= max => Ok(()),
      Some(version) => Err(TemplateError::UnsupportedVersion { version, max }),
      None => Err(TemplateError::Bytecode(
        "program does not start with a language version".into(),
      )),
    }
  }

  /// Address of the account the key derives to under this deployment's
  /// program template.
  pub fn derive(&self, key: &Key) -> Result<Address, TemplateError> {
    self.check_template()?;
    self.template.derive(key)
  }
}
