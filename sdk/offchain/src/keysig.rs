use {
  keysig_primitives::{
    Address,
    CompiledProgram,
    Compiler,
    Key,
    ProgramTemplate,
    TemplateError,
    KEY_LABEL,
  },
  serde::{Deserialize, Serialize},
};

/// Client side view of the key signature program.
///
/// Knows the assembled template and nothing else, which is enough to
/// tell anyone holding a key which account it controls without talking
/// to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySig {
  template: ProgramTemplate,
}

impl KeySig {
  pub fn new(template: ProgramTemplate) -> Self {
    Self { template }
  }

  /// Loads the template from the source map that the assembler emits
  /// alongside the bytecode.
  pub fn from_source_map(json: &str) -> Result<Self, TemplateError> {
    let compiled = CompiledProgram::from_source_map(json)?;
    Ok(Self::new(ProgramTemplate::from_compiled(compiled, KEY_LABEL)?))
  }

  pub fn compile(
    compiler: &impl Compiler,
    source: &str,
  ) -> Result<Self, TemplateError> {
    Ok(Self::new(ProgramTemplate::compile(compiler, source)?))
  }

  pub fn template(&self) -> &ProgramTemplate {
    &self.template
  }

  pub fn into_template(self) -> ProgramTemplate {
    self.template
  }

  /// The program bytes that spend from the account of this key.
  pub fn populate(&self, key: &Key) -> Result<Vec<u8>, TemplateError> {
    self.template.populate(key)
  }

  /// The account controlled by the program populated with this key.
  pub fn address(&self, key: &Key) -> Result<Address, TemplateError> {
    self.template.derive(key)
  }
}

impl From<ProgramTemplate> for KeySig {
  fn from(template: ProgramTemplate) -> Self {
    Self::new(template)
  }
}

#[cfg(test)]
mod tests {
  use {
    super::KeySig,
    keysig_primitives::{
      Address,
      CompiledProgram,
      Compiler,
      Key,
      TemplateError,
      TemplateLabel,
    },
    std::collections::BTreeMap,
  };

  const SOURCE_MAP: &str = r#"{
    "bytecode": "BYAASIEBQw==",
    "template_labels": { "TMPL_KEY": { "position": 2 } }
  }"#;

  #[test]
  fn address_of_known_key() -> anyhow::Result<()> {
    let keysig = KeySig::from_source_map(SOURCE_MAP)?;
    let key = Key::try_from("abcdefghij")?;

    let program = keysig.populate(&key)?;
    assert_eq!(program.len(), 17);
    assert_eq!(program[2], 10);
    assert_eq!(&program[3..13], b"abcdefghij");

    let expected: [u8; 32] = [
      0x27, 0x76, 0x87, 0xf9, 0x7c, 0x73, 0x4c, 0x11, 0x3d, 0xd4, 0x10, 0xf8,
      0x18, 0x3e, 0xe6, 0xd7, 0xdd, 0xd2, 0x72, 0xff, 0x20, 0xd8, 0x03, 0xd6,
      0x0d, 0xf5, 0xb9, 0x83, 0x95, 0xf3, 0x4c, 0x7d,
    ];
    assert_eq!(keysig.address(&key)?, Address::from_bytes(expected));
    Ok(())
  }

  #[test]
  fn source_map_without_key_label() {
    let json = r#"{ "bytecode": "BYAASIEBQw==" }"#;
    assert_eq!(
      KeySig::from_source_map(json),
      Err(TemplateError::MissingLabel("TMPL_KEY".into()))
    );
  }

  #[derive(Debug, thiserror::Error)]
  #[error("assembler is offline")]
  struct Offline;

  struct OfflineAssembler;

  impl Compiler for OfflineAssembler {
    type Error = Offline;

    fn compile(&self, _: &str) -> Result<CompiledProgram, Self::Error> {
      Err(Offline)
    }
  }

  struct Prebuilt;

  impl Compiler for Prebuilt {
    type Error = Offline;

    fn compile(&self, _: &str) -> Result<CompiledProgram, Self::Error> {
      let mut labels = BTreeMap::new();
      labels.insert("TMPL_KEY".to_owned(), TemplateLabel {
        position: 2,
        width: 1,
      });
      Ok(CompiledProgram {
        bytecode: vec![0x05, 0x80, 0x00, 0x48, 0x81, 0x01, 0x43],
        labels,
      })
    }
  }

  #[test]
  fn compiles_through_assembler() -> anyhow::Result<()> {
    assert_eq!(
      KeySig::compile(&OfflineAssembler, "pushbytes TMPL_KEY"),
      Err(TemplateError::Compilation("assembler is offline".into()))
    );

    let compiled = KeySig::compile(&Prebuilt, "pushbytes TMPL_KEY")?;
    assert_eq!(compiled, KeySig::from_source_map(SOURCE_MAP)?);
    Ok(())
  }
}
