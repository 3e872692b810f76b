use {
  crate::{Address, Key},
  base64::{engine::general_purpose::STANDARD, Engine},
  serde::{Deserialize, Serialize},
  std::{collections::BTreeMap, fmt::Debug},
  thiserror::Error,
};

/// Name of the placeholder that keys are substituted into.
pub const KEY_LABEL: &str = "TMPL_KEY";

/// Largest program the host ledger accepts as an account's spending
/// logic. Populated templates must fit within this size.
pub const MAX_PROGRAM_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error(
    "Substitution site at offset {offset} with width {width} is out of \
     bounds of a {len} byte template"
  )]
  TemplateMalformed {
    offset: usize,
    width: usize,
    len: usize,
  },

  #[error("Key of length {len} exceeds the maximum of {max} bytes")]
  KeyTooLarge { len: usize, max: usize },

  #[error("Template label '{0}' not found in compiled program")]
  MissingLabel(String),

  #[error("Invalid source map: {0}")]
  SourceMap(String),

  #[error("Invalid base64 bytecode in source map: {0}")]
  Bytecode(String),

  #[error("Program compilation failed: {0}")]
  Compilation(String),

  #[error(
    "Program language version {version} is newer than the supported {max}"
  )]
  UnsupportedVersion { version: u64, max: u64 },
}

/// Location of a named placeholder within assembled bytecode.
///
/// `width` is the number of bytes occupied by the default value of the
/// placeholder. An empty byte string placeholder is assembled as a
/// single zero length prefix, hence the default of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLabel {
  pub position: usize,

  #[serde(default = "default_label_width")]
  pub width: usize,
}

fn default_label_width() -> usize {
  1
}

/// Output of the external program assembler.
#[derive(Clone, PartialEq, Eq)]
pub struct CompiledProgram {
  pub bytecode: Vec<u8>,
  pub labels: BTreeMap<String, TemplateLabel>,
}

impl Debug for CompiledProgram {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompiledProgram")
      .field("bytecode", &"[program-bytecode]")
      .field("labels", &self.labels)
      .finish()
  }
}

#[derive(Deserialize)]
struct SourceMap {
  bytecode: String,
  #[serde(default)]
  template_labels: BTreeMap<String, TemplateLabel>,
}

impl CompiledProgram {
  /// Parses the JSON source map emitted by the assembler:
  ///
  /// ```json
  /// {
  ///   "bytecode": "<base64>",
  ///   "template_labels": { "TMPL_KEY": { "position": 2 } }
  /// }
  /// ```
  pub fn from_source_map(json: &str) -> Result<Self, TemplateError> {
    let map: SourceMap = serde_json::from_str(json)
      .map_err(|e| TemplateError::SourceMap(e.to_string()))?;
    let bytecode = STANDARD
      .decode(map.bytecode.as_bytes())
      .map_err(|e| TemplateError::Bytecode(e.to_string()))?;
    Ok(Self {
      bytecode,
      labels: map.template_labels,
    })
  }
}

/// The assembler boundary. Turns program source into bytecode and
/// reports where template placeholders ended up.
pub trait Compiler {
  type Error: std::error::Error;

  fn compile(&self, source: &str) -> Result<CompiledProgram, Self::Error>;
}

/// Assembled program bytes with one substitution site for a key.
///
/// Bytes outside of the substitution site are never touched, so every
/// populated program shares the same layout apart from the key region.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateParts", into = "TemplateParts")]
pub struct ProgramTemplate {
  bytecode: Vec<u8>,
  offset: usize,
  width: usize,
  max_program_len: usize,
}

#[derive(Clone, Serialize, Deserialize)]
struct TemplateParts {
  bytecode: Vec<u8>,
  offset: usize,
  width: usize,
  #[serde(default = "default_max_program_len")]
  max_program_len: usize,
}

fn default_max_program_len() -> usize {
  MAX_PROGRAM_LEN
}

impl TryFrom<TemplateParts> for ProgramTemplate {
  type Error = TemplateError;

  fn try_from(parts: TemplateParts) -> Result<Self, Self::Error> {
    Ok(
      ProgramTemplate::new(parts.bytecode, parts.offset, parts.width)?
        .with_max_program_len(parts.max_program_len),
    )
  }
}

impl From<ProgramTemplate> for TemplateParts {
  fn from(t: ProgramTemplate) -> Self {
    TemplateParts {
      bytecode: t.bytecode,
      offset: t.offset,
      width: t.width,
      max_program_len: t.max_program_len,
    }
  }
}

impl ProgramTemplate {
  pub fn new(
    bytecode: Vec<u8>,
    offset: usize,
    width: usize,
  ) -> Result<Self, TemplateError> {
    match offset.checked_add(width) {
      Some(end) if end <= bytecode.len() => Ok(Self {
        bytecode,
        offset,
        width,
        max_program_len: MAX_PROGRAM_LEN,
      }),
      _ => Err(TemplateError::TemplateMalformed {
        offset,
        width,
        len: bytecode.len(),
      }),
    }
  }

  /// Overrides the largest populated program size this template
  /// may produce.
  pub fn with_max_program_len(mut self, max: usize) -> Self {
    self.max_program_len = max;
    self
  }

  /// Builds a template from assembler output using the placeholder
  /// with the given label name.
  pub fn from_compiled(
    compiled: CompiledProgram,
    label: &str,
  ) -> Result<Self, TemplateError> {
    let site = compiled
      .labels
      .get(label)
      .copied()
      .ok_or_else(|| TemplateError::MissingLabel(label.into()))?;
    Self::new(compiled.bytecode, site.position, site.width)
  }

  /// Runs the external assembler on the program source and builds a
  /// template around its [`KEY_LABEL`] placeholder.
  pub fn compile(
    compiler: &impl Compiler,
    source: &str,
  ) -> Result<Self, TemplateError> {
    let compiled = compiler
      .compile(source)
      .map_err(|e| TemplateError::Compilation(e.to_string()))?;
    Self::from_compiled(compiled, KEY_LABEL)
  }

  pub fn bytecode(&self) -> &[u8] {
    &self.bytecode
  }

  pub fn offset(&self) -> usize {
    self.offset
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn max_program_len(&self) -> usize {
    self.max_program_len
  }

  /// Language version the program was assembled for, carried as the
  /// leading uvarint of the bytecode. `None` when the bytecode does not
  /// start with one or the substitution site covers it.
  pub fn language_version(&self) -> Option<u64> {
    if self.offset == 0 {
      return None;
    }
    let (version, rest) = unsigned_varint::decode::u64(&self.bytecode).ok()?;
    let header = self.bytecode.len() - rest.len();
    (header <= self.offset).then_some(version)
  }

  /// Longest key that still produces a program within the size limit.
  pub fn max_key_len(&self) -> usize {
    let fixed = self.bytecode.len() - self.width;
    let budget = self.max_program_len.saturating_sub(fixed);
    let mut len = budget.saturating_sub(1).min(Key::MAX_LEN);
    while len > 0 && uvarint_len(len) + len > budget {
      len -= 1;
    }
    len
  }

  /// Substitutes a length-prefixed key into the placeholder and returns
  /// the resulting program bytes.
  pub fn populate(&self, key: &Key) -> Result<Vec<u8>, TemplateError> {
    let malformed = || TemplateError::TemplateMalformed {
      offset: self.offset,
      width: self.width,
      len: self.bytecode.len(),
    };

    let end = self.offset.checked_add(self.width).ok_or_else(malformed)?;
    let before = self.bytecode.get(..self.offset).ok_or_else(malformed)?;
    let after = self.bytecode.get(end..).ok_or_else(malformed)?;

    let mut buf = unsigned_varint::encode::usize_buffer();
    let prefix = unsigned_varint::encode::usize(key.len(), &mut buf);

    let total = before.len() + prefix.len() + key.len() + after.len();
    if total > self.max_program_len {
      return Err(TemplateError::KeyTooLarge {
        len: key.len(),
        max: self.max_key_len(),
      });
    }

    let mut program = Vec::with_capacity(total);
    program.extend_from_slice(before);
    program.extend_from_slice(prefix);
    program.extend_from_slice(key);
    program.extend_from_slice(after);
    Ok(program)
  }

  /// Computes the account that is controlled by this template populated
  /// with the given key.
  pub fn derive(&self, key: &Key) -> Result<Address, TemplateError> {
    Ok(Address::for_program(&self.populate(key)?))
  }
}

/// Computes the address of the account that a key derives to under
/// a program template.
///
/// The mapping is deterministic and one-way, the same (template, key)
/// pair always yields the same address.
pub fn derive(
  template: &ProgramTemplate,
  key: &Key,
) -> Result<Address, TemplateError> {
  template.derive(key)
}

fn uvarint_len(value: usize) -> usize {
  let mut buf = unsigned_varint::encode::usize_buffer();
  unsigned_varint::encode::usize(value, &mut buf).len()
}

impl Debug for ProgramTemplate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProgramTemplate")
      .field("bytecode", &"[program-bytecode]")
      .field("len", &self.bytecode.len())
      .field("offset", &self.offset)
      .field("width", &self.width)
      .finish()
  }
}
