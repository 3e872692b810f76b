mod address;
mod application;
mod b58;
mod group;
mod key;
mod operation;
mod template;

pub use {
  address::Address,
  application::ControllingApplication,
  b58::ToBase58String,
  group::OperationGroup,
  key::Key,
  operation::{
    ApplicationCall,
    Body,
    OnCompletion,
    Operation,
    OperationKind,
    Payment,
  },
  template::{
    derive,
    CompiledProgram,
    Compiler,
    ProgramTemplate,
    TemplateError,
    TemplateLabel,
    KEY_LABEL,
    MAX_PROGRAM_LEN,
  },
};
