mod builder;
mod keys;
mod keysig;

pub use {
  builder::GroupBuilder,
  keys::{random_keys, random_keys_with},
  keysig::KeySig,
  keysig_vm::{execute, Context, InMemoryStateStore, ProtocolVersion, State},
};
