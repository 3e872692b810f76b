use {
  keysig_primitives::{
    Address,
    Key,
    OnCompletion,
    Operation,
    OperationGroup,
    TemplateError,
    ToBase58String,
  },
  keysig_vm::Context,
  tracing::debug,
};

/// Assembles the operation groups that move a key through its
/// lifecycle under a controlling application.
///
/// The groups produced here are exactly the shapes the application
/// approves. Signing and submission are left to the caller.
pub struct GroupBuilder<'c> {
  ctx: &'c Context,
  funder: Address,
}

impl<'c> GroupBuilder<'c> {
  /// Builder where the application creator funds new accounts.
  pub fn new(ctx: &'c Context) -> Self {
    Self {
      ctx,
      funder: ctx.application.creator,
    }
  }

  /// Funds new accounts from another recognized funding authority.
  pub fn funded_by(mut self, funder: Address) -> Self {
    self.funder = funder;
    self
  }

  /// Seeds the account of the key, opts it into the application and
  /// delegates its spending authority to the application.
  pub fn create(&self, key: &Key) -> Result<OperationGroup, TemplateError> {
    let account = self.ctx.derive(key)?;
    let app = &self.ctx.application;

    let group = OperationGroup::new(vec![
      Operation::payment(self.funder, account, self.ctx.version.seed_amount()),
      Operation::call(account, app.id, OnCompletion::OptIn).arg(key.as_bytes()),
      Operation::payment(account, account, 0).rekey_to(app.address()),
    ]);

    debug!(
      "built create group {} for {key:?} at {account}",
      group.hash().to_b58()
    );
    Ok(group)
  }

  /// Revokes the key: the creator triggers the application, the account
  /// leaves the application and its balance is closed out to the creator.
  pub fn delete(&self, key: &Key) -> Result<OperationGroup, TemplateError> {
    let account = self.ctx.derive(key)?;
    let app = &self.ctx.application;

    let group = OperationGroup::new(vec![
      Operation::call(app.creator, app.id, OnCompletion::NoOp)
        .arg(key.as_bytes())
        .account(account),
      Operation::call(account, app.id, OnCompletion::CloseOut),
      Operation::payment(account, app.creator, 0)
        .close_remainder_to(app.creator),
    ]);

    debug!(
      "built delete group {} for {key:?} at {account}",
      group.hash().to_b58()
    );
    Ok(group)
  }
}

#[cfg(test)]
mod tests {
  use {
    super::GroupBuilder,
    keysig_primitives::{
      Address,
      ControllingApplication,
      Key,
      ProgramTemplate,
      TemplateError,
    },
    keysig_vm::{
      validate_create,
      validate_delete,
      Context,
      Error,
      ProtocolVersion,
      Violation,
    },
  };

  fn context() -> anyhow::Result<Context> {
    Ok(Context::new(
      ControllingApplication::new(7, Address::from_bytes([1; 32])),
      ProgramTemplate::new(vec![0x05, 0x80, 0x00, 0x48, 0x81, 0x01, 0x43], 2, 1)?,
    ))
  }

  #[test]
  fn built_groups_are_approved() -> anyhow::Result<()> {
    let key = Key::try_from("abcdefghij")?;
    for version in [ProtocolVersion::V1, ProtocolVersion::V2] {
      let ctx = context()?.with_version(version);
      let builder = GroupBuilder::new(&ctx);

      validate_create(&ctx, &builder.create(&key)?)?;
      let synthesized = validate_delete(&ctx, &builder.delete(&key)?)?;
      assert_eq!(synthesized.is_some(), version.rekeys_back_on_delete());
    }
    Ok(())
  }

  #[test]
  fn funding_authority_must_be_recognized() -> anyhow::Result<()> {
    let key = Key::try_from("abcdefghij")?;
    let funder = Address::from_bytes([2; 32]);

    let ctx = context()?;
    let create = GroupBuilder::new(&ctx).funded_by(funder).create(&key)?;
    assert_eq!(
      validate_create(&ctx, &create),
      Err(Error::Predicate(Violation::SeedSender(funder)))
    );

    let ctx = context()?.with_funder(funder);
    let create = GroupBuilder::new(&ctx).funded_by(funder).create(&key)?;
    assert_eq!(validate_create(&ctx, &create), Ok(()));
    Ok(())
  }

  #[test]
  fn oversized_key_is_refused() -> anyhow::Result<()> {
    let ctx = context()?;
    let key = Key::new(vec![b'k'; 1000])?;
    assert!(matches!(
      GroupBuilder::new(&ctx).create(&key),
      Err(TemplateError::KeyTooLarge { len: 1000, .. })
    ));
    Ok(())
  }
}
