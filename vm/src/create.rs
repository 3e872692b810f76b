use {
  crate::{
    shape::{
      expect_application,
      expect_call,
      expect_payment,
      expect_size,
      key_argument,
    },
    Context,
    Error,
    Violation,
  },
  keysig_primitives::{Address, OnCompletion, OperationGroup, ToBase58String},
  tracing::{debug, warn},
};

/// Decides whether a group legitimately binds a key to its derived
/// account. `Ok(())` approves the group.
///
/// The group must have exactly this layout:
///
///   0. seed: payment of the seed amount from a funding authority to the
///      derived account.
///   1. optin: the derived account opts into the application, passing
///      the key as the only argument.
///   2. rekey: zero payment from the derived account that delegates its
///      spending authority to the application without closing it.
///
/// The derived account must be the account the key derives to under
/// the deployment's template, otherwise any account could be passed off
/// as the key's account. The first failing condition is reported.
pub fn validate_create(ctx: &Context, group: &OperationGroup) -> Result<(), Error> {
  let result = check(ctx, group);
  match &result {
    Ok(()) => debug!("key creation group {} approved", group.hash().to_b58()),
    Err(e) => warn!("key creation group {} rejected: {e}", group.hash().to_b58()),
  }
  result
}

fn check(ctx: &Context, group: &OperationGroup) -> Result<(), Error> {
  let app = &ctx.application;

  expect_size(group)?;

  // seed the derived account
  let seed = expect_payment(group, 0, "seed")?;
  if !ctx.is_funding_authority(&group[0].sender) {
    return Err(Violation::SeedSender(group[0].sender).into());
  }
  let expected = ctx.version.seed_amount();
  if seed.amount != expected {
    return Err(
      Violation::SeedAmount {
        expected,
        actual: seed.amount,
      }
      .into(),
    );
  }

  // opt the derived account into the app
  let optin = expect_call(group, 1, "optin", OnCompletion::OptIn)?;
  expect_application(optin, "optin", app.id)?;
  let key = key_argument(optin, "optin")?;
  let account = group[1].sender;

  // hand its spending authority over to the app
  let rekey = expect_payment(group, 2, "rekey")?;
  if rekey.amount != 0 {
    return Err(
      Violation::NonZeroAmount {
        role: "rekey",
        actual: rekey.amount,
      }
      .into(),
    );
  }
  if group[2].rekey_to != app.address() {
    return Err(
      Violation::RekeyTarget {
        role: "rekey",
        expected: app.address(),
        actual: group[2].rekey_to,
      }
      .into(),
    );
  }
  if !rekey.close_remainder_to.is_zero() {
    return Err(
      Violation::CloseRemainder {
        role: "rekey",
        expected: Address::ZERO,
        actual: rekey.close_remainder_to,
      }
      .into(),
    );
  }

  // all three operations concern the same account
  if seed.receiver != account {
    return Err(
      Violation::SeedReceiver {
        expected: account,
        actual: seed.receiver,
      }
      .into(),
    );
  }
  if group[2].sender != account {
    return Err(
      Violation::RekeySender {
        expected: account,
        actual: group[2].sender,
      }
      .into(),
    );
  }

  let derived = ctx.derive(&key)?;
  if derived != account {
    return Err(
      Violation::IdentityMismatch {
        key,
        derived,
        claimed: account,
      }
      .into(),
    );
  }

  Ok(())
}
