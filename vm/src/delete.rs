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
  keysig_primitives::{
    Address,
    OnCompletion,
    Operation,
    OperationGroup,
    ToBase58String,
  },
  serde::{Deserialize, Serialize},
  tracing::{debug, warn},
};

/// An operation the application issues on its own as a consequence of
/// approving a group. It is part of the group's atomic unit: if it
/// cannot be applied, none of the group's operations take effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesizedOperation {
  /// Index of the application call in the group that produced it.
  pub trigger: usize,

  /// The authority the operation is issued under. This is the control
  /// address of the application, which the sender has delegated to.
  pub authorizer: Address,

  pub operation: Operation,
}

/// Decides whether a group legitimately revokes the authority bound to
/// a key and returns its funds to the application creator.
///
/// The group must have exactly this layout:
///
///   0. trigger: the application creator calls the application with the
///      key as the only argument and the derived account attached as the
///      first account reference.
///   1. closeout: the derived account closes out of the application.
///   2. closeto: zero payment from the derived account to the creator
///      that closes the account and sweeps its balance to the creator.
///
/// On approval, protocol versions that hand delegation back return the
/// zero payment the application issues for the attached account that
/// delegates it back to itself.
pub fn validate_delete(
  ctx: &Context,
  group: &OperationGroup,
) -> Result<Option<SynthesizedOperation>, Error> {
  let result = check(ctx, group).and_then(|()| synthesize(ctx, group));
  match &result {
    Ok(synth) => debug!(
      "key deletion group {} approved, synthesized: {synth:?}",
      group.hash().to_b58()
    ),
    Err(e) => warn!("key deletion group {} rejected: {e}", group.hash().to_b58()),
  }
  result
}

fn check(ctx: &Context, group: &OperationGroup) -> Result<(), Error> {
  let app = &ctx.application;

  expect_size(group)?;

  // creator triggers the deletion
  let trigger = expect_call(group, 0, "trigger", OnCompletion::NoOp)?;
  expect_application(trigger, "trigger", app.id)?;
  if group[0].sender != app.creator {
    return Err(
      Violation::TriggerSender {
        expected: app.creator,
        actual: group[0].sender,
      }
      .into(),
    );
  }
  let key = key_argument(trigger, "trigger")?;

  // derived account leaves the app
  let closeout = expect_call(group, 1, "closeout", OnCompletion::CloseOut)?;
  expect_application(closeout, "closeout", app.id)?;

  // and sends everything it has left to the creator
  let closeto = expect_payment(group, 2, "closeto")?;
  if closeto.amount != 0 {
    return Err(
      Violation::NonZeroAmount {
        role: "closeto",
        actual: closeto.amount,
      }
      .into(),
    );
  }
  if closeto.close_remainder_to != app.creator {
    return Err(
      Violation::CloseRemainder {
        role: "closeto",
        expected: app.creator,
        actual: closeto.close_remainder_to,
      }
      .into(),
    );
  }
  if !group[2].rekey_to.is_zero() {
    return Err(
      Violation::RekeyTarget {
        role: "closeto",
        expected: Address::ZERO,
        actual: group[2].rekey_to,
      }
      .into(),
    );
  }
  if group[1].sender != group[2].sender {
    return Err(
      Violation::CloseOutSender {
        closeout: group[1].sender,
        closeto: group[2].sender,
      }
      .into(),
    );
  }
  if closeto.receiver != group[0].sender {
    return Err(
      Violation::CloseToReceiver {
        expected: group[0].sender,
        actual: closeto.receiver,
      }
      .into(),
    );
  }

  let account = group[2].sender;
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

fn synthesize(
  ctx: &Context,
  group: &OperationGroup,
) -> Result<Option<SynthesizedOperation>, Error> {
  if !ctx.version.rekeys_back_on_delete() {
    return Ok(None);
  }

  let target = group[0].account_ref(1).ok_or_else(|| {
    Error::SynthesisFailure(
      "trigger has no account attached to hand delegation back to".into(),
    )
  })?;

  Ok(Some(SynthesizedOperation {
    trigger: 0,
    authorizer: ctx.application.address(),
    operation: Operation::payment(target, target, 0).rekey_to(target),
  }))
}
