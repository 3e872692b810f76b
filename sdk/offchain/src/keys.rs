use {
  keysig_primitives::{Key, TemplateError},
  rand::Rng,
};

/// Generates `count` keys of `len` random lowercase ASCII letters.
///
/// Keys are not deduplicated, with short lengths collisions between
/// generated keys are possible.
pub fn random_keys(count: usize, len: usize) -> Result<Vec<Key>, TemplateError> {
  random_keys_with(&mut rand::thread_rng(), count, len)
}

/// Same as [`random_keys`] with a caller supplied source of randomness.
pub fn random_keys_with(
  rng: &mut impl Rng,
  count: usize,
  len: usize,
) -> Result<Vec<Key>, TemplateError> {
  (0..count)
    .map(|_| {
      Key::new(
        (0..len)
          .map(|_| rng.gen_range(b'a'..=b'z'))
          .collect::<Vec<u8>>(),
      )
    })
    .collect()
}
