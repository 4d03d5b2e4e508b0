//! Filename generation for incoming images.
//!
//! Names combine the local wall-clock minute with six random base36
//! characters, so concurrent webhook calls in the same minute do not collide
//! without any serialization between them.

use chrono::NaiveDateTime;
use rand::Rng;
use weddingwall_types::image::{ImageName, NAME_SUFFIX_LEN};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base36 suffix.
pub fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..NAME_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}

/// Generate a fresh image name for the given local time.
pub fn generate_image_name(now: NaiveDateTime) -> ImageName {
    let suffix = random_suffix();
    ImageName::from_parts(now, &suffix)
        .unwrap_or_else(|_| unreachable!("base36 suffix of fixed length is always valid"))
}

/// Generate a name stamped with the current local time.
pub fn generate_image_name_now() -> ImageName {
    generate_image_name(chrono::Local::now().naive_local())
}
