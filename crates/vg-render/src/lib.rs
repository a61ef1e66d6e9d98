pub mod hit;

pub use hit::{Hit, HitKind, HitOptions, hit_test};
