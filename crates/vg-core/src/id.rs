//! Item identity.
//!
//! Named ids are interned: a copy is small and equality is an integer
//! compare. The interner never frees a string, so only ids with a fixed
//! vocabulary go through it. Items created by the importer or the tools get
//! a generated id, which is a plain counter value and costs no interner
//! memory however many documents a session loads.
//!
//! Snapshots store the string (or counter) form, so an id survives an undo
//! round-trip even though the interner itself is never serialized.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static IDS: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);
static NEXT_GENERATED: AtomicU64 = AtomicU64::new(0);

/// Handle of one item in a `SceneGraph`. Every item has one, named or not.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Repr", from = "Repr")]
pub struct NodeId(Inner);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Inner {
    Named(Spur),
    Generated(u64),
}

#[derive(Serialize, Deserialize)]
enum Repr {
    Named(String),
    Generated(u64),
}

impl NodeId {
    pub fn intern(s: &str) -> Self {
        Self(Inner::Named(IDS.get_or_intern(s)))
    }

    /// A process-unique id for an item without an explicit name.
    pub fn anonymous() -> Self {
        Self(Inner::Generated(
            NEXT_GENERATED.fetch_add(1, Ordering::Relaxed),
        ))
    }

    pub fn is_generated(&self) -> bool {
        matches!(self.0, Inner::Generated(_))
    }
}

impl From<NodeId> for Repr {
    fn from(id: NodeId) -> Self {
        match id.0 {
            Inner::Named(spur) => Repr::Named(IDS.resolve(&spur).to_owned()),
            Inner::Generated(n) => Repr::Generated(n),
        }
    }
}

impl From<Repr> for NodeId {
    fn from(repr: Repr) -> Self {
        match repr {
            Repr::Named(s) => NodeId::intern(&s),
            Repr::Generated(n) => {
                // Keep the counter ahead of anything restored from a snapshot.
                NEXT_GENERATED.fetch_max(n + 1, Ordering::Relaxed);
                NodeId(Inner::Generated(n))
            }
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({self})")
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Inner::Named(spur) => f.write_str(IDS.resolve(&spur)),
            Inner::Generated(n) => write!(f, "_anon_{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_same_id() {
        assert_eq!(NodeId::intern("logo_outline"), NodeId::intern("logo_outline"));
        assert_ne!(NodeId::intern("logo_outline"), NodeId::intern("logo_fill"));
        assert_eq!(NodeId::intern("logo_outline").to_string(), "logo_outline");
    }

    #[test]
    fn generated_ids_never_repeat() {
        let a = NodeId::anonymous();
        let b = NodeId::anonymous();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("_anon_"));
    }

    #[test]
    fn generated_ids_stay_out_of_the_interner() {
        let ids: Vec<NodeId> = (0..1_000).map(|_| NodeId::anonymous()).collect();
        assert!(ids.iter().all(NodeId::is_generated));
        assert!(!NodeId::intern("badge").is_generated());
        for id in ids.iter().take(5) {
            assert!(IDS.get(id.to_string()).is_none(), "{id} was interned");
        }
    }

    #[test]
    fn serializes_named_and_generated_ids() {
        let named = NodeId::intern("badge");
        let bytes = rmp_serde::to_vec(&named).unwrap();
        assert_eq!(rmp_serde::from_slice::<NodeId>(&bytes).unwrap(), named);

        let generated = NodeId::anonymous();
        let bytes = rmp_serde::to_vec(&generated).unwrap();
        let back: NodeId = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, generated);
        assert!(back.is_generated());
        assert_ne!(NodeId::anonymous(), generated);
    }
}
