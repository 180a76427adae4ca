//! Property-Based Tests for gpk-select
//!
//! These tests verify:
//! - Row state derivation is total and consistent with the checkbox
//! - Reconciler invariants hold after arbitrary toggle/clear sequences
//! - Rejected toggles leave the reconciler untouched
//! - Package id parse/display agreement

use gpk_select::package_id::PackageId;
use gpk_select::reconciler::{PackageRecord, Reconciler};
use gpk_select::types::{ActionMode, RowState};
use proptest::prelude::*;

// =============================================================================
// RowState Property Tests
// =============================================================================

proptest! {
    /// RowState: derived state reports back the flags it came from
    #[test]
    fn row_state_derive_is_faithful(installed in any::<bool>(), queued in any::<bool>()) {
        let state = RowState::derive(installed, queued);
        prop_assert_eq!(state.is_installed(), installed);
        prop_assert_eq!(state.is_queued(), queued);
    }

    /// RowState: a successful toggle flips exactly the queued flag
    #[test]
    fn row_state_toggle_inverts(index in 0..6usize) {
        let (id, installed) = package(index);
        let mut r = Reconciler::new();
        let before = r.record_arrived(&PackageRecord::new(id.clone(), "", installed));
        let after = r.toggle(&id, installed).expect("idle reconciler accepts");
        prop_assert_eq!(after, before.inverted());
    }

    /// RowState: checkbox shows "installed afterwards"
    #[test]
    fn row_state_checkbox_is_outcome(installed in any::<bool>(), queued in any::<bool>()) {
        let state = RowState::derive(installed, queued);
        prop_assert_eq!(state.checkbox(), installed != queued);
        prop_assert_eq!(state.inverted().inverted(), state);
        prop_assert!(!state.unselected().is_queued());
    }
}

// =============================================================================
// Reconciler Property Tests
// =============================================================================

/// Fixed pool of packages; even indexes are installed
const POOL: [&str; 6] = [
    "alpha;1.0;x86_64;installed",
    "beta;1.0;x86_64;fedora",
    "gamma;2.1;noarch;installed",
    "delta;0.3;x86_64;updates",
    "epsilon;5;i686;installed",
    "zeta;1.2.3;x86_64;fedora",
];

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (0..POOL.len()).prop_map(Op::Toggle),
        1 => Just(Op::Clear),
    ]
}

fn package(index: usize) -> (PackageId, bool) {
    let id = POOL[index].parse().expect("pool ids are valid");
    (id, index % 2 == 0)
}

proptest! {
    /// Reconciler: mode is None exactly when nothing is queued
    #[test]
    fn reconciler_stays_consistent(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut r = Reconciler::new();
        for op in ops {
            match op {
                Op::Toggle(index) => {
                    let (id, installed) = package(index);
                    let _ = r.toggle(&id, installed);
                }
                Op::Clear => r.clear(),
            }
            prop_assert!(r.is_consistent());
            prop_assert_eq!(r.mode() == ActionMode::None, r.is_empty());
        }
    }

    /// Reconciler: every queued package matches the batch mode
    #[test]
    fn reconciler_batch_is_homogeneous(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut r = Reconciler::new();
        for op in ops {
            match op {
                Op::Toggle(index) => {
                    let (id, installed) = package(index);
                    let _ = r.toggle(&id, installed);
                }
                Op::Clear => r.clear(),
            }
        }
        for id in r.pending().iter() {
            let index = POOL.iter().position(|p| *p == id.to_string()).expect("id from pool");
            let (_, installed) = package(index);
            prop_assert_eq!(ActionMode::for_installed(installed), r.mode());
        }
    }

    /// Reconciler: a rejected toggle changes nothing
    #[test]
    fn reconciler_rejection_is_pure(
        ops in prop::collection::vec(op_strategy(), 0..32),
        target in 0..POOL.len(),
    ) {
        let mut r = Reconciler::new();
        for op in ops {
            match op {
                Op::Toggle(index) => {
                    let (id, installed) = package(index);
                    let _ = r.toggle(&id, installed);
                }
                Op::Clear => r.clear(),
            }
        }

        let (id, installed) = package(target);
        let before = (r.mode(), r.pending().clone());
        if r.toggle(&id, installed).is_err() {
            prop_assert_eq!((r.mode(), r.pending().clone()), before);
        }
    }

    /// Reconciler: toggling the same package twice restores the previous state
    #[test]
    fn reconciler_double_toggle_is_identity(
        ops in prop::collection::vec(op_strategy(), 0..32),
        target in 0..POOL.len(),
    ) {
        let mut r = Reconciler::new();
        for op in ops {
            match op {
                Op::Toggle(index) => {
                    let (id, installed) = package(index);
                    let _ = r.toggle(&id, installed);
                }
                Op::Clear => r.clear(),
            }
        }

        let (id, installed) = package(target);
        let before_mode = r.mode();
        let before: Vec<PackageId> = r.pending().iter().cloned().collect();
        if r.toggle(&id, installed).is_ok() {
            r.toggle(&id, installed).expect("undo is always accepted");
            prop_assert_eq!(r.mode(), before_mode);
            let mut after: Vec<PackageId> = r.pending().iter().cloned().collect();
            let mut expected = before;
            after.sort_by_key(|p| p.to_string());
            expected.sort_by_key(|p| p.to_string());
            prop_assert_eq!(after, expected);
        }
    }
}

// =============================================================================
// PackageId Property Tests
// =============================================================================

fn field_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9._+-]{0,15}"
}

proptest! {
    /// PackageId: display output parses back to the same id
    #[test]
    fn package_id_display_parses(
        name in field_strategy(),
        version in field_strategy(),
        arch in field_strategy(),
        data in field_strategy(),
    ) {
        let raw = format!("{};{};{};{}", name, version, arch, data);
        let id: PackageId = raw.parse().expect("four fields with a name");
        prop_assert_eq!(id.to_string(), raw);
        prop_assert_eq!(id.name(), name.as_str());
    }

    /// PackageId: anything but four fields is refused
    #[test]
    fn package_id_wrong_field_count_rejected(fields in prop::collection::vec(field_strategy(), 1..8)) {
        prop_assume!(fields.len() != 4);
        let raw = fields.join(";");
        prop_assert!(raw.parse::<PackageId>().is_err());
    }
}
