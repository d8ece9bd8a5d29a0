//! Integration test: end-to-end usage scenarios.
//!
//! Walks the public surface the way a caller would: appends through the
//! growth policy, default construction, positional insert and erase,
//! copy-assignment across capacities, and moves.

use stow_seq::{seq, CloneTransfer, Sequence};
use stow_test_utils::DropLedger;

// ── Growth ─────────────────────────────────────────────────────────────

#[test]
fn appends_follow_doubling_policy() {
    let mut seq = Sequence::new();
    assert_eq!(seq.capacity(), 0);
    seq.push(1);
    assert_eq!(seq.capacity(), 1);
    seq.push(2);
    assert_eq!(seq.capacity(), 2);
    seq.push(3);
    assert_eq!(seq.capacity(), 4);
    assert_eq!(seq, [1, 2, 3]);
}

#[test]
fn emplace_back_returns_new_element() {
    let mut seq: Sequence<String> = Sequence::new();
    seq.emplace_back_with(|| "first".to_string()).push('!');
    seq.emplace_back_with(String::new);
    assert_eq!(seq, ["first!", ""]);
}

#[test]
fn reserve_then_fill_does_not_reallocate() {
    let mut seq: Sequence<u64> = Sequence::new();
    seq.reserve(100);
    let base = seq.as_ptr();
    for i in 0..100 {
        seq.push(i);
    }
    assert_eq!(seq.as_ptr(), base);
    assert_eq!(seq.capacity(), 100);
}

// ── Construction ───────────────────────────────────────────────────────

#[test]
fn with_len_builds_default_values() {
    let ints: Sequence<i32> = Sequence::with_len(3);
    assert_eq!(ints, [0, 0, 0]);
    assert_eq!(ints.capacity(), 3);

    let strings: Sequence<String> = Sequence::with_len(2);
    assert!(strings.iter().all(String::is_empty));
}

#[test]
fn macro_forms() {
    let empty: Sequence<u8> = seq![];
    assert!(empty.is_empty());
    assert_eq!(seq![7u8; 4], [7, 7, 7, 7]);
    assert_eq!(seq![1, 2, 3].capacity(), 3);
}

// ── Positional edits ───────────────────────────────────────────────────

#[test]
fn insert_then_erase() {
    let mut seq = seq![1, 2, 3];
    seq.insert(1, 99);
    assert_eq!(seq, [1, 99, 2, 3]);
    assert_eq!(seq.capacity(), 6);

    let next = seq.erase(0);
    assert_eq!(next, 0);
    assert_eq!(seq[next], 99);
    assert_eq!(seq, [99, 2, 3]);
    assert_eq!(seq.capacity(), 6);
}

#[test]
fn erase_last_returns_len() {
    let mut seq = seq!['a', 'b'];
    assert_eq!(seq.erase(1), seq.len());
}

#[test]
fn insert_and_remove_drop_exactly_once() {
    let ledger = DropLedger::new();
    {
        let mut seq = Sequence::new();
        for v in 0..4 {
            seq.push(ledger.track(v));
        }
        seq.insert(2, ledger.track(10));
        seq.insert(5, ledger.track(11));
        let removed = seq.remove(0);
        assert_eq!(removed, 0);
        seq.erase(1);
        ledger.assert_live(5);
        assert_eq!(seq.iter().map(|t| t.value()).collect::<Vec<_>>(), vec![1, 2, 3, 11]);
    }
    ledger.assert_balanced();
}

// ── Copy and move ──────────────────────────────────────────────────────

#[test]
fn copy_assign_into_small_destination() {
    let source = seq![1, 2, 3, 4, 5];
    let mut dest = Sequence::with_capacity(2);
    dest.push(0);
    dest.push(0);
    dest.clone_from(&source);
    assert_eq!(dest, source);
    assert_eq!(dest.capacity(), 5);
    assert_eq!(source.len(), 5);
}

#[test]
fn copies_are_independent() {
    let original = seq![String::from("a"), String::from("b")];
    let mut copy = original.clone();
    copy[1].push('z');
    copy.push("c".into());
    assert_eq!(original, ["a", "b"]);
    assert_eq!(copy, ["a", "bz", "c"]);
}

#[test]
fn move_leaves_source_empty() {
    let mut source = seq![1, 2, 3];
    let dest = source.take();
    assert_eq!(dest, [1, 2, 3]);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
    source.push(4);
    assert_eq!(source, [4]);
}

#[test]
fn assign_from_slices() {
    let ledger = DropLedger::new();
    {
        let mut dest: Sequence<_> = Sequence::with_capacity(8);
        for v in 0..6 {
            dest.push(ledger.track(v));
        }
        let short = [ledger.track(100), ledger.track(101)];
        dest.assign_from(&short);
        assert_eq!(dest.len(), 2);
        assert_eq!(dest.capacity(), 8);
        let long: Vec<_> = (0..7).map(|v| ledger.track(v)).collect();
        dest.assign_from(&long);
        assert_eq!(dest.len(), 7);
        assert_eq!(dest.capacity(), 8);
    }
    ledger.assert_balanced();
}

// ── Strategies ─────────────────────────────────────────────────────────

#[test]
fn clone_strategy_preserves_contents_across_growth() {
    let ledger = DropLedger::new();
    {
        let mut seq: Sequence<_, CloneTransfer> = Sequence::with_strategy();
        for v in 0..9 {
            seq.push(ledger.track(v));
        }
        seq.insert(4, ledger.track(-1));
        assert_eq!(seq.len(), 10);
        assert_eq!(seq[4], -1);
        ledger.assert_live(10);
    }
    ledger.assert_balanced();
}

#[test]
fn owned_iteration_consumes() {
    let ledger = DropLedger::new();
    let seq: Sequence<_> = (0..5).map(|v| ledger.track(v)).collect();
    let mut iter = seq.into_iter();
    let last = iter.next_back();
    assert_eq!(last.as_ref().map(|t| t.value()), Some(4));
    drop(iter);
    ledger.assert_live(1);
    drop(last);
    ledger.assert_balanced();
}
