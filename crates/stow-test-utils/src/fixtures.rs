//! Reusable element fixtures.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct LedgerState {
    next_id: Cell<u64>,
    created: Cell<usize>,
    dropped: Cell<usize>,
    live: RefCell<HashSet<u64>>,
    double_drops: Cell<usize>,
}

/// Shared accounting for [`Tracked`] values.
///
/// Every `Tracked` created through a ledger (directly or by cloning) gets a
/// unique id. Dropping removes the id from the live set; dropping an id
/// that is not live is recorded as a double drop.
#[derive(Clone, Default)]
pub struct DropLedger {
    state: Rc<LedgerState>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracked value carrying `value`.
    pub fn track(&self, value: i64) -> Tracked {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state.created.set(self.state.created.get() + 1);
        self.state.live.borrow_mut().insert(id);
        Tracked {
            id,
            value,
            ledger: self.clone(),
        }
    }

    /// Number of values created (including clones).
    pub fn created(&self) -> usize {
        self.state.created.get()
    }

    /// Number of values dropped.
    pub fn dropped(&self) -> usize {
        self.state.dropped.get()
    }

    /// Number of values currently alive.
    pub fn live(&self) -> usize {
        self.state.live.borrow().len()
    }

    /// Number of drops of values that were not alive.
    pub fn double_drops(&self) -> usize {
        self.state.double_drops.get()
    }

    /// Assert that exactly `expected` values are alive and nothing was
    /// dropped twice.
    #[track_caller]
    pub fn assert_live(&self, expected: usize) {
        assert_eq!(self.double_drops(), 0, "a tracked value was dropped twice");
        assert_eq!(self.live(), expected, "unexpected number of live values");
    }

    /// Assert that every value created has been dropped exactly once.
    #[track_caller]
    pub fn assert_balanced(&self) {
        self.assert_live(0);
        assert_eq!(self.created(), self.dropped());
    }
}

/// A value whose construction and destruction is recorded in a
/// [`DropLedger`].
pub struct Tracked {
    id: u64,
    value: i64,
    ledger: DropLedger,
}

impl Tracked {
    /// The payload.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Unique id within the ledger.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.ledger.track(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let state = &self.ledger.state;
        state.dropped.set(state.dropped.get() + 1);
        if !state.live.borrow_mut().remove(&self.id) {
            state.double_drops.set(state.double_drops.get() + 1);
        }
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<i64> for Tracked {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// A value whose `clone` panics once a shared budget of successful clones
/// is exhausted.
///
/// All values cloned from one another share the budget, so a container
/// copying a batch of them fails part-way through deterministically.
#[derive(Debug)]
pub struct FragileClone {
    pub value: i64,
    budget: Rc<Cell<usize>>,
    alive: Rc<Cell<usize>>,
}

impl FragileClone {
    /// A family of values allowing `budget` successful clones in total.
    pub fn family(budget: usize) -> FragileFamily {
        FragileFamily {
            budget: Rc::new(Cell::new(budget)),
            alive: Rc::new(Cell::new(0)),
        }
    }
}

impl Clone for FragileClone {
    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("FragileClone: clone budget exhausted");
        }
        self.budget.set(left - 1);
        self.alive.set(self.alive.get() + 1);
        FragileClone {
            value: self.value,
            budget: Rc::clone(&self.budget),
            alive: Rc::clone(&self.alive),
        }
    }
}

impl Drop for FragileClone {
    fn drop(&mut self) {
        self.alive.set(self.alive.get() - 1);
    }
}

impl PartialEq<i64> for FragileClone {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

/// Factory and accounting for a group of [`FragileClone`] values.
#[derive(Debug)]
pub struct FragileFamily {
    budget: Rc<Cell<usize>>,
    alive: Rc<Cell<usize>>,
}

impl FragileFamily {
    /// Create a member; creation does not consume the clone budget.
    pub fn make(&self, value: i64) -> FragileClone {
        self.alive.set(self.alive.get() + 1);
        FragileClone {
            value,
            budget: Rc::clone(&self.budget),
            alive: Rc::clone(&self.alive),
        }
    }

    /// Reset the remaining clone budget.
    pub fn set_budget(&self, budget: usize) {
        self.budget.set(budget);
    }

    /// Remaining successful clones.
    pub fn budget(&self) -> usize {
        self.budget.get()
    }

    /// Number of family members currently alive.
    pub fn alive(&self) -> usize {
        self.alive.get()
    }
}

/// Error returned by constructors from [`fail_after`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Refused {
    /// Zero-based index of the refused call.
    pub call: usize,
}

impl fmt::Display for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constructor refused on call {}", self.call)
    }
}

impl Error for Refused {}

/// A constructor that yields `make(i)` for the first `successes` calls and
/// `Err(Refused)` afterwards.
pub fn fail_after<T>(
    successes: usize,
    mut make: impl FnMut(usize) -> T,
) -> impl FnMut() -> Result<T, Refused> {
    let mut calls = 0;
    move || {
        let call = calls;
        calls += 1;
        if call < successes {
            Ok(make(call))
        } else {
            Err(Refused { call })
        }
    }
}

/// A constructor that yields `make(i)` for the first `successes` calls and
/// panics afterwards.
pub fn panic_after<T>(
    successes: usize,
    mut make: impl FnMut(usize) -> T,
) -> impl FnMut() -> T {
    let mut calls = 0;
    move || {
        let call = calls;
        calls += 1;
        if call >= successes {
            panic!("constructor panicked on call {call}");
        }
        make(call)
    }
}
