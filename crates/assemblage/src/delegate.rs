//! Observer protocol for structural changes.

use std::cell::RefCell;
use std::rc::Rc;

use assemblage_index_path::IndexPath;

use crate::change_set::Change;
use crate::child::Child;
use crate::node::Assemblage;
use crate::summary::NetChanges;

/// Receives the changes of one root assemblage, one batch at a time.
///
/// Callbacks arrive in the order the edits were made, each path valid
/// against the tree as it was right before (for removals and the source of
/// a move) or right after (for insertions, updates and the target of a move)
/// that single edit. Every method defaults to doing nothing.
pub trait AssemblageDelegate<T> {
    fn will_begin_updates(&mut self, _assemblage: &Assemblage<T>) {}

    fn did_insert(&mut self, _object: &Child<T>, _path: &IndexPath) {}

    fn did_remove(&mut self, _object: &Child<T>, _path: &IndexPath) {}

    fn did_update(&mut self, _object: &Child<T>, _path: &IndexPath) {}

    fn did_move(&mut self, _object: &Child<T>, _from: &IndexPath, _to: &IndexPath) {}

    /// Net effect of the batch, delivered after the individual changes.
    fn did_coalesce_updates(&mut self, _changes: &NetChanges) {}

    fn did_end_updates(&mut self, _assemblage: &Assemblage<T>) {}
}

/// One delegate callback, as captured by [`ChangeRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DelegateEvent<T> {
    /// Root child count when the batch was delivered.
    WillBegin { count: usize },
    Change(Change<T>),
    Coalesced(NetChanges),
    DidEnd { count: usize },
}

/// Delegate that stores every callback it receives.
#[derive(Debug, Clone)]
pub struct ChangeRecorder<T> {
    events: Vec<DelegateEvent<T>>,
}

impl<T> Default for ChangeRecorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeRecorder<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// A recorder ready to pass to [`Assemblage::set_delegate`].
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn events(&self) -> &[DelegateEvent<T>] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<DelegateEvent<T>> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of complete batches received.
    pub fn batches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DelegateEvent::DidEnd { .. }))
            .count()
    }

    pub fn summaries(&self) -> Vec<&NetChanges> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::Coalesced(net) => Some(net),
                _ => None,
            })
            .collect()
    }
}

impl<T: Clone> ChangeRecorder<T> {
    /// The individual changes received, brackets left out.
    pub fn changes(&self) -> Vec<Change<T>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::Change(change) => Some(change.clone()),
                _ => None,
            })
            .collect()
    }
}

impl<T: Clone> AssemblageDelegate<T> for ChangeRecorder<T> {
    fn will_begin_updates(&mut self, assemblage: &Assemblage<T>) {
        self.events.push(DelegateEvent::WillBegin {
            count: assemblage.count(),
        });
    }

    fn did_insert(&mut self, object: &Child<T>, path: &IndexPath) {
        self.events.push(DelegateEvent::Change(Change::Insert {
            object: object.clone(),
            path: path.clone(),
        }));
    }

    fn did_remove(&mut self, object: &Child<T>, path: &IndexPath) {
        self.events.push(DelegateEvent::Change(Change::Remove {
            object: object.clone(),
            path: path.clone(),
        }));
    }

    fn did_update(&mut self, object: &Child<T>, path: &IndexPath) {
        self.events.push(DelegateEvent::Change(Change::Update {
            object: object.clone(),
            path: path.clone(),
        }));
    }

    fn did_move(&mut self, object: &Child<T>, from: &IndexPath, to: &IndexPath) {
        self.events.push(DelegateEvent::Change(Change::Move {
            object: object.clone(),
            from: from.clone(),
            to: to.clone(),
        }));
    }

    fn did_coalesce_updates(&mut self, changes: &NetChanges) {
        self.events.push(DelegateEvent::Coalesced(changes.clone()));
    }

    fn did_end_updates(&mut self, assemblage: &Assemblage<T>) {
        self.events.push(DelegateEvent::DidEnd {
            count: assemblage.count(),
        });
    }
}
