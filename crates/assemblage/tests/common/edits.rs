#![allow(dead_code)]

use assemblage::{Assemblage, AssemblageError, Child, IndexPath};
use proptest::prelude::*;

/// One step of a generated edit script over a tree of sections (nested
/// assemblages) holding `u32` leaves. Raw offsets are reduced against the
/// tree when the step runs, so every step is applicable or skipped.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    InsertLeaf { section: usize, at: usize, value: u32 },
    RemoveLeaf { section: usize, at: usize },
    UpdateLeaf { section: usize, at: usize, value: u32 },
    MoveLeaf { section: usize, from: usize, target: usize, to: usize },
    InsertSection { at: usize },
    RemoveSection { at: usize },
    UpdateSection { at: usize, len: usize },
    MoveSection { from: usize, to: usize },
}

pub fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0usize..16, 0usize..16, any::<u32>())
            .prop_map(|(section, at, value)| Step::InsertLeaf { section, at, value }),
        2 => (0usize..16, 0usize..16).prop_map(|(section, at)| Step::RemoveLeaf { section, at }),
        1 => (0usize..16, 0usize..16, any::<u32>())
            .prop_map(|(section, at, value)| Step::UpdateLeaf { section, at, value }),
        2 => (0usize..16, 0usize..16, 0usize..16, 0usize..16).prop_map(
            |(section, from, target, to)| Step::MoveLeaf { section, from, target, to }
        ),
        1 => (0usize..16).prop_map(|at| Step::InsertSection { at }),
        1 => (0usize..16).prop_map(|at| Step::RemoveSection { at }),
        1 => (0usize..16, 0usize..5).prop_map(|(at, len)| Step::UpdateSection { at, len }),
        1 => (0usize..16, 0usize..16).prop_map(|(from, to)| Step::MoveSection { from, to }),
    ]
}

pub fn script() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step(), 0..24)
}

/// `[[1, 2, 3], [4], []]`
pub fn seed() -> Assemblage<u32> {
    Assemblage::new([
        Assemblage::from_leaves([1, 2, 3]).into(),
        Assemblage::from_leaves([4]).into(),
        Assemblage::empty().into(),
    ])
}

fn section_len(root: &Assemblage<u32>, section: usize) -> usize {
    root.number_of_children_at_path(&IndexPath::from([section]))
        .unwrap_or(0)
}

/// Runs `step` against `root`. `Ok(false)` when the tree has nothing the
/// step could act on.
pub fn apply(root: &mut Assemblage<u32>, step: &Step) -> Result<bool, AssemblageError> {
    let sections = root.count();
    match *step {
        Step::InsertSection { at } => {
            root.insert(Assemblage::empty().into(), at % (sections + 1))?;
        }
        _ if sections == 0 => return Ok(false),
        Step::InsertLeaf { section, at, value } => {
            let s = section % sections;
            let len = section_len(root, s);
            root.insert_at_path(Child::leaf(value), &IndexPath::from([s, at % (len + 1)]))?;
        }
        Step::RemoveLeaf { section, at } => {
            let s = section % sections;
            let len = section_len(root, s);
            if len == 0 {
                return Ok(false);
            }
            root.remove_at_path(&IndexPath::from([s, at % len]))?;
        }
        Step::UpdateLeaf { section, at, value } => {
            let s = section % sections;
            let len = section_len(root, s);
            if len == 0 {
                return Ok(false);
            }
            root.update_at_path(Child::leaf(value), &IndexPath::from([s, at % len]))?;
        }
        Step::MoveLeaf {
            section,
            from,
            target,
            to,
        } => {
            let s = section % sections;
            let len = section_len(root, s);
            if len == 0 {
                return Ok(false);
            }
            let t = target % sections;
            let room = if t == s { len - 1 } else { section_len(root, t) };
            root.move_at_path(
                &IndexPath::from([s, from % len]),
                &IndexPath::from([t, to % (room + 1)]),
            )?;
        }
        Step::RemoveSection { at } => {
            root.remove(at % sections)?;
        }
        Step::UpdateSection { at, len } => {
            let rows = (0..len).map(|v| 100 + v as u32);
            root.update(Assemblage::from_leaves(rows).into(), at % sections)?;
        }
        Step::MoveSection { from, to } => {
            root.move_child(from % sections, to % sections)?;
        }
    }
    Ok(true)
}
