//! Per-translation working state

use super::text::{Expr, ShaderWriter};
use super::types::{CombinerCountFlags, FINAL_COMBINER_STAGE};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Set that remembers first-insertion order
///
/// Iteration order is the order values were first inserted. The generated
/// declarations follow this order, so it is part of the output format.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    order: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Insert a value, returns `false` if it was already present
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.order.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.order
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Which part of the program is being emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageCursor {
    Combiner(u8),
    Final,
}

impl StageCursor {
    /// Stage index, 8 for the final combiner
    pub fn index(self) -> u8 {
        match self {
            StageCursor::Combiner(i) => i,
            StageCursor::Final => FINAL_COMBINER_STAGE,
        }
    }

    pub fn is_final(self) -> bool {
        self == StageCursor::Final
    }
}

/// A per-stage constant register slot, declared as `c_<stage>_<index>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantSlot {
    /// 0..=7 for combiner stages, 8 for the final combiner
    pub stage: u8,
    /// 0 for C0, 1 for C1
    pub index: u8,
}

impl ConstantSlot {
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConstantSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c_{}_{}", self.stage, self.index)
    }
}

/// E and F of the final combiner, captured while it is emitted
#[derive(Debug, Clone)]
pub struct EfProduct {
    pub e: Expr,
    pub f: Expr,
}

/// Mutable state of one translation
///
/// Created fresh for every shader and threaded through every emission
/// helper.
#[derive(Debug)]
pub struct TranslatorContext {
    pub flags: CombinerCountFlags,
    pub cursor: StageCursor,
    /// Temporaries referenced so far (`r0`, `r1`)
    pub var_refs: OrderedSet<String>,
    /// Constant slots referenced so far
    pub const_refs: OrderedSet<ConstantSlot>,
    /// Only set while the final combiner is emitted
    pub ef: Option<EfProduct>,
    pub code: ShaderWriter,
}

impl TranslatorContext {
    pub fn new(flags: CombinerCountFlags) -> Self {
        Self {
            flags,
            cursor: StageCursor::Combiner(0),
            var_refs: OrderedSet::new(),
            const_refs: OrderedSet::new(),
            ef: None,
            code: ShaderWriter::new(),
        }
    }

    /// Record a temporary register reference
    pub fn add_var_ref(&mut self, name: &str) {
        self.var_refs.insert(name.to_string());
    }
}
