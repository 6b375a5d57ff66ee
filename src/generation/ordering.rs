//! Placement of model classes in the emitted module.
//!
//! Python evaluates class bodies top to bottom, so a class should be declared
//! before the classes whose annotations name it.

use crate::generation::ir::ClassDecl;

/// Decides where a finished class goes among those already declared
pub trait DeclarationOrdering: Send + Sync {
    fn place(&self, declared: &mut Vec<ClassDecl>, class: ClassDecl);
}

/// Inserts a class right before the first declared class that mentions it,
/// otherwise appends it.
///
/// This is a single-pass heuristic rather than a topological sort: a class
/// inserted early can still name one appended later.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertBeforeFirstMention;

impl DeclarationOrdering for InsertBeforeFirstMention {
    fn place(&self, declared: &mut Vec<ClassDecl>, class: ClassDecl) {
        match declared
            .iter()
            .position(|existing| existing.mentions(&class.name))
        {
            Some(index) => declared.insert(index, class),
            None => declared.push(class),
        }
    }
}
