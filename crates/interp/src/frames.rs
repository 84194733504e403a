//! Variable storage: variables, frames, and the frame manager.
//!
//! A frame is an insertion-ordered collection of named variables, unique by
//! name. The frame manager owns the one persistent global frame, the stack
//! of activated local frames, and the single staging slot for a temporary
//! frame. Qualified variable names resolve through the manager.

use framecode_common::{FrameSelector, Value, VarRef};
use thiserror::Error;

/// Storage-level errors, mapped to [`crate::RuntimeError`] (with the
/// instruction order attached) at the machine layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The selected frame does not exist (local stack empty or nothing staged).
    #[error("no {0} frame")]
    NoFrame(&'static str),

    /// The name is not declared in the selected frame.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// The name is already declared in the selected frame.
    #[error("variable '{0}' redefined")]
    Redefinition(String),

    /// The variable is declared but was never assigned.
    #[error("variable '{0}' is uninitialized")]
    Uninitialized(String),
}

/// A named mutable storage slot.
///
/// Created unbound; reading an unbound slot is an error, writing replaces
/// the whole binding atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    binding: Option<Value>,
}

impl Variable {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: None,
        }
    }

    /// The variable's bare name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current binding, or `None` if declared but never assigned.
    pub fn binding(&self) -> Option<&Value> {
        self.binding.as_ref()
    }

    /// Replace the binding. The only mutator.
    pub fn bind(&mut self, value: Value) {
        self.binding = Some(value);
    }
}

/// An insertion-ordered collection of variables, unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    slots: Vec<Variable>,
}

impl Frame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unbound variable. Fails if the name already exists.
    pub fn declare(&mut self, name: &str) -> Result<(), FrameError> {
        if self.slots.iter().any(|var| var.name == name) {
            return Err(FrameError::Redefinition(name.to_string()));
        }
        self.slots.push(Variable::new(name));
        Ok(())
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.slots.iter().find(|var| var.name == name)
    }

    /// Look up a variable by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.slots.iter_mut().find(|var| var.name == name)
    }

    /// Iterate variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.slots.iter()
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no variables are declared.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Governs which frame a qualified variable name resolves into.
#[derive(Debug, Clone, Default)]
pub struct FrameManager {
    global: Frame,
    locals: Vec<Frame>,
    staged: Option<Frame>,
}

impl FrameManager {
    /// Create a manager with an empty global frame, no local frames, and
    /// nothing staged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a fresh empty temporary frame, discarding whatever was staged.
    /// Idempotent, never fails.
    pub fn create_temporary(&mut self) {
        self.staged = Some(Frame::new());
    }

    /// Move the staged frame onto the local-frame stack as the new current
    /// local frame, clearing the staging slot.
    pub fn push_temporary(&mut self) -> Result<(), FrameError> {
        let staged = self.staged.take().ok_or(FrameError::NoFrame("temporary"))?;
        self.locals.push(staged);
        Ok(())
    }

    /// Move the current local frame back into the staging slot, discarding
    /// whatever was staged.
    pub fn pop_local(&mut self) -> Result<(), FrameError> {
        let top = self.locals.pop().ok_or(FrameError::NoFrame("local"))?;
        self.staged = Some(top);
        Ok(())
    }

    /// Declare an unbound variable in the selected frame.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), FrameError> {
        self.frame_mut(var.selector)?.declare(&var.name)
    }

    /// Resolve a selector to its frame.
    pub fn frame(&self, selector: FrameSelector) -> Result<&Frame, FrameError> {
        match selector {
            FrameSelector::Global => Ok(&self.global),
            FrameSelector::Local => self.locals.last().ok_or(FrameError::NoFrame("local")),
            FrameSelector::Temporary => {
                self.staged.as_ref().ok_or(FrameError::NoFrame("temporary"))
            }
        }
    }

    /// Resolve a selector to its frame, mutably.
    pub fn frame_mut(&mut self, selector: FrameSelector) -> Result<&mut Frame, FrameError> {
        match selector {
            FrameSelector::Global => Ok(&mut self.global),
            FrameSelector::Local => self.locals.last_mut().ok_or(FrameError::NoFrame("local")),
            FrameSelector::Temporary => {
                self.staged.as_mut().ok_or(FrameError::NoFrame("temporary"))
            }
        }
    }

    /// Resolve a variable reference to its declared slot.
    pub fn lookup(&self, var: &VarRef) -> Result<&Variable, FrameError> {
        self.frame(var.selector)?
            .get(&var.name)
            .ok_or_else(|| FrameError::UnknownVariable(var.to_string()))
    }

    /// Resolve a variable reference to its declared slot, mutably.
    /// Writing never requires an existing binding.
    pub fn lookup_mut(&mut self, var: &VarRef) -> Result<&mut Variable, FrameError> {
        self.frame_mut(var.selector)?
            .get_mut(&var.name)
            .ok_or_else(|| FrameError::UnknownVariable(var.to_string()))
    }

    /// Resolve a variable reference for reading: fails on a missing frame,
    /// a missing name, or an unbound slot.
    pub fn read(&self, var: &VarRef) -> Result<&Value, FrameError> {
        let slot = self.lookup(var)?;
        slot.binding()
            .ok_or_else(|| FrameError::Uninitialized(var.to_string()))
    }

    /// The global frame, for diagnostics.
    pub fn global(&self) -> &Frame {
        &self.global
    }

    /// The current local frame, if any, for diagnostics.
    pub fn local(&self) -> Option<&Frame> {
        self.locals.last()
    }

    /// The staged temporary frame, if any, for diagnostics.
    pub fn temporary(&self) -> Option<&Frame> {
        self.staged.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecode_common::FrameSelector::{Global, Local, Temporary};

    fn gvar(name: &str) -> VarRef {
        VarRef::new(Global, name)
    }

    #[test]
    fn declare_then_read_is_uninitialized() {
        let mut frames = FrameManager::new();
        frames.declare(&gvar("x")).unwrap();
        assert_eq!(
            frames.read(&gvar("x")),
            Err(FrameError::Uninitialized("GF@x".into()))
        );
    }

    #[test]
    fn write_clears_uninitialized_status() {
        let mut frames = FrameManager::new();
        frames.declare(&gvar("x")).unwrap();
        frames.lookup_mut(&gvar("x")).unwrap().bind(Value::Int(5));
        assert_eq!(frames.read(&gvar("x")), Ok(&Value::Int(5)));
    }

    #[test]
    fn redefinition_in_same_frame_fails() {
        let mut frames = FrameManager::new();
        frames.declare(&gvar("x")).unwrap();
        assert_eq!(
            frames.declare(&gvar("x")),
            Err(FrameError::Redefinition("x".into()))
        );
    }

    #[test]
    fn same_name_in_different_frames_does_not_conflict() {
        let mut frames = FrameManager::new();
        frames.declare(&gvar("x")).unwrap();
        frames.create_temporary();
        frames.declare(&VarRef::new(Temporary, "x")).unwrap();
        frames.push_temporary().unwrap();
        frames.declare(&VarRef::new(Local, "y")).unwrap();
        assert!(frames.lookup(&VarRef::new(Local, "x")).is_ok());
    }

    #[test]
    fn local_access_without_frame_fails() {
        let frames = FrameManager::new();
        assert_eq!(
            frames.frame(Local).unwrap_err(),
            FrameError::NoFrame("local")
        );
        assert_eq!(
            frames.frame(Temporary).unwrap_err(),
            FrameError::NoFrame("temporary")
        );
    }

    #[test]
    fn push_without_staged_frame_fails() {
        let mut frames = FrameManager::new();
        assert_eq!(
            frames.push_temporary(),
            Err(FrameError::NoFrame("temporary"))
        );
    }

    #[test]
    fn pop_with_empty_local_stack_fails() {
        let mut frames = FrameManager::new();
        assert_eq!(frames.pop_local(), Err(FrameError::NoFrame("local")));
    }

    #[test]
    fn push_then_pop_round_trips_bindings() {
        let mut frames = FrameManager::new();
        frames.create_temporary();
        frames.declare(&VarRef::new(Temporary, "x")).unwrap();
        frames
            .lookup_mut(&VarRef::new(Temporary, "x"))
            .unwrap()
            .bind(Value::Str("kept".into()));

        let staged_before = frames.temporary().cloned();
        frames.push_temporary().unwrap();
        assert!(frames.temporary().is_none());
        frames.pop_local().unwrap();

        assert_eq!(frames.temporary().cloned(), staged_before);
        assert_eq!(
            frames.read(&VarRef::new(Temporary, "x")),
            Ok(&Value::Str("kept".into()))
        );
    }

    #[test]
    fn create_temporary_discards_staged_frame() {
        let mut frames = FrameManager::new();
        frames.create_temporary();
        frames.declare(&VarRef::new(Temporary, "old")).unwrap();
        frames.create_temporary();
        assert_eq!(
            frames.lookup(&VarRef::new(Temporary, "old")).unwrap_err(),
            FrameError::UnknownVariable("TF@old".into())
        );
    }

    #[test]
    fn pop_discards_previously_staged_frame() {
        let mut frames = FrameManager::new();
        frames.create_temporary();
        frames.push_temporary().unwrap();
        // Stage a second frame, then pop the local one over it.
        frames.create_temporary();
        frames.declare(&VarRef::new(Temporary, "doomed")).unwrap();
        frames.pop_local().unwrap();
        assert!(frames.lookup(&VarRef::new(Temporary, "doomed")).is_err());
    }

    #[test]
    fn unknown_variable_reports_qualified_name() {
        let frames = FrameManager::new();
        assert_eq!(
            frames.lookup(&gvar("ghost")).unwrap_err(),
            FrameError::UnknownVariable("GF@ghost".into())
        );
    }
}
