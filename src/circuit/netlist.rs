//! A placed-component list, as the editor would hand it to the engine.

use std::collections::HashSet;

use super::types::ComponentId;
use crate::components::Component;
use crate::dsl::CircuitAst;
use crate::error::{CircuitError, Result};

/// An ordered list of placed components.
///
/// Order carries no electrical meaning but is kept stable, so node ids,
/// feedback and reports come out the same on every run.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub components: Vec<Component>,
}

impl Circuit {
    /// Create a circuit from an existing component list.
    pub fn new(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// Build a circuit from a parsed circuit file.
    pub fn from_ast(ast: CircuitAst) -> Result<Self> {
        let mut names = HashSet::new();
        let mut components = Vec::with_capacity(ast.components.len());

        for (idx, def) in ast.components.iter().enumerate() {
            if !names.insert(def.name.clone()) {
                return Err(CircuitError::DuplicateComponent {
                    name: def.name.clone(),
                });
            }
            components.push(Component::from_def(ComponentId(idx), def)?);
        }

        Ok(Self { components })
    }

    /// Find a component by name.
    pub fn find(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Find a component by name for editing.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.name == name)
    }

    /// Open or close the named switch.
    pub fn set_switch(&mut self, name: &str, closed: bool) -> Result<()> {
        let component = self.find_mut(name).ok_or_else(|| CircuitError::UnknownComponent {
            name: name.to_string(),
        })?;
        if component.set_closed(closed) {
            Ok(())
        } else {
            Err(CircuitError::InvalidParameter {
                component: name.to_string(),
                param: "state".to_string(),
                message: format!("a {} has no switch state", component.kind.type_name()),
            })
        }
    }

    /// Flip the named switch, as a click in the editor does. Returns the
    /// new state.
    pub fn toggle_switch(&mut self, name: &str) -> Result<bool> {
        let component = self.find_mut(name).ok_or_else(|| CircuitError::UnknownComponent {
            name: name.to_string(),
        })?;
        component
            .toggle_closed()
            .ok_or_else(|| CircuitError::InvalidParameter {
                component: name.to_string(),
                param: "state".to_string(),
                message: format!("a {} has no switch state", component.kind.type_name()),
            })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    #[test]
    fn test_from_ast_assigns_ids_in_order() {
        let ast = dsl::parse("V1 0,0 1,0 9\nR1 1,0 0,0 1k\n").unwrap();
        let circuit = Circuit::from_ast(ast).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.components[1].id, ComponentId(1));
        assert_eq!(circuit.find("R1").unwrap().effective_resistance(), 1000.0);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let ast = dsl::parse("R1 0,0 1,0 10\nR1 1,0 2,0 10\n").unwrap();
        assert!(matches!(
            Circuit::from_ast(ast),
            Err(CircuitError::DuplicateComponent { .. })
        ));
    }

    #[test]
    fn test_set_switch() {
        let ast = dsl::parse("SW1 0,0 1,0\nR1 1,0 0,0 10\n").unwrap();
        let mut circuit = Circuit::from_ast(ast).unwrap();
        circuit.set_switch("SW1", false).unwrap();
        assert!(!circuit.find("SW1").unwrap().is_conductive());
        assert!(circuit.set_switch("R1", true).is_err());
        assert!(matches!(
            circuit.set_switch("SW9", true),
            Err(CircuitError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_toggle_switch() {
        let ast = dsl::parse("SW1 0,0 1,0\nR1 1,0 0,0 10\n").unwrap();
        let mut circuit = Circuit::from_ast(ast).unwrap();
        assert!(!circuit.toggle_switch("SW1").unwrap());
        assert!(!circuit.find("SW1").unwrap().is_conductive());
        assert!(circuit.toggle_switch("SW1").unwrap());
        assert!(circuit.find("SW1").unwrap().is_conductive());
        assert!(circuit.toggle_switch("R1").is_err());
    }
}
