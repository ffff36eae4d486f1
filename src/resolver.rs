//! Concrete subtype resolution for abstract type references

use tracing::debug;

use crate::error::{FormError, Result};
use crate::model::{ClassDeclaration, ModelManager};

/// Find a concrete type that extends the provided type.
///
/// A non-abstract declaration is returned unchanged. For an abstract one the
/// first non-abstract, non-system declaration of its subtype closure is
/// returned, in registration order. When several concrete subtypes exist the
/// choice is whichever was registered first, not the closest one.
pub fn find_concrete_subclass<'a>(
    manager: &'a ModelManager,
    declaration: &'a ClassDeclaration,
) -> Result<&'a ClassDeclaration> {
    if !declaration.is_abstract() {
        return Ok(declaration);
    }

    let concrete = manager
        .assignable_class_declarations(declaration)
        .into_iter()
        .filter(|subclass| !subclass.is_abstract())
        .find(|subclass| !subclass.is_system_type())
        .ok_or_else(|| FormError::NoConcreteType {
            type_name: declaration.fully_qualified_name(),
        })?;

    debug!(
        "Resolved abstract {} to {}",
        declaration.fully_qualified_name(),
        concrete.fully_qualified_name()
    );
    Ok(concrete)
}

/// Look up a type by fully-qualified name and resolve it to a concrete declaration
pub fn resolve_type<'a>(manager: &'a ModelManager, fully_qualified_name: &str) -> Result<&'a ClassDeclaration> {
    let declaration = manager.get_type(fully_qualified_name)?;
    find_concrete_subclass(manager, declaration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelFile;
    use serde_json::json;

    fn manager() -> ModelManager {
        let file: ModelFile = serde_json::from_value(json!({
            "namespace": "org.acme.shapes",
            "declarations": [
                { "kind": "concept", "name": "Shape", "abstract": true },
                { "kind": "concept", "name": "Polygon", "abstract": true, "superType": "Shape" },
                { "kind": "concept", "name": "Internal", "superType": "Polygon", "system": true },
                { "kind": "concept", "name": "Square", "superType": "Polygon",
                  "properties": [ { "kind": "field", "name": "side", "type": "Double" } ] },
                { "kind": "concept", "name": "Circle", "superType": "Shape" },
                { "kind": "concept", "name": "Orphan", "abstract": true },
                { "kind": "concept", "name": "Hidden", "abstract": true },
                { "kind": "concept", "name": "HiddenImpl", "superType": "Hidden", "system": true }
            ]
        }))
        .unwrap();
        let mut manager = ModelManager::new();
        manager.add_model_files(vec![file]).unwrap();
        manager
    }

    #[test]
    fn test_concrete_type_returned_unchanged() {
        let manager = manager();
        let circle = manager.get_type("org.acme.shapes.Circle").unwrap();
        let resolved = find_concrete_subclass(&manager, circle).unwrap();
        assert_eq!(resolved.name(), "Circle");
    }

    #[test]
    fn test_abstract_resolves_to_first_concrete() {
        let manager = manager();
        let resolved = resolve_type(&manager, "org.acme.shapes.Shape").unwrap();
        // Internal is registered first but is a system type
        assert_eq!(resolved.name(), "Square");
        assert!(!resolved.is_abstract());
    }

    #[test]
    fn test_abstract_without_subclass_fails() {
        let manager = manager();
        let err = resolve_type(&manager, "org.acme.shapes.Orphan").unwrap_err();
        assert!(matches!(err, FormError::NoConcreteType { type_name } if type_name == "org.acme.shapes.Orphan"));
    }

    #[test]
    fn test_system_only_subclasses_fail() {
        let manager = manager();
        assert!(matches!(
            resolve_type(&manager, "org.acme.shapes.Hidden"),
            Err(FormError::NoConcreteType { .. })
        ));
    }

    #[test]
    fn test_unknown_type() {
        let manager = manager();
        assert!(matches!(
            resolve_type(&manager, "org.acme.shapes.Nope"),
            Err(FormError::TypeNotFound(_))
        ));
    }
}
