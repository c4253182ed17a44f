//! Built-in material catalog.
//!
//! The same three materials seed the record store's reference table.

use crate::errors::{GeomError, GeomResult};

use super::Material;

/// All built-in materials, in catalog order.
pub fn builtin() -> Vec<Material> {
    vec![Material::steel(), Material::aluminum(), Material::copper()]
}

/// Look up a built-in material by name (case-insensitive).
pub fn find_builtin(name: &str) -> GeomResult<Material> {
    let wanted = name.trim();
    builtin()
        .into_iter()
        .find(|m| m.name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| GeomError::material_not_found(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let names: Vec<_> = builtin().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["Steel", "Aluminum", "Copper"]);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find_builtin("steel").unwrap(), Material::steel());
        assert_eq!(find_builtin(" COPPER ").unwrap(), Material::copper());
    }

    #[test]
    fn test_find_unknown() {
        let err = find_builtin("Unobtainium").unwrap_err();
        assert_eq!(err, GeomError::material_not_found("Unobtainium"));
    }
}
