use std::collections::HashSet;

use super::schema::Catalog;

/// Validate a subject catalog after loading.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &Catalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();

    if catalog.subjects.is_empty() {
        errors.push("subjects: catalog has no subjects".to_string());
    }

    for (i, subject) in catalog.subjects.iter().enumerate() {
        if subject.id.trim().is_empty() {
            errors.push(format!("subjects[{}].id: must not be empty", i));
        } else if !seen_ids.insert(subject.id.as_str()) {
            errors.push(format!("subjects[{}].id: duplicate id '{}'", i, subject.id));
        }

        if subject.name.trim().is_empty() {
            errors.push(format!("subjects[{}].name: must not be empty", i));
        }

        if !subject.scaling_factor.is_finite() || subject.scaling_factor < 0.0 {
            errors.push(format!(
                "subjects[{}].scaling_factor: must be a non-negative number, got {}",
                i, subject.scaling_factor
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SubjectRef;

    fn subject(id: &str, name: &str, factor: f64) -> SubjectRef {
        SubjectRef {
            id: id.to_string(),
            name: name.to_string(),
            category: "Sciences".to_string(),
            scaling_factor: factor,
            has_bonus: false,
        }
    }

    #[test]
    fn test_valid_catalog() {
        let catalog = Catalog {
            year: Some(2024),
            subjects: vec![subject("physics", "Physics", 1.14), subject("biology", "Biology", 0.0)],
        };
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog { year: None, subjects: vec![] };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("no subjects"));
    }

    #[test]
    fn test_duplicate_id() {
        let catalog = Catalog {
            year: None,
            subjects: vec![subject("physics", "Physics", 1.14), subject("physics", "Physics 2", 1.0)],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("subjects[1].id: duplicate id 'physics'"));
    }

    #[test]
    fn test_negative_scaling_factor() {
        let catalog = Catalog {
            year: None,
            subjects: vec![subject("physics", "Physics", -1.0)],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("subjects[0].scaling_factor"));
    }

    #[test]
    fn test_nan_scaling_factor() {
        let catalog = Catalog {
            year: None,
            subjects: vec![subject("physics", "Physics", f64::NAN)],
        };
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let catalog = Catalog {
            year: None,
            subjects: vec![subject("", "", -2.0)],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
