//! Category hierarchy resolution.
//!
//! Raw exports embed the category as a JSON object. Top-level categories
//! carry only `name`; sub-categories carry `name` plus `parent_name`:
//!
//! - `{"name": "Games"}` -> parent `Games`, sub `None`
//! - `{"name": "Tabletop Games", "parent_name": "Games"}` -> parent `Games`, sub `Tabletop Games`

use ksp_model::{Category, SUB_CATEGORY_NONE};

/// Parent and sub-category of one campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCategory {
    pub parent_category: String,
    /// Sub-category name, or the `"None"` sentinel.
    pub sub_category: String,
}

/// Parse category JSON and resolve the two-level hierarchy.
///
/// Returns a reason string when the JSON is unusable.
pub fn resolve_category(raw: &str) -> Result<ResolvedCategory, String> {
    let category: Category =
        serde_json::from_str(raw).map_err(|e| format!("invalid category JSON: {e}"))?;
    resolve(&category)
}

/// Resolve an already-parsed category.
pub fn resolve(category: &Category) -> Result<ResolvedCategory, String> {
    let name = non_blank(category.name.as_deref());
    let parent = non_blank(category.parent_name.as_deref());

    match (name, parent) {
        (Some(name), Some(parent)) => Ok(ResolvedCategory {
            parent_category: parent.to_string(),
            sub_category: name.to_string(),
        }),
        (Some(name), None) => Ok(ResolvedCategory {
            parent_category: name.to_string(),
            sub_category: SUB_CATEGORY_NONE.to_string(),
        }),
        (None, Some(_)) => Err("category has parent_name but no name".to_string()),
        (None, None) => Err("category has neither name nor parent_name".to_string()),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_category_gets_sentinel_sub_category() {
        let resolved = resolve_category(r#"{"name": "Games"}"#).unwrap();
        assert_eq!(resolved.parent_category, "Games");
        assert_eq!(resolved.sub_category, "None");
    }

    #[test]
    fn sub_category_moves_name_under_parent() {
        let resolved =
            resolve_category(r#"{"name":"Tabletop Games","parent_name":"Games"}"#).unwrap();
        assert_eq!(resolved.parent_category, "Games");
        assert_eq!(resolved.sub_category, "Tabletop Games");
    }

    #[test]
    fn extra_export_fields_are_ignored() {
        let raw = r#"{"id":34,"name":"Tabletop Games","slug":"games/tabletop games",
            "position":6,"parent_id":12,"parent_name":"Games","color":51627,
            "urls":{"web":{"discover":"http://www.kickstarter.com/discover/categories/games/tabletop%20games"}}}"#;
        let resolved = resolve_category(raw).unwrap();
        assert_eq!(resolved.parent_category, "Games");
    }

    #[test]
    fn missing_names_are_rejected() {
        assert!(resolve_category(r#"{"slug":"games"}"#).is_err());
        assert!(resolve_category(r#"{"parent_name":"Games"}"#).is_err());
        assert!(resolve_category(r#"{"name":"  "}"#).is_err());
    }

    #[test]
    fn non_json_is_rejected() {
        let err = resolve_category("Games").unwrap_err();
        assert!(err.starts_with("invalid category JSON"));
        assert!(resolve_category("[1, 2]").is_err());
    }
}
