//! Contract extractors for individual project artifacts.
//!
//! Each extractor inspects one parsed artifact and returns the full list of
//! violation strings, never just the first. Callers join the list into a
//! single check reason. Extractors are pure over their inputs; all file
//! reading happens in [`crate::facts`].

use regex::Regex;
use serde_json::{Map, Value};

/// Returns true when the plugin list contains `plugin_name`.
///
/// Plugin entries come in two shapes: a bare name (`"expo-router"`) or a
/// `[name, options]` pair. Pairs match on their first element; any other
/// entry shape never matches.
pub fn has_plugin(plugins: &Value, plugin_name: &str) -> bool {
    let Some(entries) = plugins.as_array() else {
        return false;
    };
    entries.iter().any(|entry| match entry {
        Value::String(name) => name == plugin_name,
        Value::Array(pair) => pair.first().and_then(Value::as_str) == Some(plugin_name),
        _ => false,
    })
}

/// Validate the app.json contract: an `expo` object with an iOS bundle
/// identifier and the expo-router plugin.
pub fn app_manifest_violations(doc: &Map<String, Value>) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(expo) = doc.get("expo").and_then(Value::as_object) else {
        errors.push("app.json is missing top-level expo object.".to_string());
        return errors;
    };

    let bundle_id = expo
        .get("ios")
        .and_then(Value::as_object)
        .and_then(|ios| ios.get("bundleIdentifier"))
        .and_then(Value::as_str);
    if !matches!(bundle_id, Some(id) if !id.is_empty()) {
        errors.push("app.json is missing expo.ios.bundleIdentifier.".to_string());
    }

    let plugins = expo.get("plugins").cloned().unwrap_or(Value::Array(vec![]));
    if !has_plugin(&plugins, "expo-router") {
        errors.push("app.json is missing expo-router in expo.plugins.".to_string());
    }

    errors
}

/// Validate the app.config.ts contract by pattern-matching the raw script.
pub fn inline_config_violations(content: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let bundle_id = Regex::new(r#"bundleIdentifier\s*:\s*['"][^'"]+['"]"#).unwrap();
    if !bundle_id.is_match(content) {
        errors.push("app.config.ts is missing ios.bundleIdentifier.".to_string());
    }
    if !content.contains("expo-router") {
        errors.push("app.config.ts is missing expo-router plugin reference.".to_string());
    }

    errors
}

/// Validate the eas.json contract: a `build` section with `preview` and
/// `production` profiles.
pub fn eas_violations(doc: &Map<String, Value>) -> Vec<String> {
    let Some(build) = doc.get("build").and_then(Value::as_object) else {
        return vec!["eas.json is missing build section.".to_string()];
    };

    let mut errors = Vec::new();
    if !build.contains_key("preview") {
        errors.push("eas.json is missing build.preview profile.".to_string());
    }
    if !build.contains_key("production") {
        errors.push("eas.json is missing build.production profile.".to_string());
    }
    errors
}

/// Validate the .gitignore Expo rules: `.expo/` and `.expo-shared/` must
/// each appear as a whole line.
pub fn gitignore_violations(content: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let expo_rule = Regex::new(r"(?m)^\.expo/\s*$").unwrap();
    if !expo_rule.is_match(content) {
        errors.push(".gitignore is missing .expo/ ignore rule.".to_string());
    }
    let expo_shared_rule = Regex::new(r"(?m)^\.expo-shared/\s*$").unwrap();
    if !expo_shared_rule.is_match(content) {
        errors.push(".gitignore is missing .expo-shared/ ignore rule.".to_string());
    }

    errors
}

/// Returns true when a test script is a placeholder rather than a real
/// test command.
pub fn is_placeholder_test_script(script: &str) -> bool {
    let normalized = script.trim().to_lowercase();
    ["no tests configured yet", "echo", "placeholder", "todo"]
        .iter()
        .any(|pattern| normalized.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_has_plugin_bare_name() {
        let plugins = json!(["expo-router", "expo-font"]);
        assert!(has_plugin(&plugins, "expo-router"));
        assert!(!has_plugin(&plugins, "expo-notifications"));
    }

    #[test]
    fn test_has_plugin_name_options_pair() {
        let plugins = json!([["expo-notifications", {"icon": "./icon.png"}]]);
        assert!(has_plugin(&plugins, "expo-notifications"));
        assert!(!has_plugin(&plugins, "expo-router"));
    }

    #[test]
    fn test_has_plugin_ignores_other_shapes() {
        let plugins = json!([42, {"name": "expo-router"}, []]);
        assert!(!has_plugin(&plugins, "expo-router"));
        assert!(!has_plugin(&json!("expo-router"), "expo-router"));
    }

    #[test]
    fn test_app_manifest_complete() {
        let doc = obj(json!({
            "expo": {
                "ios": {"bundleIdentifier": "com.example.app"},
                "plugins": ["expo-router"]
            }
        }));
        assert!(app_manifest_violations(&doc).is_empty());
    }

    #[test]
    fn test_app_manifest_missing_expo_short_circuits() {
        let doc = obj(json!({"name": "app"}));
        let errors = app_manifest_violations(&doc);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("top-level expo object"));
    }

    #[test]
    fn test_app_manifest_collects_all_violations() {
        let doc = obj(json!({"expo": {"plugins": []}}));
        let errors = app_manifest_violations(&doc);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("bundleIdentifier"));
        assert!(errors[1].contains("expo-router"));
    }

    #[test]
    fn test_app_manifest_empty_bundle_identifier() {
        let doc = obj(json!({
            "expo": {
                "ios": {"bundleIdentifier": ""},
                "plugins": ["expo-router"]
            }
        }));
        let errors = app_manifest_violations(&doc);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("bundleIdentifier"));
    }

    #[test]
    fn test_inline_config_complete() {
        let content = r#"
            export default {
                ios: { bundleIdentifier: "com.example.app" },
                plugins: ["expo-router"],
            };
        "#;
        assert!(inline_config_violations(content).is_empty());
    }

    #[test]
    fn test_inline_config_missing_both() {
        let errors = inline_config_violations("export default {};");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_eas_complete() {
        let doc = obj(json!({"build": {"preview": {}, "production": {}}}));
        assert!(eas_violations(&doc).is_empty());
    }

    #[test]
    fn test_eas_missing_build_short_circuits() {
        let errors = eas_violations(&obj(json!({})));
        assert_eq!(errors, vec!["eas.json is missing build section.".to_string()]);
    }

    #[test]
    fn test_eas_missing_profiles() {
        let errors = eas_violations(&obj(json!({"build": {"development": {}}})));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_gitignore_whole_line_rules() {
        assert!(gitignore_violations(".expo/\n.expo-shared/\n").is_empty());
        // Substring matches on another line do not count.
        let errors = gitignore_violations("foo/.expo/\nnode_modules/\n");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_gitignore_trailing_whitespace_tolerated() {
        assert!(gitignore_violations(".expo/  \n.expo-shared/\t\n").is_empty());
    }

    #[test]
    fn test_placeholder_test_script() {
        assert!(is_placeholder_test_script("echo \"no tests\""));
        assert!(is_placeholder_test_script("  TODO  "));
        assert!(is_placeholder_test_script("Placeholder"));
        assert!(!is_placeholder_test_script("jest --ci"));
    }
}
