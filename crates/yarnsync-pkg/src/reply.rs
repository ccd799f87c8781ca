//! Shapes of the structured reply returned by `yarn info --json`.

use serde_json::Value;

/// A resolution reply, classified by which of the known shapes it matches.
///
/// When a reply matches several shapes, the first variant wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionReply {
    /// A top-level `value` holding the resolution identifier.
    Direct(String),
    /// The identifier is the `value` of the first entry in `children`.
    FirstChild(String),
    /// A `children` entry keyed `"Version"` holding a bare version number.
    VersionEntry(String),
    /// None of the above.
    Unrecognized,
}

impl ResolutionReply {
    /// Classify a raw reply.
    pub fn classify(reply: &Value) -> Self {
        if let Some(value) = non_empty_str(reply.get("value")) {
            return Self::Direct(value.to_string());
        }

        let Some(children) = reply.get("children") else {
            return Self::Unrecognized;
        };

        // A leading `"Version"` entry holds a bare version, not an identifier.
        let first = children
            .as_array()
            .and_then(|c| c.first())
            .filter(|child| !is_version_entry(child));
        if let Some(value) = non_empty_str(first.and_then(|c| c.get("value"))) {
            return Self::FirstChild(value.to_string());
        }

        children
            .as_array()
            .into_iter()
            .flatten()
            .find(|child| is_version_entry(child))
            .and_then(|entry| match entry.get("value") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .map_or(Self::Unrecognized, Self::VersionEntry)
    }

    /// The resolution identifier for `name`.
    ///
    /// A bare version entry becomes `<name>@npm:<version>`.
    pub fn identifier(&self, name: &str) -> Option<String> {
        match self {
            Self::Direct(id) | Self::FirstChild(id) => Some(id.clone()),
            Self::VersionEntry(version) => Some(format!("{name}@npm:{version}")),
            Self::Unrecognized => None,
        }
    }
}

fn is_version_entry(child: &Value) -> bool {
    child.get("key").and_then(Value::as_str) == Some("Version")
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direct_value() {
        let reply = ResolutionReply::classify(&json!({"value": "lodash@npm:4.17.21"}));
        assert_eq!(reply, ResolutionReply::Direct("lodash@npm:4.17.21".to_string()));
        assert_eq!(reply.identifier("lodash").as_deref(), Some("lodash@npm:4.17.21"));
    }

    #[test]
    fn direct_value_wins_over_children() {
        let reply = ResolutionReply::classify(&json!({
            "value": "react@npm:18.2.0",
            "children": [{"value": "react@npm:17.0.0"}]
        }));
        assert_eq!(reply, ResolutionReply::Direct("react@npm:18.2.0".to_string()));
    }

    #[test]
    fn first_child_value() {
        let reply = ResolutionReply::classify(&json!({
            "children": [{"value": "react@npm:18.2.0"}, {"value": "react@npm:17.0.2"}]
        }));
        assert_eq!(reply, ResolutionReply::FirstChild("react@npm:18.2.0".to_string()));
    }

    #[test]
    fn version_entry_synthesizes_identifier() {
        let reply = ResolutionReply::classify(&json!({
            "children": [{"key": "Version", "value": "2.0.0"}]
        }));
        assert_eq!(reply, ResolutionReply::VersionEntry("2.0.0".to_string()));
        assert_eq!(reply.identifier("pkgname").as_deref(), Some("pkgname@npm:2.0.0"));
    }

    #[test]
    fn leading_version_entry_is_not_an_identifier() {
        let reply = ResolutionReply::classify(&json!({
            "children": [{"key": "Version", "value": "2.0.0"}]
        }));
        assert!(!matches!(reply, ResolutionReply::FirstChild(_)));
        let identifier = reply.identifier("pkgname").unwrap();
        assert_eq!(identifier, "pkgname@npm:2.0.0");
        assert_eq!(crate::extract_version(&identifier), Some("2.0.0"));
    }

    #[test]
    fn first_child_identifier_wins_over_later_version_entry() {
        let reply = ResolutionReply::classify(&json!({
            "children": [
                {"key": "Resolution", "value": "react@npm:18.2.0"},
                {"key": "Version", "value": "18.2.0"}
            ]
        }));
        assert_eq!(reply, ResolutionReply::FirstChild("react@npm:18.2.0".to_string()));
    }

    #[test]
    fn version_entry_after_other_children() {
        let reply = ResolutionReply::classify(&json!({
            "children": [
                {"key": "Instances", "value": ""},
                {"key": "Version", "value": "1.4.2"}
            ]
        }));
        assert_eq!(reply, ResolutionReply::VersionEntry("1.4.2".to_string()));
    }

    #[test]
    fn numeric_version_entry() {
        let reply = ResolutionReply::classify(&json!({
            "children": [{"key": "Version", "value": 3}]
        }));
        assert_eq!(reply.identifier("tiny").as_deref(), Some("tiny@npm:3"));
    }

    #[test]
    fn empty_value_falls_through() {
        let reply = ResolutionReply::classify(&json!({
            "value": "",
            "children": [{"value": "left-pad@npm:1.3.0"}]
        }));
        assert_eq!(reply, ResolutionReply::FirstChild("left-pad@npm:1.3.0".to_string()));
    }

    #[test]
    fn unrecognized_shapes() {
        for reply in [
            json!({}),
            json!({"children": []}),
            json!({"children": [{"key": "Instances", "value": 2}]}),
            json!({"children": {"Version": "1.0.0"}}),
            json!("lodash@npm:4.17.21"),
        ] {
            let classified = ResolutionReply::classify(&reply);
            assert_eq!(classified, ResolutionReply::Unrecognized, "{reply}");
            assert!(classified.identifier("x").is_none());
        }
    }
}
