//! Event type definitions and the registry that resolves them.
//!
//! Type definitions carry the presentation metadata for a category of
//! event: display name, icon and colour scheme. The registry merges a small
//! built-in set with caller overrides once, at construction time.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Type key used when no default is configured
pub const FALLBACK_EVENT_TYPE: &str = "file-operation";

/// Icons a type definition can reference.
///
/// Names match the lucide icon set used by the web front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    FileText,
    Database,
    Globe,
    Server,
    Bell,
    Clock,
    Cpu,
    Mail,
    Cloud,
    Terminal,
    Zap,
}

impl Icon {
    /// Icon used for names that don't resolve
    pub const FALLBACK: Icon = Icon::Clock;

    pub fn name(self) -> &'static str {
        match self {
            Icon::FileText => "FileText",
            Icon::Database => "Database",
            Icon::Globe => "Globe",
            Icon::Server => "Server",
            Icon::Bell => "Bell",
            Icon::Clock => "Clock",
            Icon::Cpu => "Cpu",
            Icon::Mail => "Mail",
            Icon::Cloud => "Cloud",
            Icon::Terminal => "Terminal",
            Icon::Zap => "Zap",
        }
    }

    /// Resolve an icon name, falling back to [`Icon::FALLBACK`]
    pub fn resolve(name: &str) -> Icon {
        name.parse().unwrap_or_else(|_| {
            warn!(icon = name, "Unknown icon name, using fallback");
            Icon::FALLBACK
        })
    }
}

/// Error for icon names outside the known set
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown icon: {0}")]
pub struct UnknownIcon(pub String);

impl FromStr for Icon {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let icon = match s {
            "FileText" => Icon::FileText,
            "Database" => Icon::Database,
            "Globe" => Icon::Globe,
            "Server" => Icon::Server,
            "Bell" => Icon::Bell,
            "Clock" => Icon::Clock,
            "Cpu" => Icon::Cpu,
            "Mail" => Icon::Mail,
            "Cloud" => Icon::Cloud,
            "Terminal" => Icon::Terminal,
            "Zap" => Icon::Zap,
            other => return Err(UnknownIcon(other.to_string())),
        };
        Ok(icon)
    }
}

/// Colour scheme of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub background: String,
}

/// Optional icon background (a gradient when `secondary` is set)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconBackground {
    pub primary: String,
    #[serde(default)]
    pub secondary: Option<String>,
}

/// Per-type style overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStyle {
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

/// Type definition as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeSpec {
    /// Display name
    pub name: String,

    /// Icon name (e.g. "FileText")
    pub icon: String,

    pub color: ColorScheme,

    #[serde(default)]
    pub icon_background: Option<IconBackground>,

    #[serde(default)]
    pub style: Option<TypeStyle>,
}

impl EventTypeSpec {
    fn new(name: &str, icon: &str, primary: &str, secondary: &str, background: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            color: ColorScheme {
                primary: primary.to_string(),
                secondary: secondary.to_string(),
                background: background.to_string(),
            },
            icon_background: None,
            style: None,
        }
    }

    /// Resolve the icon name into a definition
    pub fn resolve(self) -> EventTypeDefinition {
        EventTypeDefinition {
            icon: Icon::resolve(&self.icon),
            name: self.name,
            color: self.color,
            icon_background: self.icon_background,
            style: self.style,
        }
    }
}

/// Resolved type definition with a statically known icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeDefinition {
    pub name: String,
    pub icon: Icon,
    pub color: ColorScheme,
    pub icon_background: Option<IconBackground>,
    pub style: Option<TypeStyle>,
}

/// Style hints applied to every event node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyleDefinition {
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub padding: Option<String>,
    #[serde(default)]
    pub border_radius: Option<String>,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub shadow: Option<String>,
    #[serde(default)]
    pub animation: Option<String>,
}

/// Caller-supplied type configuration, merged over the built-ins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeConfig {
    #[serde(default)]
    pub event_types: BTreeMap<String, EventTypeSpec>,

    #[serde(default)]
    pub default_event_type: Option<String>,

    #[serde(default)]
    pub node_styles: Option<NodeStyleDefinition>,
}

impl EventTypeConfig {
    /// Parse a type configuration from YAML
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        use anyhow::Context;
        serde_yaml::from_str(content).context("Failed to parse event type YAML")
    }

    /// Layer `other` on top of `self`: its entries win per key, and its
    /// default type and node styles win when set.
    pub fn merged_with(mut self, other: EventTypeConfig) -> Self {
        self.event_types.extend(other.event_types);
        if other.default_event_type.is_some() {
            self.default_event_type = other.default_event_type;
        }
        if other.node_styles.is_some() {
            self.node_styles = other.node_styles;
        }
        self
    }
}

fn builtin_event_types() -> BTreeMap<String, EventTypeSpec> {
    [
        (
            "file-operation",
            EventTypeSpec::new("File Operation", "FileText", "#3b82f6", "#dbeafe", "#eff6ff"),
        ),
        (
            "data-processing",
            EventTypeSpec::new("Data Processing", "Database", "#10b981", "#d1fae5", "#ecfdf5"),
        ),
        (
            "api-call",
            EventTypeSpec::new("API Call", "Globe", "#f59e0b", "#fef3c7", "#fffbeb"),
        ),
        (
            "database",
            EventTypeSpec::new("Database", "Server", "#8b5cf6", "#ede9fe", "#f5f3ff"),
        ),
        (
            "notification",
            EventTypeSpec::new("Notification", "Bell", "#ef4444", "#fee2e2", "#fef2f2"),
        ),
    ]
    .into_iter()
    .map(|(key, spec)| (key.to_string(), spec))
    .collect()
}

/// Merged, resolved type definitions.
///
/// The default type's definition is kept aside so lookups never miss.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    definitions: BTreeMap<String, EventTypeDefinition>,
    default_type: String,
    default_definition: EventTypeDefinition,
    node_styles: Option<NodeStyleDefinition>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(EventTypeConfig::default())
    }
}

impl TypeRegistry {
    /// Merge caller entries over the built-ins (caller wins per key)
    pub fn new(config: EventTypeConfig) -> Self {
        let mut specs = builtin_event_types();
        specs.extend(config.event_types);

        let definitions: BTreeMap<String, EventTypeDefinition> = specs
            .into_iter()
            .map(|(key, spec)| (key, spec.resolve()))
            .collect();

        let default_type = match config.default_event_type {
            Some(key) if definitions.contains_key(&key) => key,
            Some(key) => {
                warn!(
                    default_type = %key,
                    fallback = FALLBACK_EVENT_TYPE,
                    "Configured default event type is not defined"
                );
                FALLBACK_EVENT_TYPE.to_string()
            }
            None => FALLBACK_EVENT_TYPE.to_string(),
        };

        // Overrides replace entries but never remove them, so the fallback
        // key is always present.
        let default_definition = definitions
            .get(&default_type)
            .cloned()
            .unwrap_or_else(|| builtin_event_types()[FALLBACK_EVENT_TYPE].clone().resolve());

        Self {
            definitions,
            default_type,
            default_definition,
            node_styles: config.node_styles,
        }
    }

    /// Definition for a type key, or the default type's definition
    pub fn definition(&self, event_type: &str) -> &EventTypeDefinition {
        self.definitions
            .get(event_type)
            .unwrap_or(&self.default_definition)
    }

    /// Whether a type key has its own definition
    pub fn contains(&self, event_type: &str) -> bool {
        self.definitions.contains_key(event_type)
    }

    pub fn definitions(&self) -> &BTreeMap<String, EventTypeDefinition> {
        &self.definitions
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    pub fn node_styles(&self) -> Option<&NodeStyleDefinition> {
        self.node_styles.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_types() {
        let registry = TypeRegistry::default();

        assert_eq!(registry.definitions().len(), 5);
        assert_eq!(registry.default_type(), "file-operation");
        assert_eq!(registry.definition("api-call").icon, Icon::Globe);
        assert_eq!(registry.definition("notification").name, "Notification");
    }

    #[test]
    fn test_unknown_type_falls_back_to_default() {
        let registry = TypeRegistry::default();
        let definition = registry.definition("no-such-type");

        assert_eq!(definition.name, "File Operation");
        assert!(!registry.contains("no-such-type"));
    }

    #[test]
    fn test_caller_overrides_win() {
        let mut config = EventTypeConfig::default();
        config.event_types.insert(
            "database".to_string(),
            EventTypeSpec::new("DB", "Database", "#06b6d4", "#cffafe", "#ecfeff"),
        );
        config.event_types.insert(
            "custom".to_string(),
            EventTypeSpec::new("Custom", "Cpu", "#000", "#111", "#222"),
        );
        config.default_event_type = Some("custom".to_string());

        let registry = TypeRegistry::new(config);

        assert_eq!(registry.definitions().len(), 6);
        assert_eq!(registry.definition("database").name, "DB");
        assert_eq!(registry.definition("database").color.primary, "#06b6d4");
        assert_eq!(registry.definition("unknown").name, "Custom");
    }

    #[test]
    fn test_missing_default_type_is_replaced() {
        let config = EventTypeConfig {
            default_event_type: Some("ghost".to_string()),
            ..Default::default()
        };
        let registry = TypeRegistry::new(config);

        assert_eq!(registry.default_type(), FALLBACK_EVENT_TYPE);
        assert_eq!(registry.definition("ghost").name, "File Operation");
    }

    #[test]
    fn test_config_layering() {
        let mut base = EventTypeConfig::default();
        base.event_types.insert(
            "job".to_string(),
            EventTypeSpec::new("Job", "Cpu", "#1", "#2", "#3"),
        );
        base.default_event_type = Some("job".to_string());

        let mut top = EventTypeConfig::default();
        top.event_types.insert(
            "job".to_string(),
            EventTypeSpec::new("Batch Job", "Zap", "#1", "#2", "#3"),
        );

        let merged = base.merged_with(top);
        assert_eq!(merged.event_types["job"].name, "Batch Job");
        assert_eq!(merged.default_event_type.as_deref(), Some("job"));
    }

    #[test]
    fn test_icon_resolution() {
        assert_eq!(Icon::resolve("Bell"), Icon::Bell);
        assert_eq!(Icon::resolve("Sparkles"), Icon::FALLBACK);
        assert!("Sparkles".parse::<Icon>().is_err());
    }

    #[test]
    fn test_type_config_yaml() {
        let yaml = r##"
default_event_type: custom-operation
event_types:
  custom-operation:
    name: Custom Operation
    icon: Server
    color:
      primary: "#8b5cf6"
      secondary: "#ede9fe"
      background: "#f5f3ff"
    icon_background:
      primary: "#8b5cf6"
      secondary: "#7c3aed"
node_styles:
  width: 280px
"##;
        let config = EventTypeConfig::from_yaml(yaml).unwrap();
        let registry = TypeRegistry::new(config);

        let definition = registry.definition("custom-operation");
        assert_eq!(definition.icon, Icon::Server);
        assert_eq!(
            definition.icon_background.as_ref().unwrap().secondary.as_deref(),
            Some("#7c3aed")
        );
        assert_eq!(
            registry.node_styles().unwrap().width.as_deref(),
            Some("280px")
        );
    }
}
