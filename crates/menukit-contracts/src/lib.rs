//! # menukit-contracts
//!
//! Shared types, configuration model, and contracts for the menukit runtime.
//!
//! All crates in the workspace import from here. No session logic lives in
//! this crate, only identities, the configuration tree, render output,
//! lifecycle enums and error types.

pub mod config;
pub mod display;
pub mod error;
pub mod lifecycle;
pub mod player;
pub mod settings;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use config::{ConfigValue, Section};
    use error::MenuError;
    use player::{PlayerId, SessionId};
    use settings::{InventoryShape, PluginSettings};

    // ── Section ──────────────────────────────────────────────────────────────

    #[test]
    fn section_lookup_ignores_case() {
        let section = Section::new().with("Menu-Settings", "x");

        assert!(section.get("menu-settings").is_some());
        assert!(section.get("MENU-SETTINGS").is_some());
        assert!(section.get("menu_settings").is_none());
    }

    #[test]
    fn section_insert_replaces_in_place() {
        let mut section = Section::new().with("a", "1").with("b", "2");
        section.insert("A", "3");

        let keys: Vec<&str> = section.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(section.get("a"), Some(&ConfigValue::from("3")));
    }

    #[test]
    fn section_from_toml_keeps_declaration_order() {
        let doc = r#"
            [zeta]
            slot = 1
            [alpha]
            slot = 2
            [middle]
            slot = 3
        "#;
        let section = Section::from_toml_str(doc).unwrap();
        let keys: Vec<&str> = section.iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["zeta", "alpha", "middle"]);
        assert_eq!(
            section.section("alpha").and_then(|s| s.get("slot")),
            Some(&ConfigValue::Integer(2))
        );
    }

    #[test]
    fn section_from_malformed_toml_is_config_error() {
        let err = Section::from_toml_str("[unterminated").unwrap_err();
        assert!(matches!(err, MenuError::ConfigError { .. }));
    }

    // ── ConfigValue ──────────────────────────────────────────────────────────

    #[test]
    fn string_list_from_scalar_and_list() {
        assert_eq!(ConfigValue::from(" shop ").to_string_list(), vec!["shop"]);
        assert_eq!(
            ConfigValue::from(vec!["a", " b"]).to_string_list(),
            vec!["a", "b"]
        );
        assert!(ConfigValue::Section(Section::new()).to_string_list().is_empty());
    }

    #[test]
    fn number_parses_text() {
        assert_eq!(ConfigValue::from("4").as_number(), Some(4.0));
        assert_eq!(ConfigValue::Integer(6).as_number(), Some(6.0));
        assert_eq!(ConfigValue::from("six").as_number(), None);
    }

    #[test]
    fn bool_text_is_true_only_for_true() {
        assert_eq!(ConfigValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(ConfigValue::from("yes").as_bool(), Some(false));
        assert_eq!(ConfigValue::Integer(1).as_bool(), None);
    }

    // ── Settings ─────────────────────────────────────────────────────────────

    #[test]
    fn inventory_shape_parses_case_insensitively() {
        assert_eq!("hopper".parse::<InventoryShape>().unwrap(), InventoryShape::Hopper);
        assert_eq!(
            "ender_chest".parse::<InventoryShape>().unwrap(),
            InventoryShape::EnderChest
        );
        assert!("cauldron".parse::<InventoryShape>().is_err());
    }

    #[test]
    fn settings_default_from_empty_toml() {
        let settings = PluginSettings::from_toml_str("").unwrap();
        assert_eq!(settings.plugin_name, "menukit");
        assert_eq!(settings.tick_millis, 50);
        assert!(settings.messages.invalid_condition.contains("{input}"));
    }

    #[test]
    fn ticks_to_duration_clamps_negative() {
        let settings = PluginSettings::default();
        assert_eq!(settings.ticks_to_duration(5), Duration::from_millis(250));
        assert_eq!(settings.ticks_to_duration(-3), Duration::ZERO);
    }

    // ── Identities ───────────────────────────────────────────────────────────

    #[test]
    fn session_ids_are_unique() {
        let ids: std::collections::HashSet<SessionId> =
            (0..100).map(|_| SessionId::new()).collect();
        assert_eq!(ids.len(), 100);
        assert_ne!(PlayerId::new(), PlayerId::new());
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_unknown_component_display() {
        let err = MenuError::UnknownComponent {
            kind: "requirement",
            name: "levels".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("requirement"));
        assert!(msg.contains("levels"));
    }

    #[test]
    fn error_display_failed_display() {
        let err = MenuError::DisplayFailed {
            reason: "player offline".to_string(),
        };
        assert!(err.to_string().contains("player offline"));
    }
}
