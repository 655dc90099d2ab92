//! # menukit-button
//!
//! Buttons that occupy menu slots, and the builder that creates them from
//! slot-group sections.
//!
//! - `IconButton` (`type = "simple"`, the default): a single icon.
//! - `ListButton` (`type = "list"`): ordered children behind a per-viewer
//!   cursor, built recursively from a `child` section.
//! - `resolve_slots`: which slots a slot group occupies.

pub mod builder;
pub mod icon;
pub mod list;
pub mod slots;

pub use builder::{ButtonBuilder, ButtonFactory};
pub use icon::IconButton;
pub use list::ListButton;
pub use slots::resolve_slots;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use menukit_contracts::{
        config::{ConfigValue, Section},
        display::RenderedIcon,
        error::MenuError,
        player::{PlayerId, SessionId, Viewer},
    };
    use menukit_core::traits::Button;

    use crate::{resolve_slots, testing::services, ButtonBuilder, IconButton, ListButton};

    /// Renders its label as the material and counts refreshes.
    struct Label {
        label: &'static str,
        refreshes: Arc<AtomicUsize>,
    }

    impl Button for Label {
        fn render(&self, _viewer: &Viewer) -> Option<RenderedIcon> {
            Some(RenderedIcon::new(self.label))
        }

        fn refresh(&self, _player: &PlayerId) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn labels(names: &[&'static str], refreshes: &Arc<AtomicUsize>) -> Vec<Arc<dyn Button>> {
        names
            .iter()
            .map(|&label| Arc::new(Label { label, refreshes: refreshes.clone() }) as Arc<dyn Button>)
            .collect()
    }

    fn material(button: &dyn Button, viewer: &Viewer) -> Option<String> {
        button.render(viewer).map(|icon| icon.material)
    }

    fn viewer(player: PlayerId) -> Viewer {
        Viewer::new(player, SessionId::new())
    }

    // ── ListButton ───────────────────────────────────────────────────────────

    #[test]
    fn list_renders_child_at_cursor_and_clamps() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let list = ListButton::new(labels(&["a", "b", "c"], &refreshes), false);
        let v = viewer(PlayerId::new());

        assert_eq!(material(&list, &v).as_deref(), Some("a"));
        assert!(list.advance(&v, 1));
        assert_eq!(material(&list, &v).as_deref(), Some("b"));
        assert!(list.advance(&v, 10));
        assert_eq!(list.current_index(&v), 2);
        assert!(!list.advance(&v, 1));
        assert!(list.advance(&v, -99));
        assert_eq!(list.current_index(&v), 0);
    }

    #[test]
    fn empty_list_renders_nothing() {
        let list = ListButton::new(Vec::new(), true);
        let v = viewer(PlayerId::new());

        assert!(list.render(&v).is_none());
        assert!(!list.advance(&v, 1));
        assert_eq!(list.current_index(&v), 0);
    }

    #[test]
    fn refresh_reaches_every_child() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let list = ListButton::new(labels(&["a", "b", "c"], &refreshes), false);

        list.refresh(&PlayerId::new());

        assert_eq!(refreshes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn session_cursor_resets_on_reopen() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let list = ListButton::new(labels(&["a", "b"], &refreshes), false);
        let player = PlayerId::new();
        let first = viewer(player);

        list.advance(&first, 1);
        list.close(&first);
        assert_eq!(list.current_index(&first), 0);

        let second = viewer(player);
        assert_eq!(material(&list, &second).as_deref(), Some("a"));
    }

    #[test]
    fn player_cursor_survives_reopen() {
        let refreshes = Arc::new(AtomicUsize::new(0));
        let list = ListButton::new(labels(&["a", "b"], &refreshes), true);
        let player = PlayerId::new();
        let first = viewer(player);

        list.advance(&first, 1);
        list.close(&first);

        let second = viewer(player);
        assert_eq!(material(&list, &second).as_deref(), Some("b"));
        // Another player starts from the beginning.
        assert_eq!(material(&list, &viewer(PlayerId::new())).as_deref(), Some("a"));
    }

    // ── ButtonBuilder ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn builder_builds_nested_lists() {
        let section = Section::from_toml_str(
            r#"
            type = "list"
            keep-current-index = true

            [child.first]
            id = "paper"
            name = "&6{rank} member"

            [child.second]
            type = "list"
            [child.second.child.inner]
            id = "DIAMOND"

            [child.broken]
            type = "teleporter"
            "#,
        )
        .expect("valid toml");

        let button = ButtonBuilder::new().build(&section, &services()).expect("list builds");
        let v = viewer(PlayerId::new());

        let icon = button.render(&v).expect("first child renders");
        assert_eq!(icon.material, "PAPER");
        assert_eq!(icon.display_name.as_deref(), Some("\u{00A7}6Gold member"));

        assert!(button.advance(&v, 1));
        assert_eq!(material(button.as_ref(), &v).as_deref(), Some("DIAMOND"));
        // The broken child was skipped, so there are only two.
        assert!(!button.advance(&v, 1));
    }

    #[tokio::test]
    async fn list_without_child_section_is_rejected() {
        let err = ButtonBuilder::new()
            .build(&Section::new().with("type", "list"), &services())
            .err();

        assert!(matches!(err, Some(MenuError::ConfigError { .. })));
    }

    #[tokio::test]
    async fn unknown_button_type_is_rejected() {
        let err = ButtonBuilder::new()
            .build(&Section::new().with("type", "animated"), &services())
            .err();

        assert!(matches!(err, Some(MenuError::UnknownComponent { kind: "button", .. })));
    }

    #[tokio::test]
    async fn icon_defaults_and_amount_clamp() {
        let section = Section::new().with("amount", 500_i64).with("lore", vec!["&7one", "two"]);
        let button = ButtonBuilder::new().build(&section, &services()).expect("icon builds");

        let icon = button.render(&viewer(PlayerId::new())).expect("icon renders");
        assert_eq!(icon.material, "STONE");
        assert_eq!(icon.amount, 64);
        assert_eq!(icon.display_name, None);
        assert_eq!(icon.lore, vec!["\u{00A7}7one".to_string(), "two".to_string()]);
    }

    #[tokio::test]
    async fn icon_text_is_formatted_per_viewer() {
        let button = IconButton::new("PAPER", services())
            .with_name("&b{rank}")
            .with_lore(vec!["for {player}".to_string()]);
        let player = PlayerId::new();

        let icon = button.render(&viewer(player)).expect("icon renders");
        assert_eq!(icon.display_name.as_deref(), Some("\u{00A7}bGold"));
        assert_eq!(icon.lore, vec![format!("for {}", player)]);
    }

    // ── Slots ────────────────────────────────────────────────────────────────

    #[test]
    fn slots_accept_numbers_lists_and_ranges() {
        assert_eq!(resolve_slots(&Section::new().with("slot", 4_i64)).unwrap(), vec![4]);
        assert_eq!(
            resolve_slots(&Section::new().with("slot", vec!["0-2", "5, 7"])).unwrap(),
            vec![0, 1, 2, 5, 7]
        );
        assert_eq!(
            resolve_slots(&Section::new().with("slot", "1-3, 2")).unwrap(),
            vec![1, 2, 3]
        );
        assert!(resolve_slots(&Section::new()).unwrap().is_empty());
    }

    #[test]
    fn slots_accept_positions() {
        let section = Section::new().with("position-x", 3_i64).with("position-y", 2_i64);
        assert_eq!(resolve_slots(&section).unwrap(), vec![11]);

        let column_only = Section::new().with("position-x", 9_i64);
        assert_eq!(resolve_slots(&column_only).unwrap(), vec![8]);
    }

    #[test]
    fn invalid_slots_are_errors() {
        assert!(resolve_slots(&Section::new().with("slot", "abc")).is_err());
        assert!(resolve_slots(&Section::new().with("slot", "5-2")).is_err());
        assert!(resolve_slots(&Section::new().with("position-x", 10_i64)).is_err());
        assert!(resolve_slots(&Section::new().with("position-y", 0_i64)).is_err());
    }

    #[test]
    fn huge_positions_are_errors() {
        let far_down = Section::new().with("position-y", ConfigValue::Float(1e20));
        assert!(matches!(resolve_slots(&far_down), Err(MenuError::ConfigError { .. })));
    }

    #[test]
    fn ranges_stop_at_the_largest_inventory() {
        let unbounded = Section::new().with("slot", "0-99999999999");
        assert!(matches!(resolve_slots(&unbounded), Err(MenuError::ConfigError { .. })));
        assert!(resolve_slots(&Section::new().with("slot", "50-54")).is_err());
        assert_eq!(resolve_slots(&Section::new().with("slot", "50-53")).unwrap(), vec![50, 51, 52, 53]);
    }
}
