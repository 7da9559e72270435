use care_core::ShortcutConfig;
use care_keymap::{BindingSpec, KeyChord, Keymap, KeymapError, Modifiers};

#[test]
fn parses_modifiers_in_any_order() {
    let a = KeyChord::parse("ctrl+shift+k").expect("chord hợp lệ");
    let b = KeyChord::parse("Shift + Control + K").expect("chord hợp lệ");

    assert_eq!(a, b);
    assert_eq!(a.key(), "k");
    assert_eq!(
        a.modifiers(),
        Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::default()
        }
    );
    assert_eq!(b.to_string(), "ctrl+shift+k");
}

#[test]
fn aliases_are_normalized() {
    assert_eq!(
        KeyChord::parse("cmd+option+Return").expect("chord hợp lệ").to_string(),
        "alt+meta+enter"
    );
    assert_eq!(KeyChord::parse("Esc").expect("chord hợp lệ").key(), "escape");
    assert!(KeyChord::parse("?").expect("chord hợp lệ").modifiers().none());
}

#[test]
fn plus_can_be_the_key() {
    assert_eq!(KeyChord::parse("+").expect("chord hợp lệ").key(), "+");
    assert_eq!(
        KeyChord::parse("ctrl++").expect("chord hợp lệ").to_string(),
        "ctrl++"
    );
}

#[test]
fn rejects_malformed_chords() {
    assert!(matches!(KeyChord::parse("  "), Err(KeymapError::EmptyChord)));
    assert!(matches!(KeyChord::parse("ctrl+shift"), Err(KeymapError::MissingKey(_))));
    assert!(matches!(KeyChord::parse("ctrl+"), Err(KeymapError::MissingKey(_))));
    assert!(matches!(KeyChord::parse("a+b"), Err(KeymapError::MultipleKeys(_))));
    assert!(matches!(KeyChord::parse("a++"), Err(KeymapError::MultipleKeys(_))));
}

#[test]
fn rejects_bad_bindings() {
    let mut keymap = Keymap::new(&ShortcutConfig::default()).expect("config hợp lệ");
    let err = keymap
        .insert(BindingSpec {
            scope: " :: ".to_string(),
            keys: "ctrl+p".to_string(),
            action: "print".to_string(),
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, KeymapError::EmptyScope { .. }));
    assert!(keymap.is_empty());

    assert!(matches!(
        Keymap::from_json_str("{\"bindings\": 3}", &ShortcutConfig::default()),
        Err(KeymapError::Parse(_))
    ));

    let bad_config = ShortcutConfig {
        hierarchy_separator: String::new(),
        ..ShortcutConfig::default()
    };
    assert!(matches!(
        Keymap::new(&bad_config),
        Err(KeymapError::Config(_))
    ));
}
