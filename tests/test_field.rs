use rat_mask::clipboard::{Clipboard, LocalClipboard};
use rat_mask::event::{HandleEvent, Regular, TextOutcome};
use rat_mask::masked_field::{MaskedFieldState, handle_events};
use rat_mask::{MaskError, MaskId, MaskRegistry};
use ratatui_crossterm::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers,
};
use std::rc::Rc;

fn key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn code(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn shift(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::SHIFT))
}

fn release(c: char) -> Event {
    Event::Key(KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    })
}

fn date_field() -> (MaskedFieldState, LocalClipboard) {
    let clip = LocalClipboard::new();
    let mut state = MaskedFieldState::new()
        .with_clipboard(clip.clone())
        .with_mask(MaskId::Date)
        .expect("registered");
    state.set_focused(true);
    (state, clip)
}

#[test]
fn test_config() {
    let r = MaskedFieldState::new()
        .with_placeholder("birthday")
        .and_then(|v| v.with_mask(MaskId::Date));
    assert!(matches!(r, Err(MaskError::ConflictingConfiguration)));

    let mut state = MaskedFieldState::new()
        .with_mask(MaskId::Cpf)
        .expect("registered");
    assert_eq!(
        state.set_placeholder("cpf"),
        Err(MaskError::ConflictingConfiguration)
    );
    assert_eq!(state.placeholder(), None);
    assert_eq!(state.mask_id(), MaskId::Cpf);
    assert_eq!(state.text(), "___.___.___-__");
    assert!(state.set_placeholder("").is_ok());

    assert!(state.set_mask(MaskId::None).is_ok());
    assert!(!state.is_masked());
    assert_eq!(state.text(), "");
    assert!(state.set_placeholder("cpf").is_ok());
    assert_eq!(state.display_text(), "cpf");

    assert!(matches!(
        state.set_regex("[0-9"),
        Err(MaskError::InvalidRegex(_))
    ));
    assert_eq!(state.regex(), None);
}

#[test]
fn test_registry() {
    let registry =
        Rc::new(MaskRegistry::from_templates([(MaskId::Cep, "_____-___")]).expect("valid"));

    let r = MaskedFieldState::new()
        .with_registry(registry.clone())
        .with_mask(MaskId::Date);
    assert!(matches!(r, Err(MaskError::UnknownTemplate(MaskId::Date))));

    let mut state = MaskedFieldState::new().with_registry(registry);
    assert_eq!(
        state.set_mask(MaskId::Date),
        Err(MaskError::UnknownTemplate(MaskId::Date))
    );
    assert!(!state.is_masked());
    assert!(state.set_mask(MaskId::Cep).is_ok());
    assert_eq!(state.text(), "_____-___");
}

#[test]
fn test_keys() {
    let (mut state, _) = date_field();

    assert_eq!(state.handle(&key('2'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.handle(&key('4'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "24/__/____");
    assert_eq!(state.cursor(), 3);

    // ignored
    assert_eq!(state.handle(&key('a'), Regular), TextOutcome::Unchanged);
    assert_eq!(state.handle(&code(KeyCode::F(2)), Regular), TextOutcome::Unchanged);
    assert_eq!(state.handle(&ctrl('z'), Regular), TextOutcome::Unchanged);
    assert_eq!(state.handle(&release('2'), Regular), TextOutcome::Unchanged);
    assert_eq!(state.text(), "24/__/____");

    // space skips
    assert_eq!(state.handle(&key(' '), Regular), TextOutcome::Changed);
    assert_eq!(state.cursor(), 4);
    assert_eq!(state.text(), "24/__/____");
    // and typing fills the next empty slot
    assert_eq!(state.handle(&key('1'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "24/1_/____");
    assert_eq!(state.cursor(), 4);

    assert_eq!(
        state.handle(&code(KeyCode::Backspace), Regular),
        TextOutcome::TextChanged
    );
    assert_eq!(state.text(), "24/__/____");
    assert_eq!(state.cursor(), 3);

    assert_eq!(state.handle(&code(KeyCode::Left), Regular), TextOutcome::Changed);
    assert_eq!(state.cursor(), 2);
    assert_eq!(state.handle(&code(KeyCode::Home), Regular), TextOutcome::Changed);
    assert_eq!(state.handle(&code(KeyCode::Home), Regular), TextOutcome::Unchanged);
    assert_eq!(state.handle(&shift(KeyCode::Right), Regular), TextOutcome::Changed);
    assert_eq!(state.selection(), 0..1);
    assert_eq!(
        state.handle(&code(KeyCode::Delete), Regular),
        TextOutcome::TextChanged
    );
    assert_eq!(state.text(), "4_/__/____");
    assert_eq!(state.cursor(), 0);

    // left to the host
    assert_eq!(state.handle(&code(KeyCode::Tab), Regular), TextOutcome::Continue);
    assert_eq!(state.handle(&code(KeyCode::Enter), Regular), TextOutcome::Continue);
    assert_eq!(state.handle(&Event::FocusLost, Regular), TextOutcome::Continue);
}

#[test]
fn test_focus() {
    let (mut state, _) = date_field();
    assert_eq!(handle_events(&mut state, false, &key('1')), TextOutcome::Continue);
    assert_eq!(state.text(), "__/__/____");
    assert_eq!(handle_events(&mut state, true, &key('1')), TextOutcome::TextChanged);
    assert_eq!(state.text(), "1_/__/____");
}

#[test]
fn test_clipboard() {
    let (mut state, clip) = date_field();
    state.set_text("24/1_/____").expect("valid");

    assert_eq!(state.handle(&ctrl('a'), Regular), TextOutcome::Changed);
    assert_eq!(state.handle(&ctrl('c'), Regular), TextOutcome::Changed);
    assert_eq!(clip.get_string().expect("clip"), "24/1 /    ");

    assert_eq!(state.handle(&ctrl('x'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "__/__/____");
    assert_eq!(state.cursor(), 0);

    assert_eq!(state.handle(&ctrl('v'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "24/1_/____");
    assert_eq!(state.cursor(), 4);

    // nothing selected
    assert_eq!(state.handle(&ctrl('c'), Regular), TextOutcome::Unchanged);

    clip.set_string("no digits").expect("clip");
    assert_eq!(state.handle(&ctrl('v'), Regular), TextOutcome::Unchanged);
    assert_eq!(state.text(), "24/1_/____");

    state.set_clipboard(None::<LocalClipboard>);
    state.select_all();
    assert_eq!(state.handle(&ctrl('c'), Regular), TextOutcome::Unchanged);
}

#[test]
fn test_backspace_empty_slot() {
    let (mut state, _) = date_field();
    state.set_text("12/__/____").expect("valid");
    state.set_cursor(5, false);

    // no digit to remove, the cursor moves to the slot
    assert_eq!(
        state.handle(&code(KeyCode::Backspace), Regular),
        TextOutcome::Changed
    );
    assert_eq!(state.text(), "12/__/____");
    assert_eq!(state.cursor(), 4);

    assert_eq!(
        state.handle(&code(KeyCode::Backspace), Regular),
        TextOutcome::Changed
    );
    assert_eq!(state.cursor(), 3);
    assert_eq!(
        state.handle(&code(KeyCode::Backspace), Regular),
        TextOutcome::TextChanged
    );
    assert_eq!(state.text(), "1_/__/____");
    assert_eq!(state.cursor(), 1);
}

#[test]
fn test_cut_literal() {
    let (mut state, clip) = date_field();
    state.set_text("12/34/____").expect("valid");
    clip.set_string("x").expect("clip");

    state.set_selection(2, 3);
    assert_eq!(state.handle(&ctrl('x'), Regular), TextOutcome::Unchanged);
    assert_eq!(clip.get_string().expect("clip"), "x");
    assert_eq!(state.text(), "12/34/____");

    // copy still works
    assert_eq!(state.handle(&ctrl('c'), Regular), TextOutcome::Changed);
    assert_eq!(clip.get_string().expect("clip"), "/");
}

#[test]
fn test_paste_event() {
    let (mut state, _) = date_field();
    let r = state.handle(&Event::Paste("01.02.2003".into()), Regular);
    assert_eq!(r, TextOutcome::TextChanged);
    assert_eq!(state.text(), "01/02/2003");
    assert!(state.is_complete());
    assert_eq!(state.value(), "01022003");

    let r = state.handle(&Event::Paste("4".into()), Regular);
    assert_eq!(r, TextOutcome::Unchanged);
}

#[test]
fn test_set_text() {
    let (mut state, _) = date_field();
    assert!(matches!(
        state.set_text("1_/2_/____"),
        Err(MaskError::InvalidText(_))
    ));
    assert!(matches!(
        state.set_text("12-__-____"),
        Err(MaskError::InvalidText(_))
    ));
    assert!(state.set_text("12/__/____").is_ok());
    assert_eq!(state.cursor(), 3);
    assert!(state.set_text("").is_ok());
    assert_eq!(state.text(), "__/__/____");
    assert!(state.is_empty());
    assert!(!state.clear());
}

#[test]
fn test_free_text() {
    let mut state = MaskedFieldState::new()
        .with_placeholder("name")
        .and_then(|v| v.with_regex("[0-9]"))
        .expect("valid");
    state.set_focused(true);
    assert_eq!(state.display_text(), "name");

    assert_eq!(state.handle(&key('a'), Regular), TextOutcome::TextChanged);
    assert_eq!(
        state.handle(
            &Event::Key(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT)),
            Regular
        ),
        TextOutcome::TextChanged
    );
    assert_eq!(state.handle(&key('1'), Regular), TextOutcome::Unchanged);
    assert_eq!(state.handle(&Event::Paste("c2".into()), Regular), TextOutcome::Unchanged);
    assert_eq!(state.handle(&key(' '), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "aB ");
    assert_eq!(state.display_text(), "aB ");
    assert!(state.is_complete());

    // unknown keys are not swallowed
    assert_eq!(state.handle(&code(KeyCode::F(2)), Regular), TextOutcome::Continue);

    assert_eq!(
        state.handle(&code(KeyCode::Backspace), Regular),
        TextOutcome::TextChanged
    );
    assert_eq!(state.handle(&shift(KeyCode::Home), Regular), TextOutcome::Changed);
    assert_eq!(state.selected_text(), "aB");
    assert_eq!(state.handle(&key('x'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "x");

    assert!(state.set_regex("").is_ok());
    assert_eq!(state.handle(&key('1'), Regular), TextOutcome::TextChanged);
    assert_eq!(state.text(), "x1");
}
