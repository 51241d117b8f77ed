//!
//! Edit one masked field on the terminal.
//!
//! `cargo run --example mask_demo -- cpf`
//!
//! The argument is one of cpf, cnpj, date, cep, mobile, phone or
//! none. Esc quits, Enter prints the value.
//!

use anyhow::anyhow;
use rat_mask::MaskId;
use rat_mask::event::{Outcome, TextOutcome};
use rat_mask::masked_field::{MaskedFieldState, handle_events};
use ratatui_crossterm::crossterm::cursor::MoveToColumn;
use ratatui_crossterm::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, read};
use ratatui_crossterm::crossterm::terminal::{
    Clear, ClearType, disable_raw_mode, enable_raw_mode,
};
use ratatui_crossterm::crossterm::{event, execute};
use std::fs;
use std::io::{Write, stdout};
use std::path::PathBuf;

fn main() -> Result<(), anyhow::Error> {
    setup_logging()?;

    let name = std::env::args().nth(1).unwrap_or("cpf".into());
    let id = MaskId::from_name(&name).ok_or_else(|| anyhow!("unknown mask {:?}", name))?;

    let mut state = MaskedFieldState::new().with_mask(id)?;
    if id == MaskId::None {
        state.set_placeholder("type something")?;
        state.set_regex("[0-9]")?;
    }

    enable_raw_mode()?;
    execute!(stdout(), event::EnableBracketedPaste)?;
    let r = run(&mut state);
    execute!(stdout(), event::DisableBracketedPaste)?;
    disable_raw_mode()?;
    println!();
    r
}

fn run(state: &mut MaskedFieldState) -> Result<(), anyhow::Error> {
    render(state)?;
    loop {
        let event = read()?;
        match &event {
            Event::Key(KeyEvent {
                code: KeyCode::Esc,
                kind: KeyEventKind::Press,
                ..
            }) => return Ok(()),
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                kind: KeyEventKind::Press,
                ..
            }) => {
                log::debug!(
                    "value {:?} complete {}",
                    state.value(),
                    state.is_complete()
                );
            }
            _ => {}
        }

        let r = handle_events(state, true, &event);
        if r == TextOutcome::TextChanged {
            log::debug!("text {:?}", state.text());
        }
        if Outcome::from(r) == Outcome::Changed {
            render(state)?;
        }
    }
}

fn render(state: &MaskedFieldState) -> Result<(), anyhow::Error> {
    let mut out = stdout();
    let sel = state.selection();
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    write!(out, "{}: {}", state.mask_id(), state.display_text())?;
    if !sel.is_empty() {
        write!(out, "  [{}]", state.selected_text())?;
    }
    let prefix = state.mask_id().name().chars().count() as u16 + 2;
    execute!(out, MoveToColumn(prefix + state.cursor() as u16))?;
    out.flush()?;
    Ok(())
}

fn setup_logging() -> Result<(), anyhow::Error> {
    let log = PathBuf::from("mask.log");
    if log.exists() {
        fs::remove_file(&log)?;
    }
    fern::Dispatch::new()
        .format(|out, message, _record| out.finish(format_args!("{}", message)))
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(&log)?)
        .apply()?;
    Ok(())
}
