//! Line-oriented session over the form. Each edit redraws the results, the
//! way the browser form recomputed on every keystroke.

use super::form::{Field, Form};
use super::ui;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  set <field> [value]   change a field (blank value clears it) and recalculate
  calc                  recalculate and show results
  save                  save the current fields on this device
  load                  restore the saved fields
  clear                 reset all fields
  show                  list the current field values
  help                  show this help
  quit                  leave the session

Fields: start-date, end-date, begin-balance, end-balance, net-flow,
        timing (start|mid|end|none), annualize (yes|no)";

/// Runs commands read from `input` until it is exhausted or `quit` is given.
pub fn run<R: BufRead, W: Write>(form: &mut Form, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "{}", ui::style_text("Gain calculator", ui::StyleType::Title))?;
    writeln!(out, "Type 'help' for commands.")?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        debug!(command, "Interactive command");
        match command.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "?" => writeln!(out, "{HELP}")?,
            "show" => writeln!(out, "{}", form.describe_fields())?,
            "calc" => writeln!(out, "{}", form.render())?,
            "set" => set_field(form, rest.trim(), out)?,
            "save" => match form.save() {
                Ok(_) => writeln!(out, "{}", form.render())?,
                Err(e) => {
                    warn!(error = %e, "Save failed");
                    let message = format!("Error: {e:#}");
                    writeln!(out, "{}", ui::style_text(&message, ui::StyleType::Error))?;
                }
            },
            "load" => {
                form.load();
                writeln!(out, "{}", form.render())?;
            }
            "clear" => {
                form.clear();
                writeln!(out, "{}", form.render())?;
            }
            other => writeln!(
                out,
                "{}",
                ui::style_text(
                    &format!("Unknown command: {other}. Type 'help' for commands."),
                    ui::StyleType::Error
                )
            )?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn set_field<W: Write>(form: &mut Form, args: &str, out: &mut W) -> Result<()> {
    let (name, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    if name.is_empty() {
        writeln!(
            out,
            "{}",
            ui::style_text("Usage: set <field> [value]", ui::StyleType::Error)
        )?;
        return Ok(());
    }

    let result = name
        .parse::<Field>()
        .and_then(|field| form.set(field, value.trim()));
    match result {
        Ok(_) => writeln!(out, "{}", form.render())?,
        Err(e) => writeln!(
            out,
            "{}",
            ui::style_text(&format!("Error: {e}"), ui::StyleType::Error)
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::DEFAULT_STORAGE_KEY;
    use crate::core::{FlowTiming, PersistenceAdapter};
    use crate::store::memory::MemoryCollection;
    use std::io::Cursor;
    use std::sync::Arc;

    fn session(form: &mut Form, script: &str) -> String {
        let mut out = Vec::new();
        run(form, Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn form() -> Form {
        Form::new(PersistenceAdapter::new(
            Arc::new(MemoryCollection::new()),
            DEFAULT_STORAGE_KEY,
        ))
    }

    #[test]
    fn set_commands_recompute_results() {
        let mut form = form();
        let output = session(
            &mut form,
            "set begin $10,000\nset end-balance 12000\nset flow 1000\nset timing start\n",
        );

        assert!(output.contains("$2,000.00"));
        assert!(output.contains("$1,000.00"));
        assert!(output.contains("9.09%"));
        assert_eq!(form.fields().flow_timing, FlowTiming::Start);
    }

    #[test]
    fn set_without_value_blanks_field() {
        let mut form = form();
        session(&mut form, "set begin 100\nset begin\n");
        assert_eq!(form.fields().begin_balance, "");
    }

    #[test]
    fn save_clear_load_cycle() {
        let mut form = form();
        let output = session(
            &mut form,
            "set start 2024-01-01\nset end 2025-01-01\nset begin 500\nsave\nclear\nload\n",
        );

        assert!(output.contains("Saved to this device."));
        assert!(output.contains("Loaded saved values."));
        assert_eq!(form.fields().start_date, "2024-01-01");
        assert_eq!(form.fields().begin_balance, "500");
    }

    #[test]
    fn reports_errors_and_keeps_going() {
        let mut form = form();
        let output = session(
            &mut form,
            "frobnicate\nset nowhere 1\nset timing later\nset\nload\nshow\nquit\nset begin 1\n",
        );

        assert!(output.contains("Unknown command: frobnicate"));
        assert!(output.contains("Unknown field: nowhere"));
        assert!(output.contains("Invalid flow timing"));
        assert!(output.contains("Usage: set"));
        assert!(output.contains("Nothing saved yet on this device."));
        assert!(output.contains("net-flow: 0"));
        // Input after quit is ignored
        assert_eq!(form.fields().begin_balance, "");
    }
}
