//! Line-oriented stand-in for the slider windows.
//!
//! Every `set` moves one slider and re-runs the whole inspection, then
//! rewrites the previews in the output directory so an image viewer that
//! watches the files shows the new state.

use crate::report::{print_summary, write_previews, write_reference_only};
use shiftdiff::{Frame, Session, Slider};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const HELP: &str = "\
commands:
  set <slider> <value>   move a slider and refresh
  sliders                list sliders with their values and ranges
  show                   print the last result again
  save [dir]             write previews to dir (default: output dir)
  help                   show this text
  quit | q | esc         leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Set(Slider, u32),
    Sliders,
    Show,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "set" => {
                let (Some(name), Some(value)) = (words.next(), words.next()) else {
                    return Err("usage: set <slider> <value>".to_string());
                };
                let slider: Slider = name.parse().map_err(|err| format!("{err}"))?;
                let value: u32 = value
                    .parse()
                    .map_err(|_| format!("`{value}` is not a non-negative integer"))?;
                Command::Set(slider, value)
            }
            "sliders" | "get" => Command::Sliders,
            "show" => Command::Show,
            "save" => Command::Save(words.next().map(PathBuf::from)),
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" | "esc" => Command::Quit,
            other => return Err(format!("unknown command `{other}`; try `help`")),
        };
        Ok(Some(command))
    }
}

pub fn run(
    mut session: Session,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut frame = session.refresh()?;
    report(&session, &frame, output_dir.as_deref());
    println!("{HELP}");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let command = match Command::parse(&line?) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Set(slider, value) => {
                frame = session.set(slider, value)?;
                let stored = session.params().get(slider);
                if stored != value {
                    println!("{slider} clamped to {stored}");
                }
                report(&session, &frame, output_dir.as_deref());
            }
            Command::Sliders => {
                for slider in Slider::ALL {
                    println!(
                        "{:<13} {:>5}  (0..={})",
                        slider.name(),
                        session.params().get(slider),
                        slider.max()
                    );
                }
            }
            Command::Show => report(&session, &frame, None),
            Command::Save(dir) => match dir.or_else(|| output_dir.clone()) {
                Some(dir) => save(&frame, &dir),
                None => println!("no directory given and no output directory configured"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
    Ok(())
}

fn report(session: &Session, frame: &Frame, output_dir: Option<&Path>) {
    match &frame.result {
        Ok(findings) => print_summary(&findings.inspection, session.params().min_area),
        Err(err) => println!("inspection failed: {err}"),
    }
    if let Some(dir) = output_dir {
        save(frame, dir);
    }
}

fn save(frame: &Frame, dir: &Path) {
    let written = match frame.previews() {
        Some(previews) => write_previews(dir, &previews),
        None => write_reference_only(dir, &frame.reference_preview).map(|removed| {
            for path in removed {
                println!("removed stale {}", path.display());
            }
        }),
    };
    if let Err(err) = written {
        tracing::warn!(error = %err, "failed to write previews");
        println!("could not write previews: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::Command;
    use shiftdiff::Slider;
    use std::path::PathBuf;

    #[test]
    fn parses_set_commands() {
        assert_eq!(
            Command::parse("set threshold 80").unwrap(),
            Some(Command::Set(Slider::Threshold, 80))
        );
        assert_eq!(
            Command::parse("  SET tpl_x 12 ").unwrap(),
            Some(Command::Set(Slider::TplX, 12))
        );
    }

    #[test]
    fn rejects_malformed_set() {
        assert!(Command::parse("set threshold").is_err());
        assert!(Command::parse("set threshold -3").is_err());
        assert!(Command::parse("set zoom 3").is_err());
    }

    #[test]
    fn parses_other_commands() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("esc").unwrap(), Some(Command::Quit));
        assert_eq!(
            Command::parse("save out").unwrap(),
            Some(Command::Save(Some(PathBuf::from("out"))))
        );
        assert_eq!(Command::parse("save").unwrap(), Some(Command::Save(None)));
        assert!(Command::parse("zoom").is_err());
    }
}
