//! Line commands for the terminal front end.
//!
//! Each input line parses into one [`Command`]; [`Command::execute`] maps
//! it onto a [`Dashboard`] operation and returns a short reply.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::api::dto::SimulationParams;
use crate::domain::CameraField;
use crate::error::DashboardError;
use crate::service::{CycleOutcome, Dashboard};
use crate::view::DialogKind;

/// Help text listing every command.
pub const HELP: &str = "\
files                      list event files
load <file>                load an event file
sequences                  list camera sequence files
sequence <file>            load a camera sequence file
rename <serial>            start renaming a camera
name <description>         confirm the rename
choice <serial> <property> start setting a camera property
set <value>                confirm the choice
cancel                     close the open dialog
trigger <serial>           fire one exposure
sim                        open the simulation dialog with defaults
sim start [lat long alt event_id offset]
sim stop                   stop the simulation
poll                       refresh now
show                       print the dashboard
status                     show when the dashboard last updated
quit                       exit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List event files.
    Files,
    /// Load an event file.
    Load(String),
    /// List camera sequence files.
    Sequences,
    /// Load a camera sequence file.
    Sequence(String),
    /// Open the rename dialog.
    Rename(String),
    /// Confirm the rename dialog.
    Name(String),
    /// Open a choice dialog.
    Choice(String, CameraField),
    /// Confirm the choice dialog.
    Set(String),
    /// Close the open dialog.
    Cancel,
    /// Trigger a camera.
    Trigger(String),
    /// Open the simulation dialog.
    SimDefaults,
    /// Start a simulation, with explicit parameters or the dialog's.
    SimStart(Option<SimulationParams>),
    /// Stop the simulation.
    SimStop,
    /// Run a poll cycle now.
    Poll,
    /// Print the document.
    Show,
    /// Print the last update summary.
    Status,
    /// Print help.
    Help,
    /// Exit.
    Quit,
}

impl FromStr for Command {
    type Err = DashboardError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(v, r)| (v, r.trim()));
        let required = |what: &str| -> Result<String, DashboardError> {
            if rest.is_empty() {
                Err(DashboardError::InvalidRequest(format!("{verb} needs {what}")))
            } else {
                Ok(rest.to_string())
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "files" => Ok(Self::Files),
            "load" => required("a file name").map(Self::Load),
            "sequences" => Ok(Self::Sequences),
            "sequence" => required("a file name").map(Self::Sequence),
            "rename" => required("a serial").map(Self::Rename),
            // An empty description is allowed.
            "name" => Ok(Self::Name(rest.to_string())),
            "choice" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(serial), Some(field)) => {
                        Ok(Self::Choice(serial.to_string(), field.parse()?))
                    }
                    _ => Err(DashboardError::InvalidRequest(
                        "choice needs a serial and a property".to_string(),
                    )),
                }
            }
            "set" => required("a value").map(Self::Set),
            "cancel" => Ok(Self::Cancel),
            "trigger" => required("a serial").map(Self::Trigger),
            "sim" => parse_sim(rest),
            "poll" => Ok(Self::Poll),
            "show" | "" => Ok(Self::Show),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(DashboardError::InvalidRequest(format!(
                "unknown command {other:?}, try help"
            ))),
        }
    }
}

fn parse_sim(rest: &str) -> Result<Command, DashboardError> {
    let mut parts = rest.split_whitespace();
    match parts.next() {
        None => Ok(Command::SimDefaults),
        Some("stop") => Ok(Command::SimStop),
        Some("start") => {
            let args: Vec<&str> = parts.collect();
            match args.as_slice() {
                [] => Ok(Command::SimStart(None)),
                [lat, long, alt, event_id, offset] => {
                    let number = |text: &str| {
                        text.parse::<f64>().map_err(|_| {
                            DashboardError::InvalidRequest(format!("not a number: {text}"))
                        })
                    };
                    Ok(Command::SimStart(Some(SimulationParams {
                        gps_latitude: number(lat)?,
                        gps_longitude: number(long)?,
                        gps_altitude: number(alt)?,
                        event_id: (*event_id).to_string(),
                        event_time_offset: number(offset)?,
                    })))
                }
                _ => Err(DashboardError::InvalidRequest(
                    "sim start takes no arguments or lat long alt event_id offset".to_string(),
                )),
            }
        }
        Some(other) => Err(DashboardError::InvalidRequest(format!(
            "unknown sim command {other:?}"
        ))),
    }
}

impl Command {
    /// Runs the command and returns the text to show.
    ///
    /// # Errors
    ///
    /// Returns whatever the dashboard operation returns.
    pub async fn execute(self, dashboard: &Dashboard) -> Result<String, DashboardError> {
        match self {
            Self::Files => dashboard.open_event_files().await.map(|f| numbered(&f)),
            Self::Sequences => dashboard.open_sequence_files().await.map(|f| numbered(&f)),
            Self::Load(name) => {
                let name = pick_file(dashboard, &name).await;
                dashboard.select_event_file(&name).await?;
                Ok(format!("loaded {name}"))
            }
            Self::Sequence(name) => {
                let name = pick_file(dashboard, &name).await;
                let ack = dashboard.select_sequence_file(&name).await?;
                Ok(ack.message.unwrap_or_else(|| format!("loaded {name}")))
            }
            Self::Rename(serial) => {
                dashboard.open_rename(&serial).await?;
                Ok(format!("renaming {serial}; enter: name <description>"))
            }
            Self::Name(text) => {
                dashboard.confirm_rename(&text).await?;
                Ok("description saved".to_string())
            }
            Self::Choice(serial, field) => {
                let choices = dashboard.open_choice(&serial, field).await?;
                Ok(format!("{field} for {serial}: {}", choices.join(", ")))
            }
            Self::Set(value) => {
                dashboard.confirm_choice(&value).await?;
                Ok("value saved".to_string())
            }
            Self::Cancel => {
                dashboard.cancel_dialog().await;
                Ok("cancelled".to_string())
            }
            Self::Trigger(serial) => {
                let ack = dashboard.trigger_camera(&serial).await?;
                Ok(ack.message.unwrap_or_else(|| format!("triggered {serial}")))
            }
            Self::SimDefaults => {
                let p = dashboard.open_simulation().await?;
                Ok(format!(
                    "lat {} long {} alt {} event {} offset {}; enter: sim start",
                    p.gps_latitude, p.gps_longitude, p.gps_altitude, p.event_id, p.event_time_offset
                ))
            }
            Self::SimStart(params) => {
                let params = match params {
                    Some(params) => params,
                    None => match dashboard.dialog().await.kind() {
                        Some(DialogKind::Simulation { params }) => params.clone(),
                        _ => {
                            return Err(DashboardError::InvalidRequest(
                                "open the simulation dialog first: sim".to_string(),
                            ));
                        }
                    },
                };
                let ack = dashboard.start_simulation(&params).await?;
                Ok(ack.message.unwrap_or_else(|| "simulation started".to_string()))
            }
            Self::SimStop => {
                let ack = dashboard.stop_simulation().await?;
                Ok(ack.message.unwrap_or_else(|| "simulation stopped".to_string()))
            }
            Self::Poll => match dashboard.poll_cycle().await {
                CycleOutcome::Applied { revision } => Ok(format!("revision {revision}")),
                CycleOutcome::Skipped => Ok("poll already running".to_string()),
                CycleOutcome::Failed(err) => Err(err),
            },
            Self::Show => Ok(dashboard.render_text().await),
            Self::Status => Ok(dashboard.status().await.to_string()),
            Self::Help => Ok(HELP.to_string()),
            Self::Quit => Ok(String::new()),
        }
    }
}

/// Resolves `1`, `2`, ... against the open file dialog; anything else is
/// taken as a file name.
async fn pick_file(dashboard: &Dashboard, input: &str) -> String {
    let Ok(index) = input.parse::<usize>() else {
        return input.to_string();
    };
    match dashboard.dialog().await.kind() {
        Some(DialogKind::FileSelect { files, .. }) => index
            .checked_sub(1)
            .and_then(|i| files.get(i))
            .cloned()
            .unwrap_or_else(|| input.to_string()),
        _ => input.to_string(),
    }
}

fn numbered(files: &[String]) -> String {
    if files.is_empty() {
        return "No files found.".to_string();
    }
    let mut out = String::new();
    for (i, file) in files.iter().enumerate() {
        let _ = writeln!(out, "{:>3}  {file}", i + 1);
    }
    out
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        let Ok(cmd) = line.parse::<Command>() else {
            panic!("{line:?} must parse");
        };
        cmd
    }

    #[test]
    fn parses_file_commands() {
        assert_eq!(parse("files"), Command::Files);
        assert_eq!(parse("load 2024_04_08.event"), Command::Load("2024_04_08.event".into()));
        assert_eq!(parse("  sequence  eclipse.seq "), Command::Sequence("eclipse.seq".into()));
        assert!("load".parse::<Command>().is_err());
    }

    #[test]
    fn parses_edit_commands() {
        assert_eq!(parse("rename 3006513"), Command::Rename("3006513".into()));
        assert_eq!(parse("name West rig"), Command::Name("West rig".into()));
        assert_eq!(parse("name"), Command::Name(String::new()));
        assert_eq!(
            parse("choice 3006513 f-number"),
            Command::Choice("3006513".into(), CameraField::Fstop)
        );
        assert_eq!(parse("set 1/400"), Command::Set("1/400".into()));
        assert!("choice 3006513".parse::<Command>().is_err());
        assert!("choice 3006513 zoom".parse::<Command>().is_err());
    }

    #[test]
    fn parses_simulation_commands() {
        assert_eq!(parse("sim"), Command::SimDefaults);
        assert_eq!(parse("sim stop"), Command::SimStop);
        assert_eq!(parse("sim start"), Command::SimStart(None));
        let Command::SimStart(Some(params)) = parse("sim start 40.9 -1.28 950 C2 -30") else {
            panic!("explicit parameters expected");
        };
        assert_eq!(params.event_id, "C2");
        assert!("sim start 1 2".parse::<Command>().is_err());
        assert!("sim start a b c C2 0".parse::<Command>().is_err());
    }

    #[test]
    fn unknown_and_blank_lines() {
        assert_eq!(parse(""), Command::Show);
        assert_eq!(parse("QUIT"), Command::Quit);
        assert_eq!(parse("status"), Command::Status);
        assert!("launch".parse::<Command>().is_err());
    }

    #[test]
    fn numbered_listing() {
        assert_eq!(numbered(&[]), "No files found.");
        let text = numbered(&["a.event".to_string(), "b.event".to_string()]);
        assert!(text.contains("  1  a.event"));
        assert!(text.contains("  2  b.event"));
    }
}
