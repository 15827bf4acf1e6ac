//! Console commands for the headless host.
//!
//! One command per line on stdin:
//!
//! ```text
//! show | hide                 toggle layer visibility (hide stops the feed)
//! pause | resume              suspend or resume refreshes, keeping events
//! source <name>               switch feed source (see swarm-config.yaml)
//! url <endpoint>              poll a custom GeoJSON endpoint
//! mode depth|age              marker color mode
//! legend on|off               legend visibility
//! status                      log the current state
//! ```

use std::str::FromStr;

use swarm_hypocenters::config::HypocenterSource;
use swarm_types::ColorMode;

use crate::error::CommandError;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Show the layer and start the feed.
    Show,
    /// Hide the layer, stop the feed, and clear every event.
    Hide,
    /// Stop fetching but keep the displayed events.
    Pause,
    /// Fetch again on the next tick.
    Resume,
    /// Switch to another feed source.
    Source(HypocenterSource),
    /// Poll a custom endpoint.
    Url(String),
    /// Change what marker color encodes.
    Mode(ColorMode),
    /// Show or hide the legend.
    Legend(bool),
    /// Log the host state.
    Status,
}

impl FromStr for HostCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(CommandError::Empty);
        };
        let argument = words.next();

        match command.to_lowercase().as_str() {
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "status" => Ok(Self::Status),
            "source" => {
                let name = require(argument, "source")?;
                HypocenterSource::from_name(name)
                    .map(Self::Source)
                    .ok_or_else(|| invalid("source", name))
            }
            "url" => Ok(Self::Url(require(argument, "url")?.to_owned())),
            "mode" => match require(argument, "mode")?.to_lowercase().as_str() {
                "depth" => Ok(Self::Mode(ColorMode::Depth)),
                "age" => Ok(Self::Mode(ColorMode::Age)),
                other => Err(invalid("mode", other)),
            },
            "legend" => match require(argument, "legend")?.to_lowercase().as_str() {
                "on" => Ok(Self::Legend(true)),
                "off" => Ok(Self::Legend(false)),
                other => Err(invalid("legend", other)),
            },
            other => Err(CommandError::Unknown {
                command: other.to_owned(),
            }),
        }
    }
}

fn require<'a>(argument: Option<&'a str>, command: &'static str) -> Result<&'a str, CommandError> {
    argument.ok_or(CommandError::MissingArgument { command })
}

fn invalid(command: &'static str, value: &str) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.to_owned(),
    }
}
