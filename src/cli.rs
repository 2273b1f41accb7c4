use clap::{Parser, Subcommand};
use onboarding_wizard::{FieldValue, WizardEvent};

#[derive(Parser)]
#[command(name = "onboarding", version, about = "AdMyBrand onboarding flows")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Drive a flow from stdin, one command per line
    Run {
        /// Preset name (signup, login) or path to a YAML flow file
        #[arg(long, default_value = "signup")]
        flow: String,
        /// Make the simulated backend reject the submission
        #[arg(long)]
        fail: bool,
        /// Simulated backend latency
        #[arg(long, default_value_t = 2_000)]
        delay_ms: u64,
    },
    /// Recommend a plan from usage figures
    Pricing {
        #[arg(long, default_value_t = 5_000)]
        spend: u32,
        #[arg(long, default_value_t = 3)]
        platforms: u32,
        #[arg(long, default_value_t = 10)]
        campaigns: u32,
        #[arg(long, default_value_t = 2)]
        team: u32,
    },
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Event(WizardEvent),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  set <field> [text]          set a text field, no text clears it
  check <field> <true|false>  set a checkbox
  select <field> <option|->   pick an option, '-' clears it
  toggle <field> <option>     add or remove an option of a multi-select
  next | prev | goto <index>  navigate
  social <provider>           social sign-in
  show | help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "next" => Command::Event(WizardEvent::Next),
        "prev" | "back" => Command::Event(WizardEvent::Previous),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "goto" => {
            let index = rest
                .parse::<usize>()
                .map_err(|_| format!("goto expects a step index, got '{rest}'"))?;
            Command::Event(WizardEvent::JumpTo(index))
        }
        "social" => {
            if rest.is_empty() {
                return Err("social expects a provider name".to_string());
            }
            Command::Event(WizardEvent::SocialSignIn {
                provider: rest.to_string(),
            })
        }
        "set" => {
            let (field, value) = split_arg(verb, rest)?;
            Command::Event(WizardEvent::set(field, FieldValue::text(value)))
        }
        "check" => {
            let (field, value) = split_arg(verb, rest)?;
            let value = required_value(verb, value)?;
            let checked = value
                .parse::<bool>()
                .map_err(|_| format!("check expects true or false, got '{value}'"))?;
            Command::Event(WizardEvent::set(field, FieldValue::Boolean(checked)))
        }
        "select" => {
            let (field, value) = split_arg(verb, rest)?;
            let value = match required_value(verb, value)? {
                "-" => FieldValue::SingleSelect(None),
                option => FieldValue::selected(option),
            };
            Command::Event(WizardEvent::set(field, value))
        }
        "toggle" => {
            let (field, option) = split_arg(verb, rest)?;
            let option = required_value(verb, option)?;
            Command::Event(WizardEvent::toggle(field, option))
        }
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(command)
}

/// Splits `<field> [value]`. The value may be empty.
fn split_arg<'a>(verb: &str, rest: &'a str) -> Result<(&'a str, &'a str), String> {
    if rest.is_empty() {
        return Err(format!("{verb} expects <field> <value>"));
    }
    Ok(rest
        .split_once(char::is_whitespace)
        .map(|(field, value)| (field, value.trim()))
        .unwrap_or((rest, "")))
}

fn required_value<'a>(verb: &str, value: &'a str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("{verb} expects <field> <value>"))
    } else {
        Ok(value)
    }
}
