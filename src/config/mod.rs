pub mod presets;

use crate::core::FieldName;
use crate::core::field::FieldSpec;
use crate::input::validators::{self, Predicate};
use crate::runtime::effect::NotificationTemplate;
use crate::state::step::StepDefinition;
use crate::state::wizard::{Wizard, WizardError};
use crate::task::DEFAULT_TIMEOUT;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read flow file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid flow definition")]
    Yaml(#[from] serde_yaml::Error),
    #[error("rule on step '{step}' references unknown field '{field}'")]
    UnknownRuleField { step: String, field: String },
    #[error("invalid pattern for field '{field}'")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

/// Everything around the steps: where to go on success, what to tell the
/// user, how long to wait for the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSettings {
    pub redirect_to: String,
    pub timeout: Option<Duration>,
    pub success: NotificationTemplate,
    pub failure: NotificationTemplate,
    /// Suffix of social sign-in notices, e.g. "Signup" in "Google Signup".
    pub social_label: String,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            redirect_to: "/".to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            success: NotificationTemplate::new("Submitted", "Your information was sent.", 5_000),
            failure: NotificationTemplate::new(
                "Submission failed",
                "Something went wrong. Please try again.",
                5_000,
            ),
            social_label: "Login".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct FlowDefinition {
    pub id: String,
    pub steps: Vec<StepDefinition>,
    pub settings: FlowSettings,
}

impl FlowDefinition {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let file: FlowFile = serde_yaml::from_str(source)?;
        file.into_definition()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Builds the wizard and hands back the settings the runtime needs.
    pub fn into_parts(self) -> Result<(Wizard, FlowSettings), WizardError> {
        Ok((Wizard::new(self.steps)?, self.settings))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlowFile {
    id: String,
    #[serde(default)]
    redirect_to: Option<String>,
    #[serde(default)]
    timeout_ms: Option<u64>,
    #[serde(default)]
    success: Option<NotificationTemplate>,
    #[serde(default)]
    failure: Option<NotificationTemplate>,
    #[serde(default)]
    social_label: Option<String>,
    steps: Vec<StepFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepFile {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    fields: Vec<FieldSpec>,
    #[serde(default)]
    rules: Vec<RuleFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    field: FieldName,
    #[serde(with = "serde_yaml::with::singleton_map")]
    check: Check,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Check {
    Required,
    Email,
    NonEmpty,
    Accepted,
    OneOf,
    MinLength(usize),
    MaxLength(usize),
    Matches(String),
    Pattern(String),
}

impl FlowFile {
    fn into_definition(self) -> Result<FlowDefinition, ConfigError> {
        let defaults = FlowSettings::default();
        let settings = FlowSettings {
            redirect_to: self.redirect_to.unwrap_or(defaults.redirect_to),
            timeout: match self.timeout_ms {
                Some(0) => None,
                Some(ms) => Some(Duration::from_millis(ms)),
                None => defaults.timeout,
            },
            success: self.success.unwrap_or(defaults.success),
            failure: self.failure.unwrap_or(defaults.failure),
            social_label: self.social_label.unwrap_or(defaults.social_label),
        };

        let declared: HashSet<FieldName> = self
            .steps
            .iter()
            .flat_map(|step| step.fields.iter().map(|spec| spec.name.clone()))
            .collect();
        let steps = self
            .steps
            .into_iter()
            .map(|step| step.into_step(&declared))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FlowDefinition {
            id: self.id,
            steps,
            settings,
        })
    }
}

impl StepFile {
    fn into_step(self, declared: &HashSet<FieldName>) -> Result<StepDefinition, ConfigError> {
        let mut builder = StepDefinition::builder(self.id.clone(), self.title);
        if let Some(description) = self.description {
            builder = builder.description(description);
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            let spec = self
                .fields
                .iter()
                .find(|spec| spec.name == rule.field)
                .ok_or_else(|| ConfigError::UnknownRuleField {
                    step: self.id.clone(),
                    field: rule.field.to_string(),
                })?;
            if let Check::Matches(other) = &rule.check {
                if !declared.contains(other.as_str()) {
                    return Err(ConfigError::UnknownRuleField {
                        step: self.id.clone(),
                        field: other.clone(),
                    });
                }
            }
            let predicate = predicate_for(&rule.check, spec)?;
            rules.push((rule.field, predicate, rule.message));
        }

        builder = builder.fields(self.fields);
        for (field, predicate, message) in rules {
            builder = builder.rule(field, predicate, message);
        }
        Ok(builder.build())
    }
}

fn predicate_for(check: &Check, spec: &FieldSpec) -> Result<Predicate, ConfigError> {
    Ok(match check {
        Check::Required => validators::required(),
        Check::Email => validators::email(),
        Check::NonEmpty => validators::non_empty_selection(),
        Check::Accepted => validators::accepted(),
        Check::OneOf => validators::one_of(spec.options.iter().cloned()),
        Check::MinLength(min) => validators::min_length(*min),
        Check::MaxLength(max) => validators::max_length(*max),
        Check::Matches(other) => validators::matches_field(other.clone()),
        Check::Pattern(pattern) => {
            validators::pattern(pattern).map_err(|source| ConfigError::Pattern {
                field: spec.name.to_string(),
                source,
            })?
        }
    })
}
