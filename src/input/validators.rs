use crate::core::value::FieldValue;
use crate::state::validation::ValidationContext;
use regex::Regex;
use std::sync::LazyLock;

pub type Predicate = Box<dyn Fn(&FieldValue, &ValidationContext<'_>) -> bool + Send + Sync>;

const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

pub fn required() -> Predicate {
    Box::new(|value: &FieldValue, _: &ValidationContext<'_>| !value.is_empty())
}

pub fn min_length(min: usize) -> Predicate {
    Box::new(move |value: &FieldValue, _: &ValidationContext<'_>| {
        value.as_text().is_some_and(|v| v.chars().count() >= min)
    })
}

pub fn max_length(max: usize) -> Predicate {
    Box::new(move |value: &FieldValue, _: &ValidationContext<'_>| {
        value.as_text().is_some_and(|v| v.chars().count() <= max)
    })
}

pub fn email() -> Predicate {
    Box::new(|value: &FieldValue, _: &ValidationContext<'_>| {
        value.as_text().is_some_and(|v| EMAIL.is_match(v.trim()))
    })
}

pub fn pattern(pattern: &str) -> Result<Predicate, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(Box::new(move |value: &FieldValue, _: &ValidationContext<'_>| {
        value.as_text().is_some_and(|v| re.is_match(v))
    }))
}

/// Text equal to another field's text, e.g. a password confirmation.
pub fn matches_field(other: impl Into<String>) -> Predicate {
    let other = other.into();
    Box::new(move |value: &FieldValue, ctx: &ValidationContext<'_>| {
        match (value.as_text(), ctx.text(other.as_str())) {
            (Some(this), Some(that)) => this == that,
            _ => false,
        }
    })
}

pub fn one_of<I, S>(options: I) -> Predicate
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options: Vec<String> = options.into_iter().map(Into::into).collect();
    Box::new(move |value: &FieldValue, _: &ValidationContext<'_>| {
        value
            .as_selected()
            .is_some_and(|selected| options.iter().any(|o| o == selected))
    })
}

pub fn non_empty_selection() -> Predicate {
    Box::new(|value: &FieldValue, _: &ValidationContext<'_>| {
        value.as_options().is_some_and(|set| !set.is_empty())
    })
}

pub fn accepted() -> Predicate {
    Box::new(|value: &FieldValue, _: &ValidationContext<'_>| value.as_bool() == Some(true))
}

pub fn custom<F>(f: F) -> Predicate
where
    F: Fn(&FieldValue, &ValidationContext<'_>) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}
