//! Interactive collection of configuration values from a line-oriented
//! terminal.
//!
//! Every field goes through the same states: an optional skip check (for
//! fields that have a default), a type-specific collect step, and
//! validation. Input and validation problems loop back to collect; only a
//! failed read (closed stdin, broken terminal) ends the sequence.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use colored::Colorize;

use super::error::{ConfigError, PromptError};
use super::path;
use super::schema::{self, FieldDescriptor};
use super::types::{ConfigDocument, ConfigValue, FieldType};
use super::validation::validate_field;

/// Result of one collect attempt.
enum Collected {
    Value(ConfigValue),
    Retry(String),
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompts for every registered field in declared order and writes the
    /// accepted values into `doc`.
    pub fn collect_all(&mut self, doc: &mut ConfigDocument) -> Result<(), ConfigError> {
        for field in schema::fields() {
            let value = self
                .prompt_field(field, doc)
                .map_err(|source| ConfigError::PromptAborted {
                    key: field.key,
                    source,
                })?;
            path::set(doc, field.key, value)?;
        }
        Ok(())
    }

    /// Runs the state machine for a single field until a value is accepted.
    pub fn prompt_field(
        &mut self,
        field: &FieldDescriptor,
        doc: &ConfigDocument,
    ) -> Result<ConfigValue, PromptError> {
        if let Some(default) = field.default_value().filter(|_| !field.required) {
            writeln!(self.output)?;
            writeln!(self.output, "{}", field.help.bold())?;
            writeln!(self.output, "Current default: {}", default.to_string().as_str().cyan())?;
            write!(self.output, "Change this setting? [y/N]: ")?;
            self.output.flush()?;
            if !self.read_yes_no(false)? {
                return Ok(default);
            }
        }

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{}", field.prompt)?;

            let collected = match field.field_type {
                FieldType::Select => self.collect_select(field)?,
                FieldType::String => self.collect_string(field)?,
                FieldType::Int => self.collect_int(field)?,
                FieldType::Bool => self.collect_bool(field)?,
            };

            match collected {
                Collected::Retry(message) => {
                    writeln!(self.output, "{} {message}", "❌".red())?;
                }
                Collected::Value(value) => match validate_field(field, &value, doc) {
                    Ok(()) => return Ok(value),
                    Err(err) => writeln!(self.output, "{} {}", "❌".red(), err.reason)?,
                },
            }
        }
    }

    fn default_for_blank(&self, field: &FieldDescriptor) -> Option<ConfigValue> {
        if field.required {
            None
        } else {
            field.default_value()
        }
    }

    fn collect_select(&mut self, field: &FieldDescriptor) -> Result<Collected, PromptError> {
        writeln!(self.output, "Options:")?;
        for (idx, option) in field.options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", idx + 1, option.label)?;
        }
        write!(self.output, "Enter option number (1-{}): ", field.options.len())?;
        self.output.flush()?;

        let input = self.read_line()?;
        if input.is_empty() {
            return Ok(match self.default_for_blank(field) {
                Some(default) => Collected::Value(default),
                None => Collected::Retry("Please choose an option.".to_string()),
            });
        }

        Ok(match input.parse::<usize>() {
            Ok(num) if num >= 1 && num <= field.options.len() => {
                Collected::Value(ConfigValue::from(field.options[num - 1].value))
            }
            _ => Collected::Retry(format!(
                "Please enter a number between 1 and {}.",
                field.options.len()
            )),
        })
    }

    fn collect_string(&mut self, field: &FieldDescriptor) -> Result<Collected, PromptError> {
        write!(self.output, "> ")?;
        self.output.flush()?;

        let input = self.read_line()?;
        if input.is_empty() {
            if let Some(default) = self.default_for_blank(field) {
                return Ok(Collected::Value(default));
            }
        }
        Ok(Collected::Value(ConfigValue::String(input)))
    }

    fn collect_int(&mut self, field: &FieldDescriptor) -> Result<Collected, PromptError> {
        write!(self.output, "> ")?;
        self.output.flush()?;

        let input = self.read_line()?;
        if input.is_empty() {
            if let Some(default) = self.default_for_blank(field) {
                return Ok(Collected::Value(default));
            }
        }
        Ok(match input.parse::<i64>() {
            Ok(value) => Collected::Value(ConfigValue::Int(value)),
            Err(_) => Collected::Retry("Please enter a valid whole number.".to_string()),
        })
    }

    fn collect_bool(&mut self, field: &FieldDescriptor) -> Result<Collected, PromptError> {
        let default = field
            .default_value()
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        write!(self.output, "[y/n] ({}): ", if default { "Y" } else { "N" })?;
        self.output.flush()?;

        Ok(Collected::Value(ConfigValue::Bool(self.read_yes_no(default)?)))
    }

    /// `y`/`yes` is true, `n`/`no` is false, anything else is `default`.
    fn read_yes_no(&mut self, default: bool) -> Result<bool, PromptError> {
        let answer = self.read_line()?.to_lowercase();
        Ok(match answer.as_str() {
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    /// Reads one trimmed line. End of input is an error, never a blank answer.
    fn read_line(&mut self) -> Result<String, PromptError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }
}

/// Asks a single yes/no question outside of the field flow.
pub fn confirm<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    question: &str,
    default: bool,
) -> Result<bool, PromptError> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(prompter.output, "{question} {hint}: ")?;
    prompter.output.flush()?;
    prompter.read_yes_no(default)
}
