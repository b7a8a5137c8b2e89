//! Dispatch of parsed commands onto the registry service.

use crate::cli::Command;
use anyhow::Context;
use registry_core::{validate_new_person, validate_person_update, PersonRecord, RegistryService};
use serde_json::Value;
use std::io::Read;

/// Runs one command. Returns the JSON document to print, if any.
pub fn execute(service: &RegistryService<'_>, command: Command) -> anyhow::Result<Option<Value>> {
    match command {
        Command::Create { tax_code, person } => {
            let input = validate_new_person(&person.to_record(&tax_code))?;
            service.create(&input)?;
            Ok(None)
        }
        Command::CreateJson { source } => {
            let record = read_record(&source)?;
            let input = validate_new_person(&record)?;
            service.create(&input)?;
            Ok(None)
        }
        Command::Get { tax_code } => Ok(Some(serde_json::to_value(service.get(&tax_code)?)?)),
        Command::List => Ok(Some(serde_json::to_value(service.list()?)?)),
        Command::Search { query } => Ok(Some(serde_json::to_value(
            service.search_by_name(&query)?,
        )?)),
        Command::Update { tax_code, person } => {
            let draft = validate_person_update(&person.to_record(&tax_code))?;
            service.update(&tax_code, &draft)?;
            Ok(None)
        }
        Command::Delete { tax_code } => {
            service.delete(&tax_code)?;
            Ok(None)
        }
    }
}

fn read_record(source: &str) -> anyhow::Result<PersonRecord> {
    let text = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read person record from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read person record from `{source}`"))?
    };
    serde_json::from_str(&text).with_context(|| format!("`{source}` is not a person record"))
}
