//! Diff command - compare variable keys across environment files.
//!
//! Prints a presence table: `x` when a variable is set, `<empty>` when it
//! is present with no value, blank when it is missing from that file.

use std::collections::BTreeMap;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::{envfile, environments};
use crate::error::Result;

struct Comparison {
    name: String,
    variables: BTreeMap<String, String>,
}

fn load_comparisons(config: &Config) -> Result<Vec<Comparison>> {
    let mut comparisons = Vec::new();

    if environments::template_exists(config) {
        comparisons.push(Comparison {
            name: "template".to_string(),
            variables: envfile::parse(&environments::read_template(config)?)
                .into_iter()
                .collect(),
        });
    }

    for env in environments::discover(config, true)? {
        let contents = std::fs::read_to_string(&env.path)?;
        comparisons.push(Comparison {
            name: env.name,
            variables: envfile::parse(&contents).into_iter().collect(),
        });
    }

    Ok(comparisons)
}

/// Compare environments' variable keys.
pub fn execute(config: &Config) -> Result<()> {
    let comparisons = load_comparisons(config)?;

    if comparisons.is_empty() {
        output::dimmed(&format!(
            "no environment found at {}. Aborting.",
            config.environments
        ));
        return Ok(());
    }

    // Union of variable names, sorted.
    let mut all_variables: Vec<String> = comparisons
        .iter()
        .flat_map(|c| c.variables.keys().cloned())
        .collect();
    all_variables.sort();
    all_variables.dedup();

    let mut should_warn = false;

    let var_width = all_variables
        .iter()
        .map(|v| v.len())
        .max()
        .unwrap_or(0)
        .max("variable".len());
    let col_widths: Vec<usize> = comparisons
        .iter()
        .map(|c| c.name.len().max("<empty>".len()))
        .collect();

    let mut header = format!("{:width$}", "variable", width = var_width);
    for (comparison, width) in comparisons.iter().zip(&col_widths) {
        header.push_str(&format!("  {:width$}", comparison.name, width = width));
    }
    output::section("Environment variables");
    println!("{}", header);

    for variable in &all_variables {
        let mut row = format!("{:width$}", variable, width = var_width);
        for (comparison, width) in comparisons.iter().zip(&col_widths) {
            let cell = match comparison.variables.get(variable) {
                Some(value) if value.is_empty() => {
                    should_warn = true;
                    "<empty>"
                }
                Some(_) => "x",
                None => {
                    should_warn = true;
                    ""
                }
            };
            row.push_str(&format!("  {:width$}", cell, width = width));
        }
        println!("{}", row.trim_end());
    }

    if should_warn {
        println!();
        output::warn("there are diverging or empty variables in some files");
    }
    Ok(())
}
