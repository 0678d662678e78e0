//! List command handler

use hotel_probe::{all_scenarios, select, ScenarioInfo};

use crate::commands::{FormatArg, ListArgs};
use crate::error::CliResult;
use crate::output::render_list;

/// Scenarios carrying `tag`, or all of them
#[must_use]
pub fn list_scenarios(tag: Option<&str>) -> Vec<ScenarioInfo> {
    select(all_scenarios(), None, tag)
        .iter()
        .map(|s| ScenarioInfo::of(s.as_ref()))
        .collect()
}

/// Execute the list command
pub fn execute_list(args: &ListArgs) -> CliResult<()> {
    let scenarios = list_scenarios(args.tag.as_deref());
    match args.format {
        FormatArg::Text => print!("{}", render_list(&scenarios)),
        FormatArg::Json => println!("{}", serde_json::to_string_pretty(&scenarios)?),
    }
    Ok(())
}
