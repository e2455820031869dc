use clap::ArgMatches;
use tracing::info;

use formsync_core::{FormApi, FormsyncConfig, ListFilter, SortOrder};

use super::helpers;
use crate::table::TableFormatter;

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    let config = helpers::load_config(matches)?;
    let filter = build_filter(matches, &config)?;

    info!(
        event = "cli.list_started",
        json_output = json_output,
        page = filter.page,
        status = filter.status.as_deref().unwrap_or(""),
    );

    let api = helpers::build_api(&config)?;
    let page = helpers::runtime()?
        .block_on(api.fetch_list(&filter))
        .map_err(|e| helpers::fail("list", e))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else if page.form_containers.is_empty() {
        println!("No form containers found.");
    } else {
        let formatter = TableFormatter::new(&page.form_containers);
        formatter.print_table(&page.form_containers);
        println!(
            "Page {} · {} of {} containers",
            page.page,
            page.form_containers.len(),
            page.total
        );
    }

    info!(event = "cli.list_completed", count = page.form_containers.len());
    Ok(())
}

/// Table settings from config, overridden by whatever flags were given.
fn build_filter(
    matches: &ArgMatches,
    config: &FormsyncConfig,
) -> Result<ListFilter, Box<dyn std::error::Error>> {
    let mut filter = config.table.initial_filter();

    if let Some(status) = matches.get_one::<String>("status") {
        filter.status = Some(status.clone());
    }
    if let Some(page) = matches.get_one::<u32>("page") {
        filter.page = *page;
    }
    if let Some(limit) = matches.get_one::<u32>("limit") {
        filter.limit = *limit;
    }
    if let Some(sort) = matches.get_one::<String>("sort") {
        filter.sort = sort.parse::<SortOrder>()?;
    }
    if let Some(app_ids) = matches.get_many::<String>("app-ids") {
        filter.app_ids = app_ids.cloned().collect();
    }
    filter.title = matches.get_one::<String>("title").cloned();
    filter.user_email = matches.get_one::<String>("email").cloned();
    filter.expired = matches.get_flag("expired");

    Ok(filter)
}
