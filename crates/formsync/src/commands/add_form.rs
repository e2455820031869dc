use clap::ArgMatches;
use tracing::info;

use formsync_core::{FormApi, Mutation};

use super::create::questions;
use super::helpers;

pub(crate) fn handle_add_form_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let container_id = *matches
        .get_one::<u64>("container_id")
        .ok_or("Container id is required")?;
    let app_id = matches
        .get_one::<String>("app-id")
        .ok_or("--app-id is required")?
        .clone();
    let questions = questions(matches);

    info!(
        event = "cli.add_form_started",
        container_id = container_id,
        questions = questions.len(),
    );

    let config = helpers::load_config(matches)?;
    let api = helpers::build_api(&config)?;
    helpers::runtime()?
        .block_on(api.mutate(Mutation::AddForm {
            container_id,
            app_id,
            questions,
        }))
        .map_err(|e| helpers::fail("add-form", e))?;

    println!("✅ New form added to container {}", container_id);
    info!(event = "cli.add_form_completed", container_id = container_id);
    Ok(())
}
