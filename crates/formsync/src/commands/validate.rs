use clap::ArgMatches;
use tracing::info;

use formsync_core::{FormApi, Mutation};

use super::helpers;

pub(crate) fn handle_validate_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let container_id = *matches
        .get_one::<u64>("container_id")
        .ok_or("Container id is required")?;
    let form_id = *matches
        .get_one::<u64>("form_id")
        .ok_or("Form id is required")?;
    let archive = matches.get_flag("archive");

    info!(
        event = "cli.validate_started",
        container_id = container_id,
        form_id = form_id,
        archive = archive,
    );

    let config = helpers::load_config(matches)?;
    let api = helpers::build_api(&config)?;
    helpers::runtime()?
        .block_on(api.mutate(Mutation::Validate {
            container_id,
            form_id,
            archive,
        }))
        .map_err(|e| helpers::fail("validate", e))?;

    println!("✅ Form {} of container {} validated", form_id, container_id);
    info!(event = "cli.validate_completed", container_id = container_id, form_id = form_id);
    Ok(())
}
