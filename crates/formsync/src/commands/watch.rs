use std::sync::Arc;

use clap::ArgMatches;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use formsync_core::{
    FormApi, FormsyncConfig, FormsyncError, HttpFormApi, Mutation, PollingRegistry, Route,
    ViewCoordinator, ViewError, ViewState, events,
};

use super::helpers;
use super::show::{render_detail, render_timeline};
use crate::table::TableFormatter;

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = helpers::load_config(matches)?;
    let api = Arc::new(helpers::build_api(&config)?);
    let route = Route {
        access_token: matches.get_one::<String>("access_token").cloned(),
    };

    info!(
        event = "cli.watch_started",
        access_token = route.access_token.as_deref().unwrap_or(""),
        base_url = api.base_url(),
    );

    let runtime = helpers::runtime()?;
    let result = runtime.block_on(run_watch(api, &config, route));
    // A pending stdin read sits on a blocking thread until the next line
    runtime.shutdown_background();
    result?;

    events::log_app_shutdown();
    info!(event = "cli.watch_completed");
    Ok(())
}

/// One line typed while watching.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Refresh,
    Open(String),
    Back,
    NextPage,
    PreviousPage,
    Validate(u64),
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (None, _) | (Some("r"), None) => Input::Refresh,
        (Some("q"), None) => Input::Quit,
        (Some("b"), None) => Input::Back,
        (Some("n"), None) => Input::NextPage,
        (Some("p"), None) => Input::PreviousPage,
        (Some("o"), Some(token)) => Input::Open(token.to_string()),
        (Some("v"), Some(id)) => match id.parse() {
            Ok(form_id) => Input::Validate(form_id),
            Err(_) => Input::Unknown(line.trim().to_string()),
        },
        _ => Input::Unknown(line.trim().to_string()),
    }
}

async fn run_watch(
    api: Arc<HttpFormApi>,
    config: &FormsyncConfig,
    route: Route,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ViewCoordinator::from_config(api, PollingRegistry::new(), config);
    let mut list_rx = view.subscribe_list();
    let mut notice_rx = view.subscribe_notice();

    report(view.mount(route).await);
    render(&view);
    list_rx.borrow_and_update();
    notice_rx.borrow_and_update();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = list_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                list_rx.borrow_and_update();
                if view.state() == ViewState::Table {
                    render(&view);
                }
            }
            changed = notice_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let notice = notice_rx.borrow_and_update().clone();
                if let Some(notice) = notice {
                    println!("\n🔔 {} (press Enter)", notice.message);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Refresh => report(view.refresh().await),
                    Input::Open(token) => report(view.open_detail(&token).await),
                    Input::Back => report(view.show_table().await),
                    Input::NextPage => {
                        let mut filter = view.filter();
                        filter.page += 1;
                        report(view.set_filter(filter).await);
                    }
                    Input::PreviousPage => {
                        let mut filter = view.filter();
                        filter.page = filter.page.saturating_sub(1).max(1);
                        report(view.set_filter(filter).await);
                    }
                    Input::Validate(form_id) => match view.detail() {
                        Some(detail) => report(
                            view.mutate(Mutation::Validate {
                                container_id: detail.id,
                                form_id,
                                archive: false,
                            })
                            .await,
                        ),
                        None => eprintln!("Open a container first (o <token>)"),
                    },
                    Input::Unknown(input) => {
                        eprintln!(
                            "Unknown input '{}'. Try r, o <token>, b, n, p, v <form_id> or q.",
                            input
                        );
                        continue;
                    }
                }
                render(&view);
                list_rx.borrow_and_update();
                notice_rx.borrow_and_update();
            }
        }
    }

    view.teardown();
    Ok(())
}

fn report(result: Result<(), ViewError>) {
    if let Err(e) = result {
        eprintln!("❌ {}", e);
        warn!(
            event = "cli.watch_action_failed",
            error = %e,
            error_code = e.error_code(),
        );
    }
}

fn render<A: FormApi>(view: &ViewCoordinator<A>) {
    match view.state() {
        ViewState::Table => {
            let rows = view.list();
            if rows.is_empty() {
                println!("No form containers found.");
            } else {
                TableFormatter::new(&rows).print_table(&rows);
                println!("Page {} · {} containers", view.filter().page, view.total());
            }
        }
        ViewState::Questions => {
            if let Some(detail) = view.detail() {
                print!("{}", render_detail(&detail));
            }
            print!("{}", render_timeline(&view.timeline()));
            if let Some(notice) = view.notice() {
                println!("\n🔔 {} (press Enter)", notice.message);
            }
        }
        ViewState::CreateForm => println!("Form builder open; nothing is polled."),
        ViewState::Loading => println!("Loading..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(""), Input::Refresh);
        assert_eq!(parse_input("  r "), Input::Refresh);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("b"), Input::Back);
        assert_eq!(parse_input("n"), Input::NextPage);
        assert_eq!(parse_input("p"), Input::PreviousPage);
        assert_eq!(parse_input("o tok123"), Input::Open("tok123".to_string()));
        assert_eq!(parse_input("v 9"), Input::Validate(9));
    }

    #[test]
    fn test_parse_input_unknown() {
        assert_eq!(parse_input("v nine"), Input::Unknown("v nine".to_string()));
        assert_eq!(parse_input("o"), Input::Unknown("o".to_string()));
        assert_eq!(parse_input("hello"), Input::Unknown("hello".to_string()));
    }
}
