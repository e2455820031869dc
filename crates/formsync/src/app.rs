use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

use crate::forms::{parse_answer, parse_question};

const QUESTION_HELP: &str = "Questions are LABEL[:KIND[:OPT1|OPT2|...]]. KIND is text (default), \
radioButton, checkbox or dropdown; choice kinds need options. Prefix the label with '~' to make \
the question optional.";

pub fn build_cli() -> Command {
    Command::new("formsync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch and act on form containers of the approval service")
        .long_about("formsync keeps a terminal view of form containers in step with the approval service by polling it. The list refreshes itself; an open container announces remote changes and waits for you to refresh.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Read configuration from this file instead of ~/.formsync and ./.formsync")
                .value_parser(value_parser!(std::path::PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .help("API base URL (overrides config)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List form containers")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .short('s')
                        .help("Form status to filter on (overrides config)")
                )
                .arg(
                    Arg::new("page")
                        .long("page")
                        .help("Page number, starting at 1")
                        .value_parser(value_parser!(u32).range(1..))
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .help("Rows per page (overrides config)")
                        .value_parser(value_parser!(u32).range(1..))
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Creation date order")
                        .value_parser(["asc", "desc"])
                )
                .arg(
                    Arg::new("app-ids")
                        .long("app-ids")
                        .help("Comma-separated application ids (overrides config)")
                        .value_delimiter(',')
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Only containers whose title contains this text")
                )
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Only containers sent to this address")
                )
                .arg(
                    Arg::new("expired")
                        .long("expired")
                        .help("Only containers past their expiry date")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("show")
                .about("Show one form container with its forms and questions")
                .arg(
                    Arg::new("access_token")
                        .help("Access token of the container")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("watch")
                .about("Keep the list, or one container, up to date until you quit")
                .long_about(
                    "Without an access token, prints the container list and reprints it whenever it changes.\n\
                    With an access token, prints that container and announces remote changes without\n\
                    replacing what is shown.\n\n\
                    Keys (followed by Enter):\n\
                    - <Enter> or r   refresh the current view\n\
                    - o <token>      open a container\n\
                    - b              back to the list\n\
                    - n / p          next / previous page\n\
                    - v <form_id>    validate a form of the open container\n\
                    - q              quit (Ctrl-C works too)"
                )
                .arg(
                    Arg::new("access_token")
                        .help("Open this container instead of the list")
                        .index(1)
                )
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a form")
                .arg(
                    Arg::new("container_id")
                        .help("Container id")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("form_id")
                        .help("Form id")
                        .required(true)
                        .index(2)
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("archive")
                        .long("archive")
                        .help("Archive the container right away")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel an open form")
                .arg(
                    Arg::new("container_id")
                        .help("Container id")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("form_id")
                        .help("Form id")
                        .required(true)
                        .index(2)
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("comment")
                        .long("comment")
                        .short('m')
                        .help("Reason for cancelling (at least 4 characters)")
                        .required(true)
                )
        )
        .subcommand(
            Command::new("create")
                .about("Create a form container with its first form")
                .after_help(QUESTION_HELP)
                .arg(
                    Arg::new("app-id")
                        .long("app-id")
                        .help("Application the container belongs to")
                        .required(true)
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .help("Container title")
                        .required(true)
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .help("What the recipient is asked to do")
                        .required(true)
                )
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Recipient address")
                        .required(true)
                )
                .arg(
                    Arg::new("reference")
                        .long("reference")
                        .help("Free-form reference shown with the container")
                )
                .arg(
                    Arg::new("campaign-id")
                        .long("campaign-id")
                        .help("Campaign of the application to attach to")
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("escalate")
                        .long("escalate")
                        .help("Escalate when reminders go unanswered")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("question")
                        .long("question")
                        .short('q')
                        .help("Question of the first form (repeatable)")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(parse_question)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("add-form")
                .about("Add a new form to an existing container")
                .after_help(QUESTION_HELP)
                .arg(
                    Arg::new("container_id")
                        .help("Container id")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("app-id")
                        .long("app-id")
                        .help("Application the container belongs to")
                        .required(true)
                )
                .arg(
                    Arg::new("question")
                        .long("question")
                        .short('q')
                        .help("Question of the new form (repeatable)")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(parse_question)
                )
        )
        .subcommand(
            Command::new("respond")
                .about("Submit answers to a form")
                .after_help(
                    "Answers are QUESTION_ID=VALUE. Separate the choices of a checkbox answer with '|'."
                )
                .arg(
                    Arg::new("access_token")
                        .help("Access token of the container")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("form_id")
                        .help("Form id")
                        .required(true)
                        .index(2)
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("app-id")
                        .long("app-id")
                        .help("Application the container belongs to")
                        .required(true)
                )
                .arg(
                    Arg::new("answer")
                        .long("answer")
                        .short('a')
                        .help("One answer (repeatable)")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(parse_answer)
                )
        )
        .subcommand(
            Command::new("config")
                .about("Print the effective configuration as TOML")
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion script")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell))
                )
        )
}
