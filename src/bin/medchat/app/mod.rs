mod commands;
mod drive;
mod interactive;
mod one_shot;
mod slash;

use clap::Parser;

use medchat::HttpChatClient;

use crate::args::CliArgs;
use crate::config::load_config;
use crate::logging::init_logging;

use interactive::Session;

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.clone())?;
    let _logger = init_logging(&loaded.config.logging, &loaded.paths)?;

    let file_config = loaded.config.clone();
    let mut config = loaded.config;
    args.apply(&mut config);
    let client = HttpChatClient::new(config.server.client_config())?;
    log::info!("using backend {}", client.base_url());

    if args.clear {
        return commands::clear(client, &config).await;
    }
    if args.history {
        return commands::print_history(client, &config).await;
    }
    if let Some(question) = one_shot::resolve_question(&args).await? {
        return if args.no_stream {
            one_shot::ask_once(client, &question).await
        } else {
            one_shot::ask_streaming(client, &question).await
        };
    }

    let session = Session {
        config,
        file_config,
        paths: loaded.paths,
    };
    interactive::run_interactive(client, session).await
}
