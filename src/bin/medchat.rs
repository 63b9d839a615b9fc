#[path = "medchat/app/mod.rs"]
mod app;
#[path = "medchat/args.rs"]
mod args;
#[path = "medchat/config/mod.rs"]
mod config;
#[path = "medchat/logging.rs"]
mod logging;
#[path = "medchat/ui/mod.rs"]
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
