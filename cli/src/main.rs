use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use sekai_api::{ApiClient, HttpTransport};
use sekai_core::{
    config::Settings,
    logger::{init_logger, init_tracing},
    pages::PageContext,
    route::{Navigator, Route},
    session::FileTokenStore,
};

mod handlers;

use handlers::{CommandHandler, utils::WriteAdapter};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "sekai-cli", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// Use the given config file instead of the default one
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// Override the address of the API server
    #[clap(long, value_hint = clap::ValueHint::Url)]
    base_url: Option<String>,
    /// Override the log level (off, error, warn, info, debug, trace)
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// subcommand to run
    #[clap(subcommand)]
    subcommand: Option<handlers::Command>,
}

#[test]
fn verify_cli() {
    Flags::command().debug_assert();
}

/// Load the settings, honoring the config file given on the command line.
pub(crate) fn load_settings(
    config: Option<PathBuf>,
    base_url: Option<String>,
    log_level: Option<log::LevelFilter>,
) -> anyhow::Result<Settings> {
    let config = match config {
        Some(path) => path,
        None => Settings::get_config_path()?,
    };
    Ok(Settings::init(config, base_url, log_level)?)
}

/// Build the page context every command runs against.
pub(crate) fn init_context(settings: &Settings) -> anyhow::Result<PageContext<HttpTransport>> {
    let session = Arc::new(FileTokenStore::new(settings.session.token_path()?));
    let transport = HttpTransport::new(
        &settings.client.base_url,
        settings.client.request_timeout(),
    )?;
    let navigator = Navigator::new(Route::Top);
    let api =
        ApiClient::new(transport, session).with_auth_failure_hook(navigator.auth_failure_hook());
    Ok(PageContext::new(
        api,
        navigator,
        settings.client.redirect_delay(),
    ))
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();

    let flags = Flags::parse();

    let settings = load_settings(flags.config, flags.base_url, flags.log_level)?;

    init_logger(settings.client.log_level);
    if settings.client.tracing {
        tracing::subscriber::set_global_default(init_tracing())?;
    }

    let ctx = init_context(&settings)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut stdout_adapter = WriteAdapter(std::io::stdout());
        let mut stderr_adapter = WriteAdapter(std::io::stderr());

        if let Some(command) = flags.subcommand {
            command
                .handle(
                    &ctx,
                    &mut stdout_adapter,
                    &mut stderr_adapter,
                    &std::io::stdin(),
                )
                .await?;
        } else {
            eprintln!("No subcommand provided");
        }

        Ok(())
    })
}
