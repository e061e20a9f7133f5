use ::std::io::stdout;

use ::coinwash_client::MachineClient;
use ::coinwash_common::{
    config::{load_config, Args},
    error::Result,
    tokio,
    tracing::info,
    tracing_subscriber,
};
use ::coinwash_monitor::{
    config::MonitorConfig,
    notifier::{Notifier, ServerRelay, ToastId},
    tone::TerminalBell,
    Monitor,
};

#[tokio::main]
/// Start Coinwash monitor
async fn main() -> Result<()> {
    // setup tracing
    tracing_subscriber::fmt::init();

    let Args { config_path } = Args::parse_args();
    let config: MonitorConfig = load_config(&config_path)?;
    info!("Monitoring machines of {}", config.server_url);

    let api = MachineClient::new(&config.server_url);
    let mut notifier = Notifier::new(
        ServerRelay::new(api.clone()),
        TerminalBell::new(stdout()),
        config.toast_duration(),
    );
    let mut last_logged: Option<ToastId> = None;
    notifier.subscribe(move |toasts| {
        for toast in toasts {
            if last_logged.map_or(true, |last| toast.id > last) {
                info!("[{:?}] {}", toast.level, toast.message);
                last_logged = Some(toast.id);
            }
        }
    });

    let monitor = Monitor::new(api, notifier, config.warning_threshold_secs, stdout());
    monitor
        .run(config.poll_interval(), config.tick_interval())
        .await;
    Ok(())
}
