use anyhow::Context;
use clap::Parser;
use log::{error, info};
use stick_core::CommandBridge;
use ws_to_stick::{
    event_queue, read_local_sticks, Args, LogFlightSink, LogNotices, QueueSource, Supervisor,
};

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = args.into_config().context("invalid configuration")?;

    info!("ws-to-stick starting, server {}", config.endpoint);

    // --- Event queue: connection task and local joystick feed the bridge ---
    let (events_tx, events_rx) = event_queue(config.queue_capacity);

    let (supervisor, handle) = Supervisor::new(
        config.endpoint.clone(),
        config.backoff,
        config.reconnect,
        events_tx.clone(),
    );
    let connection = supervisor.spawn();

    if config.local_stick {
        let local_tx = events_tx.clone();
        // Blocking reader, own thread
        std::thread::Builder::new()
            .name("local-stick".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                if let Err(e) = read_local_sticks(stdin.lock(), local_tx) {
                    error!("local stick input failed: {}", e);
                }
            })
            .context("failed to start local stick reader")?;
        info!("reading local stick samples from stdin");
    }
    drop(events_tx);

    // --- Bridge: single consumer owning the flight sink ---
    let source = QueueSource::new(events_rx);
    let mut bridge = CommandBridge::new(
        source,
        LogFlightSink::new(),
        LogNotices,
        handle,
        config.mapper,
    );

    tokio::select! {
        _ = bridge.run() => info!("all command sources closed"),
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            info!("interrupted, shutting down");
        }
    }

    connection.abort();
    Ok(())
}
