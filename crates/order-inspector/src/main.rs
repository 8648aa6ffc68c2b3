use {clap::Parser, order_inspector::arguments::Arguments};

#[tokio::main]
async fn main() {
    let args = Arguments::parse();
    observe::tracing::initialize(&observe::Config::new(
        &args.log_filter,
        args.use_json_logs,
    ));
    tracing::info!("running order inspector with validated arguments:\n{}", args);

    if let Err(err) = order_inspector::run(args).await {
        tracing::error!(?err, "order inspector failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
