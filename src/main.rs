use anyhow::{Context, anyhow};
use tracing_subscriber::fmt::SubscriberBuilder;
use treeform::{ControlOptions, HostConfig, Value, statics};

fn main() -> anyhow::Result<()> {
    let level = if std::env::var_os(statics::ENV_DEBUG).is_some() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default().with_max_level(level).try_init();

    let value = Value::parse_json5(statics::DEMO_VALUE)
        .context("parsing demo value")?;
    let options = ControlOptions::from_json5(statics::DEMO_OPTIONS)
        .context("parsing demo options")?;

    tracing::info!("starting {}", statics::EN_APP_TITLE);
    treeform::run_gui(HostConfig {
        value,
        options,
        dark: std::env::var_os(statics::ENV_LIGHT).is_none(),
    })
    .map_err(|e| anyhow!("GUI failed: {e}"))
}
