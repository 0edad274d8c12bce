use anyhow::Context;
use blocky::AppConfig;

fn main() -> anyhow::Result<()> {
    // info+ unless RUST_LOG overrides; GPU backend chatter is off by default.
    let default = "info,wgpu_hal=off,wgpu_core=off,wgpu=off,naga=off";
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();

    let config = AppConfig::from_env();
    log::info!(
        "starting {}x{} window (vsync {})",
        config.width,
        config.height,
        if config.vsync { "on" } else { "off" }
    );

    blocky::run(config).context("blocky exited with an error")
}
