mod platform;

#[tokio::main]
async fn main() -> anyhow::Result<std::process::ExitCode> {
    platform::run_app().await
}
