use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the LSP protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("lintbridge_lsp=debug".parse().unwrap())
                .add_directive("lintbridge_core=debug".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    lintbridge_lsp::run().await;
}
