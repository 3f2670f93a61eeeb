mod cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
