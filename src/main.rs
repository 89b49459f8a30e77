use auction_bids::config::{Settings, DEFAULT_LOG_FILTER};
use auction_bids::web::app::run_app;
use log::error;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };

    run_app(settings).await
}
