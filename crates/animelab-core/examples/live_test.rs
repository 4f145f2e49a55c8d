use animelab_core::{service_handler, RegionHint, Season, ServiceConfig, Stream};
use tracing_subscriber::EnvFilter;

/// Usage: live_test [YEAR SEASON]
///
/// Reads service settings from the TOML file named by `ANIMELAB_CONFIG`, if set.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = match std::env::var("ANIMELAB_CONFIG") {
        Ok(path) => ServiceConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        Err(_) => ServiceConfig::default(),
    };
    if config.region.is_none() {
        config.region = RegionHint::from_locale_env().map(|hint| hint.as_str().to_string());
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (year, season) = match args.as_slice() {
        [year, season] => (Some(year.parse::<i32>()?), Some(season.parse::<Season>()?)),
        _ => (None, None),
    };

    let service = service_handler("animelab", &config)?.ok_or("animelab service not registered")?;

    println!("Listing {} simulcasts...\n", service.name());
    let streams = service.get_seasonal_streams(year, season).await;

    for stream in &streams {
        println!("  {} - {}", stream.show_key, stream.name);
    }
    println!("\nFound {} shows.", streams.len());

    if let Some(first) = streams.into_iter().next() {
        let stream = Stream::from(first);
        println!("\nShow page: {}", service.get_stream_link(&stream));

        match service.get_latest_episode(&stream).await {
            Some(episode) => println!("Latest episode: #{} {} ({})", episode.number, episode.name, episode.link),
            None => println!("No recent episode found for {}", stream.show_key),
        }
    }

    Ok(())
}
