//! Sink preset example
//!
//! Configures the middleware and a JSON appender for Google Cloud Logging
//! and Graylog from one JSON document, then prints what each record looks
//! like on the wire.
//!
//! Run with: cargo run --example sink_presets

use log_dedup::prelude::*;
use log_dedup::error;

const CONFIG: &str = r#"{
    "policy": "increment",
    "sinks": ["stackdriver", "graylog"],
    "overwrite_summary": true
}"#;

fn main() -> Result<()> {
    println!("=== log_dedup - Sink Presets Example ===\n");

    let config = DedupConfig::from_json(CONFIG)?;
    println!("Config: {}\n", serde_json::to_string(&config)?);

    let mut appender = JsonAppender::from_writer(std::io::stdout());
    if let Some(replacer) = config.replace_attr() {
        appender = appender.with_replace_attr(replacer);
    }
    let handler = DedupHandler::from_config(appender, &config)?;
    let metrics = handler.metrics().clone();

    let logger = Logger::new(handler).with(vec![
        Attr::string("severity", "from-attr"),
        Attr::string("message", "shadowed summary"),
        Attr::string("timestamp", "graylog reserves this"),
    ]);

    logger.info("order placed", vec![Attr::int("order_id", 1234)])?;
    error!(logger, "payment declined"; "code" => "card_expired", "sourceLoc" => "billing")?;
    logger.flush()?;

    println!(
        "\nRecords: {}, keys renamed: {}",
        metrics.records_handled(),
        metrics.keys_renamed()
    );
    Ok(())
}
