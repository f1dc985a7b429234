//! Basic dedup usage example
//!
//! Shows the four policies side by side on the same layered logger, using
//! the console appender as the final sink.
//!
//! Run with: cargo run --example basic_usage

use log_dedup::prelude::*;
use log_dedup::{info, warn};

fn demo(policy: DedupPolicy) -> Result<()> {
    println!("--- {} ---", policy);

    let logger = Logger::new(DedupHandler::new(
        ConsoleAppender::new().with_min_level(LogLevel::Debug),
        policy,
    ));

    // A request-scoped logger that repeats keys the base logger already set
    let base = logger.with(vec![
        Attr::string("service", "checkout"),
        Attr::string("user", "anonymous"),
    ]);
    let request = base.with(vec![Attr::string("user", "alice")]).with_group("http");

    request.info(
        "request started",
        vec![Attr::string("path", "/cart"), Attr::string("path", "/cart/items")],
    )?;
    warn!(request, "slow response"; "elapsed_ms" => 1250, "elapsed_ms" => 1300)?;

    // `time` is written by every sink, so the attribute is moved aside
    info!(base, "clock skew"; "time" => "yesterday")?;

    logger.flush()
}

fn main() -> Result<()> {
    println!("=== log_dedup - Basic Usage Example ===\n");

    for policy in [
        DedupPolicy::Overwrite,
        DedupPolicy::Ignore,
        DedupPolicy::Increment,
        DedupPolicy::Append,
    ] {
        demo(policy)?;
        println!();
    }

    println!("Builder API:");
    let logger = Logger::new(DedupHandler::increment(ConsoleAppender::new()));
    logger
        .warn_builder()
        .message("retrying upload")
        .attr("attempt", 2)
        .attr("attempt", 3)
        .group("s3", vec![Attr::string("bucket", "logs")])
        .location(module_path!(), file!(), line!())
        .log()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
