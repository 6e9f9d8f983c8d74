//! Fetch one document and print its attributes, links and embedded keys.
//!
//! ```text
//! RUST_LOG=hal_resource=debug cargo run --example browse -- https://api.example.com /accounts TOKEN
//! ```

use futures_util::StreamExt;
use hal_resource::{GENERIC_RESOURCE, Paginator, Params, ResourceClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let root = args.next().ok_or("usage: browse <root> [href] [token]")?;
    let href = args.next().unwrap_or_else(|| "/".to_string());

    let mut builder = ResourceClient::builder(root);
    if let Some(token) = args.next() {
        builder = builder.credential(token);
    }
    let client = builder.build()?;

    let found = client
        .find_by_url(&GENERIC_RESOURCE, &href, &Params::new())
        .await?;
    let Some(node) = found else {
        println!("{href}: not found");
        return Ok(());
    };

    println!("{} ({})", node.href(), node.resource_type());
    for (name, value) in node.attributes() {
        println!("  {name} = {value}");
    }
    for (name, link) in node.links() {
        println!("  -> {name}: {}", link.href());
    }

    for (name, embedded) in node.embedded() {
        println!("  embedded {name}: {} resource(s)", embedded.nodes().len());
    }

    if let Some(list) = node.embedded().keys().next() {
        let mut entries = Paginator::new(&node, node.href(), list.as_str()).entries().take(5);
        while let Some(entry) = entries.next().await {
            println!("  * {}", entry?.href());
        }
    }

    Ok(())
}
