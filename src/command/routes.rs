use anyhow::Result;

use crate::config::DashConfig;
use crate::pages::PAGES;

pub fn run_routes(config: &DashConfig) -> Result<()> {
    println!("Routes (default: {}):", config.default_route);
    for binding in &config.routes {
        let fragments = PAGES
            .iter()
            .find(|p| p.view == binding.view)
            .map(|p| p.fragments.len());
        match fragments {
            Some(n) => println!("  #/{:<10} {:<15} {} fragment(s)", binding.route, binding.view, n),
            None => println!("  #/{:<10} {:<15} (no built-in page)", binding.route, binding.view),
        }
    }

    println!(
        "\nRegistration: up to {} attempt(s), {}ms apart",
        config.retry.max_attempts, config.retry.delay_ms
    );
    Ok(())
}
