use anyhow::{bail, Context, Result};
use electromonitor_core::format::format_amount;
use electromonitor_service::{config::AppConfig, observability};
use std::env;

fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        bail!("usage: bill-estimate <kWh> [<kWh>...]");
    }

    // Uses the configured slabs (ELECTROMONITOR_CONFIG), or the default table.
    let cfg = AppConfig::load()?;
    let tariff = cfg.tariff()?;

    for arg in &args {
        let usage: f64 = arg
            .trim()
            .parse()
            .with_context(|| format!("invalid usage '{arg}'"))?;
        if !usage.is_finite() || usage <= 0.0 {
            bail!("usage must be a positive number, got '{arg}'");
        }

        println!("{usage} kWh -> {}", format_amount(tariff.payable(usage)));
        for charge in tariff.breakdown(usage) {
            let upto = charge
                .upto
                .map(|u| u.to_string())
                .unwrap_or_else(|| "∞".to_string());
            println!(
                "  {:>6} - {:<6} {:>8} x {:<4} = {}",
                charge.from,
                upto,
                charge.units,
                format_amount(charge.rate),
                format_amount(charge.amount)
            );
        }
    }

    Ok(())
}
