use anyhow::Context;

use vending_app::Command;
use vending_infra::{VendingConfig, open_file_service};

fn main() -> anyhow::Result<()> {
    vending_observability::init();

    let command = Command::parse(std::env::args().skip(1))?;
    let config = VendingConfig::from_env().context("reading configuration")?;
    let mut service = open_file_service(&config).with_context(|| {
        format!(
            "opening catalog {} and ledger {}",
            config.catalog_path.display(),
            config.ledger_path.display()
        )
    })?;

    let stdout = std::io::stdout();
    vending_app::run(&mut service, command, &mut stdout.lock())
}
