//! Headless staff tool over the vending core.
//!
//! ```text
//! vending [catalog]                          list items
//! vending orders                             print the order ledger
//! vending report                             best seller / highest sale
//! vending buy <item> <qty>... [--yes]        price a cart, commit only with --yes
//! vending add <name> <price> <stock> [image] add a catalog item
//! vending set <name> <field> <value>         field: name | price | stock | image
//! ```

use std::io::Write;

use anyhow::{Context, bail};

use vending_catalog::{Item, ItemUpdate};
use vending_core::{ItemName, Money};
use vending_infra::{CatalogStore, CheckoutOutcome, OrderLedger, VendingService};
use vending_sales::Decision;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Catalog,
    Orders,
    Report,
    Buy {
        lines: Vec<(String, i64)>,
        confirm: bool,
    },
    Add {
        name: String,
        price: String,
        stock: String,
        image: String,
    },
    Set {
        name: String,
        field: String,
        value: String,
    },
}

impl Command {
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut args: Vec<String> = args.into_iter().collect();
        if args.is_empty() {
            return Ok(Command::Catalog);
        }
        let verb = args.remove(0);

        match verb.as_str() {
            "catalog" => Ok(Command::Catalog),
            "orders" => Ok(Command::Orders),
            "report" => Ok(Command::Report),
            "buy" => {
                let confirm = args.iter().any(|a| a == "--yes");
                args.retain(|a| a != "--yes");
                if args.is_empty() || args.len() % 2 != 0 {
                    bail!("usage: vending buy <item> <qty> [<item> <qty>...] [--yes]");
                }
                let lines = args
                    .chunks(2)
                    .map(|pair| {
                        let quantity = pair[1]
                            .parse::<i64>()
                            .with_context(|| format!("quantity for {:?} is not a number", pair[0]))?;
                        Ok((pair[0].clone(), quantity))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(Command::Buy { lines, confirm })
            }
            "add" => match args.as_slice() {
                [name, price, stock] => Ok(Command::Add {
                    name: name.clone(),
                    price: price.clone(),
                    stock: stock.clone(),
                    image: String::new(),
                }),
                [name, price, stock, image] => Ok(Command::Add {
                    name: name.clone(),
                    price: price.clone(),
                    stock: stock.clone(),
                    image: image.clone(),
                }),
                _ => bail!("usage: vending add <name> <price> <stock> [image]"),
            },
            "set" => match args.as_slice() {
                [name, field, value] => Ok(Command::Set {
                    name: name.clone(),
                    field: field.clone(),
                    value: value.clone(),
                }),
                _ => bail!("usage: vending set <name> <name|price|stock|image> <value>"),
            },
            other => bail!("unknown command {other:?} (try catalog, orders, report, buy, add, set)"),
        }
    }
}

/// Execute one command against the service, writing human-readable output to `out`.
pub fn run<C, L>(
    service: &mut VendingService<C, L>,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    C: CatalogStore,
    L: OrderLedger,
{
    match command {
        Command::Catalog => {
            for item in service.list_catalog() {
                writeln!(
                    out,
                    "{:<20} {:>8} {:>5}",
                    item.name().as_str(),
                    item.unit_price().to_string(),
                    item.stock()
                )?;
            }
        }
        Command::Orders => {
            let orders = service.get_orders().context("reading order ledger")?;
            if orders.is_empty() {
                writeln!(out, "No orders recorded yet.")?;
            }
            for order in orders {
                writeln!(out, "{order}\n")?;
            }
        }
        Command::Report => {
            let report = service.generate_report().context("reading order ledger")?;
            writeln!(out, "{report}")?;
        }
        Command::Buy { lines, confirm } => {
            let mut session = service.begin_checkout();
            for (name, quantity) in &lines {
                service.add_to_cart(&mut session, name, *quantity)?;
            }
            let summary = service.checkout(&mut session)?;
            writeln!(out, "{summary}")?;

            match service.confirm(&mut session, Decision::from(confirm))? {
                CheckoutOutcome::Committed(record) => {
                    tracing::debug!(order_id = ?record.order_id, "sale completed from command line");
                    writeln!(out, "Purchase complete.")?;
                }
                CheckoutOutcome::Declined => writeln!(out, "Not purchased (pass --yes to confirm).")?,
            }
        }
        Command::Add {
            name,
            price,
            stock,
            image,
        } => {
            let item = Item::new(
                ItemName::new(name)?,
                price.parse::<Money>()?,
                parse_stock(&stock)?,
                image,
            )?;
            let name = item.name().clone();
            service.add_item(item)?;
            writeln!(out, "Added {name}.")?;
        }
        Command::Set { name, field, value } => {
            let update = match field.as_str() {
                "name" => ItemUpdate::Rename(ItemName::new(value)?),
                "price" => ItemUpdate::Price(value.parse::<Money>()?),
                "stock" => ItemUpdate::Stock(parse_stock(&value)?),
                "image" => ItemUpdate::ImageReference(value),
                other => bail!("unknown field {other:?} (expected name, price, stock or image)"),
            };
            let item = service.update_item(&name, update)?;
            writeln!(
                out,
                "Updated {}: {} {} {}",
                item.name(),
                item.unit_price(),
                item.stock(),
                item.image_reference()
            )?;
        }
    }
    Ok(())
}

fn parse_stock(value: &str) -> anyhow::Result<u32> {
    value
        .trim()
        .parse()
        .with_context(|| format!("stock {value:?} must be a whole number of units"))
}
