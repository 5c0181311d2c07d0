//! Line-oriented catalog file: `name,price,quantity,imageReference` per line.
//!
//! Fields are not escaped, which is why `ItemName` and image references refuse
//! commas and line breaks.

use std::path::{Path, PathBuf};

use vending_catalog::Item;
use vending_core::{ItemName, Money};

use super::r#trait::CatalogStore;
use crate::persistence::{PersistenceError, read_optional, write_atomically};

const FIELD_COUNT: usize = 4;

/// File-backed catalog. A missing file is an empty catalog.
#[derive(Debug, Clone)]
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for FileCatalogStore {
    fn load(&self) -> Result<Vec<Item>, PersistenceError> {
        let contents = read_optional(&self.path)?;
        let mut items = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            match parse_record(line) {
                Some(Ok(item)) => items.push(item),
                Some(Err(reason)) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        %reason,
                        "skipping unreadable catalog record"
                    );
                }
                None => {}
            }
        }

        tracing::debug!(path = %self.path.display(), count = items.len(), "catalog loaded");
        Ok(items)
    }

    fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
        let mut contents = String::new();
        for item in items {
            contents.push_str(&format_record(item));
            contents.push('\n');
        }
        write_atomically(&self.path, contents.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "catalog saved");
        Ok(())
    }
}

/// Parse one catalog line.
///
/// `None` means "not a record" (blank line or wrong field count) and is skipped
/// silently; `Some(Err(_))` means the shape was right but a field was unusable.
pub fn parse_record(line: &str) -> Option<Result<Item, String>> {
    let fields: Vec<&str> = line.split(',').collect();
    if line.trim().is_empty() || fields.len() != FIELD_COUNT {
        return None;
    }

    let parsed = (|| -> Result<Item, String> {
        let name = ItemName::new(fields[0]).map_err(|e| e.to_string())?;
        let price = fields[1].parse::<Money>().map_err(|e| e.to_string())?;
        let stock: u32 = fields[2]
            .trim()
            .parse()
            .map_err(|_| format!("invalid quantity {:?}", fields[2].trim()))?;
        Item::new(name, price, stock, fields[3].trim()).map_err(|e| e.to_string())
    })();
    Some(parsed)
}

pub fn format_record(item: &Item) -> String {
    format!(
        "{},{},{},{}",
        item.name(),
        item.unit_price(),
        item.stock(),
        item.image_reference()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::test_support::ScratchDir;
    use proptest::prelude::*;

    fn item(name: &str, cents: u64, stock: u32, image: &str) -> Item {
        Item::new(ItemName::new(name).unwrap(), Money::from_cents(cents), stock, image).unwrap()
    }

    #[test]
    fn parses_legacy_float_prices() {
        let parsed = parse_record("Cola,1.5,10,cola.png").unwrap().unwrap();
        assert_eq!(parsed, item("Cola", 150, 10, "cola.png"));
    }

    #[test]
    fn wrong_field_count_is_not_a_record() {
        assert!(parse_record("Cola,1.50,10").is_none());
        assert!(parse_record("Cola,Zero,1.50,10,cola.png").is_none());
        assert!(parse_record("").is_none());
    }

    #[test]
    fn bad_fields_are_reported() {
        assert!(parse_record("Cola,abc,10,cola.png").unwrap().is_err());
        assert!(parse_record("Cola,1.50,-3,cola.png").unwrap().is_err());
        assert!(parse_record(",1.50,3,cola.png").unwrap().is_err());
    }

    #[test]
    fn load_skips_malformed_lines() {
        let dir = ScratchDir::new();
        let path = dir.path("drinks.txt");
        std::fs::write(
            &path,
            "Cola,1.50,10,cola.png\nbroken line\nWater,two,3,water.png\n\nJuice,3.00,10,juice.png\n",
        )
        .unwrap();

        let items = FileCatalogStore::new(&path).load().unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name().as_str()).collect();
        assert_eq!(names, vec!["Cola", "Juice"]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = ScratchDir::new();
        let store = FileCatalogStore::new(dir.path("none.txt"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_writes_two_decimal_prices() {
        let dir = ScratchDir::new();
        let path = dir.path("drinks.txt");
        let store = FileCatalogStore::new(&path);
        store
            .save(&[item("Cola", 150, 10, "cola.png"), item("Water", 200, 3, "")])
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Cola,1.50,10,cola.png\nWater,2.00,3,\n"
        );
    }

    #[test]
    fn save_into_missing_directory_is_a_persistence_error() {
        let dir = ScratchDir::new();
        let store = FileCatalogStore::new(dir.path("gone/drinks.txt"));
        assert!(matches!(
            store.save(&[item("Cola", 150, 10, "")]),
            Err(PersistenceError::Io { .. })
        ));
    }

    fn arb_item() -> impl Strategy<Value = Item> {
        (
            "[A-Za-z][A-Za-z0-9 ]{0,12}[A-Za-z0-9]",
            0u64..100_000,
            0u32..1_000,
            "[a-z0-9_./]{0,16}",
        )
            .prop_map(|(name, cents, stock, image)| item(&name, cents, stock, &image))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: save(load()) reproduces a well-formed catalog.
        #[test]
        fn save_then_load_preserves_catalog(items in prop::collection::vec(arb_item(), 0..12)) {
            let dir = ScratchDir::new();
            let store = FileCatalogStore::new(dir.path("drinks.txt"));

            store.save(&items).unwrap();
            let loaded = store.load().unwrap();
            prop_assert_eq!(&loaded, &items);

            store.save(&loaded).unwrap();
            prop_assert_eq!(store.load().unwrap(), items);
        }
    }
}
