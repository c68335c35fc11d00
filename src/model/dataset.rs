//! Named, ordered collection of tables

use indexmap::IndexMap;

use super::table::Table;
use crate::error::{Error, Result};

/// An ordered set of tables with unique names.
///
/// Tables are keyed by the name they had when added; rename them with
/// [`DataSet::rename_table`] rather than by editing `Table::name` in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    /// Dataset name (not part of the encoding)
    pub name: String,
    tables: IndexMap<String, Table>,
}

impl DataSet {
    /// Create an empty dataset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    /// Append a table, keyed by its name
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.tables.contains_key(&table.name) {
            return Err(Error::DuplicateTable(table.name));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Remove a table, keeping the order of the others
    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        self.tables.shift_remove(name)
    }

    /// Rename a table in place, keeping its position
    pub fn rename_table(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        if !self.tables.contains_key(from) {
            return Err(Error::UnknownTable(from.to_string()));
        }
        if from == to {
            return Ok(());
        }
        if self.tables.contains_key(&to) {
            return Err(Error::DuplicateTable(to));
        }
        let Some((index, _, mut table)) = self.tables.shift_remove_full(from) else {
            return Err(Error::UnknownTable(from.to_string()));
        };
        table.name = to.clone();
        self.tables.shift_insert(index, to, table);
        Ok(())
    }

    /// Tables in order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Table names in order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_and_lookup() {
        let mut ds = DataSet::new("set");
        ds.add_table(Table::new("b")).unwrap();
        ds.add_table(Table::new("a")).unwrap();

        assert_eq!(ds.table_names().collect::<Vec<_>>(), ["b", "a"]);
        assert!(ds.table("a").is_some());
        assert!(ds.table("c").is_none());
    }

    #[test]
    fn test_duplicate_table() {
        let mut ds = DataSet::default();
        ds.add_table(Table::new("t")).unwrap();
        assert!(matches!(ds.add_table(Table::new("t")), Err(Error::DuplicateTable(_))));
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut ds = DataSet::default();
        for name in ["one", "two", "three"] {
            ds.add_table(Table::new(name)).unwrap();
        }

        ds.rename_table("two", "deux").unwrap();
        assert_eq!(ds.table_names().collect::<Vec<_>>(), ["one", "deux", "three"]);
        assert_eq!(ds.table("deux").unwrap().name, "deux");

        assert!(matches!(ds.rename_table("one", "three"), Err(Error::DuplicateTable(_))));
        assert!(matches!(
            ds.rename_table("missing", "other"),
            Err(Error::UnknownTable(ref name)) if name == "missing"
        ));
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut ds = DataSet::default();
        for name in ["one", "two", "three"] {
            ds.add_table(Table::new(name)).unwrap();
        }

        assert_eq!(ds.remove_table("two").map(|t| t.name), Some("two".to_string()));
        assert!(ds.remove_table("two").is_none());
        assert_eq!(ds.table_names().collect::<Vec<_>>(), ["one", "three"]);
    }
}
