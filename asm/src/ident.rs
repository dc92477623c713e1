use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ident {
    /// Address of the statement it annotates.
    Label,
    /// Value given by `.define`.
    Const,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub kind: Ident,
    pub value: u16,
    pub line: usize,
}

/// Labels and constants share one namespace.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Idents(IndexMap<String, Symbol>);

impl Idents {
    pub fn new() -> Self {
        Idents(IndexMap::new())
    }

    pub fn define(&mut self, name: &str, kind: Ident, value: u16, line: usize) -> Result<(), Error> {
        if self.0.contains_key(name) {
            return Err(Error::DuplicateSymbol(name.to_string()));
        }
        self.0.insert(name.to_string(), Symbol { kind, value, line });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<u16, Error> {
        self.0
            .get(name)
            .map(|sym| sym.value)
            .ok_or_else(|| Error::UndefinedSymbol(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn define_and_lookup() {
        let mut idents = Idents::new();
        idents.define("loop", Ident::Label, 4, 2).unwrap();
        idents.define("LIMIT", Ident::Const, 0x1FF, 1).unwrap();
        assert_eq!(idents.lookup("loop").unwrap(), 4);
        assert_eq!(idents.lookup("LIMIT").unwrap(), 0x1FF);
        assert_eq!(idents.get("LIMIT").unwrap().kind, Ident::Const);
        assert_eq!(idents.len(), 2);
    }

    #[test]
    fn one_namespace_for_both_kinds() {
        let mut idents = Idents::new();
        idents.define("x", Ident::Const, 1, 1).unwrap();
        let err = idents.define("x", Ident::Label, 0, 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateSymbolError);
        // the first definition survives
        assert_eq!(idents.get("x").unwrap().line, 1);
    }

    #[test]
    fn undefined() {
        let err = Idents::new().lookup("nowhere").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedSymbolError);
    }
}
