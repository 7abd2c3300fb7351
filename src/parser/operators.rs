//! The mutable operator table consulted by the expression parser.
//!
//! Every operator is an entry keyed by lexeme and fixity class, so one
//! lexeme can hold a prefix and an infix entry at the same time (`-` is
//! the usual example). Fixity declarations executed mid-parse mutate the
//! table through `declare`, and the tokens after the declaration are
//! parsed under the updated table.

use std::collections::HashMap;

/// Precedence of `=>`. Everything structural sits below the
/// conventional user range, which starts at 40.
pub const PREC_LAMBDA: u32 = 10;
/// Precedence of `,`.
pub const PREC_COMMA: u32 = 15;
/// Precedence of `:`.
pub const PREC_ANNOTATION: u32 = 20;
/// Precedence of `->`.
pub const PREC_ARROW: u32 = 25;
/// Precedence of `@`.
pub const PREC_PARAM: u32 = 30;
/// Binding level at which only juxtaposition continues an expression.
pub const PREC_ATOM: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Infix,
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorEntry {
    pub name: String,
    pub fixity: Fixity,
    pub precedence: u32,
    pub assoc: Assoc,
}

#[derive(Debug, Clone, Default)]
struct OperatorSlots {
    prefix: Option<OperatorEntry>,
    infix: Option<OperatorEntry>,
    suffix: Option<OperatorEntry>,
}

impl OperatorSlots {
    fn slot(&self, fixity: Fixity) -> &Option<OperatorEntry> {
        match fixity {
            Fixity::Prefix => &self.prefix,
            Fixity::Infix => &self.infix,
            Fixity::Suffix => &self.suffix,
        }
    }

    fn slot_mut(&mut self, fixity: Fixity) -> &mut Option<OperatorEntry> {
        match fixity {
            Fixity::Prefix => &mut self.prefix,
            Fixity::Infix => &mut self.infix,
            Fixity::Suffix => &mut self.suffix,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperatorTable {
    slots: HashMap<String, OperatorSlots>,
    order: Vec<(String, Fixity)>,
}

impl OperatorTable {
    pub fn new() -> OperatorTable {
        OperatorTable {
            slots: HashMap::new(),
            order: vec![],
        }
    }

    /// The table every parse starts from: just the structural operators.
    /// `=>` stays the lowest-precedence table entry, so a lambda body
    /// extends as far right as possible.
    pub fn standard() -> OperatorTable {
        let mut table = OperatorTable::new();
        table.declare("=>", Fixity::Infix, PREC_LAMBDA, Assoc::Right);
        table.declare(",", Fixity::Infix, PREC_COMMA, Assoc::Right);
        table.declare(":", Fixity::Infix, PREC_ANNOTATION, Assoc::None);
        table.declare("->", Fixity::Infix, PREC_ARROW, Assoc::Right);
        table.declare("@", Fixity::Infix, PREC_PARAM, Assoc::None);
        table
    }

    /// Inserts or overwrites the entry for `name` in the given fixity
    /// class. Redeclaration replaces the old entry and takes effect for
    /// all tokens parsed afterwards.
    pub fn declare(&mut self, name: &str, fixity: Fixity, precedence: u32, assoc: Assoc) {
        let slots = self.slots.entry(name.to_string()).or_default();
        let slot = slots.slot_mut(fixity);

        if slot.is_none() {
            self.order.push((name.to_string(), fixity));
        }
        *slot = Some(OperatorEntry {
            name: name.to_string(),
            fixity,
            precedence,
            assoc,
        });
    }

    pub fn lookup(&self, name: &str, fixity: Fixity) -> Option<&OperatorEntry> {
        self.slots.get(name).and_then(|slots| slots.slot(fixity).as_ref())
    }

    /// Whether any fixity class has an entry for `name`.
    pub fn is_declared(&self, name: &str) -> bool {
        self.slots.get(name).map_or(false, |slots| {
            slots.prefix.is_some() || slots.infix.is_some() || slots.suffix.is_some()
        })
    }

    /// All entries in declaration order. Redeclarations keep the slot's
    /// original position.
    pub fn entries(&self) -> Vec<&OperatorEntry> {
        self.order
            .iter()
            .filter_map(|(name, fixity)| self.lookup(name, *fixity))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for OperatorTable {
    fn default() -> OperatorTable {
        OperatorTable::standard()
    }
}
