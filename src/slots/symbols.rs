use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbol classes. Every kind other than `Regular` is "special".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SymbolKind {
    #[default]
    Regular,
    Jackpot,
    Wild,
    Scatter,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 4] =
        [SymbolKind::Regular, SymbolKind::Jackpot, SymbolKind::Wild, SymbolKind::Scatter];

    pub const fn is_special(self) -> bool {
        !matches!(self, SymbolKind::Regular)
    }

    pub const fn label(self) -> &'static str {
        match self {
            SymbolKind::Regular => "regular",
            SymbolKind::Jackpot => "jackpot",
            SymbolKind::Wild => "wild",
            SymbolKind::Scatter => "scatter",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SymbolKindParseError {
    #[error("invalid symbol kind: '{0}'")]
    Invalid(String),
}

impl FromStr for SymbolKind {
    type Err = SymbolKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_ascii_lowercase();
        SymbolKind::ALL
            .into_iter()
            .find(|k| k.label() == t)
            .ok_or_else(|| SymbolKindParseError::Invalid(s.to_string()))
    }
}

/// A catalog entry. Immutable once the machine is built; grid cells share
/// it through `Arc<Symbol>`.
///
/// ```
/// use casino_rs::slots::{Symbol, SymbolKind};
///
/// let bell = Symbol::regular("bell", "Bell", "🔔", 30);
/// assert_eq!(bell.value(), 30);
/// assert!(!bell.is_special());
///
/// let wild = Symbol::wild("wild", "Wild", "⭐", 2.0);
/// assert_eq!(wild.kind(), SymbolKind::Wild);
/// assert_eq!(wild.multiplier(), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    id: String,
    name: String,
    glyph: String,
    value: u32,
    #[serde(default)]
    kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiplier: Option<f64>,
}

impl Symbol {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        value: u32,
        kind: SymbolKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            glyph: glyph.into(),
            value,
            kind,
            multiplier: None,
        }
    }

    pub fn regular(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        value: u32,
    ) -> Self {
        Self::new(id, name, glyph, value, SymbolKind::Regular)
    }

    pub fn jackpot(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        value: u32,
    ) -> Self {
        Self::new(id, name, glyph, value, SymbolKind::Jackpot)
    }

    pub fn wild(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        multiplier: f64,
    ) -> Self {
        Self::new(id, name, glyph, 0, SymbolKind::Wild).with_multiplier(multiplier)
    }

    pub fn scatter(
        id: impl Into<String>,
        name: impl Into<String>,
        glyph: impl Into<String>,
        multiplier: f64,
    ) -> Self {
        Self::new(id, name, glyph, 0, SymbolKind::Scatter).with_multiplier(multiplier)
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque rendering token (usually an emoji).
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    /// Base payout per matched cell.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn multiplier(&self) -> Option<f64> {
        self.multiplier
    }

    pub fn is_special(&self) -> bool {
        self.kind.is_special()
    }

    pub fn is_wild(&self) -> bool {
        self.kind == SymbolKind::Wild
    }

    pub fn is_jackpot(&self) -> bool {
        self.kind == SymbolKind::Jackpot
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph, self.name)
    }
}

/// The built-in eleven-symbol catalog, in draw order.
pub fn default_symbols() -> Vec<Symbol> {
    vec![
        Symbol::regular("cherry", "Cherry", "🍒", 5),
        Symbol::regular("lemon", "Lemon", "🍋", 10),
        Symbol::regular("orange", "Orange", "🍊", 15),
        Symbol::regular("watermelon", "Watermelon", "🍉", 20),
        Symbol::regular("grapes", "Grapes", "🍇", 25),
        Symbol::regular("bell", "Bell", "🔔", 30),
        Symbol::regular("seven", "Seven", "7️⃣", 77),
        Symbol::regular("diamond", "Diamond", "💎", 50),
        Symbol::jackpot("jackpot", "Jackpot", "💰", 100),
        Symbol::wild("wild", "Wild", "⭐", 2.0),
        Symbol::scatter("scatter", "Scatter", "🎲", 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_unique_ids() {
        let symbols = default_symbols();
        assert_eq!(symbols.len(), 11);
        let mut ids: Vec<&str> = symbols.iter().map(Symbol::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn special_flags_follow_kind() {
        let symbols = default_symbols();
        let special: Vec<&str> =
            symbols.iter().filter(|s| s.is_special()).map(Symbol::id).collect();
        assert_eq!(special, vec!["jackpot", "wild", "scatter"]);
        assert!(symbols[8].is_jackpot());
        assert!(symbols[9].is_wild());
    }

    #[test]
    fn kind_display_and_from_str() {
        assert_eq!(SymbolKind::Wild.to_string(), "wild");
        assert_eq!("Jackpot".parse::<SymbolKind>().unwrap(), SymbolKind::Jackpot);
        assert!("bonus".parse::<SymbolKind>().is_err());
    }

    #[test]
    fn symbol_json_defaults_to_regular() {
        let s: Symbol = serde_json::from_str(
            r#"{"id":"plum","name":"Plum","glyph":"P","value":12}"#,
        )
        .unwrap();
        assert_eq!(s.kind(), SymbolKind::Regular);
        assert_eq!(s.multiplier(), None);
    }
}
