//! Function catalog
//!
//! A metadata-only registry of spreadsheet functions: name, arity bounds,
//! category. The builder consults it to validate calls at build time; it
//! never evaluates anything. Domain packs (finance templates, lab
//! worksheets) extend the built-in set through [`FunctionCatalog::register`].

use crate::error::{FormulaError, FormulaResult};
use ahash::AHashMap;
use once_cell::sync::Lazy;

/// Function category, used for browsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    Math,
    Statistical,
    Logical,
    Text,
    Lookup,
    DateTime,
    Financial,
}

/// Function metadata
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Category
    pub category: FunctionCategory,
}

impl FunctionDef {
    /// Whether a call with `actual` arguments satisfies the arity bounds
    pub fn accepts(&self, actual: usize) -> bool {
        actual >= self.min_args && self.max_args.map_or(true, |max| actual <= max)
    }

    /// Human-readable arity, for error messages
    pub fn arity(&self) -> String {
        match (self.min_args, self.max_args) {
            (min, Some(max)) if min == max => format!("{}", min),
            (min, Some(max)) => format!("{}-{}", min, max),
            (min, None) => format!("at least {}", min),
        }
    }
}

/// Arity table entry: (name, min_args, max_args)
type ArityEntry = (&'static str, usize, Option<usize>);

const MATH_FUNCTIONS: &[ArityEntry] = &[
    ("SUM", 1, None),
    ("PRODUCT", 1, None),
    ("ABS", 1, Some(1)),
    ("ROUND", 2, Some(2)),
    ("ROUNDUP", 2, Some(2)),
    ("ROUNDDOWN", 2, Some(2)),
    ("INT", 1, Some(1)),
    ("MOD", 2, Some(2)),
    ("SQRT", 1, Some(1)),
    ("POWER", 2, Some(2)),
    ("EXP", 1, Some(1)),
    ("LN", 1, Some(1)),
    ("LOG", 1, Some(2)),
    ("LOG10", 1, Some(1)),
];

const STATISTICAL_FUNCTIONS: &[ArityEntry] = &[
    ("AVERAGE", 1, None),
    ("COUNT", 1, None),
    ("COUNTA", 1, None),
    ("MAX", 1, None),
    ("MIN", 1, None),
    ("MEDIAN", 1, None),
    ("STDEV", 1, None),
    ("VAR", 1, None),
];

const LOGICAL_FUNCTIONS: &[ArityEntry] = &[
    ("IF", 2, Some(3)),
    ("AND", 1, None),
    ("OR", 1, None),
    ("NOT", 1, Some(1)),
    ("IFERROR", 2, Some(2)),
];

const TEXT_FUNCTIONS: &[ArityEntry] = &[
    ("CONCATENATE", 1, None),
    ("LEFT", 1, Some(2)),
    ("RIGHT", 1, Some(2)),
    ("MID", 3, Some(3)),
    ("LEN", 1, Some(1)),
    ("LOWER", 1, Some(1)),
    ("UPPER", 1, Some(1)),
    ("TRIM", 1, Some(1)),
    ("TEXT", 2, Some(2)),
];

const LOOKUP_FUNCTIONS: &[ArityEntry] = &[
    ("VLOOKUP", 3, Some(4)),
    ("HLOOKUP", 3, Some(4)),
    ("INDEX", 2, Some(3)),
    ("MATCH", 2, Some(3)),
    ("OFFSET", 3, Some(5)),
];

const DATETIME_FUNCTIONS: &[ArityEntry] = &[
    ("DATE", 3, Some(3)),
    ("TODAY", 0, Some(0)),
    ("NOW", 0, Some(0)),
    ("YEAR", 1, Some(1)),
    ("MONTH", 1, Some(1)),
    ("DAY", 1, Some(1)),
    ("EDATE", 2, Some(2)),
];

const FINANCIAL_FUNCTIONS: &[ArityEntry] = &[
    ("NPV", 2, None),
    ("IRR", 1, Some(2)),
    ("PMT", 3, Some(5)),
    ("PV", 3, Some(5)),
    ("FV", 3, Some(5)),
    ("RATE", 3, Some(6)),
    ("NPER", 3, Some(5)),
    ("SLN", 3, Some(3)),
    ("SYD", 4, Some(4)),
    ("DB", 4, Some(5)),
    ("DDB", 4, Some(5)),
];

/// Function registry keyed by uppercase name
#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    functions: AHashMap<String, FunctionDef>,
}

impl FunctionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding all built-in functions
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        catalog.register_table(MATH_FUNCTIONS, FunctionCategory::Math);
        catalog.register_table(STATISTICAL_FUNCTIONS, FunctionCategory::Statistical);
        catalog.register_table(LOGICAL_FUNCTIONS, FunctionCategory::Logical);
        catalog.register_table(TEXT_FUNCTIONS, FunctionCategory::Text);
        catalog.register_table(LOOKUP_FUNCTIONS, FunctionCategory::Lookup);
        catalog.register_table(DATETIME_FUNCTIONS, FunctionCategory::DateTime);
        catalog.register_table(FINANCIAL_FUNCTIONS, FunctionCategory::Financial);

        catalog
    }

    fn register_table(&mut self, table: &[ArityEntry], category: FunctionCategory) {
        for &(name, min_args, max_args) in table {
            self.register(FunctionDef {
                name,
                min_args,
                max_args,
                category,
            });
        }
    }

    /// Register a function (replaces any prior definition of the same name)
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Whether the catalog knows this function
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_uppercase())
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Check a call against the catalog: known name, acceptable arity
    pub fn validate_call(&self, name: &str, actual: usize) -> FormulaResult<()> {
        let def = self
            .get(name)
            .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

        if !def.accepts(actual) {
            return Err(FormulaError::ArgumentCount {
                function: def.name.to_string(),
                expected: def.arity(),
                actual,
            });
        }

        Ok(())
    }
}

/// The process-wide built-in catalog
static DEFAULT_CATALOG: Lazy<FunctionCatalog> = Lazy::new(FunctionCatalog::builtin);

/// Access the shared built-in catalog
pub fn default_catalog() -> &'static FunctionCatalog {
    &DEFAULT_CATALOG
}
