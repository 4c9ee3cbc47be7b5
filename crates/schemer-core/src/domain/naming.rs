//! Identifier shortener.
//!
//! Derives table, column, join-table and constraint names that fit the
//! target dialect's identifier limit while staying readable and
//! deterministic.
//!
//! # Shortening
//!
//! A name that fits is returned as-is, byte for byte. A name that does not
//! fit is rebuilt as
//!
//! ```text
//! prefix + head(first) + "__" + head(second) + "_" + hh + suffix
//! ```
//!
//! where `hh` is two hex digits hashed from the **full** untruncated name,
//! and the two heads share what is left of the limit (a short fragment
//! keeps all of its bytes, the other one gets the rest). The result never
//! exceeds `max_identifier_length`, and is exactly that long for ASCII
//! names.
//!
//! Lengths are counted in UTF-8 bytes, the unit PostgreSQL and MySQL use
//! for their limits. Fragments are only ever cut on a `char` boundary, so a
//! multi-byte name may come out a byte or two short of the limit.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Dialect;

/// Separator between the two name fragments.
pub const SEPARATOR: &str = "__";

/// Length of the `_hh` hash tag appended to shortened names.
pub const HASH_TAG_WIDTH: usize = 3;

/// Words most engines refuse as unquoted table names.
const RESERVED_WORDS: &[&str] = &[
    "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "cross", "current", "date", "default", "delete", "desc", "distinct",
    "drop", "else", "end", "exists", "from", "full", "grant", "group", "having", "in", "index",
    "inner", "insert", "intersect", "into", "is", "join", "key", "left", "like", "limit", "not",
    "null", "offset", "on", "or", "order", "outer", "primary", "references", "right", "role",
    "select", "session", "set", "table", "then", "to", "union", "unique", "update", "user",
    "using", "values", "view", "when", "where", "with",
];

// ── Kinds ────────────────────────────────────────────────────────────────────

/// The schema object being named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierKind {
    Table,
    Column,
    /// `rel_<entity>__<relationship>`
    JoinTable,
    /// `fk_<entity>__<relationship>_id`
    #[serde(rename = "fk")]
    ForeignKey,
    /// `ux_<entity>__<column>`
    #[serde(rename = "ux")]
    UniqueConstraint,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 5] = [
        Self::Table,
        Self::Column,
        Self::JoinTable,
        Self::ForeignKey,
        Self::UniqueConstraint,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::JoinTable => "join-table",
            Self::ForeignKey => "fk",
            Self::UniqueConstraint => "ux",
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Table | Self::Column => "",
            Self::JoinTable => "rel_",
            Self::ForeignKey => "fk_",
            Self::UniqueConstraint => "ux_",
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::ForeignKey => "_id",
            _ => "",
        }
    }

    /// Whether the name is built from two fragments.
    pub const fn is_pair(self) -> bool {
        matches!(
            self,
            Self::JoinTable | Self::ForeignKey | Self::UniqueConstraint
        )
    }
}

// ── Request ──────────────────────────────────────────────────────────────────

/// Input to every naming operation.
///
/// `secondary` is ignored for single-fragment kinds and treated as empty
/// when a pair kind is requested without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingRequest<'a> {
    pub primary: &'a str,
    pub secondary: Option<&'a str>,
    pub dialect: Dialect,
    pub disable_snake_case: bool,
}

impl<'a> NamingRequest<'a> {
    /// Single-fragment request (table or column).
    pub fn new(primary: &'a str, dialect: Dialect) -> Self {
        Self {
            primary,
            secondary: None,
            dialect,
            disable_snake_case: false,
        }
    }

    /// Two-fragment request (join table or constraint).
    pub fn pair(primary: &'a str, secondary: &'a str, dialect: Dialect) -> Self {
        Self {
            secondary: Some(secondary),
            ..Self::new(primary, dialect)
        }
    }

    pub fn disable_snake_case(mut self, disable: bool) -> Self {
        self.disable_snake_case = disable;
        self
    }

    /// Whether fragments are snake_cased.
    pub fn snake_cased(&self) -> bool {
        self.dialect.folds_case() && !self.disable_snake_case
    }

    /// Build the identifier for `kind`.
    pub fn generate(&self, kind: IdentifierKind) -> String {
        let limit = self.dialect.max_identifier_length();

        if !kind.is_pair() {
            return shorten_single(&self.fold_single(self.primary), limit);
        }

        shorten_pair(
            kind.prefix(),
            &self.fold_pair(self.primary),
            &self.fold_pair(self.secondary.unwrap_or_default()),
            kind.suffix(),
            limit,
        )
    }

    /// The identifier for `kind` before any shortening.
    pub fn full_name(&self, kind: IdentifierKind) -> String {
        if !kind.is_pair() {
            return self.fold_single(self.primary);
        }
        format!(
            "{}{}{SEPARATOR}{}{}",
            kind.prefix(),
            self.fold_pair(self.primary),
            self.fold_pair(self.secondary.unwrap_or_default()),
            kind.suffix(),
        )
    }

    fn fold_single(&self, name: &str) -> String {
        if self.snake_cased() {
            snake_case(name)
        } else {
            name.to_lowercase()
        }
    }

    fn fold_pair(&self, name: &str) -> String {
        if self.snake_cased() {
            snake_case(name)
        } else {
            name.to_owned()
        }
    }

    pub fn table_name(&self) -> String {
        self.generate(IdentifierKind::Table)
    }

    pub fn column_name(&self) -> String {
        self.generate(IdentifierKind::Column)
    }

    pub fn join_table_name(&self) -> String {
        self.generate(IdentifierKind::JoinTable)
    }

    pub fn fk_constraint_name(&self) -> String {
        self.generate(IdentifierKind::ForeignKey)
    }

    pub fn ux_constraint_name(&self) -> String {
        self.generate(IdentifierKind::UniqueConstraint)
    }

    /// Table name for an entity, prefixed with `<table_prefix>_` when the
    /// folded name is a reserved word.
    ///
    /// When the prefixed name overflows, the prefix and the table share the
    /// budget like the two halves of a pair, so the table survives.
    pub fn entity_table_name(&self, table_prefix: &str) -> String {
        let limit = self.dialect.max_identifier_length();
        let table = self.fold_single(self.primary);
        if table_prefix.is_empty() || !is_reserved_word(&table) {
            return shorten_single(&table, limit);
        }
        shorten_joined("", &table_prefix.to_lowercase(), "_", &table, "", limit)
    }

    /// [`Self::entity_table_name`] before any shortening.
    pub fn entity_table_full_name(&self, table_prefix: &str) -> String {
        let table = self.fold_single(self.primary);
        if table_prefix.is_empty() || !is_reserved_word(&table) {
            return table;
        }
        format!("{}_{}", table_prefix.to_lowercase(), table)
    }
}

// ── Free functions ───────────────────────────────────────────────────────────

pub fn table_name(name: &str, dialect: Dialect, disable_snake_case: bool) -> String {
    NamingRequest::new(name, dialect)
        .disable_snake_case(disable_snake_case)
        .table_name()
}

pub fn column_name(name: &str, dialect: Dialect, disable_snake_case: bool) -> String {
    NamingRequest::new(name, dialect)
        .disable_snake_case(disable_snake_case)
        .column_name()
}

pub fn join_table_name(entity: &str, relationship: &str, dialect: Dialect) -> String {
    NamingRequest::pair(entity, relationship, dialect).join_table_name()
}

pub fn fk_constraint_name(entity: &str, relationship: &str, dialect: Dialect) -> String {
    NamingRequest::pair(entity, relationship, dialect).fk_constraint_name()
}

pub fn ux_constraint_name(
    entity: &str,
    column: &str,
    dialect: Dialect,
    disable_snake_case: bool,
) -> String {
    NamingRequest::pair(entity, column, dialect)
        .disable_snake_case(disable_snake_case)
        .ux_constraint_name()
}

/// Whether `name` (compared lower-cased) is a reserved SQL word.
pub fn is_reserved_word(name: &str) -> bool {
    let name = name.to_lowercase();
    RESERVED_WORDS.contains(&name.as_str())
}

// ============================================================================
// Case folding
// ============================================================================

/// Hibernate-style snake case.
///
/// An underscore goes before an uppercase letter only when it sits between
/// two lowercase letters, so acronyms stay glued: `entityName` becomes
/// `entity_name`, `PaginationAndDTO` becomes `pagination_anddto`. Dots turn
/// into underscores and the result is lower-cased.
pub fn snake_case(value: &str) -> String {
    let chars: Vec<char> = value
        .chars()
        .map(|c| if c == '.' { '_' } else { c })
        .collect();

    let mut out = String::with_capacity(value.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let boundary = i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_lowercase()
            && c.is_uppercase()
            && chars[i + 1].is_lowercase();
        if boundary {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

// ============================================================================
// Shortening
// ============================================================================

/// The longest prefix of `s` that is at most `n` bytes and ends on a
/// `char` boundary.
fn head(s: &str, n: usize) -> &str {
    if s.len() <= n {
        return s;
    }
    let mut end = n;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// 32-bit FNV-1a over the UTF-8 bytes.
fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(0x811c_9dc5, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

/// `_hh`: the FNV-1a hash of `full`, xor-folded to one byte.
fn hash_tag(full: &str) -> String {
    let [a, b, c, d] = fnv1a(full).to_be_bytes();
    format!("_{:02x}", a ^ b ^ c ^ d)
}

/// Split `budget` bytes between two fragments. Each keeps at least
/// half (rounded up for the first) unless the other one is shorter.
fn split_budget(budget: usize, first: usize, second: usize) -> (usize, usize) {
    let share = budget - budget / 2;
    let first = first.min(share.max(budget.saturating_sub(second)));
    let second = second.min(budget - first);
    (first, second)
}

fn shorten_single(name: &str, limit: usize) -> String {
    if name.len() <= limit {
        return name.to_owned();
    }
    let tag = hash_tag(name);
    format!("{}{}", head(name, limit.saturating_sub(HASH_TAG_WIDTH)), tag)
}

fn shorten_pair(prefix: &str, first: &str, second: &str, suffix: &str, limit: usize) -> String {
    shorten_joined(prefix, first, SEPARATOR, second, suffix, limit)
}

fn shorten_joined(
    prefix: &str,
    first: &str,
    separator: &str,
    second: &str,
    suffix: &str,
    limit: usize,
) -> String {
    let full = format!("{prefix}{first}{separator}{second}{suffix}");
    if full.len() <= limit {
        return full;
    }

    let tag = hash_tag(&full);
    let reserved = prefix.len() + separator.len() + HASH_TAG_WIDTH + suffix.len();
    let budget = limit.saturating_sub(reserved);
    let (first_len, second_len) = split_budget(budget, first.len(), second.len());

    format!(
        "{prefix}{}{separator}{}{tag}{suffix}",
        head(first, first_len),
        head(second, second_len),
    )
}

// ── tests ─────────────────────────────────────────────────────────────────────
